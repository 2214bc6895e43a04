//! Handlers for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your settings", path.display()));
    output::note("2. Set SUPABASE_URL and SUPABASE_ANON_KEY for the hosted backend");
    output::note(&format!(
        "3. Run: tirestock config validate -c {}",
        path.display()
    ));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load_or_default(path)?;
    let local = config.local.resolve_path()?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "path": path.display().to_string(),
            "logging": { "level": config.logging.level, "format": config.logging.format },
            "supabase": {
                "configured": config.supabase.is_configured(),
                "url": config.supabase.url,
                "timeout_ms": config.supabase.timeout_ms,
                "retry_max_attempts": config.supabase.retry_max_attempts,
            },
            "local": { "path": local.display().to_string() },
            "ledger": {
                "strict": config.ledger.strict,
                "default_min_stock": config.ledger.default_min_stock,
            },
            "session": { "user_id": config.session.user_id },
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("Path", path.display());
    output::field("Log level", &config.logging.level);
    output::field("Log format", &config.logging.format);

    output::section("Hosted Backend");
    if config.supabase.is_configured() {
        output::field("URL", &config.supabase.url);
        output::field("Timeout", format!("{}ms", config.supabase.timeout_ms));
        output::field("Retries", config.supabase.retry_max_attempts);
    } else {
        output::note("(not configured, local storage only)");
    }

    output::section("Local Storage");
    output::field("Path", local.display());

    output::section("Ledger");
    output::field("Strict", if config.ledger.strict { "yes" } else { "no" });
    output::field("Min stock", config.ledger.default_min_stock);

    output::section("Session");
    output::field(
        "User",
        config
            .session
            .user_id
            .as_deref()
            .unwrap_or("(signed out)"),
    );
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    output::section("Config Validation");
    output::field("Path", path.display());
    let config = Config::load(path)?;
    output::success("Config file is valid");

    if config.session.user().is_none() {
        output::warning("No [session] user_id: commands will fail until one is set");
    }
    if !config.supabase.is_configured() {
        output::note("No hosted backend configured; records stay local");
    }

    output::field(
        "Next",
        format!("tirestock config show -c {}", path.display()),
    );
    Ok(())
}

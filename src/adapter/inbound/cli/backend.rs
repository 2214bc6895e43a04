//! Handlers for the `backend` command group.

use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use serde_json::json;

use crate::adapter::inbound::cli::command::MigrateArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::store::BackendKind;

/// Execute `backend status`.
pub async fn execute_status(config: &Config) -> Result<()> {
    let inventory = super::open(config).await?;
    let pending = inventory.pending_migration().await?;
    let backend = inventory.backend();
    let remote_configured = config.supabase.is_configured();

    if output::is_json() {
        output::json_output(json!({
            "command": "backend.status",
            "active": backend.as_str(),
            "remote_configured": remote_configured,
            "pending_local_tires": pending,
            "user": inventory.user().id,
        }));
        return Ok(());
    }

    output::section("Backend");
    output::field(
        "Active",
        match backend {
            BackendKind::Remote => output::positive(backend),
            BackendKind::Local => output::highlight(backend),
        },
    );
    output::field(
        "Remote",
        if remote_configured {
            config.supabase.url.clone()
        } else {
            output::muted("not configured")
        },
    );
    output::field("User", &inventory.user().id);
    output::field("Pending", format!("{pending} local tires"));

    if pending > 0 && remote_configured {
        output::hint("Run `tirestock backend migrate` to copy them to the hosted backend");
    }
    Ok(())
}

/// Execute `backend migrate`.
pub async fn execute_migrate(config: &Config, args: MigrateArgs) -> Result<()> {
    let inventory = super::open(config).await?;
    let pending = inventory.pending_migration().await?;
    if pending == 0 {
        if output::is_json() {
            output::json_output(json!({ "command": "backend.migrate", "migrated": 0 }));
        } else {
            output::note("No local tires to migrate");
        }
        return Ok(());
    }

    if !args.yes && !output::is_json() {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Copy {pending} local tires to the hosted backend? Local movement history is not copied"
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            output::warning("Migration cancelled");
            return Ok(());
        }
    }

    let pb = output::spinner("Migrating tires");
    let result = inventory
        .migrate(|done, total| pb.set_message(format!("Migrating tires {done}/{total}")))
        .await;

    match result {
        Ok(report) => {
            // The inventory reports the outcome as a notice.
            pb.finish_and_clear();
            if output::is_json() {
                output::json_output(json!({
                    "command": "backend.migrate",
                    "migrated": report.migrated,
                    "active": inventory.backend().as_str(),
                }));
            }
            Ok(())
        }
        Err(err) => {
            output::spinner_fail(&pb, "Migration failed");
            Err(err)
        }
    }
}

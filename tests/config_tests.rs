use std::fs;

use tirestock::error::{ConfigError, Error};
use tirestock::infrastructure::config::settings::Config;

fn write_config(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn config_loads_every_section_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
[logging]
level = "info"
format = "json"

[local]
path = "/srv/tirestock"

[ledger]
strict = true
default_min_stock = 2

[session]
user_id = "shop-9"
email = "front@shop.test"
"#,
    );

    let config = Config::load(&path).unwrap();
    assert_eq!(config.logging.format, "json");
    assert!(config.ledger.strict);
    assert_eq!(config.ledger.default_min_stock, 2);
    assert_eq!(
        config.local.resolve_path().unwrap(),
        std::path::PathBuf::from("/srv/tirestock")
    );
    let user = config.session.user().unwrap();
    assert_eq!(user.id, "shop-9");
    assert_eq!(user.email.as_deref(), Some("front@shop.test"));
}

#[test]
fn config_rejects_remote_without_anon_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[supabase]\nurl = \"https://demo.supabase.co\"\n");

    if std::env::var("SUPABASE_ANON_KEY").is_ok() {
        return;
    }
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::MissingField { field: "supabase.anon_key" })
    ));
}

#[test]
fn config_rejects_unknown_log_level() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[logging]\nlevel = \"loud=everything=now\"\n");
    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::InvalidValue { field: "logging.level", .. }))
    ));
}

#[test]
fn missing_file_is_a_read_error_but_load_or_default_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
    let config = Config::load_or_default(&path).unwrap();
    assert_eq!(config.ledger.default_min_stock, 5);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[ledger\nstrict = true\n");
    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

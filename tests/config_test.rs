use rask_logger::app::{Config, ConfigError};
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn clean_all_env_vars() {
    let env_vars = [
        "INSTANCE_ID",
        "APP_NAME",
        "APP_ENV",
        "APP_VERSION",
        "LOG_SILENT",
        "CONFIG_FILE",
        "ERROR_TYPES",
    ];

    unsafe {
        for var in &env_vars {
            std::env::remove_var(var);
        }
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_from_file() {
    let file = write_config(
        r#"
instance_id = "pod-7"
app = "billing"
env = "staging"
app_version = "3.1.0"
silent = true
error_types = ["PimError:akeneo"]

[fields]
team = "payments"
region = "eu-west-1"
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.instance_id.as_deref(), Some("pod-7"));
    assert_eq!(config.app, "billing");
    assert_eq!(config.env, "staging");
    assert_eq!(config.app_version, "3.1.0");
    assert!(config.silent);
    assert_eq!(config.error_types, vec!["PimError:akeneo"]);
    assert_eq!(config.fields.get("team").and_then(|v| v.as_str()), Some("payments"));

    let logger = config.build_logger().unwrap();
    assert_eq!(logger.instance_id(), "pod-7");
    assert_eq!(logger.metadata().get("region").and_then(|v| v.as_str()), Some("eu-west-1"));
}

#[test]
fn test_config_file_defaults_missing_keys() {
    let file = write_config("instance_id = \"pod-8\"\n");
    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.app, Config::default().app);
    assert!(!config.silent);
    assert!(config.fields.is_empty());
}

#[test]
fn test_config_file_errors() {
    let missing = Config::from_file("/nonexistent/rask-logger.toml");
    assert!(matches!(missing, Err(ConfigError::FileError(_))));

    let file = write_config("app = [");
    assert!(matches!(Config::from_file(file.path()), Err(ConfigError::ParseError(_))));

    let file = write_config("instance_id = \"pod\"\nerror_types = [\"broken\"]\n");
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::InvalidErrorType(_))
    ));
}

#[test]
#[serial]
fn test_resolve_prefers_config_file() {
    clean_all_env_vars();
    let file = write_config("instance_id = \"from-file\"\napp = \"file-app\"\n");

    let path = file.path().to_str().unwrap().to_string();
    let config = Config::from_args(["rask-logger", "--config-file", path.as_str()])
        .unwrap()
        .resolve()
        .unwrap();

    assert_eq!(config.instance_id.as_deref(), Some("from-file"));
    assert_eq!(config.app, "file-app");
}

#[test]
#[serial]
fn test_env_overrides_defaults() {
    clean_all_env_vars();
    unsafe {
        std::env::set_var("APP_NAME", "from-env");
        std::env::set_var("APP_ENV", "prod");
        std::env::set_var("INSTANCE_ID", "pod-env");
    }

    let config = Config::from_args(["rask-logger"]).unwrap();
    assert_eq!(config.app, "from-env");
    assert_eq!(config.env, "prod");
    assert_eq!(config.instance_id.as_deref(), Some("pod-env"));

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_instance_id_defaults_to_hostname() {
    clean_all_env_vars();
    let config = Config::from_env().unwrap();

    let expected = hostname::get().ok().and_then(|h| h.into_string().ok());
    assert_eq!(config.instance_id, expected.filter(|h| !h.is_empty()));
}

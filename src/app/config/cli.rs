use super::ConfigError;
use super::serde_helpers::{
    load_env_flag, load_env_list, load_env_path_opt, load_env_string, load_env_string_opt,
};
use super::validation::parse_error_type;
use crate::domain::Fields;
use crate::logger::{Logger, LoggerOptions, Metadata};
use crate::parser::{ErrorParser, ParserRegistry};
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};

pub const DEFAULT_APP: &str = "rask-logger";
pub const DEFAULT_ENV: &str = "development";

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Stable instance identity (defaults to the hostname)
    #[arg(long, env = "INSTANCE_ID")]
    pub instance_id: Option<String>,

    /// Application name
    #[arg(long, env = "APP_NAME", default_value = DEFAULT_APP)]
    pub app: String,

    /// Deployment environment
    #[arg(long, env = "APP_ENV", default_value = DEFAULT_ENV)]
    pub env: String,

    /// Application version
    #[arg(long, env = "APP_VERSION", default_value = env!("CARGO_PKG_VERSION"))]
    pub app_version: String,

    /// Suppress every emitted line
    #[arg(long, env = "LOG_SILENT")]
    pub silent: bool,

    /// Configuration file path (optional)
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Extra error types as Type:filter, comma separated
    #[arg(long, env = "ERROR_TYPES", value_delimiter = ',')]
    pub error_types: Vec<String>,

    /// Static metadata added to every line (file only)
    #[arg(skip)]
    pub fields: Map<String, JsonValue>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instance_id: None,
            app: DEFAULT_APP.to_string(),
            env: DEFAULT_ENV.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            silent: false,
            config_file: None,
            error_types: Vec::new(),
            fields: Map::new(),
        }
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::parse_from(args);
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        load_env_string_opt("INSTANCE_ID", &mut config.instance_id);
        load_env_string("APP_NAME", &mut config.app);
        load_env_string("APP_ENV", &mut config.env);
        load_env_string("APP_VERSION", &mut config.app_version);
        load_env_flag("LOG_SILENT", &mut config.silent)?;
        load_env_path_opt("CONFIG_FILE", &mut config.config_file);
        load_env_list("ERROR_TYPES", &mut config.error_types);

        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    /// Replace this config with the one in `config_file`, when set.
    pub fn resolve(self) -> Result<Self, ConfigError> {
        match &self.config_file {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading configuration from file");
                Config::from_file(path)
            }
            None => Ok(self),
        }
    }

    pub fn post_process(&mut self) -> Result<(), ConfigError> {
        if self.instance_id.is_none() {
            self.instance_id = detect_instance_id();
        }
        self.error_types = self
            .error_types
            .iter()
            .map(|spec| spec.trim().to_string())
            .filter(|spec| !spec.is_empty())
            .collect();
        Ok(())
    }

    pub fn get_instance_id(&self) -> Result<String, ConfigError> {
        self.instance_id.clone().ok_or_else(|| {
            ConfigError::InvalidConfig(
                "Could not detect instance id. Please set INSTANCE_ID or use --instance-id"
                    .to_string(),
            )
        })
    }

    /// Error classifier with the configured types appended to the defaults.
    pub fn error_parser(&self) -> Result<ErrorParser, ConfigError> {
        let mut parser = ErrorParser::new();
        for spec in &self.error_types {
            let entry = parse_error_type(spec)?;
            parser.register_type(entry.type_name, entry.filter);
        }
        Ok(parser)
    }

    pub fn build_logger(&self) -> Result<Logger, ConfigError> {
        let registry = ParserRegistry::with_error_parser(self.error_parser()?);
        let metadata = Metadata::new(&self.app, &self.env, &self.app_version)
            .with_extra(Fields::from(JsonValue::Object(self.fields.clone())));
        let options = LoggerOptions {
            silent: self.silent,
        };

        Ok(Logger::with_registry(
            self.get_instance_id()?,
            options,
            metadata,
            registry,
        ))
    }
}

fn detect_instance_id() -> Option<String> {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: [&str; 7] = [
        "INSTANCE_ID",
        "APP_NAME",
        "APP_ENV",
        "APP_VERSION",
        "LOG_SILENT",
        "CONFIG_FILE",
        "ERROR_TYPES",
    ];

    fn clear_env() {
        for name in ENV_VARS {
            unsafe {
                std::env::remove_var(name);
            }
        }
    }

    #[test]
    #[serial]
    fn test_from_args() {
        clear_env();
        let config = Config::from_args([
            "rask-logger",
            "--instance-id",
            "pod-1",
            "--app",
            "billing",
            "--env",
            "prod",
            "--app-version",
            "2.0.0",
            "--silent",
            "--error-types",
            "PimError:akeneo,S3Error:s3",
        ])
        .unwrap();

        assert_eq!(config.instance_id.as_deref(), Some("pod-1"));
        assert_eq!(config.app, "billing");
        assert_eq!(config.env, "prod");
        assert_eq!(config.app_version, "2.0.0");
        assert!(config.silent);
        assert_eq!(config.error_types, vec!["PimError:akeneo", "S3Error:s3"]);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        unsafe {
            std::env::set_var("INSTANCE_ID", "pod-2");
            std::env::set_var("APP_NAME", "orders");
            std::env::set_var("LOG_SILENT", "true");
            std::env::set_var("ERROR_TYPES", "PimError:akeneo");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.instance_id.as_deref(), Some("pod-2"));
        assert_eq!(config.app, "orders");
        assert_eq!(config.env, DEFAULT_ENV);
        assert!(config.silent);
        assert_eq!(config.error_types, vec!["PimError:akeneo"]);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_flag() {
        clear_env();
        unsafe {
            std::env::set_var("LOG_SILENT", "sometimes");
        }
        assert!(matches!(Config::from_env(), Err(ConfigError::EnvError(_))));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_error_type() {
        clear_env();
        unsafe {
            std::env::set_var("ERROR_TYPES", "PimError");
        }
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidErrorType(_))));
        clear_env();
    }

    #[test]
    fn test_error_parser_appends_types() {
        let config = Config {
            error_types: vec!["PimError:akeneo".to_string()],
            ..Config::default()
        };
        let parser = config.error_parser().unwrap();
        assert_eq!(parser.infer_type(Some("https://akeneo.com")), Some("PimError"));
        assert_eq!(parser.infer_type(Some("aws-sdk")), Some("AWSError"));
    }

    #[test]
    fn test_build_logger() {
        let mut fields = Map::new();
        fields.insert("team".to_string(), JsonValue::from("payments"));
        let config = Config {
            instance_id: Some("pod-3".to_string()),
            silent: true,
            fields,
            ..Config::default()
        };

        let logger = config.build_logger().unwrap();
        assert_eq!(logger.instance_id(), "pod-3");
        assert!(logger.options().silent);
        assert_eq!(logger.metadata().get("app"), Some(&JsonValue::from(DEFAULT_APP)));
        assert_eq!(logger.metadata().get("team"), Some(&JsonValue::from("payments")));
    }
}

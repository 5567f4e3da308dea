use super::{Config, ConfigError};
use crate::parser::ErrorTypeFilter;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("app", &self.app),
            ("env", &self.env),
            ("app_version", &self.app_version),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(format!("{name} must not be empty")));
            }
        }

        if let Some(instance_id) = &self.instance_id
            && instance_id.trim().is_empty()
        {
            return Err(ConfigError::InvalidConfig(
                "instance_id must not be empty".to_string(),
            ));
        }

        for spec in &self.error_types {
            parse_error_type(spec)?;
        }

        Ok(())
    }
}

/// Parse `Type:filter` into a type filter entry.
pub fn parse_error_type(spec: &str) -> Result<ErrorTypeFilter, ConfigError> {
    let (type_name, filter) = spec
        .split_once(':')
        .ok_or_else(|| ConfigError::InvalidErrorType(spec.to_string()))?;
    let (type_name, filter) = (type_name.trim(), filter.trim());
    if type_name.is_empty() || filter.is_empty() {
        return Err(ConfigError::InvalidErrorType(spec.to_string()));
    }
    Ok(ErrorTypeFilter::new(type_name, filter))
}

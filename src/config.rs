//! Settings for a combined analysis run.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Cpm,
    Mpm,
    Pert,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Cpm, Method::Mpm, Method::Pert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Cpm => "cpm",
            Method::Mpm => "mpm",
            Method::Pert => "pert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_methods")]
    pub methods: Vec<Method>,
    #[serde(default = "default_target_probability")]
    pub target_probability: f64,
    /// Deadline for the PERT completion probability; the expected project
    /// duration when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_duration: Option<f64>,
}

fn default_methods() -> Vec<Method> {
    Method::ALL.to_vec()
}

fn default_target_probability() -> f64 {
    0.95
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            methods: default_methods(),
            target_probability: default_target_probability(),
            target_duration: None,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_probability > 0.0 && self.target_probability < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "target_probability must lie strictly between 0 and 1, got {}",
                self.target_probability
            )));
        }
        if let Some(target) = self.target_duration {
            if !target.is_finite() || target < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "target_duration must be a non-negative number of days, got {target}"
                )));
            }
        }
        if self.methods.is_empty() {
            return Err(ConfigError::Invalid("no calculation method selected".into()));
        }
        Ok(())
    }

    pub fn runs(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert!(config.runs(Method::Pert));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn methods_use_lowercase_names() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"methods": ["cpm", "pert"], "target_duration": 12.5}"#)
                .unwrap();
        assert!(config.runs(Method::Cpm));
        assert!(!config.runs(Method::Mpm));
        assert_eq!(config.target_duration, Some(12.5));
    }

    #[test]
    fn probability_bounds_are_exclusive() {
        let mut config = AnalysisConfig::default();
        config.target_probability = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.target_probability = 0.0;
        assert!(config.validate().is_err());
    }
}

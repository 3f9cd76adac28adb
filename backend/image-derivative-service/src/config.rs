/// Configuration management for image-derivative-service
///
/// Loaded once at cold start from environment variables, immutable afterwards.
use crate::error::{AppError, Result};
use crate::models::DerivativeSpec;
use s3_utils::S3Config;

/// Default derivative list: `label:max_dimension:container_suffix`
pub const DEFAULT_DERIVATIVES: &str = "thumbnail:100:-thumb,large:2000:-large";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Output sizes, produced in this order
    pub derivatives: Vec<DerivativeSpec>,
    /// Terminate the process when a derivative write is rejected
    pub exit_on_store_failure: bool,
    pub log_format: LogFormat,
    pub s3: S3Config,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            derivatives: vec![DerivativeSpec::thumbnail(), DerivativeSpec::large()],
            exit_on_store_failure: true,
            log_format: LogFormat::Text,
            s3: S3Config::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let derivatives = parse_derivatives(
            lookup("IMAGE_DERIVATIVES")
                .as_deref()
                .unwrap_or(DEFAULT_DERIVATIVES),
        )?;

        let exit_on_store_failure = match lookup("EXIT_ON_STORE_FAILURE") {
            Some(raw) => raw.trim().parse::<bool>().map_err(|_| {
                AppError::Config(format!(
                    "EXIT_ON_STORE_FAILURE must be true or false, got `{raw}`"
                ))
            })?,
            None => true,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "LOG_FORMAT must be `text` or `json`, got `{other}`"
                )))
            }
        };

        let s3 = S3Config::from_lookup(&lookup).map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Config {
            derivatives,
            exit_on_store_failure,
            log_format,
            s3,
        })
    }
}

/// Parse `label:max_dimension:suffix` entries separated by commas
pub fn parse_derivatives(raw: &str) -> Result<Vec<DerivativeSpec>> {
    let derivatives = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_derivative)
        .collect::<Result<Vec<_>>>()?;

    if derivatives.is_empty() {
        return Err(AppError::Config(
            "IMAGE_DERIVATIVES must list at least one derivative".to_string(),
        ));
    }

    for (i, spec) in derivatives.iter().enumerate() {
        if derivatives[..i]
            .iter()
            .any(|other| other.container_suffix == spec.container_suffix)
        {
            return Err(AppError::Config(format!(
                "duplicate derivative container suffix `{}`",
                spec.container_suffix
            )));
        }
    }

    Ok(derivatives)
}

fn parse_derivative(entry: &str) -> Result<DerivativeSpec> {
    let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
    let [label, max_dimension, suffix] = parts.as_slice() else {
        return Err(AppError::Config(format!(
            "derivative `{entry}` must look like label:max_dimension:suffix"
        )));
    };

    let max_dimension: f32 = max_dimension.parse().map_err(|_| {
        AppError::Config(format!("derivative `{entry}` has a non-numeric max dimension"))
    })?;
    if !max_dimension.is_finite() || max_dimension < 1.0 {
        return Err(AppError::Config(format!(
            "derivative `{entry}` max dimension must be at least 1"
        )));
    }
    if label.is_empty() || suffix.is_empty() {
        return Err(AppError::Config(format!(
            "derivative `{entry}` needs a label and a container suffix"
        )));
    }

    Ok(DerivativeSpec::new(*label, max_dimension, *suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            config.derivatives,
            vec![DerivativeSpec::thumbnail(), DerivativeSpec::large()]
        );
        assert!(config.exit_on_store_failure);
    }

    #[test]
    fn test_custom_derivatives_keep_order() {
        let config = Config::from_lookup(lookup_from(&[(
            "IMAGE_DERIVATIVES",
            "small:64:-small, medium:640:-medium ,large:2000:-large",
        )]))
        .unwrap();

        let labels: Vec<&str> = config.derivatives.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["small", "medium", "large"]);
        assert_eq!(config.derivatives[1].max_dimension, 640.0);
        assert_eq!(config.derivatives[1].container_suffix, "-medium");
    }

    #[test]
    fn test_invalid_derivatives() {
        for raw in [
            "",
            "thumb:100",
            "thumb:abc:-thumb",
            "thumb:0:-thumb",
            "thumb:100:",
            "a:100:-x,b:200:-x",
        ] {
            assert!(
                matches!(parse_derivatives(raw), Err(AppError::Config(_))),
                "accepted `{raw}`"
            );
        }
    }

    #[test]
    fn test_flags() {
        let config = Config::from_lookup(lookup_from(&[
            ("EXIT_ON_STORE_FAILURE", "false"),
            ("LOG_FORMAT", "json"),
            ("S3_ENDPOINT", "http://localhost:4566"),
        ]))
        .unwrap();

        assert!(!config.exit_on_store_failure);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.s3.endpoint.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_invalid_flags() {
        assert!(Config::from_lookup(lookup_from(&[("EXIT_ON_STORE_FAILURE", "maybe")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")])).is_err());
    }
}

/// S3 client configuration shared by every binary that talks to object storage
use crate::error::StorageError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3Config {
    /// AWS region; falls back to the SDK default provider chain when unset
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores (MinIO, localstack, ...)
    pub endpoint: Option<String>,
    /// Whether to use path-style URLs (false = virtual-hosted-style)
    pub force_path_style: bool,
}

impl S3Config {
    /// Load S3 configuration from environment variables
    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StorageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let force_path_style = match lookup("S3_FORCE_PATH_STYLE") {
            Some(raw) => raw.trim().parse::<bool>().map_err(|_| {
                StorageError::Config(format!(
                    "S3_FORCE_PATH_STYLE must be true or false, got `{raw}`"
                ))
            })?,
            None => false,
        };

        Ok(Self {
            region: lookup("AWS_REGION").filter(|v| !v.trim().is_empty()),
            endpoint: lookup("S3_ENDPOINT").filter(|v| !v.trim().is_empty()),
            force_path_style,
        })
    }

    /// Human readable location of an object, used in log lines
    pub fn object_path(container: &str, key: &str) -> String {
        format!("{}/{}", container, key)
    }
}

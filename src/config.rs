use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("S3_ACCESS_KEY and S3_SECRET_KEY must be set together")]
    PartialCredentials,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    pub upload_defaults: UploadDefaults,
    pub statsd: Option<StatsdConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub force_path_style: bool,
}

/// Values substituted for any field a presigned-url request leaves out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDefaults {
    pub default_bucket: String,
    pub default_key: String,
    pub default_content_type: String,
    pub default_expiry_seconds: u64,
}

impl Default for UploadDefaults {
    fn default() -> Self {
        Self {
            default_bucket: "default-bucket".to_string(),
            default_key: "default-file".to_string(),
            default_content_type: "multipart/form-data".to_string(),
            default_expiry_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsdConfig {
    pub host: String,
    pub port: u16,
    pub prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let fallback = UploadDefaults::default();
        let default_expiry_seconds = parsed(&var, "DEFAULT_EXPIRES_SECONDS", fallback.default_expiry_seconds)?;
        if default_expiry_seconds == 0 {
            return Err(ConfigError::Invalid {
                name: "DEFAULT_EXPIRES_SECONDS",
                value: "0".to_string(),
            });
        }

        let upload_defaults = UploadDefaults {
            default_bucket: var("BUCKET_NAME").unwrap_or(fallback.default_bucket),
            default_key: var("DEFAULT_OBJECT_KEY").unwrap_or(fallback.default_key),
            default_content_type: var("DEFAULT_CONTENT_TYPE").unwrap_or(fallback.default_content_type),
            default_expiry_seconds,
        };

        let endpoint = var("S3_ENDPOINT");
        let access_key = var("S3_ACCESS_KEY");
        let secret_key = var("S3_SECRET_KEY");
        if access_key.is_some() != secret_key.is_some() {
            return Err(ConfigError::PartialCredentials);
        }
        let storage = StorageConfig {
            region: var("S3_REGION"),
            force_path_style: parsed(&var, "S3_FORCE_PATH_STYLE", endpoint.is_some())?,
            endpoint,
            access_key,
            secret_key,
        };

        let statsd = match var("STATSD_HOST") {
            Some(host) => Some(StatsdConfig {
                host,
                port: parsed(&var, "STATSD_PORT", 8125)?,
                prefix: var("STATSD_PREFIX").unwrap_or_else(|| "audio_upload_be".to_string()),
            }),
            None => None,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed(&var, "PORT", 8080)?,
            storage,
            upload_defaults,
            statsd,
        })
    }
}

fn parsed<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

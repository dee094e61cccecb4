use crate::domain::model::Target;
use crate::utils::error::{GuestbookError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One layer of settings. Every field is optional so layers can be stacked:
/// command line over config file over built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub env: Option<Target>,
    pub bucket: Option<String>,
    pub db_host: Option<String>,
    pub db_name: Option<String>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub motd_var: Option<String>,
    /// Seconds between polls of the message of the day; fractions allowed.
    pub motd_var_wait_time: Option<f64>,
    pub setup_timeout_secs: Option<u64>,
    pub aws: Option<AwsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub s3_force_path_style: Option<bool>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| GuestbookError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Fills every unset field of `self` from `lower`.
    pub fn merge(self, lower: FileConfig) -> FileConfig {
        let aws = match (self.aws, lower.aws) {
            (Some(upper), Some(lower)) => Some(AwsConfig {
                region: upper.region.or(lower.region),
                endpoint_url: upper.endpoint_url.or(lower.endpoint_url),
                s3_force_path_style: upper.s3_force_path_style.or(lower.s3_force_path_style),
            }),
            (upper, lower) => upper.or(lower),
        };

        FileConfig {
            env: self.env.or(lower.env),
            bucket: self.bucket.or(lower.bucket),
            db_host: self.db_host.or(lower.db_host),
            db_name: self.db_name.or(lower.db_name),
            db_user: self.db_user.or(lower.db_user),
            db_password: self.db_password.or(lower.db_password),
            motd_var: self.motd_var.or(lower.motd_var),
            motd_var_wait_time: self.motd_var_wait_time.or(lower.motd_var_wait_time),
            setup_timeout_secs: self.setup_timeout_secs.or(lower.setup_timeout_secs),
            aws,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let config = FileConfig::from_toml_str(
            r#"
env = "aws"
bucket = "guestbook-blobs"
db_host = "guestbook.abc123.us-west-2.rds.amazonaws.com"
db_password = "s3cret"
motd_var = "/guestbook/motd"
motd_var_wait_time = 2.5

[aws]
region = "us-west-2"
s3_force_path_style = true
"#,
        )
        .unwrap();

        assert_eq!(config.env, Some(Target::Aws));
        assert_eq!(config.bucket.as_deref(), Some("guestbook-blobs"));
        assert_eq!(config.motd_var_wait_time, Some(2.5));
        assert_eq!(config.db_name, None);
        let aws = config.aws.unwrap();
        assert_eq!(aws.region.as_deref(), Some("us-west-2"));
        assert_eq!(aws.s3_force_path_style, Some(true));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = FileConfig::from_toml_str("buckett = \"typo\"");
        assert!(matches!(result, Err(GuestbookError::TomlError(_))));
    }

    #[test]
    fn test_merge_prefers_upper_layer() {
        let upper = FileConfig {
            bucket: Some("cli-bucket".to_string()),
            aws: Some(AwsConfig {
                region: Some("eu-west-1".to_string()),
                ..AwsConfig::default()
            }),
            ..FileConfig::default()
        };
        let lower = FileConfig {
            bucket: Some("file-bucket".to_string()),
            motd_var: Some("/motd".to_string()),
            aws: Some(AwsConfig {
                region: Some("us-east-1".to_string()),
                endpoint_url: Some("http://localhost:4566".to_string()),
                ..AwsConfig::default()
            }),
            ..FileConfig::default()
        };

        let merged = upper.merge(lower);
        assert_eq!(merged.bucket.as_deref(), Some("cli-bucket"));
        assert_eq!(merged.motd_var.as_deref(), Some("/motd"));
        let aws = merged.aws.unwrap();
        assert_eq!(aws.region.as_deref(), Some("eu-west-1"));
        assert_eq!(aws.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = FileConfig::from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(GuestbookError::ConfigError { .. })));
    }
}

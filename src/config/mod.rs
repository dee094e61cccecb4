#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::{
    Flags, Target, DEFAULT_DB_NAME, DEFAULT_DB_USER, DEFAULT_MOTD_WAIT_TIME, DEFAULT_SETUP_TIMEOUT,
};
use crate::utils::error::{GuestbookError, Result};
use crate::utils::validation::{
    validate_aws_region, validate_non_empty_string, validate_path, validate_range,
    validate_s3_bucket_name, validate_url, validate_wait_time, Validate,
};
use std::time::Duration;
pub use toml_config::{AwsConfig, FileConfig};

impl FileConfig {
    /// Applies built-in defaults to whatever is still unset.
    pub fn into_flags(self) -> Result<Flags> {
        let motd_var_wait_time = match self.motd_var_wait_time {
            Some(secs) => Duration::try_from_secs_f64(secs).map_err(|e| {
                GuestbookError::InvalidConfigValueError {
                    field: "motd_var_wait_time".to_string(),
                    value: secs.to_string(),
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_MOTD_WAIT_TIME,
        };
        let aws = self.aws.unwrap_or_default();

        Ok(Flags {
            target: self.env.unwrap_or_default(),
            bucket: self.bucket.unwrap_or_default(),
            db_host: self.db_host.unwrap_or_default(),
            db_name: self.db_name.unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            db_user: self.db_user.unwrap_or_else(|| DEFAULT_DB_USER.to_string()),
            db_password: self.db_password.unwrap_or_default(),
            motd_var: self.motd_var.unwrap_or_default(),
            motd_var_wait_time,
            aws_region: aws.region,
            aws_endpoint_url: aws.endpoint_url,
            s3_force_path_style: aws.s3_force_path_style.unwrap_or(false),
            setup_timeout: self
                .setup_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_SETUP_TIMEOUT),
        })
    }
}

impl Validate for Flags {
    fn validate(&self) -> Result<()> {
        if self.bucket.is_empty() {
            return Err(GuestbookError::MissingConfigError {
                field: "bucket".to_string(),
            });
        }
        if self.motd_var.is_empty() {
            return Err(GuestbookError::MissingConfigError {
                field: "motd_var".to_string(),
            });
        }

        match self.target {
            Target::Aws => {
                validate_s3_bucket_name("bucket", &self.bucket)?;
                validate_non_empty_string("db_host", &self.db_host)?;
                if let Some(region) = &self.aws_region {
                    validate_aws_region("aws_region", region)?;
                }
                if let Some(endpoint) = &self.aws_endpoint_url {
                    validate_url("aws_endpoint_url", endpoint)?;
                }
            }
            Target::Local => {
                validate_path("bucket", &self.bucket)?;
                validate_path("motd_var", &self.motd_var)?;
            }
        }

        validate_non_empty_string("db_name", &self.db_name)?;
        validate_non_empty_string("db_user", &self.db_user)?;
        validate_wait_time("motd_var_wait_time", self.motd_var_wait_time)?;
        validate_range(
            "setup_timeout",
            self.setup_timeout,
            Duration::from_secs(1),
            Duration::from_secs(600),
        )?;

        tracing::debug!(env = %self.target, "✅ Configuration validation passed");
        Ok(())
    }
}

use crate::utils::error::{GuestbookError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_DB_NAME: &str = "guestbook";
pub const DEFAULT_DB_USER: &str = "guestbook";
pub const DEFAULT_MOTD_WAIT_TIME: Duration = Duration::from_secs(5);
pub const DEFAULT_SETUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the application's dependencies come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// S3 for blobs, SSM Parameter Store for the message of the day.
    Aws,
    /// A local directory for blobs and a local file for the message of the day.
    #[default]
    Local,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Aws => f.write_str("aws"),
            Target::Local => f.write_str("local"),
        }
    }
}

/// Resolved startup configuration. Built once, read-only afterwards.
#[derive(Clone)]
pub struct Flags {
    pub target: Target,
    pub bucket: String,
    pub db_host: String,
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub motd_var: String,
    pub motd_var_wait_time: Duration,
    pub aws_region: Option<String>,
    pub aws_endpoint_url: Option<String>,
    pub s3_force_path_style: bool,
    pub setup_timeout: Duration,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            target: Target::default(),
            bucket: String::new(),
            db_host: String::new(),
            db_name: DEFAULT_DB_NAME.to_string(),
            db_user: DEFAULT_DB_USER.to_string(),
            db_password: String::new(),
            motd_var: String::new(),
            motd_var_wait_time: DEFAULT_MOTD_WAIT_TIME,
            aws_region: None,
            aws_endpoint_url: None,
            s3_force_path_style: false,
            setup_timeout: DEFAULT_SETUP_TIMEOUT,
        }
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flags")
            .field("target", &self.target)
            .field("bucket", &self.bucket)
            .field("db_host", &self.db_host)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .field("motd_var", &self.motd_var)
            .field("motd_var_wait_time", &self.motd_var_wait_time)
            .field("aws_region", &self.aws_region)
            .field("aws_endpoint_url", &self.aws_endpoint_url)
            .field("s3_force_path_style", &self.s3_force_path_style)
            .field("setup_timeout", &self.setup_timeout)
            .finish()
    }
}

/// Connection parameters for a MySQL-compatible database.
#[derive(Clone, PartialEq, Eq)]
pub struct SqlParams {
    pub endpoint: String,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for SqlParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlParams")
            .field("endpoint", &self.endpoint)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SqlParams {
    /// Renders the parameters as a `mysql://` URL. The result carries the
    /// password, so do not log it.
    pub fn connection_url(&self) -> Result<Url> {
        if self.endpoint.trim().is_empty() {
            return Err(GuestbookError::MissingConfigError {
                field: "db_host".to_string(),
            });
        }

        let mut url = Url::parse(&format!("mysql://{}", self.endpoint))?;
        url.set_username(&self.user)
            .map_err(|_| GuestbookError::ConfigError {
                message: format!("cannot set database user on {}", self.endpoint),
            })?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|_| GuestbookError::ConfigError {
                    message: format!("cannot set database password on {}", self.endpoint),
                })?;
        }
        url.set_path(&self.database);
        Ok(url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Polling interval. Zero selects the default.
    pub wait_time: Duration,
}

impl WatchOptions {
    pub const DEFAULT_WAIT_TIME: Duration = Duration::from_secs(30);

    pub fn effective_wait_time(&self) -> Duration {
        if self.wait_time.is_zero() {
            Self::DEFAULT_WAIT_TIME
        } else {
            self.wait_time
        }
    }
}

/// A decoded value of a runtime variable together with when it was observed.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub value: T,
    pub update_time: DateTime<Utc>,
    pub version: Option<String>,
}

/// Raw bytes fetched by a watcher. Two values are the same when both
/// bytes and version match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    pub bytes: Vec<u8>,
    pub version: Option<String>,
}

impl RawValue {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

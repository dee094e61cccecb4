use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuestbookError {
    #[error("Bucket not found: {bucket}")]
    BucketNotFoundError { bucket: String },

    #[error("Object {key} not found in bucket {bucket}")]
    ObjectNotFoundError { bucket: String, key: String },

    #[error("Invalid object key {key:?}: {reason}")]
    InvalidKeyError { key: String, reason: String },

    #[error("Storage error on bucket {bucket}: {message}")]
    StorageError { bucket: String, message: String },

    #[error("Variable not found: {name}")]
    VariableNotFoundError { name: String },

    #[error("Variable {name} failed: {message}")]
    VariableError { name: String, message: String },

    #[error("Variable {name} is closed")]
    VariableClosedError { name: String },

    #[error("Decode error: {message}")]
    DecodeError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Application setup timed out after {after:?}")]
    SetupTimedOut { after: Duration },
}

impl GuestbookError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BucketNotFoundError { .. }
                | Self::ObjectNotFoundError { .. }
                | Self::VariableNotFoundError { .. }
        )
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. }
                | Self::InvalidConfigValueError { .. }
                | Self::MissingConfigError { .. }
                | Self::TomlError(_)
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::BucketNotFoundError { bucket } => {
                format!("The storage bucket '{}' does not exist", bucket)
            }
            Self::VariableNotFoundError { name } => {
                format!("The message of the day variable '{}' does not exist", name)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            Self::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            Self::SetupTimedOut { after } => {
                format!("Startup did not finish within {:?}", after)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::BucketNotFoundError { .. } => {
                "Check the --bucket value and that the bucket (or directory) exists"
            }
            Self::VariableNotFoundError { .. } => {
                "Check the --motd-var value and that the parameter (or file) exists"
            }
            Self::StorageError { .. } | Self::VariableError { .. } => {
                "Check credentials, region and network access to the provider"
            }
            Self::SetupTimedOut { .. } => "Increase --setup-timeout-secs or check connectivity",
            e if e.is_config_error() => "Run with --help to review the available settings",
            _ => "Re-run with --verbose for more details",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            e if e.is_config_error() => 1,
            e if e.is_not_found() => 2,
            Self::SetupTimedOut { .. } => 4,
            _ => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, GuestbookError>;

use crate::utils::error::{GuestbookError, Result};
use std::time::Duration;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid_value(field_name: &str, value: &str, reason: impl Into<String>) -> GuestbookError {
    GuestbookError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Checks an AWS service endpoint override such as a LocalStack URL.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid_value(field_name, url_str, "endpoint override is set but empty"));
    }

    let url = Url::parse(url_str).map_err(|e| {
        invalid_value(
            field_name,
            url_str,
            format!("expected an endpoint like http://localhost:4566 ({})", e),
        )
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid_value(
            field_name,
            url_str,
            format!("endpoint must use http or https, not {}", scheme),
        )),
    }
}

/// Checks a local bucket directory or variable file path.
pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid_value(field_name, path, "local target needs a filesystem path"));
    }
    if path.contains('\0') {
        return Err(invalid_value(field_name, path, "path contains a NUL byte"));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid_value(field_name, value, format!("{} must not be blank", field_name)));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Debug + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(GuestbookError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{:?}", value),
            reason: format!("Value must be between {:?} and {:?}", min, max),
        });
    }
    Ok(())
}

pub fn validate_wait_time(field_name: &str, value: Duration) -> Result<()> {
    validate_range(
        field_name,
        value,
        Duration::from_millis(1),
        Duration::from_secs(3600),
    )
}

pub fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    let invalid = |reason: &str| GuestbookError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: bucket_name.to_string(),
        reason: reason.to_string(),
    };

    if bucket_name.is_empty() {
        return Err(invalid("S3 bucket name cannot be empty"));
    }

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid("S3 bucket name must be between 3 and 63 characters"));
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    let first = bucket_name.chars().next();
    let last = bucket_name.chars().last();
    if !matches!(first, Some(c) if c.is_ascii_alphanumeric())
        || !matches!(last, Some(c) if c.is_ascii_alphanumeric())
    {
        return Err(invalid(
            "S3 bucket name must start and end with a letter or number",
        ));
    }

    if bucket_name.contains("..") {
        return Err(invalid("S3 bucket name cannot contain consecutive dots"));
    }

    Ok(())
}

pub fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(GuestbookError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_name_the_problem() {
        let err = validate_url("aws_endpoint_url", "ftp://example.com").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for aws_endpoint_url (\"ftp://example.com\"): endpoint must use http or https, not ftp"
        );

        let err = validate_non_empty_string("db_host", "  ").unwrap_err();
        assert!(err.to_string().ends_with("db_host must not be blank"));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("aws_endpoint_url", "https://example.com").is_ok());
        assert!(validate_url("aws_endpoint_url", "http://localhost:4566").is_ok());
        assert!(validate_url("aws_endpoint_url", "").is_err());
        assert!(validate_url("aws_endpoint_url", "invalid-url").is_err());
        assert!(validate_url("aws_endpoint_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_s3_bucket_name() {
        assert!(validate_s3_bucket_name("bucket", "guestbook-photos").is_ok());
        assert!(validate_s3_bucket_name("bucket", "my.bucket.01").is_ok());
        assert!(validate_s3_bucket_name("bucket", "").is_err());
        assert!(validate_s3_bucket_name("bucket", "ab").is_err());
        assert!(validate_s3_bucket_name("bucket", "Upper-Case").is_err());
        assert!(validate_s3_bucket_name("bucket", "-leading").is_err());
        assert!(validate_s3_bucket_name("bucket", "trailing.").is_err());
        assert!(validate_s3_bucket_name("bucket", "double..dot").is_err());
    }

    #[test]
    fn test_validate_aws_region() {
        assert!(validate_aws_region("aws_region", "us-west-2").is_ok());
        assert!(validate_aws_region("aws_region", "US_WEST").is_err());
        assert!(validate_aws_region("aws_region", " ").is_err());
    }

    #[test]
    fn test_validate_wait_time() {
        assert!(validate_wait_time("motd_var_wait_time", Duration::from_secs(5)).is_ok());
        assert!(validate_wait_time("motd_var_wait_time", Duration::ZERO).is_err());
        assert!(validate_wait_time("motd_var_wait_time", Duration::from_secs(7200)).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("bucket", "./blobs").is_ok());
        assert!(validate_path("bucket", "").is_err());
        assert!(validate_path("bucket", "bad\0path").is_err());
    }
}

use crate::domain::ports::{Bucket, BucketOpener};
use crate::utils::error::{GuestbookError, Result};
use crate::utils::validation::validate_non_empty_string;
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

#[derive(Debug, Clone)]
pub struct S3Bucket {
    client: S3Client,
    bucket: String,
}

impl S3Bucket {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    fn not_found(&self, key: &str) -> GuestbookError {
        GuestbookError::ObjectNotFoundError {
            bucket: self.bucket.clone(),
            key: key.to_string(),
        }
    }

    fn storage_error<E: std::error::Error>(&self, err: E) -> GuestbookError {
        GuestbookError::StorageError {
            bucket: self.bucket.clone(),
            message: DisplayErrorContext(err).to_string(),
        }
    }
}

#[async_trait]
impl Bucket for S3Bucket {
    fn name(&self) -> &str {
        &self.bucket
    }

    async fn read_all(&self, key: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if matches!(e.as_service_error(), Some(GetObjectError::NoSuchKey(_))) {
                    self.not_found(key)
                } else {
                    self.storage_error(&e)
                }
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| self.storage_error(&e))?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_all(&self, key: &str, data: &[u8], content_type: Option<&str>) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| self.storage_error(&e))?;

        tracing::debug!(bucket = %self.bucket, key, bytes = data.len(), "Wrote object");
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.as_service_error(), Some(HeadObjectError::NotFound(_))) => Ok(false),
            Err(e) => Err(self.storage_error(&e)),
        }
    }

    // S3 deletes are idempotent; check first so a missing key reports the same
    // error as the other backends.
    async fn delete(&self, key: &str) -> Result<()> {
        if !self.exists(key).await? {
            return Err(self.not_found(key));
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| self.storage_error(&e))?;
        Ok(())
    }
}

/// Opens S3 buckets with a shared client. Opening does not touch the network.
#[derive(Debug, Clone)]
pub struct S3BucketOpener {
    client: S3Client,
}

impl S3BucketOpener {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

impl BucketOpener for S3BucketOpener {
    type Bucket = S3Bucket;

    async fn open_bucket(&self, name: &str) -> Result<S3Bucket> {
        validate_non_empty_string("bucket", name)?;
        tracing::debug!(bucket = name, "Opened S3 bucket");
        Ok(S3Bucket::new(self.client.clone(), name.to_string()))
    }
}

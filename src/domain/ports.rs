use crate::core::runtimevar::{Decoder, Variable};
use crate::domain::model::{RawValue, WatchOptions};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt::Debug;

/// An opened object-storage container.
#[async_trait]
pub trait Bucket: Send + Sync + Debug {
    fn name(&self) -> &str;
    async fn read_all(&self, key: &str) -> Result<Vec<u8>>;
    async fn write_all(&self, key: &str, data: &[u8], content_type: Option<&str>) -> Result<()>;
    async fn exists(&self, key: &str) -> Result<bool>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Opens buckets by name for one storage provider.
pub trait BucketOpener: Send + Sync {
    type Bucket: Bucket + 'static;

    fn open_bucket(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Self::Bucket>> + Send;
}

/// Fetches the current raw value of one remote variable.
#[async_trait]
pub trait Watcher: Send + Sync {
    async fn fetch(&self) -> Result<RawValue>;
}

/// A configuration store client that can open named variables.
pub trait VariableOpener: Send + Sync {
    fn new_variable<T>(
        &self,
        name: &str,
        decoder: Decoder<T>,
        options: WatchOptions,
    ) -> impl std::future::Future<Output = Result<Variable<T>>> + Send
    where
        T: Clone + Send + Sync + 'static;
}

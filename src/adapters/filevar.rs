use crate::core::runtimevar::{Decoder, Variable};
use crate::domain::model::{RawValue, WatchOptions};
use crate::domain::ports::{VariableOpener, Watcher};
use crate::utils::error::{GuestbookError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Reads a variable from a local file. The whole file content is the value.
#[derive(Debug, Clone)]
pub struct FileWatcher {
    path: PathBuf,
}

impl FileWatcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Watcher for FileWatcher {
    async fn fetch(&self) -> Result<RawValue> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(RawValue::new(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(GuestbookError::VariableNotFoundError {
                name: self.path.display().to_string(),
            }),
            Err(e) => Err(GuestbookError::VariableError {
                name: self.path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// Opens variables whose names are file paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileVariableOpener;

impl VariableOpener for FileVariableOpener {
    async fn new_variable<T>(
        &self,
        name: &str,
        decoder: Decoder<T>,
        options: WatchOptions,
    ) -> Result<Variable<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        Variable::open(name, FileWatcher::new(name), decoder, options)
    }
}

use crate::core::runtimevar::Variable;
use crate::domain::model::SqlParams;
use crate::domain::ports::Bucket;
use std::sync::Arc;

/// Everything the guestbook needs at runtime, built by one of the setup functions.
#[derive(Debug)]
pub struct Application {
    pub bucket: Arc<dyn Bucket>,
    pub sql_params: SqlParams,
    pub motd: Variable<String>,
}

impl Application {
    pub fn new(bucket: Arc<dyn Bucket>, sql_params: SqlParams, motd: Variable<String>) -> Self {
        Self {
            bucket,
            sql_params,
            motd,
        }
    }

    /// Stops background polling. The bucket is released when the last
    /// reference to it is dropped.
    pub fn shutdown(self) {
        self.motd.close();
        tracing::info!(bucket = self.bucket.name(), "Application shut down");
    }
}

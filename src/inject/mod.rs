//! Startup wiring. Each target has an explicit setup function; [`setup`]
//! picks one from the resolved flags.

pub mod aws;
pub mod local;

use crate::core::application::Application;
use crate::domain::model::{Flags, Target};
use crate::utils::error::{GuestbookError, Result};
use std::time::Duration;

pub async fn setup(flags: &Flags) -> Result<Application> {
    tracing::info!(env = %flags.target, "Setting up application");
    match flags.target {
        Target::Local => local::setup_local(flags).await,
        #[cfg(feature = "aws")]
        Target::Aws => aws::setup_aws(flags).await,
        #[cfg(not(feature = "aws"))]
        Target::Aws => Err(GuestbookError::ConfigError {
            message: "this build does not include the aws feature".to_string(),
        }),
    }
}

/// Like [`setup`], but gives up after `limit`. Dropping the setup future
/// cancels any in-flight provider calls.
pub async fn setup_within(flags: &Flags, limit: Duration) -> Result<Application> {
    match tokio::time::timeout(limit, setup(flags)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(?limit, "Application setup timed out");
            Err(GuestbookError::SetupTimedOut { after: limit })
        }
    }
}

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod inject;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::config::FileConfig;
pub use crate::core::application::Application;
pub use crate::core::runtimevar::{string_decoder, Variable};
pub use crate::domain::model::{Flags, Snapshot, SqlParams, Target, WatchOptions};
pub use crate::inject::{setup, setup_within};
pub use crate::utils::error::{GuestbookError, Result};

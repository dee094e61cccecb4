pub mod application;
pub mod runtimevar;

pub use crate::domain::model::{Flags, SqlParams, Target, WatchOptions};
pub use crate::domain::ports::{Bucket, BucketOpener, VariableOpener, Watcher};
pub use crate::utils::error::Result;

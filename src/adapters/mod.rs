// Adapters layer: concrete storage and runtime-variable backends.

pub mod file_bucket;
pub mod filevar;
pub mod memory;

#[cfg(feature = "aws")]
pub mod aws;
#[cfg(feature = "aws")]
pub mod paramstore;
#[cfg(feature = "aws")]
pub mod s3;

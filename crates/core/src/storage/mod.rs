//! Object storage abstraction.
//!
//! This module provides an `ObjectStore` trait for archiving captured
//! files under a remote key, plus an implementation over any
//! S3-compatible backend.

mod s3;
mod types;

pub use s3::S3ObjectStore;
pub use types::*;

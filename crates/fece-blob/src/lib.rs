//! Blob storage backends for FECE audio objects.
//!
//! Two implementations of [`fece_core::blob::BlobStore`]:
//! [`LocalBlobStore`] keeps objects under a directory on disk (dev and
//! test), [`S3BlobStore`] talks to an S3-compatible bucket (Cloudflare R2
//! in production) with presigned requests.

mod local;
mod s3;
mod sign;

pub mod error;

pub use error::{Error, Result};
pub use local::LocalBlobStore;
pub use s3::{S3BlobStore, S3Config};

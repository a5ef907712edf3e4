//! Core types and trait definitions for the FECE ON EARTH song site.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod blob;
pub mod error;
pub mod playlist;
pub mod song;
pub mod store;
pub mod submission;
pub mod year;

pub use error::{Error, Result};

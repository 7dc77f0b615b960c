//! Shared types and utilities for versecast.
//!
//! This crate provides the common error type, typed identifiers, media-kind
//! classification, and storage-path helpers used by the other versecast
//! crates.

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::{FilesetId, TransactionId};
pub use types::MediaKind;

//! Versecast - timestamp-synchronized scripture audio streaming service
//!
//! This library crate exposes the server, config, and streaming pipeline for
//! integration testing.

pub mod config;
pub mod server;
pub mod streaming;

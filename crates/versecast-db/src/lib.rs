//! SQLite persistence for the versecast catalog.
//!
//! The catalog is read-mostly: filesets, audio files, stream variants,
//! verse timestamps, and stored playlists are written by ingestion (and by
//! test fixtures) and only ever read by the playlist pipeline.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;

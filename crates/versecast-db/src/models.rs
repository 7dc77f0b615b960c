//! Row models for the versecast catalog.

use serde::Serialize;
use versecast_common::MediaKind;

/// One edition of scripture content in one medium.
#[derive(Debug, Clone, Serialize)]
pub struct Fileset {
    pub hash_id: String,
    pub bible_id: String,
    pub media_kind: MediaKind,
    /// Storage bucket association. A fileset without one cannot produce
    /// playable URLs.
    pub asset_id: Option<String>,
}

/// One stored recording, scoped to a book/chapter(-range).
#[derive(Debug, Clone, Serialize)]
pub struct AudioFile {
    pub id: i64,
    pub hash_id: String,
    pub book_id: String,
    pub chapter_start: u32,
    pub chapter_end: Option<u32>,
    pub verse_start: Option<u32>,
    pub verse_end: Option<u32>,
    pub file_name: String,
    pub duration_ms: Option<i64>,
    pub file_size: Option<i64>,
}

impl AudioFile {
    /// Stored duration in seconds, when known.
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_ms.map(|ms| ms as f64 / 1000.0)
    }
}

/// One encoded rendition (bitrate/resolution/codec) of an audio file.
#[derive(Debug, Clone, Serialize)]
pub struct StreamVariant {
    pub id: i64,
    pub audio_file_id: i64,
    pub file_name: String,
    pub bandwidth: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub codecs: Option<String>,
}

/// A byte slice of a variant's shared file, optionally tied to a verse
/// timestamp (joined in at query time).
#[derive(Debug, Clone)]
pub struct ByteSegmentRow {
    pub variant_id: i64,
    pub position: u32,
    pub runtime: f64,
    pub byte_length: u64,
    pub byte_offset: u64,
    pub verse_start: Option<u32>,
    pub verse_end: Option<u32>,
}

/// A discrete TS child of a variant (one whole file per segment).
#[derive(Debug, Clone)]
pub struct FileSegmentRow {
    pub variant_id: i64,
    pub position: u32,
    pub file_name: String,
    pub runtime: f64,
}

/// A verse-to-audio-offset mapping record.
#[derive(Debug, Clone)]
pub struct VerseTimestamp {
    pub id: i64,
    pub audio_file_id: i64,
    pub verse_start: u32,
    pub verse_end: Option<u32>,
    pub byte_offset: Option<u64>,
    pub byte_length: Option<u64>,
    pub runtime: Option<f64>,
}

/// A stored multi-item playlist.
#[derive(Debug, Clone, Serialize)]
pub struct Playlist {
    pub id: i64,
    pub name: String,
}

/// One entry of a stored playlist: a fileset/book/chapter/verse reference.
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistItem {
    pub id: i64,
    pub playlist_id: i64,
    pub position: u32,
    pub fileset_id: String,
    pub book_id: String,
    pub chapter_start: u32,
    pub chapter_end: u32,
    pub verse_start: Option<u32>,
    pub verse_end: Option<u32>,
    /// Annotated total runtime, when ingestion recorded one.
    pub duration: Option<f64>,
    /// Annotated verse count, when ingestion recorded one.
    pub verses: Option<u32>,
}

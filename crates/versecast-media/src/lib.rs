//! Playlist domain logic for versecast.
//!
//! Pure computation, no I/O: the uniform segment-list shapes produced by the
//! catalog layer, verse-range alignment over byte-range segments, and HLS
//! playlist assembly/rendering.

pub mod align;
pub mod assemble;
pub mod hls;
pub mod segments;

pub use align::{align_to_verse_range, VerseRange};
pub use assemble::{assemble, RenderedPlaylist, UrlResolver};
pub use segments::{ByteRangeSegment, DiscreteSegment, GroupKind, SegmentGroup, SegmentList};

//! HLS playlist structures and M3U8 rendering.

mod playlist;

pub use playlist::{MasterPlaylist, MediaPlaylist, SegmentEntry, VariantStream};

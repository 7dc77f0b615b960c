//! HLS playlist structures.
//!
//! Renders protocol version 4 media playlists (byte-range support requires
//! version 4) and master playlists listing alternative-bandwidth variants.
//! Segment durations are rendered unrounded; only the playlist-level target
//! duration is ceiling-rounded, per streaming-manifest convention.

use std::fmt::Write;

/// A segment entry in a media playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentEntry {
    /// Duration in seconds, unrounded.
    pub duration: f64,
    /// Optional title after the `#EXTINF` duration (item identifier).
    pub title: Option<String>,
    /// Byte range `(length, offset)` for slice-of-file segments.
    pub byte_range: Option<(u64, u64)>,
    /// Resolved segment URL.
    pub uri: String,
    /// Discontinuity before this segment.
    pub discontinuity: bool,
}

/// Media playlist for one rendition or one assembled multi-source sequence.
#[derive(Debug, Clone)]
pub struct MediaPlaylist {
    /// Target duration in seconds (ceiling of the summed durations).
    pub target_duration: u64,
    /// Media sequence number.
    pub media_sequence: u32,
    /// Segment entries.
    pub segments: Vec<SegmentEntry>,
}

impl MediaPlaylist {
    /// Create an empty playlist with the given target duration.
    pub fn new(target_duration: u64) -> Self {
        Self {
            target_duration,
            media_sequence: 0,
            segments: Vec::new(),
        }
    }

    /// Render to an M3U8 string.
    pub fn render(&self) -> String {
        let mut out = String::new();

        writeln!(out, "#EXTM3U").unwrap();
        writeln!(out, "#EXT-X-TARGETDURATION:{}", self.target_duration).unwrap();
        writeln!(out, "#EXT-X-VERSION:4").unwrap();
        writeln!(out, "#EXT-X-MEDIA-SEQUENCE:{}", self.media_sequence).unwrap();

        for segment in &self.segments {
            if segment.discontinuity {
                writeln!(out, "#EXT-X-DISCONTINUITY").unwrap();
            }
            match &segment.title {
                Some(title) => writeln!(out, "#EXTINF:{},{}", segment.duration, title).unwrap(),
                None => writeln!(out, "#EXTINF:{},", segment.duration).unwrap(),
            }
            if let Some((length, offset)) = segment.byte_range {
                writeln!(out, "#EXT-X-BYTERANGE:{}@{}", length, offset).unwrap();
            }
            writeln!(out, "{}", segment.uri).unwrap();
        }

        writeln!(out, "#EXT-X-ENDLIST").unwrap();

        out
    }
}

/// One alternative-bandwidth entry of a master playlist.
#[derive(Debug, Clone)]
pub struct VariantStream {
    /// Bandwidth in bits per second.
    pub bandwidth: u32,
    /// Video resolution, absent for audio-only variants.
    pub resolution: Option<(u32, u32)>,
    /// Codec string (e.g. "mp4a.40.2").
    pub codecs: Option<String>,
    /// Variant media playlist URI.
    pub uri: String,
}

/// Master playlist listing a file's alternative-bandwidth variants.
#[derive(Debug, Clone, Default)]
pub struct MasterPlaylist {
    /// Target duration of the underlying file, 0 when unknown.
    pub target_duration: u64,
    /// Stream variants.
    pub streams: Vec<VariantStream>,
}

impl MasterPlaylist {
    /// Create a master playlist for a file of the given duration.
    pub fn new(target_duration: u64) -> Self {
        Self {
            target_duration,
            streams: Vec::new(),
        }
    }

    /// Add a stream variant.
    pub fn add_stream(mut self, stream: VariantStream) -> Self {
        self.streams.push(stream);
        self
    }

    /// Render to an M3U8 string.
    pub fn render(&self) -> String {
        let mut out = String::new();

        writeln!(out, "#EXTM3U").unwrap();
        writeln!(out, "#EXT-X-TARGETDURATION:{}", self.target_duration).unwrap();
        writeln!(out, "#EXT-X-VERSION:4").unwrap();
        writeln!(out, "#EXT-X-MEDIA-SEQUENCE:0").unwrap();

        for stream in &self.streams {
            write!(
                out,
                "#EXT-X-STREAM-INF:PROGRAM-ID=1,BANDWIDTH={}",
                stream.bandwidth
            )
            .unwrap();
            if let Some((width, height)) = stream.resolution {
                write!(out, ",RESOLUTION={}x{}", width, height).unwrap();
            }
            if let Some(ref codecs) = stream.codecs {
                write!(out, ",CODECS=\"{}\"", codecs).unwrap();
            }
            writeln!(out).unwrap();
            writeln!(out, "{}", stream.uri).unwrap();
        }

        writeln!(out, "#EXT-X-ENDLIST").unwrap();

        out
    }
}

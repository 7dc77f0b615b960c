//! Playlist assembly across one or more segment-source groups.
//!
//! Consumes ordered per-source segment lists (possibly spanning multiple
//! chapters or files), inserts discontinuity markers at heterogeneous
//! boundaries, resolves segment URLs, and renders one media playlist body.

use versecast_common::paths;

use crate::hls::{MediaPlaylist, SegmentEntry};
use crate::segments::{SegmentGroup, SegmentList};

/// Maps a logical storage path to a playable URL.
///
/// Implementations may sign, rewrite, or pass paths through. Returning
/// `None` drops the segment from the manifest; a single unresolvable
/// segment must not blank the entire response.
pub trait UrlResolver {
    fn resolve(&mut self, path: &str) -> Option<String>;
}

/// The rendered output of one assembly pass.
#[derive(Debug, Clone)]
pub struct RenderedPlaylist {
    /// Complete M3U8 document.
    pub body: String,
    /// Sum of every rendered segment's duration, in seconds.
    pub total_duration: f64,
}

/// Render one media playlist from ordered segment groups.
///
/// Group order is preserved exactly; a discontinuity marker is emitted
/// before a group whose kind differs from the previously rendered group or
/// whose first source file differs from that group's last source file.
/// Entries within one group never get markers.
pub fn assemble(groups: &[SegmentGroup], resolver: &mut dyn UrlResolver) -> RenderedPlaylist {
    let mut entries: Vec<SegmentEntry> = Vec::new();
    let mut total_duration = 0.0;
    let mut last_rendered: Option<(crate::segments::GroupKind, Option<String>)> = None;

    for group in groups {
        let Some(prefix) = group.prefix.as_deref() else {
            // No resolvable asset association: drop the group's segments
            // rather than aborting the playlist.
            continue;
        };

        let mut discontinuity = match &last_rendered {
            None => false,
            Some((last_kind, last_path)) => {
                *last_kind != group.kind() || *last_path != group.first_source_path()
            }
        };

        let group_start = entries.len();
        match &group.segments {
            SegmentList::Discrete(segments) => {
                for seg in segments {
                    let path = paths::object_path(prefix, &seg.file_name);
                    let Some(uri) = resolver.resolve(&path) else {
                        continue;
                    };
                    entries.push(SegmentEntry {
                        duration: seg.duration_secs,
                        title: group.label.clone(),
                        byte_range: None,
                        uri,
                        discontinuity: std::mem::take(&mut discontinuity),
                    });
                    total_duration += seg.duration_secs;
                }
            }
            SegmentList::ByteRange(segments) => {
                for seg in segments {
                    let path = paths::object_path(prefix, &seg.file_name);
                    let Some(uri) = resolver.resolve(&path) else {
                        continue;
                    };
                    entries.push(SegmentEntry {
                        duration: seg.duration_secs,
                        title: group.label.clone(),
                        byte_range: Some((seg.byte_length, seg.byte_offset)),
                        uri,
                        discontinuity: std::mem::take(&mut discontinuity),
                    });
                    total_duration += seg.duration_secs;
                }
            }
        }

        if entries.len() > group_start {
            last_rendered = Some((group.kind(), group.last_source_path()));
        }
    }

    let mut playlist = MediaPlaylist::new(total_duration.ceil() as u64);
    playlist.segments = entries;

    RenderedPlaylist {
        body: playlist.render(),
        total_duration,
    }
}

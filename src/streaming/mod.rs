//! Playlist assembly pipeline: catalog projection, verse alignment, URL
//! signing, and assembly caching.

pub mod cache;
pub mod signing;
pub mod source;

pub use cache::{fingerprint, PlaylistCache};
pub use signing::{generate_signing_key, SignedResolver, UrlSigner};
pub use source::{build_source_groups, SourceGroup};

use rusqlite::Connection;
use versecast_common::{paths, FilesetId, Result};
use versecast_db::queries::filesets;
use versecast_media::{align_to_verse_range, SegmentGroup, SegmentList, VerseRange};

/// A scripture reference into one fileset, as resolved from a request path
/// or a stored playlist item.
#[derive(Debug, Clone)]
pub struct ItemRef {
    pub fileset_id: FilesetId,
    pub book_id: String,
    pub chapter_start: u32,
    pub chapter_end: u32,
    pub verse_start: Option<u32>,
    pub verse_end: Option<u32>,
    /// Rendered into `#EXTINF` titles on multi-item assemblies.
    pub label: Option<String>,
}

/// Build the segment groups for one item reference.
///
/// Verse bounds trim at the edges only: `verse_start` applies to the item's
/// first group and `verse_end` to its last, since interior chapters are
/// always played whole. A fileset without an asset association yields groups
/// with no prefix, which assembly drops rather than failing the request.
pub fn build_item_groups(
    conn: &Connection,
    item: &ItemRef,
    variant_name: Option<&str>,
    fallback_duration: f64,
) -> Result<Vec<SegmentGroup>> {
    let fileset = filesets::get_fileset(conn, item.fileset_id.as_str())?;

    let prefix = match &fileset.asset_id {
        Some(_) => Some(paths::fileset_prefix(
            fileset.media_kind.content_kind(),
            &fileset.bible_id,
            &fileset.hash_id,
        )),
        None => {
            tracing::warn!(
                fileset = %fileset.hash_id,
                "fileset has no asset association; its segments will be dropped"
            );
            None
        }
    };

    let source_groups = build_source_groups(
        conn,
        &fileset,
        &item.book_id,
        item.chapter_start,
        item.chapter_end,
        variant_name,
        fallback_duration,
    )?;

    let last = source_groups.len().saturating_sub(1);
    let groups = source_groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let range = edge_range(item, i == 0, i == last);
            let segments = match (group.segments, range) {
                (SegmentList::ByteRange(segs), Some(range)) => SegmentList::ByteRange(
                    align_to_verse_range(segs, group.timestamp_count, range),
                ),
                (segments, _) => segments,
            };
            SegmentGroup {
                label: item.label.clone(),
                prefix: prefix.clone(),
                segments,
            }
        })
        .collect();

    Ok(groups)
}

/// The verse range applying to a group at the item's edges, if any.
fn edge_range(item: &ItemRef, is_first: bool, is_last: bool) -> Option<VerseRange> {
    match (is_first, is_last) {
        (true, true) => match (item.verse_start, item.verse_end) {
            (Some(start), Some(end)) => Some(VerseRange::new(start, end)),
            (Some(start), None) => Some(VerseRange::from_start(start)),
            (None, Some(end)) => Some(VerseRange::to_end(end)),
            (None, None) => None,
        },
        (true, false) => item.verse_start.map(VerseRange::from_start),
        (false, true) => item.verse_end.map(VerseRange::to_end),
        (false, false) => None,
    }
}

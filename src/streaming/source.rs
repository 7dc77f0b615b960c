//! Catalog-to-segment projection.
//!
//! Resolves a fileset/book/chapter reference into ordered segment groups.
//! Discrete filesets map each chapter file to one whole-file segment in a
//! single group; stream filesets map each file to its own group built from
//! the chosen variant's children, preferring byte-range children over
//! discrete TS children when a variant carries both.

use rusqlite::Connection;
use std::collections::HashMap;
use versecast_common::{Error, Result};
use versecast_db::models::{AudioFile, Fileset, StreamVariant};
use versecast_db::queries::{files, timestamps, variants};
use versecast_media::{ByteRangeSegment, DiscreteSegment, SegmentList};

/// One recording's segments plus the context alignment needs.
#[derive(Debug, Clone)]
pub struct SourceGroup {
    pub file_id: i64,
    pub file_name: String,
    /// Timestamp rows on the owning file. Zero means whole-file granularity.
    pub timestamp_count: usize,
    pub segments: SegmentList,
}

/// Build segment groups for every file of a fileset matching a reference.
///
/// `variant_name` pins stream filesets to one named rendition per file;
/// `None` takes each file's first available rendition. Returns `NotFound`
/// when no file matches the reference.
pub fn build_source_groups(
    conn: &Connection,
    fileset: &Fileset,
    book_id: &str,
    chapter_start: u32,
    chapter_end: u32,
    variant_name: Option<&str>,
    fallback_duration: f64,
) -> Result<Vec<SourceGroup>> {
    let matched = files::list_files_for_reference(
        conn,
        &fileset.hash_id,
        book_id,
        chapter_start,
        chapter_end,
    )?;
    if matched.is_empty() {
        return Err(Error::not_found(format!(
            "{book_id} {chapter_start}-{chapter_end} in fileset {}",
            fileset.hash_id
        )));
    }

    if !fileset.media_kind.is_stream() {
        return Ok(vec![discrete_group(&matched, fallback_duration)]);
    }

    stream_groups(conn, &matched, variant_name)
}

/// All chapter files of a discrete fileset as one continuous group.
fn discrete_group(matched: &[AudioFile], fallback_duration: f64) -> SourceGroup {
    let segments = matched
        .iter()
        .map(|file| DiscreteSegment {
            duration_secs: file.duration_secs().unwrap_or(fallback_duration),
            file_name: file.file_name.clone(),
        })
        .collect();

    SourceGroup {
        file_id: matched[0].id,
        file_name: matched[0].file_name.clone(),
        timestamp_count: 0,
        segments: SegmentList::Discrete(segments),
    }
}

/// One group per file of a stream fileset, built from the chosen variant's
/// children.
fn stream_groups(
    conn: &Connection,
    matched: &[AudioFile],
    variant_name: Option<&str>,
) -> Result<Vec<SourceGroup>> {
    let file_ids: Vec<i64> = matched.iter().map(|f| f.id).collect();

    let chosen = choose_variants(conn, &file_ids, variant_name)?;
    let variant_ids: Vec<i64> = chosen.values().map(|v| v.id).collect();

    let mut byte_rows: HashMap<i64, Vec<_>> = HashMap::new();
    for row in variants::byte_segments_for_variants(conn, &variant_ids)? {
        byte_rows.entry(row.variant_id).or_default().push(row);
    }
    let mut file_rows: HashMap<i64, Vec<_>> = HashMap::new();
    for row in variants::file_segments_for_variants(conn, &variant_ids)? {
        file_rows.entry(row.variant_id).or_default().push(row);
    }
    let counts = timestamps::counts_for_files(conn, &file_ids)?;

    let mut groups = Vec::with_capacity(matched.len());
    for file in matched {
        let Some(variant) = chosen.get(&file.id) else {
            tracing::warn!(
                file_id = file.id,
                file_name = %file.file_name,
                "file has no stream variant; skipping"
            );
            continue;
        };

        let segments = if let Some(rows) = byte_rows.remove(&variant.id) {
            SegmentList::ByteRange(
                rows.into_iter()
                    .map(|row| ByteRangeSegment {
                        duration_secs: row.runtime,
                        byte_length: row.byte_length,
                        byte_offset: row.byte_offset,
                        file_name: file.file_name.clone(),
                        verse_start: row.verse_start,
                        verse_end: row.verse_end,
                    })
                    .collect(),
            )
        } else if let Some(rows) = file_rows.remove(&variant.id) {
            SegmentList::Discrete(
                rows.into_iter()
                    .map(|row| DiscreteSegment {
                        duration_secs: row.runtime,
                        file_name: row.file_name,
                    })
                    .collect(),
            )
        } else {
            SegmentList::ByteRange(Vec::new())
        };

        groups.push(SourceGroup {
            file_id: file.id,
            file_name: file.file_name.clone(),
            timestamp_count: counts.get(&file.id).copied().unwrap_or(0),
            segments,
        });
    }

    Ok(groups)
}

/// Pick one variant per file: the named one when requested, otherwise the
/// first available.
fn choose_variants(
    conn: &Connection,
    file_ids: &[i64],
    variant_name: Option<&str>,
) -> Result<HashMap<i64, StreamVariant>> {
    if let Some(name) = variant_name {
        let mut chosen = HashMap::with_capacity(file_ids.len());
        for &file_id in file_ids {
            let variant = variants::get_by_name(conn, file_id, name)?;
            chosen.insert(file_id, variant);
        }
        return Ok(chosen);
    }

    let mut chosen = HashMap::new();
    for variant in variants::list_for_files(conn, file_ids)? {
        chosen.entry(variant.audio_file_id).or_insert(variant);
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use versecast_common::MediaKind;
    use versecast_db::pool::{get_conn, init_memory_pool, DbPool, PooledConnection};
    use versecast_db::queries::filesets::create_fileset;

    fn setup(kind: MediaKind) -> (DbPool, PooledConnection, Fileset) {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let fileset = create_fileset(&conn, "FS", "ENGESV", kind, Some("dbp-prod")).unwrap();
        (pool, conn, fileset)
    }

    #[test]
    fn test_discrete_fileset_single_group() {
        let (_pool, conn, fileset) = setup(MediaKind::Audio);
        files::create_audio_file(
            &conn, "FS", "MAT", 1, None, None, None, "MAT_1.mp3", Some(183_000), None,
        )
        .unwrap();
        files::create_audio_file(
            &conn, "FS", "MAT", 2, None, None, None, "MAT_2.mp3", None, None,
        )
        .unwrap();

        let groups = build_source_groups(&conn, &fileset, "MAT", 1, 2, None, 180.0).unwrap();

        assert_eq!(groups.len(), 1);
        match &groups[0].segments {
            SegmentList::Discrete(segs) => {
                assert_eq!(segs.len(), 2);
                assert_eq!(segs[0].duration_secs, 183.0);
                // Missing duration falls back to the configured default.
                assert_eq!(segs[1].duration_secs, 180.0);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_no_matching_files_is_not_found() {
        let (_pool, conn, fileset) = setup(MediaKind::Audio);
        let err = build_source_groups(&conn, &fileset, "MAT", 1, 1, None, 180.0).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_stream_fileset_byte_segments_preferred() {
        let (_pool, conn, fileset) = setup(MediaKind::AudioStream);
        let file = files::create_audio_file(
            &conn, "FS", "MAT", 1, None, None, None, "MAT_1.webm", None, None,
        )
        .unwrap();
        let variant =
            variants::create_variant(&conn, file.id, "av64k.m3u8", 64_000, None, None, None)
                .unwrap();
        let ts = timestamps::create_timestamp(&conn, file.id, 1, None, Some(0), Some(500), Some(4.0))
            .unwrap();
        variants::create_byte_segment(&conn, variant.id, 0, 4.0, 500, 0, Some(ts.id)).unwrap();
        // A TS child alongside byte children must lose the preference.
        variants::create_file_segment(&conn, variant.id, 0, "seg0.ts", 4.0).unwrap();

        let groups = build_source_groups(&conn, &fileset, "MAT", 1, 1, None, 180.0).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].timestamp_count, 1);
        match &groups[0].segments {
            SegmentList::ByteRange(segs) => {
                assert_eq!(segs.len(), 1);
                assert_eq!(segs[0].byte_length, 500);
                assert_eq!(segs[0].verse_start, Some(1));
                // Byte ranges slice the parent recording, not the variant
                // playlist name.
                assert_eq!(segs[0].file_name, "MAT_1.webm");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_stream_fileset_ts_fallback() {
        let (_pool, conn, fileset) = setup(MediaKind::AudioDramaStream);
        let file = files::create_audio_file(
            &conn, "FS", "MRK", 1, None, None, None, "MRK_1", None, None,
        )
        .unwrap();
        let variant =
            variants::create_variant(&conn, file.id, "ts32k.m3u8", 32_000, None, None, None)
                .unwrap();
        variants::create_file_segment(&conn, variant.id, 0, "MRK_1_0.ts", 10.0).unwrap();
        variants::create_file_segment(&conn, variant.id, 1, "MRK_1_1.ts", 9.5).unwrap();

        let groups = build_source_groups(&conn, &fileset, "MRK", 1, 1, None, 180.0).unwrap();

        match &groups[0].segments {
            SegmentList::Discrete(segs) => {
                assert_eq!(segs.len(), 2);
                assert_eq!(segs[0].file_name, "MRK_1_0.ts");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_named_variant_selection_and_miss() {
        let (_pool, conn, fileset) = setup(MediaKind::AudioStream);
        let file = files::create_audio_file(
            &conn, "FS", "MAT", 1, None, None, None, "MAT_1.webm", None, None,
        )
        .unwrap();
        let low =
            variants::create_variant(&conn, file.id, "av32k.m3u8", 32_000, None, None, None)
                .unwrap();
        let high =
            variants::create_variant(&conn, file.id, "av128k.m3u8", 128_000, None, None, None)
                .unwrap();
        variants::create_byte_segment(&conn, low.id, 0, 4.0, 100, 0, None).unwrap();
        variants::create_byte_segment(&conn, high.id, 0, 4.0, 900, 0, None).unwrap();

        let groups =
            build_source_groups(&conn, &fileset, "MAT", 1, 1, Some("av128k.m3u8"), 180.0).unwrap();
        match &groups[0].segments {
            SegmentList::ByteRange(segs) => assert_eq!(segs[0].byte_length, 900),
            _ => unreachable!(),
        }

        let err = build_source_groups(&conn, &fileset, "MAT", 1, 1, Some("av999k.m3u8"), 180.0)
            .unwrap_err();
        assert!(matches!(err, Error::VariantUnavailable(_)));
    }

    #[test]
    fn test_file_without_variant_skipped() {
        let (_pool, conn, fileset) = setup(MediaKind::AudioStream);
        let with = files::create_audio_file(
            &conn, "FS", "MAT", 1, None, None, None, "MAT_1.webm", None, None,
        )
        .unwrap();
        files::create_audio_file(
            &conn, "FS", "MAT", 2, None, None, None, "MAT_2.webm", None, None,
        )
        .unwrap();
        let variant =
            variants::create_variant(&conn, with.id, "av64k.m3u8", 64_000, None, None, None)
                .unwrap();
        variants::create_byte_segment(&conn, variant.id, 0, 4.0, 500, 0, None).unwrap();

        let groups = build_source_groups(&conn, &fileset, "MAT", 1, 2, None, 180.0).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].file_id, with.id);
    }
}

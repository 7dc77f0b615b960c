//! Stream variant and segment query operations.
//!
//! Segment reads are batched: callers collect all variant IDs first and
//! fetch every child row in one query, then group in memory.

use rusqlite::{params, params_from_iter, Connection, Row};
use versecast_common::{Error, Result};

use crate::models::{ByteSegmentRow, FileSegmentRow, StreamVariant};
use crate::queries::placeholders;

fn map_variant(row: &Row<'_>) -> rusqlite::Result<StreamVariant> {
    Ok(StreamVariant {
        id: row.get(0)?,
        audio_file_id: row.get(1)?,
        file_name: row.get(2)?,
        bandwidth: row.get(3)?,
        width: row.get(4)?,
        height: row.get(5)?,
        codecs: row.get(6)?,
    })
}

const VARIANT_COLUMNS: &str = "id, audio_file_id, file_name, bandwidth, width, height, codecs";

/// Insert a stream variant (used by ingestion and test fixtures).
pub fn create_variant(
    conn: &Connection,
    audio_file_id: i64,
    file_name: &str,
    bandwidth: u32,
    width: Option<u32>,
    height: Option<u32>,
    codecs: Option<&str>,
) -> Result<StreamVariant> {
    conn.execute(
        "INSERT INTO stream_variants (audio_file_id, file_name, bandwidth, width, height, codecs)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![audio_file_id, file_name, bandwidth, width, height, codecs],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(StreamVariant {
        id: conn.last_insert_rowid(),
        audio_file_id,
        file_name: file_name.to_string(),
        bandwidth,
        width,
        height,
        codecs: codecs.map(str::to_string),
    })
}

/// Insert a byte-range segment child of a variant.
pub fn create_byte_segment(
    conn: &Connection,
    variant_id: i64,
    position: u32,
    runtime: f64,
    byte_length: u64,
    byte_offset: u64,
    timestamp_id: Option<i64>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO variant_byte_segments (variant_id, position, runtime,
                                            byte_length, byte_offset, timestamp_id)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            variant_id,
            position,
            runtime,
            byte_length as i64,
            byte_offset as i64,
            timestamp_id,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

/// Insert a discrete TS segment child of a variant.
pub fn create_file_segment(
    conn: &Connection,
    variant_id: i64,
    position: u32,
    file_name: &str,
    runtime: f64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO variant_file_segments (variant_id, position, file_name, runtime)
         VALUES (?, ?, ?, ?)",
        params![variant_id, position, file_name, runtime],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

/// List variants for a set of audio files in one query, ordered by file then
/// insertion order ("first available" selection picks the first per file).
pub fn list_for_files(conn: &Connection, audio_file_ids: &[i64]) -> Result<Vec<StreamVariant>> {
    if audio_file_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT {VARIANT_COLUMNS} FROM stream_variants
         WHERE audio_file_id IN ({})
         ORDER BY audio_file_id, id",
        placeholders(audio_file_ids.len())
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;

    let variants = stmt
        .query_map(params_from_iter(audio_file_ids.iter()), map_variant)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(variants)
}

/// Get one variant of a file by its playlist file name.
pub fn get_by_name(
    conn: &Connection,
    audio_file_id: i64,
    file_name: &str,
) -> Result<StreamVariant> {
    conn.query_row(
        &format!(
            "SELECT {VARIANT_COLUMNS} FROM stream_variants
             WHERE audio_file_id = ? AND file_name = ?"
        ),
        params![audio_file_id, file_name],
        map_variant,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Error::variant_unavailable(file_name),
        _ => Error::database(e.to_string()),
    })
}

/// Fetch byte-range segments for a set of variants in one query, joined with
/// their verse timestamps, ordered by variant then position.
pub fn byte_segments_for_variants(
    conn: &Connection,
    variant_ids: &[i64],
) -> Result<Vec<ByteSegmentRow>> {
    if variant_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT s.variant_id, s.position, s.runtime, s.byte_length, s.byte_offset,
                t.verse_start, t.verse_end
         FROM variant_byte_segments s
         LEFT JOIN verse_timestamps t ON t.id = s.timestamp_id
         WHERE s.variant_id IN ({})
         ORDER BY s.variant_id, s.position",
        placeholders(variant_ids.len())
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map(params_from_iter(variant_ids.iter()), |row| {
            Ok(ByteSegmentRow {
                variant_id: row.get(0)?,
                position: row.get(1)?,
                runtime: row.get(2)?,
                byte_length: row.get::<_, i64>(3)? as u64,
                byte_offset: row.get::<_, i64>(4)? as u64,
                verse_start: row.get(5)?,
                verse_end: row.get(6)?,
            })
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows)
}

/// Fetch discrete TS segments for a set of variants in one query, ordered by
/// variant then position.
pub fn file_segments_for_variants(
    conn: &Connection,
    variant_ids: &[i64],
) -> Result<Vec<FileSegmentRow>> {
    if variant_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT variant_id, position, file_name, runtime
         FROM variant_file_segments
         WHERE variant_id IN ({})
         ORDER BY variant_id, position",
        placeholders(variant_ids.len())
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map(params_from_iter(variant_ids.iter()), |row| {
            Ok(FileSegmentRow {
                variant_id: row.get(0)?,
                position: row.get(1)?,
                file_name: row.get(2)?,
                runtime: row.get(3)?,
            })
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{get_conn, init_memory_pool};
    use crate::queries::{files::create_audio_file, filesets::create_fileset, timestamps};
    use versecast_common::MediaKind;

    fn setup(conn: &Connection) -> i64 {
        create_fileset(conn, "FS", "B", MediaKind::AudioDramaStream, Some("bucket")).unwrap();
        create_audio_file(conn, "FS", "MAT", 1, None, None, None, "mat1", None, None)
            .unwrap()
            .id
    }

    #[test]
    fn test_variant_selection_order() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let file_id = setup(&conn);

        create_variant(&conn, file_id, "av64k.m3u8", 64_000, None, None, None).unwrap();
        create_variant(&conn, file_id, "av128k.m3u8", 128_000, None, None, None).unwrap();

        let variants = list_for_files(&conn, &[file_id]).unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].file_name, "av64k.m3u8");

        let named = get_by_name(&conn, file_id, "av128k.m3u8").unwrap();
        assert_eq!(named.bandwidth, 128_000);

        let err = get_by_name(&conn, file_id, "av256k.m3u8").unwrap_err();
        assert!(matches!(err, Error::VariantUnavailable(_)));
    }

    #[test]
    fn test_byte_segments_join_timestamps() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let file_id = setup(&conn);

        let variant = create_variant(&conn, file_id, "av64k.m3u8", 64_000, None, None, None).unwrap();
        let ts = timestamps::create_timestamp(&conn, file_id, 1, None, Some(0), Some(500), Some(4.0))
            .unwrap();

        create_byte_segment(&conn, variant.id, 0, 4.0, 500, 0, Some(ts.id)).unwrap();
        create_byte_segment(&conn, variant.id, 1, 3.5, 400, 500, None).unwrap();

        let rows = byte_segments_for_variants(&conn, &[variant.id]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].verse_start, Some(1));
        assert_eq!(rows[1].verse_start, None);
        assert_eq!(rows[1].byte_offset, 500);
    }

    #[test]
    fn test_file_segments_ordered() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let file_id = setup(&conn);

        let variant = create_variant(&conn, file_id, "ts.m3u8", 64_000, None, None, None).unwrap();
        create_file_segment(&conn, variant.id, 1, "seg1.ts", 10.0).unwrap();
        create_file_segment(&conn, variant.id, 0, "seg0.ts", 10.0).unwrap();

        let rows = file_segments_for_variants(&conn, &[variant.id]).unwrap();
        assert_eq!(rows[0].file_name, "seg0.ts");
        assert_eq!(rows[1].file_name, "seg1.ts");
    }

    #[test]
    fn test_empty_id_lists() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        assert!(list_for_files(&conn, &[]).unwrap().is_empty());
        assert!(byte_segments_for_variants(&conn, &[]).unwrap().is_empty());
        assert!(file_segments_for_variants(&conn, &[]).unwrap().is_empty());
    }
}

//! Verse timestamp query operations.

use rusqlite::{params, Connection};
use versecast_common::{Error, Result};

use crate::models::VerseTimestamp;

/// Insert a verse timestamp (used by ingestion and test fixtures).
pub fn create_timestamp(
    conn: &Connection,
    audio_file_id: i64,
    verse_start: u32,
    verse_end: Option<u32>,
    byte_offset: Option<u64>,
    byte_length: Option<u64>,
    runtime: Option<f64>,
) -> Result<VerseTimestamp> {
    conn.execute(
        "INSERT INTO verse_timestamps (audio_file_id, verse_start, verse_end,
                                       byte_offset, byte_length, runtime)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            audio_file_id,
            verse_start,
            verse_end,
            byte_offset.map(|v| v as i64),
            byte_length.map(|v| v as i64),
            runtime,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(VerseTimestamp {
        id: conn.last_insert_rowid(),
        audio_file_id,
        verse_start,
        verse_end,
        byte_offset,
        byte_length,
        runtime,
    })
}

/// List a file's timestamps ordered by verse position.
pub fn list_for_file(conn: &Connection, audio_file_id: i64) -> Result<Vec<VerseTimestamp>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, audio_file_id, verse_start, verse_end, byte_offset, byte_length, runtime
             FROM verse_timestamps WHERE audio_file_id = ?
             ORDER BY verse_start, id",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map([audio_file_id], |row| {
            Ok(VerseTimestamp {
                id: row.get(0)?,
                audio_file_id: row.get(1)?,
                verse_start: row.get(2)?,
                verse_end: row.get(3)?,
                byte_offset: row.get::<_, Option<i64>>(4)?.map(|v| v as u64),
                byte_length: row.get::<_, Option<i64>>(5)?.map(|v| v as u64),
                runtime: row.get(6)?,
            })
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows)
}

/// Count timestamps for a set of files in one query.
pub fn counts_for_files(
    conn: &Connection,
    audio_file_ids: &[i64],
) -> Result<std::collections::HashMap<i64, usize>> {
    if audio_file_ids.is_empty() {
        return Ok(std::collections::HashMap::new());
    }

    let sql = format!(
        "SELECT audio_file_id, COUNT(*) FROM verse_timestamps
         WHERE audio_file_id IN ({})
         GROUP BY audio_file_id",
        crate::queries::placeholders(audio_file_ids.len())
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;

    let counts = stmt
        .query_map(
            rusqlite::params_from_iter(audio_file_ids.iter()),
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)? as usize)),
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<std::collections::HashMap<_, _>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(counts)
}

/// Count a file's timestamps.
pub fn count_for_file(conn: &Connection, audio_file_id: i64) -> Result<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM verse_timestamps WHERE audio_file_id = ?",
            [audio_file_id],
            |row| row.get(0),
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{get_conn, init_memory_pool};
    use crate::queries::{files::create_audio_file, filesets::create_fileset};
    use versecast_common::MediaKind;

    #[test]
    fn test_timestamps_ordered_by_verse() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        create_fileset(&conn, "FS", "B", MediaKind::AudioStream, Some("bucket")).unwrap();
        let file = create_audio_file(
            &conn, "FS", "MAT", 1, None, None, None, "mat1.mp3", None, None,
        )
        .unwrap();

        create_timestamp(&conn, file.id, 5, None, None, None, Some(3.0)).unwrap();
        create_timestamp(&conn, file.id, 1, Some(4), Some(0), Some(100), Some(10.0)).unwrap();

        let ts = list_for_file(&conn, file.id).unwrap();
        assert_eq!(ts.len(), 2);
        assert_eq!(ts[0].verse_start, 1);
        assert_eq!(ts[0].verse_end, Some(4));
        assert_eq!(ts[1].verse_start, 5);
        assert_eq!(count_for_file(&conn, file.id).unwrap(), 2);
    }
}

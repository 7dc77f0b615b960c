//! Audio file query operations.

use rusqlite::{params, Connection, Row};
use versecast_common::{Error, Result};

use crate::models::AudioFile;

fn map_audio_file(row: &Row<'_>) -> rusqlite::Result<AudioFile> {
    Ok(AudioFile {
        id: row.get(0)?,
        hash_id: row.get(1)?,
        book_id: row.get(2)?,
        chapter_start: row.get(3)?,
        chapter_end: row.get(4)?,
        verse_start: row.get(5)?,
        verse_end: row.get(6)?,
        file_name: row.get(7)?,
        duration_ms: row.get(8)?,
        file_size: row.get(9)?,
    })
}

const FILE_COLUMNS: &str = "id, hash_id, book_id, chapter_start, chapter_end, \
                            verse_start, verse_end, file_name, duration_ms, file_size";

/// Insert an audio file (used by ingestion and test fixtures).
#[allow(clippy::too_many_arguments)]
pub fn create_audio_file(
    conn: &Connection,
    hash_id: &str,
    book_id: &str,
    chapter_start: u32,
    chapter_end: Option<u32>,
    verse_start: Option<u32>,
    verse_end: Option<u32>,
    file_name: &str,
    duration_ms: Option<i64>,
    file_size: Option<i64>,
) -> Result<AudioFile> {
    conn.execute(
        "INSERT INTO audio_files (hash_id, book_id, chapter_start, chapter_end,
                                  verse_start, verse_end, file_name, duration_ms, file_size)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            hash_id,
            book_id,
            chapter_start,
            chapter_end,
            verse_start,
            verse_end,
            file_name,
            duration_ms,
            file_size,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    let id = conn.last_insert_rowid();
    Ok(AudioFile {
        id,
        hash_id: hash_id.to_string(),
        book_id: book_id.to_string(),
        chapter_start,
        chapter_end,
        verse_start,
        verse_end,
        file_name: file_name.to_string(),
        duration_ms,
        file_size,
    })
}

/// Get one audio file by fileset hash and file id.
pub fn get_file(conn: &Connection, hash_id: &str, file_id: i64) -> Result<AudioFile> {
    conn.query_row(
        &format!("SELECT {FILE_COLUMNS} FROM audio_files WHERE hash_id = ? AND id = ?"),
        params![hash_id, file_id],
        map_audio_file,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => {
            Error::not_found(format!("file {file_id} in fileset {hash_id}"))
        }
        _ => Error::database(e.to_string()),
    })
}

/// List all files of a fileset matching a book and chapter range, ordered by
/// chapter then verse position.
pub fn list_files_for_reference(
    conn: &Connection,
    hash_id: &str,
    book_id: &str,
    chapter_start: u32,
    chapter_end: u32,
) -> Result<Vec<AudioFile>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {FILE_COLUMNS} FROM audio_files
             WHERE hash_id = ? AND book_id = ? AND chapter_start >= ? AND chapter_start <= ?
             ORDER BY chapter_start, verse_start, id"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let files = stmt
        .query_map(
            params![hash_id, book_id, chapter_start, chapter_end],
            map_audio_file,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{get_conn, init_memory_pool, PooledConnection};
    use crate::queries::filesets::create_fileset;
    use versecast_common::MediaKind;

    fn setup() -> (crate::pool::DbPool, PooledConnection) {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        create_fileset(&conn, "TESTFS", "TEST", MediaKind::Audio, Some("bucket")).unwrap();
        (pool, conn)
    }

    #[test]
    fn test_create_and_get_file() {
        let (_pool, conn) = setup();

        let file = create_audio_file(
            &conn,
            "TESTFS",
            "MAT",
            1,
            None,
            None,
            None,
            "B01___01_Matthew.mp3",
            Some(183_000),
            Some(2_900_000),
        )
        .unwrap();

        let fetched = get_file(&conn, "TESTFS", file.id).unwrap();
        assert_eq!(fetched.book_id, "MAT");
        assert_eq!(fetched.duration_secs(), Some(183.0));
    }

    #[test]
    fn test_list_files_for_reference_ordered() {
        let (_pool, conn) = setup();

        for chapter in [3u32, 1, 2] {
            create_audio_file(
                &conn,
                "TESTFS",
                "MAT",
                chapter,
                None,
                None,
                None,
                &format!("MAT_{chapter}.mp3"),
                None,
                None,
            )
            .unwrap();
        }

        let files = list_files_for_reference(&conn, "TESTFS", "MAT", 1, 3).unwrap();
        let chapters: Vec<u32> = files.iter().map(|f| f.chapter_start).collect();
        assert_eq!(chapters, vec![1, 2, 3]);

        let subset = list_files_for_reference(&conn, "TESTFS", "MAT", 2, 2).unwrap();
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].chapter_start, 2);
    }

    #[test]
    fn test_get_file_wrong_fileset() {
        let (_pool, conn) = setup();

        let file = create_audio_file(
            &conn, "TESTFS", "MAT", 1, None, None, None, "a.mp3", None, None,
        )
        .unwrap();

        let err = get_file(&conn, "OTHER", file.id).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}

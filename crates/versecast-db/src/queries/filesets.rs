//! Fileset query operations.

use rusqlite::{params, Connection};
use versecast_common::{Error, MediaKind, Result};

use crate::models::Fileset;

/// Insert a fileset (used by ingestion and test fixtures).
pub fn create_fileset(
    conn: &Connection,
    hash_id: &str,
    bible_id: &str,
    media_kind: MediaKind,
    asset_id: Option<&str>,
) -> Result<Fileset> {
    conn.execute(
        "INSERT INTO filesets (hash_id, bible_id, media_kind, asset_id) VALUES (?, ?, ?, ?)",
        params![hash_id, bible_id, media_kind.to_string(), asset_id],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Fileset {
        hash_id: hash_id.to_string(),
        bible_id: bible_id.to_string(),
        media_kind,
        asset_id: asset_id.map(str::to_string),
    })
}

/// Get a fileset by its hash id.
pub fn get_fileset(conn: &Connection, hash_id: &str) -> Result<Fileset> {
    conn.query_row(
        "SELECT hash_id, bible_id, media_kind, asset_id FROM filesets WHERE hash_id = ?",
        [hash_id],
        |row| {
            Ok(Fileset {
                hash_id: row.get(0)?,
                bible_id: row.get(1)?,
                media_kind: row
                    .get::<_, String>(2)?
                    .parse()
                    .unwrap_or(MediaKind::Audio),
                asset_id: row.get(3)?,
            })
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => {
            Error::not_found(format!("fileset {hash_id}"))
        }
        _ => Error::database(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{get_conn, init_memory_pool};

    #[test]
    fn test_create_and_get_fileset() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        create_fileset(
            &conn,
            "ENGESVN2DA16",
            "ENGESV",
            MediaKind::AudioDramaStream,
            Some("dbp-prod"),
        )
        .unwrap();

        let fs = get_fileset(&conn, "ENGESVN2DA16").unwrap();
        assert_eq!(fs.bible_id, "ENGESV");
        assert_eq!(fs.media_kind, MediaKind::AudioDramaStream);
        assert_eq!(fs.asset_id.as_deref(), Some("dbp-prod"));
    }

    #[test]
    fn test_get_fileset_missing() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let err = get_fileset(&conn, "NOPE").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}

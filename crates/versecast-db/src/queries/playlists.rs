//! Stored playlist query operations.

use rusqlite::{params, Connection, Row};
use versecast_common::{Error, Result};

use crate::models::{Playlist, PlaylistItem};

fn map_item(row: &Row<'_>) -> rusqlite::Result<PlaylistItem> {
    Ok(PlaylistItem {
        id: row.get(0)?,
        playlist_id: row.get(1)?,
        position: row.get(2)?,
        fileset_id: row.get(3)?,
        book_id: row.get(4)?,
        chapter_start: row.get(5)?,
        chapter_end: row.get(6)?,
        verse_start: row.get(7)?,
        verse_end: row.get(8)?,
        duration: row.get(9)?,
        verses: row.get(10)?,
    })
}

const ITEM_COLUMNS: &str = "id, playlist_id, position, fileset_id, book_id, \
                            chapter_start, chapter_end, verse_start, verse_end, duration, verses";

/// Insert a playlist (used by test fixtures and future CRUD surfaces).
pub fn create_playlist(conn: &Connection, name: &str) -> Result<Playlist> {
    conn.execute("INSERT INTO playlists (name) VALUES (?)", [name])
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(Playlist {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

/// Append an item to a playlist.
#[allow(clippy::too_many_arguments)]
pub fn create_item(
    conn: &Connection,
    playlist_id: i64,
    position: u32,
    fileset_id: &str,
    book_id: &str,
    chapter_start: u32,
    chapter_end: u32,
    verse_start: Option<u32>,
    verse_end: Option<u32>,
) -> Result<PlaylistItem> {
    conn.execute(
        "INSERT INTO playlist_items (playlist_id, position, fileset_id, book_id,
                                     chapter_start, chapter_end, verse_start, verse_end)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            playlist_id,
            position,
            fileset_id,
            book_id,
            chapter_start,
            chapter_end,
            verse_start,
            verse_end,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(PlaylistItem {
        id: conn.last_insert_rowid(),
        playlist_id,
        position,
        fileset_id: fileset_id.to_string(),
        book_id: book_id.to_string(),
        chapter_start,
        chapter_end,
        verse_start,
        verse_end,
        duration: None,
        verses: None,
    })
}

/// Get a playlist by id.
pub fn get_playlist(conn: &Connection, id: i64) -> Result<Playlist> {
    conn.query_row(
        "SELECT id, name FROM playlists WHERE id = ?",
        [id],
        |row| {
            Ok(Playlist {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Error::not_found(format!("playlist {id}")),
        _ => Error::database(e.to_string()),
    })
}

/// List a playlist's items in position order.
pub fn list_items(conn: &Connection, playlist_id: i64) -> Result<Vec<PlaylistItem>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM playlist_items
             WHERE playlist_id = ? ORDER BY position, id"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let items = stmt
        .query_map([playlist_id], map_item)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(items)
}

/// Get one stored playlist item by id.
pub fn get_item(conn: &Connection, item_id: i64) -> Result<PlaylistItem> {
    conn.query_row(
        &format!("SELECT {ITEM_COLUMNS} FROM playlist_items WHERE id = ?"),
        [item_id],
        map_item,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => {
            Error::not_found(format!("playlist item {item_id}"))
        }
        _ => Error::database(e.to_string()),
    })
}

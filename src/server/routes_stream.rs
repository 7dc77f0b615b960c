//! Single-fileset stream endpoints.
//!
//! `GET /stream/{fileset_id}/{location}` resolves a file reference inside a
//! fileset. Stream-kind filesets answer with a master playlist listing the
//! file's bandwidth variants; discrete filesets answer directly with a media
//! playlist of signed whole-file segments.
//!
//! `GET /stream/{fileset_id}/{location}/{variant}` renders the media
//! playlist of one named variant, byte-range entries signed.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Router,
};
use versecast_common::{Error, Result};
use versecast_db::models::AudioFile;
use versecast_db::pool::get_conn;
use versecast_db::queries::{files, filesets, variants};
use versecast_media::hls::{MasterPlaylist, VariantStream};
use versecast_media::assemble;

use crate::server::{m3u8_response, ApiError, AppContext};
use crate::streaming::{build_item_groups, ItemRef, SignedResolver};

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/:fileset_id/:location", get(file_index))
        .route("/:fileset_id/:location/:variant", get(variant_playlist))
}

/// A file reference inside a fileset: a numeric file id, a `BOOK-chapter`
/// key, or a `BOOK-chapter-verse_start-verse_end` key.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    FileId(i64),
    Reference {
        book_id: String,
        chapter: u32,
        verse_start: Option<u32>,
        verse_end: Option<u32>,
    },
}

/// Parse a location key. Malformed keys are treated as references to
/// nothing, not as client errors.
fn parse_location(raw: &str) -> Result<Location> {
    if let Ok(file_id) = raw.parse::<i64>() {
        return Ok(Location::FileId(file_id));
    }

    let parts: Vec<&str> = raw.split('-').collect();
    let malformed = || Error::not_found(format!("location {raw}"));

    match parts.as_slice() {
        [book, chapter] => Ok(Location::Reference {
            book_id: (*book).to_string(),
            chapter: chapter.parse().map_err(|_| malformed())?,
            verse_start: None,
            verse_end: None,
        }),
        [book, chapter, verse_start, verse_end] => Ok(Location::Reference {
            book_id: (*book).to_string(),
            chapter: chapter.parse().map_err(|_| malformed())?,
            verse_start: Some(verse_start.parse().map_err(|_| malformed())?),
            verse_end: Some(verse_end.parse().map_err(|_| malformed())?),
        }),
        _ => Err(malformed()),
    }
}

/// Turn a location into an item reference, resolving numeric file ids
/// through the catalog.
fn location_item(
    conn: &rusqlite::Connection,
    fileset_id: &str,
    location: &Location,
) -> Result<ItemRef> {
    let (book_id, chapter_start, chapter_end, verse_start, verse_end) = match location {
        Location::FileId(file_id) => {
            let file = files::get_file(conn, fileset_id, *file_id)?;
            let end = file.chapter_end.unwrap_or(file.chapter_start);
            (file.book_id, file.chapter_start, end, None, None)
        }
        Location::Reference {
            book_id,
            chapter,
            verse_start,
            verse_end,
        } => (book_id.clone(), *chapter, *chapter, *verse_start, *verse_end),
    };

    Ok(ItemRef {
        fileset_id: fileset_id.into(),
        book_id,
        chapter_start,
        chapter_end,
        verse_start,
        verse_end,
        label: None,
    })
}

/// The single file a stream-kind location resolves to.
fn resolve_stream_file(
    conn: &rusqlite::Connection,
    fileset_id: &str,
    location: &Location,
) -> Result<AudioFile> {
    match location {
        Location::FileId(file_id) => files::get_file(conn, fileset_id, *file_id),
        Location::Reference {
            book_id, chapter, ..
        } => {
            let matched =
                files::list_files_for_reference(conn, fileset_id, book_id, *chapter, *chapter)?;
            matched
                .into_iter()
                .next()
                .ok_or_else(|| Error::not_found(format!("{book_id} {chapter} in {fileset_id}")))
        }
    }
}

async fn file_index(
    State(ctx): State<AppContext>,
    Path((fileset_id, location_key)): Path<(String, String)>,
) -> std::result::Result<Response, ApiError> {
    let conn = get_conn(&ctx.db_pool)?;
    let fileset = filesets::get_fileset(&conn, &fileset_id)?;
    let location = parse_location(&location_key)?;

    if !fileset.media_kind.is_stream() {
        // Discrete filesets have no variants to index; serve the media
        // playlist directly.
        let item = location_item(&conn, &fileset_id, &location)?;
        let groups = build_item_groups(
            &conn,
            &item,
            None,
            ctx.config.streaming.fallback_duration_secs,
        )?;
        let mut resolver = SignedResolver::new(ctx.signer.as_ref(), false);
        let rendered = assemble(&groups, &mut resolver);
        return Ok(m3u8_response(rendered.body));
    }

    let file = resolve_stream_file(&conn, &fileset_id, &location)?;
    let file_variants = variants::list_for_files(&conn, &[file.id])?;
    if file_variants.is_empty() {
        return Err(Error::variant_unavailable(format!(
            "file {} in {fileset_id}",
            file.id
        ))
        .into());
    }

    let target = file.duration_secs().map(|d| d.ceil() as u64).unwrap_or(0);
    let mut master = MasterPlaylist::new(target);
    for variant in file_variants {
        master = master.add_stream(VariantStream {
            bandwidth: variant.bandwidth,
            resolution: variant.width.zip(variant.height),
            codecs: variant.codecs,
            uri: format!("/stream/{fileset_id}/{location_key}/{}", variant.file_name),
        });
    }

    Ok(m3u8_response(master.render()))
}

async fn variant_playlist(
    State(ctx): State<AppContext>,
    Path((fileset_id, location_key, variant_name)): Path<(String, String, String)>,
) -> std::result::Result<Response, ApiError> {
    let conn = get_conn(&ctx.db_pool)?;
    let fileset = filesets::get_fileset(&conn, &fileset_id)?;
    if !fileset.media_kind.is_stream() {
        return Err(Error::variant_unavailable(format!(
            "{variant_name} in discrete fileset {fileset_id}"
        ))
        .into());
    }

    let location = parse_location(&location_key)?;
    let item = location_item(&conn, &fileset_id, &location)?;

    let key = crate::streaming::fingerprint(&[
        "stream",
        &fileset_id,
        &location_key,
        &variant_name,
    ]);
    let groups = ctx.playlist_cache.get_or_compute(&key, || {
        build_item_groups(
            &conn,
            &item,
            Some(&variant_name),
            ctx.config.streaming.fallback_duration_secs,
        )
    })?;

    let mut resolver = SignedResolver::new(ctx.signer.as_ref(), false);
    let rendered = assemble(&groups, &mut resolver);

    Ok(m3u8_response(rendered.body))
}

//! Stored-playlist endpoints.
//!
//! `GET /playlists/{playlist_id}/hls` concatenates every stored item of a
//! playlist into one media playlist, in position order, with item ids as
//! `#EXTINF` titles. `GET /playlists/{item_ref}/item-hls` serves a single
//! item, addressed either by stored item id or by an inline
//! `{fileset}-{book}-{chapter}-{verse_start}-{verse_end}` composite key.
//!
//! `?download=true` switches both from raw M3U8 text to a JSON envelope
//! carrying the body, the signed URL map, and the total duration, so a
//! client can fetch segments itself and keep the manifest offline.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use versecast_common::{Error, Result};
use versecast_db::pool::get_conn;
use versecast_db::queries::playlists;
use versecast_media::{assemble, SegmentGroup};

use crate::server::{m3u8_response, ApiError, AppContext};
use crate::streaming::{build_item_groups, fingerprint, ItemRef, SignedResolver};

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/:playlist_id/hls", get(playlist_hls))
        .route("/:item_ref/item-hls", get(item_hls))
}

#[derive(Debug, Deserialize)]
struct DownloadQuery {
    #[serde(default)]
    download: bool,
}

async fn playlist_hls(
    State(ctx): State<AppContext>,
    Path(playlist_id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> std::result::Result<Response, ApiError> {
    let playlist_id: i64 = playlist_id
        .parse()
        .map_err(|_| Error::not_found(format!("playlist {playlist_id}")))?;

    let conn = get_conn(&ctx.db_pool)?;
    playlists::get_playlist(&conn, playlist_id)?;
    let items = playlists::list_items(&conn, playlist_id)?;

    let key = fingerprint(&["playlist", &playlist_id.to_string()]);
    let groups = ctx.playlist_cache.get_or_compute(&key, || {
        let mut groups: Vec<SegmentGroup> = Vec::new();
        for item in &items {
            let item_ref = ItemRef {
                fileset_id: item.fileset_id.as_str().into(),
                book_id: item.book_id.clone(),
                chapter_start: item.chapter_start,
                chapter_end: item.chapter_end,
                verse_start: item.verse_start,
                verse_end: item.verse_end,
                label: Some(item.id.to_string()),
            };
            match build_item_groups(
                &conn,
                &item_ref,
                None,
                ctx.config.streaming.fallback_duration_secs,
            ) {
                Ok(item_groups) => groups.extend(item_groups),
                // A stale item must not blank the rest of the playlist.
                Err(Error::NotFound(reference)) => {
                    tracing::warn!(
                        playlist_id,
                        item_id = item.id,
                        %reference,
                        "skipping unresolvable playlist item"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(groups)
    })?;

    Ok(respond(&ctx, &groups, query.download))
}

async fn item_hls(
    State(ctx): State<AppContext>,
    Path(item_ref): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> std::result::Result<Response, ApiError> {
    let conn = get_conn(&ctx.db_pool)?;
    let item = resolve_item_ref(&conn, &item_ref)?;

    let key = fingerprint(&["item", &item_ref]);
    let groups = ctx.playlist_cache.get_or_compute(&key, || {
        build_item_groups(
            &conn,
            &item,
            None,
            ctx.config.streaming.fallback_duration_secs,
        )
    })?;

    Ok(respond(&ctx, &groups, query.download))
}

/// Resolve an item reference: a numeric stored-item id, or an inline
/// `{fileset}-{book}-{chapter}-{verse_start}-{verse_end}` composite key.
/// Malformed composites read as references to nothing.
fn resolve_item_ref(conn: &rusqlite::Connection, raw: &str) -> Result<ItemRef> {
    if let Ok(item_id) = raw.parse::<i64>() {
        let item = playlists::get_item(conn, item_id)?;
        return Ok(ItemRef {
            fileset_id: item.fileset_id.into(),
            book_id: item.book_id,
            chapter_start: item.chapter_start,
            chapter_end: item.chapter_end,
            verse_start: item.verse_start,
            verse_end: item.verse_end,
            label: Some(item_id.to_string()),
        });
    }

    let malformed = || Error::not_found(format!("playlist item {raw}"));
    let parts: Vec<&str> = raw.split('-').collect();
    let [fileset_id, book_id, chapter, verse_start, verse_end] = parts.as_slice() else {
        return Err(malformed());
    };

    let chapter: u32 = chapter.parse().map_err(|_| malformed())?;
    Ok(ItemRef {
        fileset_id: (*fileset_id).into(),
        book_id: (*book_id).to_string(),
        chapter_start: chapter,
        chapter_end: chapter,
        verse_start: Some(verse_start.parse().map_err(|_| malformed())?),
        verse_end: Some(verse_end.parse().map_err(|_| malformed())?),
        label: None,
    })
}

/// Render and sign the groups, as raw M3U8 or the download JSON envelope.
fn respond(ctx: &AppContext, groups: &[SegmentGroup], download: bool) -> Response {
    let mut resolver = SignedResolver::new(ctx.signer.as_ref(), download);
    let rendered = assemble(groups, &mut resolver);

    if download {
        Json(serde_json::json!({
            "body": rendered.body,
            "signed_urls": resolver.into_signed_urls(),
            "total_duration": rendered.total_duration,
        }))
        .into_response()
    } else {
        m3u8_response(rendered.body)
    }
}

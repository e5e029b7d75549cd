//! Feed Composer: ranked and filtered video pages, enriched with the
//! viewer's own relation to each video.
//!
//! Enrichment is computed fresh per request from the likes and follows
//! tables in one batch query each; the flags are never persisted.

use rusqlite::Connection;
use tracing::debug;

use pix_db::{Database, follows, hashtags, likes, users, videos};
use pix_db::models::VideoRow;
use pix_types::api::Page;
use pix_types::models::{HashTag, VideoView};

use crate::error::{Result, SocialError};

/// Videos from creators the viewer follows, newest first. A viewer who
/// follows nobody gets an empty feed, not an error.
pub fn following_feed(db: &Database, viewer_id: &str, limit: u32) -> Result<Vec<VideoView>> {
    let limit = crate::check_limit(limit)?;
    let views = db.with_conn(|conn| {
        if users::get_by_id(conn, viewer_id)?.is_none() {
            return Err(SocialError::not_found("user", viewer_id).into());
        }
        let owner_ids = follows::following_ids(conn, viewer_id)?;
        let rows = videos::from_owners(conn, &owner_ids, limit)?;
        enrich(conn, viewer_id, rows)
    })?;

    debug!(viewer_id, count = views.len(), "following_feed");
    Ok(views)
}

/// Most-viewed public videos; newer uploads win view-count ties.
pub fn trending_feed(db: &Database, viewer_id: &str, limit: u32) -> Result<Vec<VideoView>> {
    let limit = crate::check_limit(limit)?;
    let views = db.with_conn(|conn| {
        let rows = videos::trending(conn, limit)?;
        enrich(conn, viewer_id, rows)
    })?;
    Ok(views)
}

/// Most-liked public videos.
pub fn top_liked_feed(db: &Database, viewer_id: &str, limit: u32) -> Result<Vec<VideoView>> {
    let limit = crate::check_limit(limit)?;
    let views = db.with_conn(|conn| {
        let rows = videos::top_liked(conn, limit)?;
        enrich(conn, viewer_id, rows)
    })?;
    Ok(views)
}

/// Reverse-chronological page over all public videos.
pub fn discover_feed(db: &Database, viewer_id: &str, page: Page) -> Result<Vec<VideoView>> {
    let page = crate::check_page(page)?;
    let views = db.with_conn(|conn| {
        let rows = videos::public_page(conn, page.limit, page.offset)?;
        enrich(conn, viewer_id, rows)
    })?;
    Ok(views)
}

/// Substring filter over public video descriptions and hashtag lists.
pub fn search_videos(db: &Database, viewer_id: &str, query: &str, limit: u32) -> Result<Vec<VideoView>> {
    let limit = crate::check_limit(limit)?;
    if query.trim().is_empty() {
        return Err(SocialError::invalid("search query must not be empty"));
    }
    let views = db.with_conn(|conn| {
        let rows = videos::search(conn, query, limit)?;
        enrich(conn, viewer_id, rows)
    })?;
    Ok(views)
}

/// Public videos tagged with `tag`, newest first. A blocked hashtag
/// serves no videos.
pub fn videos_by_hashtag(db: &Database, viewer_id: &str, tag: &str, limit: u32) -> Result<Vec<VideoView>> {
    let limit = crate::check_limit(limit)?;
    let views = db.with_conn(|conn| {
        if let Some(row) = hashtags::get_by_name(conn, tag)? {
            if row.is_blocked {
                return Ok(vec![]);
            }
        }
        let rows = videos::by_hashtag(conn, tag, limit)?;
        enrich(conn, viewer_id, rows)
    })?;
    Ok(views)
}

/// A creator's videos, newest first. Owners see their private uploads;
/// everyone else sees the public ones only.
pub fn videos_by_user(db: &Database, viewer_id: &str, owner_id: &str) -> Result<Vec<VideoView>> {
    let views = db.with_conn(|conn| {
        if users::get_by_id(conn, owner_id)?.is_none() {
            return Err(SocialError::not_found("user", owner_id).into());
        }
        let rows = videos::by_user(conn, owner_id, viewer_id != owner_id)?;
        enrich(conn, viewer_id, rows)
    })?;
    Ok(views)
}

/// Hashtags ranked by attached-video count.
pub fn trending_hashtags(db: &Database, limit: u32) -> Result<Vec<HashTag>> {
    let limit = crate::check_limit(limit)?;
    let rows = db.with_conn(|conn| hashtags::trending(conn, limit))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub fn search_hashtags(db: &Database, query: &str, limit: u32) -> Result<Vec<HashTag>> {
    let limit = crate::check_limit(limit)?;
    if query.trim().is_empty() {
        return Err(SocialError::invalid("search query must not be empty"));
    }
    let rows = db.with_conn(|conn| hashtags::search(conn, query, limit))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Attach the viewer's like/follow state to a page of videos using one
/// batch query per relation, regardless of page size.
fn enrich(conn: &Connection, viewer_id: &str, rows: Vec<VideoRow>) -> anyhow::Result<Vec<VideoView>> {
    if rows.is_empty() {
        return Ok(vec![]);
    }

    let video_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
    let mut owner_ids: Vec<String> = rows.iter().map(|r| r.user_id.clone()).collect();
    owner_ids.sort();
    owner_ids.dedup();

    let liked = likes::liked_among(conn, viewer_id, &video_ids)?;
    let followed = follows::followed_among(conn, viewer_id, &owner_ids)?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let is_liked_by_viewer = liked.contains(&row.id);
            let is_following_owner = followed.contains(&row.user_id);
            VideoView {
                video: row.into(),
                is_liked_by_viewer,
                is_following_owner,
            }
        })
        .collect())
}

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::models::VideoRow;

pub fn insert(conn: &Connection, video: &VideoRow) -> Result<()> {
    conn.execute(
        "INSERT INTO videos (
            id, user_id, video_url, thumbnail_url, description,
            duration, width, height, file_size,
            likes_count, comments_count, shares_count, views_count, download_count,
            is_public, allow_comments, allow_duet, allow_stitch, allow_download,
            hashtags, mentions, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                  ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)",
        rusqlite::params![
            video.id,
            video.user_id,
            video.video_url,
            video.thumbnail_url,
            video.description,
            video.duration,
            video.width,
            video.height,
            video.file_size,
            video.likes_count,
            video.comments_count,
            video.shares_count,
            video.views_count,
            video.download_count,
            video.is_public,
            video.allow_comments,
            video.allow_duet,
            video.allow_stitch,
            video.allow_download,
            video.hashtags,
            video.mentions,
            video.created_at,
            video.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<VideoRow>> {
    let row = conn
        .query_row("SELECT * FROM videos WHERE id = ?1", [id], VideoRow::from_row)
        .optional()?;
    Ok(row)
}

/// A creator's videos, newest first. `public_only` hides private uploads
/// from viewers other than the owner.
pub fn by_user(conn: &Connection, user_id: &str, public_only: bool) -> Result<Vec<VideoRow>> {
    let sql = if public_only {
        "SELECT * FROM videos WHERE user_id = ?1 AND is_public = 1 ORDER BY created_at DESC, id DESC"
    } else {
        "SELECT * FROM videos WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([user_id], VideoRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Public videos, newest first, for the discover page.
pub fn public_page(conn: &Connection, limit: u32, offset: u32) -> Result<Vec<VideoRow>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM videos WHERE is_public = 1
         ORDER BY created_at DESC, id DESC
         LIMIT ?1 OFFSET ?2",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![limit, offset], VideoRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Public videos ranked by view count; newer uploads win ties so stale
/// videos cannot hold a trending slot forever.
pub fn trending(conn: &Connection, limit: u32) -> Result<Vec<VideoRow>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM videos WHERE is_public = 1
         ORDER BY views_count DESC, created_at DESC, id DESC
         LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit], VideoRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn top_liked(conn: &Connection, limit: u32) -> Result<Vec<VideoRow>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM videos WHERE is_public = 1
         ORDER BY likes_count DESC, created_at DESC, id DESC
         LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit], VideoRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Case-insensitive substring filter over description and hashtag list.
/// Deliberately a plain filter, not ranked search.
pub fn search(conn: &Connection, query: &str, limit: u32) -> Result<Vec<VideoRow>> {
    let pattern = format!("%{}%", query);
    let mut stmt = conn.prepare(
        "SELECT * FROM videos
         WHERE is_public = 1 AND (description LIKE ?1 OR hashtags LIKE ?1)
         ORDER BY created_at DESC, id DESC
         LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![pattern, limit], VideoRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn by_hashtag(conn: &Connection, tag: &str, limit: u32) -> Result<Vec<VideoRow>> {
    let pattern = format!("%{}%", tag);
    let mut stmt = conn.prepare(
        "SELECT * FROM videos
         WHERE is_public = 1 AND hashtags LIKE ?1
         ORDER BY created_at DESC, id DESC
         LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![pattern, limit], VideoRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Public videos from a set of creators, newest first; the following
/// feed query. An empty owner set yields an empty page.
pub fn from_owners(conn: &Connection, owner_ids: &[String], limit: u32) -> Result<Vec<VideoRow>> {
    if owner_ids.is_empty() {
        return Ok(vec![]);
    }

    // Owner ids take ?1..?n; the limit is the last parameter.
    let sql = format!(
        "SELECT * FROM videos
         WHERE user_id IN ({}) AND is_public = 1
         ORDER BY created_at DESC, id DESC
         LIMIT ?{}",
        crate::placeholders(1, owner_ids.len()),
        owner_ids.len() + 1
    );

    let limit = i64::from(limit);
    let mut stmt = conn.prepare(&sql)?;
    let mut params: Vec<&dyn rusqlite::types::ToSql> = owner_ids
        .iter()
        .map(|id| id as &dyn rusqlite::types::ToSql)
        .collect();
    params.push(&limit);

    let rows = stmt
        .query_map(params.as_slice(), VideoRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Distinct owners of a set of videos, in one batch query.
pub fn owner_ids(conn: &Connection, video_ids: &[String]) -> Result<Vec<String>> {
    if video_ids.is_empty() {
        return Ok(vec![]);
    }

    let sql = format!(
        "SELECT DISTINCT user_id FROM videos WHERE id IN ({})",
        crate::placeholders(1, video_ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::types::ToSql> = video_ids
        .iter()
        .map(|id| id as &dyn rusqlite::types::ToSql)
        .collect();
    let ids = stmt
        .query_map(params.as_slice(), |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

// Counter bumps: relative deltas applied in SQL, never read-modify-write.

pub fn bump_likes(conn: &Connection, id: &str, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE videos SET likes_count = likes_count + ?2 WHERE id = ?1",
        rusqlite::params![id, delta],
    )?;
    Ok(())
}

pub fn bump_comments(conn: &Connection, id: &str, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE videos SET comments_count = comments_count + ?2 WHERE id = ?1",
        rusqlite::params![id, delta],
    )?;
    Ok(())
}

pub fn bump_shares(conn: &Connection, id: &str, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE videos SET shares_count = shares_count + ?2 WHERE id = ?1",
        rusqlite::params![id, delta],
    )?;
    Ok(())
}

pub fn bump_views(conn: &Connection, id: &str, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE videos SET views_count = views_count + ?2 WHERE id = ?1",
        rusqlite::params![id, delta],
    )?;
    Ok(())
}

pub fn bump_downloads(conn: &Connection, id: &str, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE videos SET download_count = download_count + ?2 WHERE id = ?1",
        rusqlite::params![id, delta],
    )?;
    Ok(())
}

/// Partial settings update; NULL parameters keep the current value.
pub fn update_settings(
    conn: &Connection,
    id: &str,
    description: Option<&str>,
    is_public: Option<bool>,
    allow_comments: Option<bool>,
    allow_duet: Option<bool>,
    allow_stitch: Option<bool>,
    allow_download: Option<bool>,
    now: i64,
) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE videos SET
            description = COALESCE(?2, description),
            is_public = COALESCE(?3, is_public),
            allow_comments = COALESCE(?4, allow_comments),
            allow_duet = COALESCE(?5, allow_duet),
            allow_stitch = COALESCE(?6, allow_stitch),
            allow_download = COALESCE(?7, allow_download),
            updated_at = ?8
         WHERE id = ?1",
        rusqlite::params![
            id,
            description,
            is_public,
            allow_comments,
            allow_duet,
            allow_stitch,
            allow_download,
            now
        ],
    )?;
    Ok(changed > 0)
}

pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
    let changed = conn.execute("DELETE FROM videos WHERE id = ?1", [id])?;
    Ok(changed > 0)
}

//! Queries over the like relation, keyed by (user_id, video_id).

use std::collections::HashSet;

use anyhow::Result;
use rusqlite::Connection;

use crate::models::VideoRow;

pub fn exists(conn: &Connection, user_id: &str, video_id: &str) -> Result<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = ?1 AND video_id = ?2)",
        [user_id, video_id],
        |row| row.get(0),
    )?;
    Ok(found)
}

/// Idempotent like insert; true only when the row is new.
pub fn insert(conn: &Connection, user_id: &str, video_id: &str, now: i64) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO likes (user_id, video_id, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![user_id, video_id, now],
    )?;
    Ok(changed > 0)
}

/// True only when a like existed and was removed.
pub fn delete(conn: &Connection, user_id: &str, video_id: &str) -> Result<bool> {
    let changed = conn.execute(
        "DELETE FROM likes WHERE user_id = ?1 AND video_id = ?2",
        [user_id, video_id],
    )?;
    Ok(changed > 0)
}

/// Videos liked by `user_id`, most recently liked first. The video id is
/// a secondary sort key so the page order stays stable when two likes
/// share a timestamp.
pub fn liked_videos(
    conn: &Connection,
    user_id: &str,
    limit: u32,
    offset: u32,
) -> Result<Vec<VideoRow>> {
    let mut stmt = conn.prepare(
        "SELECT v.* FROM videos v
         INNER JOIN likes l ON v.id = l.video_id
         WHERE l.user_id = ?1
         ORDER BY l.created_at DESC, v.id DESC
         LIMIT ?2 OFFSET ?3",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![user_id, limit, offset], VideoRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_for_video(conn: &Connection, video_id: &str) -> Result<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM likes WHERE video_id = ?1",
        [video_id],
        |row| row.get(0),
    )?;
    Ok(n)
}

/// Distinct videos a user has liked; used to find rows whose counters
/// need repair before the user's cascade delete.
pub fn video_ids_liked_by(conn: &Connection, user_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT video_id FROM likes WHERE user_id = ?1")?;
    let ids = stmt
        .query_map([user_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Which of `video_ids` the viewer has liked, fetched in one batch query.
pub fn liked_among(
    conn: &Connection,
    viewer_id: &str,
    video_ids: &[String],
) -> Result<HashSet<String>> {
    if video_ids.is_empty() {
        return Ok(HashSet::new());
    }

    // ?1 is the viewer; video ids start at ?2.
    let sql = format!(
        "SELECT video_id FROM likes WHERE user_id = ?1 AND video_id IN ({})",
        crate::placeholders(2, video_ids.len())
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut params: Vec<&dyn rusqlite::types::ToSql> = vec![&viewer_id];
    params.extend(video_ids.iter().map(|id| id as &dyn rusqlite::types::ToSql));

    let ids = stmt
        .query_map(params.as_slice(), |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;
    Ok(ids)
}

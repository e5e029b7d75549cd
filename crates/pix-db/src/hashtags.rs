use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::models::HashTagRow;

pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<HashTagRow>> {
    let row = conn
        .query_row(
            "SELECT * FROM hashtags WHERE name = ?1",
            [name],
            HashTagRow::from_row,
        )
        .optional()?;
    Ok(row)
}

/// Create-or-bump for a tag attached to a new upload: inserts the tag on
/// first use, otherwise adds `videos_count + 1`, in one statement.
pub fn upsert_for_video(conn: &Connection, id: &str, name: &str, now: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO hashtags (id, name, videos_count, views_count, is_blocked, created_at, updated_at)
         VALUES (?1, ?2, 1, 0, 0, ?3, ?3)
         ON CONFLICT(name) DO UPDATE SET
            videos_count = videos_count + 1,
            updated_at = excluded.updated_at",
        rusqlite::params![id, name, now],
    )?;
    Ok(())
}

pub fn bump_videos(conn: &Connection, name: &str, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE hashtags SET videos_count = videos_count + ?2 WHERE name = ?1",
        rusqlite::params![name, delta],
    )?;
    Ok(())
}

pub fn bump_views(conn: &Connection, name: &str, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE hashtags SET views_count = views_count + ?2 WHERE name = ?1",
        rusqlite::params![name, delta],
    )?;
    Ok(())
}

/// Unblocked tags by attached-video count.
pub fn trending(conn: &Connection, limit: u32) -> Result<Vec<HashTagRow>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM hashtags WHERE is_blocked = 0
         ORDER BY videos_count DESC, name ASC
         LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit], HashTagRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn search(conn: &Connection, query: &str, limit: u32) -> Result<Vec<HashTagRow>> {
    let pattern = format!("%{}%", query);
    let mut stmt = conn.prepare(
        "SELECT * FROM hashtags
         WHERE name LIKE ?1 AND is_blocked = 0
         ORDER BY videos_count DESC, name ASC
         LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![pattern, limit], HashTagRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn set_blocked(conn: &Connection, name: &str, blocked: bool, now: i64) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE hashtags SET is_blocked = ?2, updated_at = ?3 WHERE name = ?1",
        rusqlite::params![name, blocked, now],
    )?;
    Ok(changed > 0)
}

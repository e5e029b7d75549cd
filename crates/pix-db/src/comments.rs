use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::models::CommentRow;

pub fn insert(conn: &Connection, comment: &CommentRow) -> Result<()> {
    conn.execute(
        "INSERT INTO comments (
            id, video_id, user_id, text, parent_comment_id,
            likes_count, replies_count, is_edited, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
            comment.id,
            comment.video_id,
            comment.user_id,
            comment.text,
            comment.parent_comment_id,
            comment.likes_count,
            comment.replies_count,
            comment.is_edited,
            comment.created_at,
            comment.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<CommentRow>> {
    let row = conn
        .query_row(
            "SELECT * FROM comments WHERE id = ?1",
            [id],
            CommentRow::from_row,
        )
        .optional()?;
    Ok(row)
}

/// Top-level comments for a video, newest first.
pub fn top_level_for_video(conn: &Connection, video_id: &str) -> Result<Vec<CommentRow>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM comments
         WHERE video_id = ?1 AND parent_comment_id IS NULL
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt
        .query_map([video_id], CommentRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Replies under a top-level comment, oldest first (thread reading order).
pub fn replies_for(conn: &Connection, parent_id: &str) -> Result<Vec<CommentRow>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM comments
         WHERE parent_comment_id = ?1
         ORDER BY created_at ASC, id ASC",
    )?;
    let rows = stmt
        .query_map([parent_id], CommentRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Distinct videos a user has commented on; used to find rows whose
/// counters need repair before the user's cascade delete.
pub fn video_ids_commented_by(conn: &Connection, user_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT video_id FROM comments WHERE user_id = ?1")?;
    let ids = stmt
        .query_map([user_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub fn count_for_video(conn: &Connection, video_id: &str) -> Result<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM comments WHERE video_id = ?1",
        [video_id],
        |row| row.get(0),
    )?;
    Ok(n)
}

pub fn bump_likes(conn: &Connection, id: &str, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE comments SET likes_count = likes_count + ?2 WHERE id = ?1",
        rusqlite::params![id, delta],
    )?;
    Ok(())
}

pub fn bump_replies(conn: &Connection, id: &str, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE comments SET replies_count = replies_count + ?2 WHERE id = ?1",
        rusqlite::params![id, delta],
    )?;
    Ok(())
}

pub fn set_text(conn: &Connection, id: &str, text: &str, now: i64) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE comments SET text = ?2, is_edited = 1, updated_at = ?3 WHERE id = ?1",
        rusqlite::params![id, text, now],
    )?;
    Ok(changed > 0)
}

/// Deletes a comment; replies go with it via the self-referential
/// cascade. Returns the number of rows removed (1 + replies).
pub fn delete(conn: &Connection, id: &str) -> Result<i64> {
    let replies: i64 = conn.query_row(
        "SELECT COUNT(*) FROM comments WHERE parent_comment_id = ?1",
        [id],
        |row| row.get(0),
    )?;
    let changed = conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
    if changed == 0 {
        return Ok(0);
    }
    Ok(1 + replies)
}

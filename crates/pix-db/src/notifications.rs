//! Notification storage. Boundary-only: rows are written by the social
//! services when follows/likes/comments land; delivery is out of scope.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::NotificationRow;

pub fn insert(conn: &Connection, n: &NotificationRow) -> Result<()> {
    conn.execute(
        "INSERT INTO notifications (
            id, user_id, from_user_id, kind, title, body, data, is_read, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            n.id,
            n.user_id,
            n.from_user_id,
            n.kind,
            n.title,
            n.body,
            n.data,
            n.is_read,
            n.created_at,
        ],
    )?;
    Ok(())
}

pub fn for_user(conn: &Connection, user_id: &str, limit: u32) -> Result<Vec<NotificationRow>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM notifications WHERE user_id = ?1
         ORDER BY created_at DESC, id DESC
         LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![user_id, limit], NotificationRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn unread_for_user(conn: &Connection, user_id: &str) -> Result<Vec<NotificationRow>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM notifications
         WHERE user_id = ?1 AND is_read = 0
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt
        .query_map([user_id], NotificationRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn unread_count(conn: &Connection, user_id: &str) -> Result<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(n)
}

pub fn mark_read(conn: &Connection, id: &str) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE notifications SET is_read = 1 WHERE id = ?1",
        [id],
    )?;
    Ok(changed > 0)
}

pub fn mark_all_read(conn: &Connection, user_id: &str) -> Result<u32> {
    let changed = conn.execute(
        "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
        [user_id],
    )?;
    Ok(changed as u32)
}

pub fn clear_for_user(conn: &Connection, user_id: &str) -> Result<u32> {
    let changed = conn.execute("DELETE FROM notifications WHERE user_id = ?1", [user_id])?;
    Ok(changed as u32)
}

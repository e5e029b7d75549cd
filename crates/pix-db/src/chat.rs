//! Direct-message storage. Boundary-only: persistence and read state,
//! no delivery semantics.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::ChatMessageRow;

pub fn insert(conn: &Connection, msg: &ChatMessageRow) -> Result<()> {
    conn.execute(
        "INSERT INTO chat_messages (
            id, sender_id, receiver_id, body, kind, media_url,
            is_read, is_delivered, reply_to_message_id, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        rusqlite::params![
            msg.id,
            msg.sender_id,
            msg.receiver_id,
            msg.body,
            msg.kind,
            msg.media_url,
            msg.is_read,
            msg.is_delivered,
            msg.reply_to_message_id,
            msg.created_at,
            msg.updated_at,
        ],
    )?;
    Ok(())
}

/// Messages exchanged between two users in either direction, newest
/// first.
pub fn conversation(
    conn: &Connection,
    user_a: &str,
    user_b: &str,
    limit: u32,
    offset: u32,
) -> Result<Vec<ChatMessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM chat_messages
         WHERE (sender_id = ?1 AND receiver_id = ?2)
            OR (sender_id = ?2 AND receiver_id = ?1)
         ORDER BY created_at DESC, id DESC
         LIMIT ?3 OFFSET ?4",
    )?;
    let rows = stmt
        .query_map(
            rusqlite::params![user_a, user_b, limit, offset],
            ChatMessageRow::from_row,
        )?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn mark_delivered(conn: &Connection, id: &str, now: i64) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE chat_messages SET is_delivered = 1, updated_at = ?2 WHERE id = ?1",
        rusqlite::params![id, now],
    )?;
    Ok(changed > 0)
}

/// Marks everything the peer sent to the reader as read.
pub fn mark_conversation_read(conn: &Connection, reader_id: &str, peer_id: &str, now: i64) -> Result<u32> {
    let changed = conn.execute(
        "UPDATE chat_messages SET is_read = 1, updated_at = ?3
         WHERE receiver_id = ?1 AND sender_id = ?2 AND is_read = 0",
        rusqlite::params![reader_id, peer_id, now],
    )?;
    Ok(changed as u32)
}

pub fn unread_count(conn: &Connection, user_id: &str) -> Result<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM chat_messages WHERE receiver_id = ?1 AND is_read = 0",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(n)
}

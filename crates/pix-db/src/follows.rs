//! Queries over the follow relation: directed follower -> following
//! edges between users, keyed by the (follower_id, following_id) pair.

use std::collections::HashSet;

use anyhow::Result;
use rusqlite::Connection;

use crate::models::UserRow;

pub fn exists(conn: &Connection, follower_id: &str, following_id: &str) -> Result<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = ?1 AND following_id = ?2)",
        [follower_id, following_id],
        |row| row.get(0),
    )?;
    Ok(found)
}

/// Idempotent edge insert. Returns true only when a new row was created,
/// so callers bump counters exactly once per actual state change.
pub fn insert(conn: &Connection, follower_id: &str, following_id: &str, now: i64) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO follows (follower_id, following_id, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![follower_id, following_id, now],
    )?;
    Ok(changed > 0)
}

/// Returns true only when an edge actually existed and was removed.
pub fn delete(conn: &Connection, follower_id: &str, following_id: &str) -> Result<bool> {
    let changed = conn.execute(
        "DELETE FROM follows WHERE follower_id = ?1 AND following_id = ?2",
        [follower_id, following_id],
    )?;
    Ok(changed > 0)
}

/// Users that `user_id` follows, most recently followed first.
pub fn following(conn: &Connection, user_id: &str) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT u.* FROM users u
         INNER JOIN follows f ON u.id = f.following_id
         WHERE f.follower_id = ?1
         ORDER BY f.created_at DESC",
    )?;
    let rows = stmt
        .query_map([user_id], UserRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Users that follow `user_id`, most recently followed first.
pub fn followers(conn: &Connection, user_id: &str) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT u.* FROM users u
         INNER JOIN follows f ON u.id = f.follower_id
         WHERE f.following_id = ?1
         ORDER BY f.created_at DESC",
    )?;
    let rows = stmt
        .query_map([user_id], UserRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn following_ids(conn: &Connection, user_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT following_id FROM follows WHERE follower_id = ?1 ORDER BY created_at DESC",
    )?;
    let ids = stmt
        .query_map([user_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub fn following_count(conn: &Connection, user_id: &str) -> Result<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM follows WHERE follower_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(n)
}

pub fn followers_count(conn: &Connection, user_id: &str) -> Result<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM follows WHERE following_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(n)
}

/// Users with follow edges in both directions relative to `user_id`.
pub fn mutuals(conn: &Connection, user_id: &str) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT u.* FROM users u
         INNER JOIN follows f1 ON u.id = f1.following_id AND f1.follower_id = ?1
         INNER JOIN follows f2 ON u.id = f2.follower_id AND f2.following_id = ?1
         ORDER BY u.id",
    )?;
    let rows = stmt
        .query_map([user_id], UserRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Friend-of-friend candidates for `user_id`: users reachable as
/// "followed by someone I follow", excluding myself and anyone I already
/// follow. Ranked by the number of distinct intermediaries, then by user
/// id for a deterministic order.
pub fn suggestions(conn: &Connection, user_id: &str, limit: u32) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT u.* FROM users u
         INNER JOIN follows f2 ON f2.following_id = u.id
         INNER JOIN follows f1 ON f1.following_id = f2.follower_id AND f1.follower_id = ?1
         WHERE u.id != ?1
           AND NOT EXISTS (
               SELECT 1 FROM follows WHERE follower_id = ?1 AND following_id = u.id
           )
         GROUP BY u.id
         ORDER BY COUNT(DISTINCT f2.follower_id) DESC, u.id ASC
         LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![user_id, limit], UserRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Which of `owner_ids` the viewer follows, fetched in one batch query.
pub fn followed_among(
    conn: &Connection,
    viewer_id: &str,
    owner_ids: &[String],
) -> Result<HashSet<String>> {
    if owner_ids.is_empty() {
        return Ok(HashSet::new());
    }

    // ?1 is the viewer; owner ids start at ?2.
    let sql = format!(
        "SELECT following_id FROM follows WHERE follower_id = ?1 AND following_id IN ({})",
        crate::placeholders(2, owner_ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut params: Vec<&dyn rusqlite::types::ToSql> = vec![&viewer_id];
    params.extend(owner_ids.iter().map(|id| id as &dyn rusqlite::types::ToSql));

    let ids = stmt
        .query_map(params.as_slice(), |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;
    Ok(ids)
}

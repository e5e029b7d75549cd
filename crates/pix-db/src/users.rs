use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::models::UserRow;

pub fn insert(conn: &Connection, user: &UserRow) -> Result<()> {
    conn.execute(
        "INSERT INTO users (
            id, username, email, full_name, avatar, bio, website,
            followers_count, following_count, videos_count, likes_count,
            is_verified, is_private, is_active, last_seen, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        rusqlite::params![
            user.id,
            user.username,
            user.email,
            user.full_name,
            user.avatar,
            user.bio,
            user.website,
            user.followers_count,
            user.following_count,
            user.videos_count,
            user.likes_count,
            user.is_verified,
            user.is_private,
            user.is_active,
            user.last_seen,
            user.created_at,
            user.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let row = conn
        .query_row("SELECT * FROM users WHERE id = ?1", [id], UserRow::from_row)
        .optional()?;
    Ok(row)
}

pub fn get_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            "SELECT * FROM users WHERE username = ?1",
            [username],
            UserRow::from_row,
        )
        .optional()?;
    Ok(row)
}

pub fn get_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            "SELECT * FROM users WHERE email = ?1",
            [email],
            UserRow::from_row,
        )
        .optional()?;
    Ok(row)
}

pub fn username_exists(conn: &Connection, username: &str) -> Result<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
        [username],
        |row| row.get(0),
    )?;
    Ok(found)
}

pub fn email_exists(conn: &Connection, email: &str) -> Result<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
        [email],
        |row| row.get(0),
    )?;
    Ok(found)
}

/// Substring search over username and full name.
pub fn search(conn: &Connection, query: &str, limit: u32) -> Result<Vec<UserRow>> {
    let pattern = format!("%{}%", query);
    let mut stmt = conn.prepare(
        "SELECT * FROM users
         WHERE username LIKE ?1 OR full_name LIKE ?1
         ORDER BY followers_count DESC, id ASC
         LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![pattern, limit], UserRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn popular(conn: &Connection, limit: u32) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM users ORDER BY followers_count DESC, id ASC LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit], UserRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn verified(conn: &Connection, limit: u32) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM users WHERE is_verified = 1
         ORDER BY followers_count DESC, id ASC
         LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit], UserRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// Counter bumps are relative deltas applied by SQLite itself, so two
// concurrent callers can never lose an update to a read-modify-write race.

pub fn bump_followers(conn: &Connection, id: &str, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE users SET followers_count = followers_count + ?2 WHERE id = ?1",
        rusqlite::params![id, delta],
    )?;
    Ok(())
}

pub fn bump_following(conn: &Connection, id: &str, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE users SET following_count = following_count + ?2 WHERE id = ?1",
        rusqlite::params![id, delta],
    )?;
    Ok(())
}

pub fn bump_videos(conn: &Connection, id: &str, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE users SET videos_count = videos_count + ?2 WHERE id = ?1",
        rusqlite::params![id, delta],
    )?;
    Ok(())
}

pub fn bump_likes(conn: &Connection, id: &str, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE users SET likes_count = likes_count + ?2 WHERE id = ?1",
        rusqlite::params![id, delta],
    )?;
    Ok(())
}

/// Partial profile update; NULL parameters keep the current value.
pub fn update_profile(
    conn: &Connection,
    id: &str,
    full_name: Option<&str>,
    bio: Option<&str>,
    website: Option<&str>,
    avatar: Option<&str>,
    now: i64,
) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE users SET
            full_name = COALESCE(?2, full_name),
            bio = COALESCE(?3, bio),
            website = COALESCE(?4, website),
            avatar = COALESCE(?5, avatar),
            updated_at = ?6
         WHERE id = ?1",
        rusqlite::params![id, full_name, bio, website, avatar, now],
    )?;
    Ok(changed > 0)
}

pub fn set_private(conn: &Connection, id: &str, is_private: bool, now: i64) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE users SET is_private = ?2, updated_at = ?3 WHERE id = ?1",
        rusqlite::params![id, is_private, now],
    )?;
    Ok(changed > 0)
}

pub fn touch_last_seen(conn: &Connection, id: &str, now: i64) -> Result<()> {
    conn.execute(
        "UPDATE users SET last_seen = ?2 WHERE id = ?1",
        rusqlite::params![id, now],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
    let changed = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
    Ok(changed > 0)
}

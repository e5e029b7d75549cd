//! Shared fixtures: a fresh in-memory store and direct row seeding with
//! explicit timestamps, so ordering assertions never race the clock.

use pix_db::Database;
use pix_db::models::{UserRow, VideoRow};

pub fn db() -> Database {
    Database::open_in_memory().unwrap()
}

pub fn seed_user(db: &Database, id: &str) {
    let row = UserRow {
        id: id.to_string(),
        username: id.to_string(),
        email: format!("{id}@example.com"),
        full_name: id.to_string(),
        avatar: None,
        bio: None,
        website: None,
        followers_count: 0,
        following_count: 0,
        videos_count: 0,
        likes_count: 0,
        is_verified: false,
        is_private: false,
        is_active: true,
        last_seen: 0,
        created_at: 0,
        updated_at: 0,
    };
    db.with_conn(|conn| pix_db::users::insert(conn, &row)).unwrap();
}

/// A public video row with zeroed counters; tests tweak fields before
/// inserting.
pub fn video_row(id: &str, owner: &str, created_at: i64) -> VideoRow {
    VideoRow {
        id: id.to_string(),
        user_id: owner.to_string(),
        video_url: format!("https://cdn.example.com/{id}.mp4"),
        thumbnail_url: None,
        description: None,
        duration: 15_000,
        width: 1080,
        height: 1920,
        file_size: 1_000_000,
        likes_count: 0,
        comments_count: 0,
        shares_count: 0,
        views_count: 0,
        download_count: 0,
        is_public: true,
        allow_comments: true,
        allow_duet: true,
        allow_stitch: true,
        allow_download: true,
        hashtags: None,
        mentions: None,
        created_at,
        updated_at: created_at,
    }
}

pub fn seed_video(db: &Database, id: &str, owner: &str, created_at: i64) {
    let row = video_row(id, owner, created_at);
    db.with_conn(|conn| pix_db::videos::insert(conn, &row)).unwrap();
}

pub fn insert_video(db: &Database, row: &VideoRow) {
    db.with_conn(|conn| pix_db::videos::insert(conn, row)).unwrap();
}

use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              TEXT PRIMARY KEY,
            username        TEXT NOT NULL UNIQUE,
            email           TEXT NOT NULL UNIQUE,
            full_name       TEXT NOT NULL,
            avatar          TEXT,
            bio             TEXT,
            website         TEXT,
            followers_count INTEGER NOT NULL DEFAULT 0,
            following_count INTEGER NOT NULL DEFAULT 0,
            videos_count    INTEGER NOT NULL DEFAULT 0,
            likes_count     INTEGER NOT NULL DEFAULT 0,
            is_verified     INTEGER NOT NULL DEFAULT 0,
            is_private      INTEGER NOT NULL DEFAULT 0,
            is_active       INTEGER NOT NULL DEFAULT 1,
            last_seen       INTEGER NOT NULL,
            created_at      INTEGER NOT NULL,
            updated_at      INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS videos (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            video_url       TEXT NOT NULL,
            thumbnail_url   TEXT,
            description     TEXT,
            duration        INTEGER NOT NULL DEFAULT 0,
            width           INTEGER NOT NULL DEFAULT 0,
            height          INTEGER NOT NULL DEFAULT 0,
            file_size       INTEGER NOT NULL DEFAULT 0,
            likes_count     INTEGER NOT NULL DEFAULT 0,
            comments_count  INTEGER NOT NULL DEFAULT 0,
            shares_count    INTEGER NOT NULL DEFAULT 0,
            views_count     INTEGER NOT NULL DEFAULT 0,
            download_count  INTEGER NOT NULL DEFAULT 0,
            is_public       INTEGER NOT NULL DEFAULT 1,
            allow_comments  INTEGER NOT NULL DEFAULT 1,
            allow_duet      INTEGER NOT NULL DEFAULT 1,
            allow_stitch    INTEGER NOT NULL DEFAULT 1,
            allow_download  INTEGER NOT NULL DEFAULT 1,
            hashtags        TEXT,
            mentions        TEXT,
            created_at      INTEGER NOT NULL,
            updated_at      INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_videos_owner
            ON videos(user_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_videos_public_created
            ON videos(is_public, created_at);

        CREATE TABLE IF NOT EXISTS comments (
            id                TEXT PRIMARY KEY,
            video_id          TEXT NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
            user_id           TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            text              TEXT NOT NULL,
            parent_comment_id TEXT REFERENCES comments(id) ON DELETE CASCADE,
            likes_count       INTEGER NOT NULL DEFAULT 0,
            replies_count     INTEGER NOT NULL DEFAULT 0,
            is_edited         INTEGER NOT NULL DEFAULT 0,
            created_at        INTEGER NOT NULL,
            updated_at        INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_comments_video
            ON comments(video_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_comments_parent
            ON comments(parent_comment_id);

        -- Composite primary keys on the two relation tables enforce the
        -- at-most-one-row-per-pair invariant at the storage layer.
        CREATE TABLE IF NOT EXISTS follows (
            follower_id  TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            following_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at   INTEGER NOT NULL,
            PRIMARY KEY (follower_id, following_id)
        );

        CREATE INDEX IF NOT EXISTS idx_follows_follower
            ON follows(follower_id);
        CREATE INDEX IF NOT EXISTS idx_follows_following
            ON follows(following_id);

        CREATE TABLE IF NOT EXISTS likes (
            user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            video_id   TEXT NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
            created_at INTEGER NOT NULL,
            PRIMARY KEY (user_id, video_id)
        );

        CREATE INDEX IF NOT EXISTS idx_likes_user
            ON likes(user_id);
        CREATE INDEX IF NOT EXISTS idx_likes_video
            ON likes(video_id);

        CREATE TABLE IF NOT EXISTS hashtags (
            id           TEXT PRIMARY KEY,
            name         TEXT NOT NULL UNIQUE,
            videos_count INTEGER NOT NULL DEFAULT 0,
            views_count  INTEGER NOT NULL DEFAULT 0,
            is_blocked   INTEGER NOT NULL DEFAULT 0,
            created_at   INTEGER NOT NULL,
            updated_at   INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS chat_messages (
            id                  TEXT PRIMARY KEY,
            sender_id           TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            receiver_id         TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            body                TEXT NOT NULL,
            kind                TEXT NOT NULL DEFAULT 'text',
            media_url           TEXT,
            is_read             INTEGER NOT NULL DEFAULT 0,
            is_delivered        INTEGER NOT NULL DEFAULT 0,
            reply_to_message_id TEXT,
            created_at          INTEGER NOT NULL,
            updated_at          INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_chat_pair
            ON chat_messages(sender_id, receiver_id, created_at);

        CREATE TABLE IF NOT EXISTS notifications (
            id           TEXT PRIMARY KEY,
            user_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            from_user_id TEXT REFERENCES users(id) ON DELETE CASCADE,
            kind         TEXT NOT NULL,
            title        TEXT NOT NULL,
            body         TEXT NOT NULL,
            data         TEXT,
            is_read      INTEGER NOT NULL DEFAULT 0,
            created_at   INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_notifications_user
            ON notifications(user_id, created_at);
        ",
    )?;

    info!("database migrations complete");
    Ok(())
}

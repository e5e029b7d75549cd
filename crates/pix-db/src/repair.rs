//! Exact recomputation of the denormalized counters from the underlying
//! relations. The hot path only ever applies deltas; these recounts are
//! the consistency-repair tool (and the oracle the tests compare
//! against), plus the cleanup step after cascade deletes invalidate
//! counters on surviving rows.

use anyhow::Result;
use rusqlite::Connection;

/// Recompute all four user counters from the relation tables.
pub fn recount_user(conn: &Connection, user_id: &str) -> Result<()> {
    conn.execute(
        "UPDATE users SET
            followers_count = (SELECT COUNT(*) FROM follows WHERE following_id = users.id),
            following_count = (SELECT COUNT(*) FROM follows WHERE follower_id = users.id),
            videos_count = (SELECT COUNT(*) FROM videos WHERE user_id = users.id),
            likes_count = (
                SELECT COUNT(*) FROM likes l
                INNER JOIN videos v ON v.id = l.video_id
                WHERE v.user_id = users.id
            )
         WHERE id = ?1",
        [user_id],
    )?;
    Ok(())
}

/// Recompute a video's like/comment counters and the reply counters of
/// its top-level comments.
pub fn recount_video(conn: &Connection, video_id: &str) -> Result<()> {
    conn.execute(
        "UPDATE videos SET
            likes_count = (SELECT COUNT(*) FROM likes WHERE video_id = videos.id),
            comments_count = (SELECT COUNT(*) FROM comments WHERE video_id = videos.id)
         WHERE id = ?1",
        [video_id],
    )?;
    conn.execute(
        "UPDATE comments SET
            replies_count = (
                SELECT COUNT(*) FROM comments c WHERE c.parent_comment_id = comments.id
            )
         WHERE video_id = ?1 AND parent_comment_id IS NULL",
        [video_id],
    )?;
    Ok(())
}

/// Recompute a hashtag's attached-video count by scanning the stored
/// hashtag lists.
pub fn recount_hashtag(conn: &Connection, name: &str) -> Result<()> {
    conn.execute(
        "UPDATE hashtags SET
            videos_count = (
                SELECT COUNT(*) FROM videos WHERE hashtags LIKE '%\"' || hashtags.name || '\"%'
            )
         WHERE name = ?1",
        [name],
    )?;
    Ok(())
}

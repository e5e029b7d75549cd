//! Database row types — these map SQLite rows 1:1, column order matching
//! the table definitions in `migrations.rs` so that `SELECT t.*` queries
//! can be decoded by index. Kept distinct from the pix-types API models.

use rusqlite::Row;
use tracing::warn;

use pix_types::models::{
    ChatMessage, Comment, HashTag, MessageKind, Notification, NotificationKind, User, Video,
};
use pix_types::time::to_datetime;

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub followers_count: i64,
    pub following_count: i64,
    pub videos_count: i64,
    pub likes_count: i64,
    pub is_verified: bool,
    pub is_private: bool,
    pub is_active: bool,
    pub last_seen: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(UserRow {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            full_name: row.get(3)?,
            avatar: row.get(4)?,
            bio: row.get(5)?,
            website: row.get(6)?,
            followers_count: row.get(7)?,
            following_count: row.get(8)?,
            videos_count: row.get(9)?,
            likes_count: row.get(10)?,
            is_verified: row.get(11)?,
            is_private: row.get(12)?,
            is_active: row.get(13)?,
            last_seen: row.get(14)?,
            created_at: row.get(15)?,
            updated_at: row.get(16)?,
        })
    }
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            username: r.username,
            email: r.email,
            full_name: r.full_name,
            avatar: r.avatar,
            bio: r.bio,
            website: r.website,
            followers_count: r.followers_count,
            following_count: r.following_count,
            videos_count: r.videos_count,
            likes_count: r.likes_count,
            is_verified: r.is_verified,
            is_private: r.is_private,
            is_active: r.is_active,
            last_seen: to_datetime(r.last_seen),
            created_at: to_datetime(r.created_at),
            updated_at: to_datetime(r.updated_at),
        }
    }
}

pub struct VideoRow {
    pub id: String,
    pub user_id: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub duration: i64,
    pub width: i64,
    pub height: i64,
    pub file_size: i64,
    pub likes_count: i64,
    pub comments_count: i64,
    pub shares_count: i64,
    pub views_count: i64,
    pub download_count: i64,
    pub is_public: bool,
    pub allow_comments: bool,
    pub allow_duet: bool,
    pub allow_stitch: bool,
    pub allow_download: bool,
    /// JSON array of tag names, nullable in storage.
    pub hashtags: Option<String>,
    /// JSON array of mentioned user ids, nullable in storage.
    pub mentions: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl VideoRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(VideoRow {
            id: row.get(0)?,
            user_id: row.get(1)?,
            video_url: row.get(2)?,
            thumbnail_url: row.get(3)?,
            description: row.get(4)?,
            duration: row.get(5)?,
            width: row.get(6)?,
            height: row.get(7)?,
            file_size: row.get(8)?,
            likes_count: row.get(9)?,
            comments_count: row.get(10)?,
            shares_count: row.get(11)?,
            views_count: row.get(12)?,
            download_count: row.get(13)?,
            is_public: row.get(14)?,
            allow_comments: row.get(15)?,
            allow_duet: row.get(16)?,
            allow_stitch: row.get(17)?,
            allow_download: row.get(18)?,
            hashtags: row.get(19)?,
            mentions: row.get(20)?,
            created_at: row.get(21)?,
            updated_at: row.get(22)?,
        })
    }
}

/// Decode a JSON string-array column, tolerating NULL and corrupt data.
fn decode_tags(column: &str, id: &str, raw: Option<String>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            warn!("corrupt {} on video '{}': {}", column, id, e);
            Vec::new()
        }),
    }
}

impl From<VideoRow> for Video {
    fn from(r: VideoRow) -> Self {
        let hashtags = decode_tags("hashtags", &r.id, r.hashtags);
        let mentions = decode_tags("mentions", &r.id, r.mentions);
        Video {
            id: r.id,
            user_id: r.user_id,
            video_url: r.video_url,
            thumbnail_url: r.thumbnail_url,
            description: r.description,
            duration: r.duration,
            width: r.width,
            height: r.height,
            file_size: r.file_size,
            likes_count: r.likes_count,
            comments_count: r.comments_count,
            shares_count: r.shares_count,
            views_count: r.views_count,
            download_count: r.download_count,
            is_public: r.is_public,
            allow_comments: r.allow_comments,
            allow_duet: r.allow_duet,
            allow_stitch: r.allow_stitch,
            allow_download: r.allow_download,
            hashtags,
            mentions,
            created_at: to_datetime(r.created_at),
            updated_at: to_datetime(r.updated_at),
        }
    }
}

pub struct CommentRow {
    pub id: String,
    pub video_id: String,
    pub user_id: String,
    pub text: String,
    pub parent_comment_id: Option<String>,
    pub likes_count: i64,
    pub replies_count: i64,
    pub is_edited: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CommentRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(CommentRow {
            id: row.get(0)?,
            video_id: row.get(1)?,
            user_id: row.get(2)?,
            text: row.get(3)?,
            parent_comment_id: row.get(4)?,
            likes_count: row.get(5)?,
            replies_count: row.get(6)?,
            is_edited: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

impl From<CommentRow> for Comment {
    fn from(r: CommentRow) -> Self {
        Comment {
            id: r.id,
            video_id: r.video_id,
            user_id: r.user_id,
            text: r.text,
            parent_comment_id: r.parent_comment_id,
            likes_count: r.likes_count,
            replies_count: r.replies_count,
            is_edited: r.is_edited,
            created_at: to_datetime(r.created_at),
            updated_at: to_datetime(r.updated_at),
        }
    }
}

pub struct HashTagRow {
    pub id: String,
    pub name: String,
    pub videos_count: i64,
    pub views_count: i64,
    pub is_blocked: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl HashTagRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(HashTagRow {
            id: row.get(0)?,
            name: row.get(1)?,
            videos_count: row.get(2)?,
            views_count: row.get(3)?,
            is_blocked: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl From<HashTagRow> for HashTag {
    fn from(r: HashTagRow) -> Self {
        HashTag {
            id: r.id,
            name: r.name,
            videos_count: r.videos_count,
            views_count: r.views_count,
            is_blocked: r.is_blocked,
            created_at: to_datetime(r.created_at),
            updated_at: to_datetime(r.updated_at),
        }
    }
}

pub struct ChatMessageRow {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub body: String,
    pub kind: String,
    pub media_url: Option<String>,
    pub is_read: bool,
    pub is_delivered: bool,
    pub reply_to_message_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ChatMessageRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ChatMessageRow {
            id: row.get(0)?,
            sender_id: row.get(1)?,
            receiver_id: row.get(2)?,
            body: row.get(3)?,
            kind: row.get(4)?,
            media_url: row.get(5)?,
            is_read: row.get(6)?,
            is_delivered: row.get(7)?,
            reply_to_message_id: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

impl From<ChatMessageRow> for ChatMessage {
    fn from(r: ChatMessageRow) -> Self {
        ChatMessage {
            id: r.id,
            sender_id: r.sender_id,
            receiver_id: r.receiver_id,
            body: r.body,
            kind: MessageKind::parse(&r.kind),
            media_url: r.media_url,
            is_read: r.is_read,
            is_delivered: r.is_delivered,
            reply_to_message_id: r.reply_to_message_id,
            created_at: to_datetime(r.created_at),
            updated_at: to_datetime(r.updated_at),
        }
    }
}

pub struct NotificationRow {
    pub id: String,
    pub user_id: String,
    pub from_user_id: Option<String>,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub data: Option<String>,
    pub is_read: bool,
    pub created_at: i64,
}

impl NotificationRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(NotificationRow {
            id: row.get(0)?,
            user_id: row.get(1)?,
            from_user_id: row.get(2)?,
            kind: row.get(3)?,
            title: row.get(4)?,
            body: row.get(5)?,
            data: row.get(6)?,
            is_read: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

impl From<NotificationRow> for Notification {
    fn from(r: NotificationRow) -> Self {
        let data = r.data.and_then(|s| {
            serde_json::from_str(&s)
                .map_err(|e| warn!("corrupt data on notification '{}': {}", r.id, e))
                .ok()
        });
        Notification {
            id: r.id,
            user_id: r.user_id,
            from_user_id: r.from_user_id,
            kind: NotificationKind::parse(&r.kind),
            title: r.title,
            body: r.body,
            data,
            is_read: r.is_read,
            created_at: to_datetime(r.created_at),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account with its denormalized engagement counters.
///
/// The counters cache the cardinality of the follow/like/video relations
/// for O(1) profile reads; every mutation of those relations adjusts the
/// matching counter in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
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
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub user_id: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    /// Playback length in milliseconds.
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
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A video as seen by a particular viewer. The two flags are computed
/// fresh on every request against the likes/follows relations and are
/// never persisted, so they cannot go stale.
#[derive(Debug, Clone, Serialize)]
pub struct VideoView {
    #[serde(flatten)]
    pub video: Video,
    pub is_liked_by_viewer: bool,
    pub is_following_owner: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub video_id: String,
    pub user_id: String,
    pub text: String,
    /// `None` for a top-level comment, `Some(parent)` for a reply.
    /// Replies always point at a top-level comment; the tree is two
    /// levels deep by construction.
    pub parent_comment_id: Option<String>,
    pub likes_count: i64,
    pub replies_count: i64,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashTag {
    pub id: String,
    pub name: String,
    pub videos_count: i64,
    pub views_count: i64,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Image,
    Video,
    Audio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub body: String,
    pub kind: MessageKind,
    pub media_url: Option<String>,
    pub is_read: bool,
    pub is_delivered: bool,
    pub reply_to_message_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Follow,
    Like,
    Comment,
    Mention,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    /// Recipient.
    pub user_id: String,
    /// Actor that triggered the notification, if any.
    pub from_user_id: Option<String>,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    /// Free-form JSON payload (target ids etc.) for navigation.
    pub data: Option<serde_json::Value>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Video => "video",
            MessageKind::Audio => "audio",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "image" => MessageKind::Image,
            "video" => MessageKind::Video,
            "audio" => MessageKind::Audio,
            _ => MessageKind::Text,
        }
    }
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Follow => "follow",
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
            NotificationKind::Mention => "mention",
            NotificationKind::System => "system",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "follow" => NotificationKind::Follow,
            "like" => NotificationKind::Like,
            "comment" => NotificationKind::Comment,
            "mention" => NotificationKind::Mention,
            _ => NotificationKind::System,
        }
    }
}

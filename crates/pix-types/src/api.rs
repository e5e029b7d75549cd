use serde::{Deserialize, Serialize};

use crate::models::MessageKind;

/// Validated pagination window. `limit` must be positive; callers that
/// pass 0 get an invalid-operation error from the service layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Page {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    20
}

impl Default for Page {
    fn default() -> Self {
        Page { limit: default_limit(), offset: 0 }
    }
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Page { limit, offset }
    }
}

/// Where a new comment attaches. Replies may only target a top-level
/// comment, which keeps the thread exactly two levels deep; the depth
/// limit is part of the type, not a runtime convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentThread {
    TopLevel,
    ReplyTo(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub avatar: Option<String>,
}

/// Everything needed to publish a new video. Media is referenced by
/// URL; capture and transcoding happen outside this core.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoDraft {
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub duration: i64,
    pub width: i64,
    pub height: i64,
    pub file_size: i64,
    pub is_public: bool,
    pub allow_comments: bool,
    pub allow_duet: bool,
    pub allow_stitch: bool,
    pub allow_download: bool,
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
}

impl Default for VideoDraft {
    fn default() -> Self {
        VideoDraft {
            video_url: String::new(),
            thumbnail_url: None,
            description: None,
            duration: 0,
            width: 0,
            height: 0,
            file_size: 0,
            is_public: true,
            allow_comments: true,
            allow_duet: true,
            allow_stitch: true,
            allow_download: true,
            hashtags: Vec::new(),
            mentions: Vec::new(),
        }
    }
}

/// Partial video settings update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoChanges {
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub allow_comments: Option<bool>,
    pub allow_duet: Option<bool>,
    pub allow_stitch: Option<bool>,
    pub allow_download: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMessage {
    pub body: String,
    #[serde(default = "default_message_kind")]
    pub kind: MessageKind,
    pub media_url: Option<String>,
    pub reply_to_message_id: Option<String>,
}

fn default_message_kind() -> MessageKind {
    MessageKind::Text
}

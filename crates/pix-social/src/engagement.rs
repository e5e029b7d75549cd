//! Engagement Aggregator: the like relation, the two-level comment tree,
//! and the denormalized counters that cache both.
//!
//! The `pix_db::videos::bump_*` delta updates are the only sanctioned
//! way video counters move; every call here pairs the relation change
//! with its counter delta inside one transaction.

use tracing::debug;

use pix_db::{Database, comments, hashtags, likes, users, videos};
use pix_db::models::CommentRow;
use pix_types::api::{CommentThread, Page};
use pix_types::models::{Comment, NotificationKind, Video};
use pix_types::time::now_millis;
use uuid::Uuid;

use crate::error::{Result, SocialError};
use crate::messaging;

/// Like a video. Idempotent: liking twice is absorbed as "no change".
/// On an actual insert, the video's like counter and the owner's
/// received-likes counter move in the same transaction. Returns the
/// resulting liked state (always true).
pub fn like(db: &Database, user_id: &str, video_id: &str) -> Result<bool> {
    let changed = db.with_tx(|conn| {
        let Some(liker) = users::get_by_id(conn, user_id)? else {
            return Err(SocialError::not_found("user", user_id).into());
        };
        let Some(video) = videos::get(conn, video_id)? else {
            return Err(SocialError::not_found("video", video_id).into());
        };

        let inserted = likes::insert(conn, user_id, video_id, now_millis())?;
        if inserted {
            videos::bump_likes(conn, video_id, 1)?;
            users::bump_likes(conn, &video.user_id, 1)?;
            if video.user_id != user_id {
                messaging::notify(
                    conn,
                    &video.user_id,
                    Some(user_id),
                    NotificationKind::Like,
                    "New like",
                    &format!("{} liked your video", liker.username),
                    Some(serde_json::json!({ "videoId": video_id, "userId": user_id })),
                )?;
            }
        }
        Ok(inserted)
    })?;

    debug!(user_id, video_id, changed, "like");
    Ok(true)
}

/// Remove a like. A missing like is a silent no-op. Returns the
/// resulting liked state (always false).
pub fn unlike(db: &Database, user_id: &str, video_id: &str) -> Result<bool> {
    let changed = db.with_tx(|conn| {
        let Some(video) = videos::get(conn, video_id)? else {
            return Err(SocialError::not_found("video", video_id).into());
        };

        let deleted = likes::delete(conn, user_id, video_id)?;
        if deleted {
            videos::bump_likes(conn, video_id, -1)?;
            users::bump_likes(conn, &video.user_id, -1)?;
        }
        Ok(deleted)
    })?;

    debug!(user_id, video_id, changed, "unlike");
    Ok(false)
}

pub fn is_liked(db: &Database, user_id: &str, video_id: &str) -> Result<bool> {
    Ok(db.with_conn(|conn| likes::exists(conn, user_id, video_id))?)
}

/// Videos the user liked, most recently liked first, with a stable
/// unique tie-break so a fresh like never shuffles an already-fetched
/// page.
pub fn liked_videos(db: &Database, user_id: &str, page: Page) -> Result<Vec<Video>> {
    let page = crate::check_page(page)?;
    let rows = db.with_conn(|conn| likes::liked_videos(conn, user_id, page.limit, page.offset))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Add a comment or a reply. Replies may only attach to a top-level
/// comment on the same video. The comment row, the video's comment
/// counter, the parent's reply counter and the owner's notification all
/// commit together.
pub fn add_comment(
    db: &Database,
    video_id: &str,
    author_id: &str,
    text: &str,
    thread: CommentThread,
) -> Result<Comment> {
    if text.trim().is_empty() {
        return Err(SocialError::invalid("comment text must not be empty"));
    }

    let row = db.with_tx(|conn| {
        let Some(author) = users::get_by_id(conn, author_id)? else {
            return Err(SocialError::not_found("user", author_id).into());
        };
        let Some(video) = videos::get(conn, video_id)? else {
            return Err(SocialError::not_found("video", video_id).into());
        };
        if !video.allow_comments {
            return Err(SocialError::forbidden("comments are disabled on this video").into());
        }

        let parent_id = match &thread {
            CommentThread::TopLevel => None,
            CommentThread::ReplyTo(parent_id) => {
                let Some(parent) = comments::get(conn, parent_id)? else {
                    return Err(SocialError::not_found("comment", parent_id.clone()).into());
                };
                if parent.video_id != video_id {
                    return Err(SocialError::not_found("comment", parent_id.clone()).into());
                }
                if parent.parent_comment_id.is_some() {
                    return Err(
                        SocialError::invalid("cannot reply to a reply; threads are one level deep")
                            .into(),
                    );
                }
                Some(parent_id.clone())
            }
        };

        let now = now_millis();
        let row = CommentRow {
            id: Uuid::new_v4().to_string(),
            video_id: video_id.to_string(),
            user_id: author_id.to_string(),
            text: text.to_string(),
            parent_comment_id: parent_id.clone(),
            likes_count: 0,
            replies_count: 0,
            is_edited: false,
            created_at: now,
            updated_at: now,
        };
        comments::insert(conn, &row)?;
        videos::bump_comments(conn, video_id, 1)?;
        if let Some(parent_id) = &parent_id {
            comments::bump_replies(conn, parent_id, 1)?;
        }
        if video.user_id != author_id {
            messaging::notify(
                conn,
                &video.user_id,
                Some(author_id),
                NotificationKind::Comment,
                "New comment",
                &format!("{} commented on your video: \"{}\"", author.username, text),
                Some(serde_json::json!({ "videoId": video_id, "userId": author_id })),
            )?;
        }
        Ok(row)
    })?;

    Ok(row.into())
}

/// Edit a comment's text. Only the author may edit.
pub fn edit_comment(
    db: &Database,
    comment_id: &str,
    editor_id: &str,
    new_text: &str,
) -> Result<Comment> {
    if new_text.trim().is_empty() {
        return Err(SocialError::invalid("comment text must not be empty"));
    }

    let row = db.with_tx(|conn| {
        let Some(comment) = comments::get(conn, comment_id)? else {
            return Err(SocialError::not_found("comment", comment_id).into());
        };
        if comment.user_id != editor_id {
            return Err(SocialError::forbidden("only the author can edit a comment").into());
        }

        comments::set_text(conn, comment_id, new_text, now_millis())?;
        match comments::get(conn, comment_id)? {
            Some(updated) => Ok(updated),
            None => Err(SocialError::not_found("comment", comment_id).into()),
        }
    })?;

    Ok(row.into())
}

/// Delete a comment (author only). Replies cascade with it; the video's
/// comment counter drops by the number of removed rows and a reply also
/// releases one slot on its parent's reply counter.
pub fn delete_comment(db: &Database, comment_id: &str, caller_id: &str) -> Result<()> {
    db.with_tx(|conn| {
        let Some(comment) = comments::get(conn, comment_id)? else {
            return Err(SocialError::not_found("comment", comment_id).into());
        };
        if comment.user_id != caller_id {
            return Err(SocialError::forbidden("only the author can delete a comment").into());
        }

        let removed = comments::delete(conn, comment_id)?;
        videos::bump_comments(conn, &comment.video_id, -removed)?;
        if let Some(parent_id) = &comment.parent_comment_id {
            comments::bump_replies(conn, parent_id, -1)?;
        }
        Ok(())
    })?;
    Ok(())
}

/// Top-level comments on a video, newest first.
pub fn comments_for_video(db: &Database, video_id: &str) -> Result<Vec<Comment>> {
    let rows = db.with_conn(|conn| {
        if videos::get(conn, video_id)?.is_none() {
            return Err(SocialError::not_found("video", video_id).into());
        }
        comments::top_level_for_video(conn, video_id)
    })?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Replies under a top-level comment, oldest first.
pub fn replies_for(db: &Database, comment_id: &str) -> Result<Vec<Comment>> {
    let rows = db.with_conn(|conn| {
        if comments::get(conn, comment_id)?.is_none() {
            return Err(SocialError::not_found("comment", comment_id).into());
        }
        comments::replies_for(conn, comment_id)
    })?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Record one playback. Also credits every hashtag on the video.
pub fn record_view(db: &Database, video_id: &str) -> Result<()> {
    db.with_tx(|conn| {
        let Some(video) = videos::get(conn, video_id)? else {
            return Err(SocialError::not_found("video", video_id).into());
        };
        videos::bump_views(conn, video_id, 1)?;
        for tag in decode_tag_list(video.hashtags.as_deref()) {
            hashtags::bump_views(conn, &tag, 1)?;
        }
        Ok(())
    })?;
    Ok(())
}

pub fn record_share(db: &Database, video_id: &str) -> Result<()> {
    db.with_tx(|conn| {
        if videos::get(conn, video_id)?.is_none() {
            return Err(SocialError::not_found("video", video_id).into());
        }
        videos::bump_shares(conn, video_id, 1)
    })?;
    Ok(())
}

pub fn record_download(db: &Database, video_id: &str) -> Result<()> {
    db.with_tx(|conn| {
        let Some(video) = videos::get(conn, video_id)? else {
            return Err(SocialError::not_found("video", video_id).into());
        };
        if !video.allow_download {
            return Err(SocialError::forbidden("downloads are disabled on this video").into());
        }
        videos::bump_downloads(conn, video_id, 1)
    })?;
    Ok(())
}

pub(crate) fn decode_tag_list(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(s).ok()).unwrap_or_default()
}

//! Entity Store operations: account lifecycle, profile updates, video
//! publishing, and the counter-repair entry points.

use tracing::{debug, info};
use uuid::Uuid;

use pix_db::{Database, comments, follows, hashtags, likes, repair, users, videos};
use pix_db::models::{UserRow, VideoRow};
use pix_types::api::{ProfileChanges, RegisterRequest, VideoChanges, VideoDraft};
use pix_types::models::{NotificationKind, User, Video};
use pix_types::time::now_millis;

use crate::engagement::decode_tag_list;
use crate::error::{Result, SocialError};
use crate::messaging;

/// Create an account. Username and email must be unique; duplicates are
/// rejected as invalid rather than silently merged.
pub fn register(db: &Database, req: RegisterRequest) -> Result<User> {
    let username = req.username.trim();
    let email = req.email.trim();
    if username.is_empty() {
        return Err(SocialError::invalid("username must not be empty"));
    }
    if !email.contains('@') {
        return Err(SocialError::invalid("email address is malformed"));
    }

    let row = db.with_tx(|conn| {
        if users::username_exists(conn, username)? {
            return Err(SocialError::invalid(format!("username already taken: {username}")).into());
        }
        if users::email_exists(conn, email)? {
            return Err(SocialError::invalid(format!("email already registered: {email}")).into());
        }

        let now = now_millis();
        let row = UserRow {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            full_name: req.full_name.trim().to_string(),
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
            last_seen: now,
            created_at: now,
            updated_at: now,
        };
        users::insert(conn, &row)?;
        Ok(row)
    })?;

    info!(user_id = %row.id, username, "registered");
    Ok(row.into())
}

pub fn get_user(db: &Database, user_id: &str) -> Result<User> {
    let row = db.with_conn(|conn| users::get_by_id(conn, user_id))?;
    row.map(Into::into)
        .ok_or_else(|| SocialError::not_found("user", user_id))
}

pub fn get_user_by_username(db: &Database, username: &str) -> Result<User> {
    let row = db.with_conn(|conn| users::get_by_username(conn, username))?;
    row.map(Into::into)
        .ok_or_else(|| SocialError::not_found("user", username))
}

pub fn search_users(db: &Database, query: &str, limit: u32) -> Result<Vec<User>> {
    let limit = crate::check_limit(limit)?;
    if query.trim().is_empty() {
        return Err(SocialError::invalid("search query must not be empty"));
    }
    let rows = db.with_conn(|conn| users::search(conn, query, limit))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub fn popular_users(db: &Database, limit: u32) -> Result<Vec<User>> {
    let limit = crate::check_limit(limit)?;
    let rows = db.with_conn(|conn| users::popular(conn, limit))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub fn verified_users(db: &Database, limit: u32) -> Result<Vec<User>> {
    let limit = crate::check_limit(limit)?;
    let rows = db.with_conn(|conn| users::verified(conn, limit))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Apply a partial profile edit and return the updated user.
pub fn update_profile(db: &Database, user_id: &str, changes: ProfileChanges) -> Result<User> {
    let row = db.with_tx(|conn| {
        let changed = users::update_profile(
            conn,
            user_id,
            changes.full_name.as_deref(),
            changes.bio.as_deref(),
            changes.website.as_deref(),
            changes.avatar.as_deref(),
            now_millis(),
        )?;
        if !changed {
            return Err(SocialError::not_found("user", user_id).into());
        }
        match users::get_by_id(conn, user_id)? {
            Some(row) => Ok(row),
            None => Err(SocialError::not_found("user", user_id).into()),
        }
    })?;
    Ok(row.into())
}

pub fn set_private(db: &Database, user_id: &str, is_private: bool) -> Result<()> {
    let changed = db.with_conn(|conn| users::set_private(conn, user_id, is_private, now_millis()))?;
    if !changed {
        return Err(SocialError::not_found("user", user_id));
    }
    Ok(())
}

pub fn touch_last_seen(db: &Database, user_id: &str) -> Result<()> {
    Ok(db.with_conn(|conn| users::touch_last_seen(conn, user_id, now_millis()))?)
}

/// Delete an account. Follows, likes, comments, videos, messages and
/// notifications cascade away; counters on the surviving rows they
/// touched are recomputed in the same transaction so no stale credit is
/// left behind.
pub fn delete_user(db: &Database, user_id: &str) -> Result<()> {
    db.with_tx(|conn| {
        if users::get_by_id(conn, user_id)?.is_none() {
            return Err(SocialError::not_found("user", user_id).into());
        }

        // Rows whose counters the cascade will invalidate, collected
        // before anything is deleted.
        let mut affected_users: Vec<String> = follows::following_ids(conn, user_id)?;
        for follower in follows::followers(conn, user_id)? {
            affected_users.push(follower.id);
        }

        let mut affected_videos = likes::video_ids_liked_by(conn, user_id)?;
        affected_videos.extend(comments::video_ids_commented_by(conn, user_id)?);
        affected_videos.sort();
        affected_videos.dedup();

        affected_users.extend(videos::owner_ids(conn, &affected_videos)?);
        affected_users.sort();
        affected_users.dedup();
        affected_users.retain(|id| id != user_id);

        // Tags on the user's own uploads lose a video each.
        let mut affected_tags: Vec<String> = Vec::new();
        for video in videos::by_user(conn, user_id, false)? {
            affected_tags.extend(decode_tag_list(video.hashtags.as_deref()));
        }
        affected_tags.sort();
        affected_tags.dedup();

        users::delete(conn, user_id)?;

        for video_id in &affected_videos {
            repair::recount_video(conn, video_id)?;
        }
        for other_id in &affected_users {
            repair::recount_user(conn, other_id)?;
        }
        for tag in &affected_tags {
            repair::recount_hashtag(conn, tag)?;
        }
        Ok(())
    })?;

    info!(user_id, "account deleted");
    Ok(())
}

/// Publish a video. The row, the owner's video counter, the hashtag
/// upserts and the mention notifications commit together.
pub fn publish_video(db: &Database, owner_id: &str, draft: VideoDraft) -> Result<Video> {
    if draft.video_url.trim().is_empty() {
        return Err(SocialError::invalid("video url must not be empty"));
    }

    let row = db.with_tx(|conn| {
        let Some(owner) = users::get_by_id(conn, owner_id)? else {
            return Err(SocialError::not_found("user", owner_id).into());
        };

        let tags = normalize_tags(&draft.hashtags);
        let now = now_millis();
        let row = VideoRow {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            video_url: draft.video_url.clone(),
            thumbnail_url: draft.thumbnail_url.clone(),
            description: draft.description.clone(),
            duration: draft.duration,
            width: draft.width,
            height: draft.height,
            file_size: draft.file_size,
            likes_count: 0,
            comments_count: 0,
            shares_count: 0,
            views_count: 0,
            download_count: 0,
            is_public: draft.is_public,
            allow_comments: draft.allow_comments,
            allow_duet: draft.allow_duet,
            allow_stitch: draft.allow_stitch,
            allow_download: draft.allow_download,
            hashtags: Some(serde_json::to_string(&tags)?),
            mentions: Some(serde_json::to_string(&draft.mentions)?),
            created_at: now,
            updated_at: now,
        };
        videos::insert(conn, &row)?;
        users::bump_videos(conn, owner_id, 1)?;

        for tag in &tags {
            hashtags::upsert_for_video(conn, &Uuid::new_v4().to_string(), tag, now)?;
        }

        for mention in &draft.mentions {
            let Some(mentioned) = users::get_by_username(conn, mention)? else {
                continue;
            };
            if mentioned.id == owner_id {
                continue;
            }
            messaging::notify(
                conn,
                &mentioned.id,
                Some(owner_id),
                NotificationKind::Mention,
                "You were mentioned",
                &format!("{} mentioned you in a video", owner.username),
                Some(serde_json::json!({ "videoId": row.id, "userId": owner_id })),
            )?;
        }
        Ok(row)
    })?;

    debug!(video_id = %row.id, owner_id, "video published");
    Ok(row.into())
}

pub fn get_video(db: &Database, video_id: &str) -> Result<Video> {
    let row = db.with_conn(|conn| videos::get(conn, video_id))?;
    row.map(Into::into)
        .ok_or_else(|| SocialError::not_found("video", video_id))
}

/// Apply a partial settings edit to a video. Owner only.
pub fn update_video(
    db: &Database,
    video_id: &str,
    caller_id: &str,
    changes: VideoChanges,
) -> Result<Video> {
    let row = db.with_tx(|conn| {
        let Some(video) = videos::get(conn, video_id)? else {
            return Err(SocialError::not_found("video", video_id).into());
        };
        if video.user_id != caller_id {
            return Err(SocialError::forbidden("only the owner can edit a video").into());
        }

        videos::update_settings(
            conn,
            video_id,
            changes.description.as_deref(),
            changes.is_public,
            changes.allow_comments,
            changes.allow_duet,
            changes.allow_stitch,
            changes.allow_download,
            now_millis(),
        )?;
        match videos::get(conn, video_id)? {
            Some(updated) => Ok(updated),
            None => Err(SocialError::not_found("video", video_id).into()),
        }
    })?;
    Ok(row.into())
}

/// Delete a video. Owner only. Its likes and comments cascade away; the
/// owner's video counter and received-likes counter and each attached
/// hashtag give back the credit this video held.
pub fn delete_video(db: &Database, video_id: &str, caller_id: &str) -> Result<()> {
    db.with_tx(|conn| {
        let Some(video) = videos::get(conn, video_id)? else {
            return Err(SocialError::not_found("video", video_id).into());
        };
        if video.user_id != caller_id {
            return Err(SocialError::forbidden("only the owner can delete a video").into());
        }

        videos::delete(conn, video_id)?;
        users::bump_videos(conn, &video.user_id, -1)?;
        users::bump_likes(conn, &video.user_id, -video.likes_count)?;
        for tag in decode_tag_list(video.hashtags.as_deref()) {
            hashtags::bump_videos(conn, &tag, -1)?;
        }
        Ok(())
    })?;

    debug!(video_id, "video deleted");
    Ok(())
}

/// Recompute a user's counters from the relation tables. Idempotent; a
/// no-op when the counters already match.
pub fn repair_user_counters(db: &Database, user_id: &str) -> Result<()> {
    db.with_tx(|conn| {
        if users::get_by_id(conn, user_id)?.is_none() {
            return Err(SocialError::not_found("user", user_id).into());
        }
        repair::recount_user(conn, user_id)
    })?;
    Ok(())
}

/// Recompute a video's like/comment counters and its comments' reply
/// counters from the relation tables.
pub fn repair_video_counters(db: &Database, video_id: &str) -> Result<()> {
    db.with_tx(|conn| {
        if videos::get(conn, video_id)?.is_none() {
            return Err(SocialError::not_found("video", video_id).into());
        }
        repair::recount_video(conn, video_id)
    })?;
    Ok(())
}

/// Strip `#` prefixes and empty entries so "#dance" and "dance" land on
/// the same tag row.
fn normalize_tags(raw: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = raw
        .iter()
        .map(|t| t.trim().trim_start_matches('#').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

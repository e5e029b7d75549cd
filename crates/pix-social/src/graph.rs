//! Graph Query Engine: questions and mutations over the follow relation.

use tracing::debug;

use pix_db::{Database, follows, users};
use pix_types::models::{NotificationKind, User};
use pix_types::time::now_millis;

use crate::error::{Result, SocialError};
use crate::messaging;

/// True iff `follower_id` currently follows `following_id`.
pub fn is_following(db: &Database, follower_id: &str, following_id: &str) -> Result<bool> {
    Ok(db.with_conn(|conn| follows::exists(conn, follower_id, following_id))?)
}

/// Users `user_id` follows, most recently followed first.
pub fn following(db: &Database, user_id: &str) -> Result<Vec<User>> {
    let rows = db.with_conn(|conn| follows::following(conn, user_id))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Users following `user_id`, most recently followed first.
pub fn followers(db: &Database, user_id: &str) -> Result<Vec<User>> {
    let rows = db.with_conn(|conn| follows::followers(conn, user_id))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub fn following_count(db: &Database, user_id: &str) -> Result<i64> {
    Ok(db.with_conn(|conn| follows::following_count(conn, user_id))?)
}

pub fn followers_count(db: &Database, user_id: &str) -> Result<i64> {
    Ok(db.with_conn(|conn| follows::followers_count(conn, user_id))?)
}

/// Users who follow `user_id` and are followed back.
pub fn mutual_follows(db: &Database, user_id: &str) -> Result<Vec<User>> {
    let rows = db.with_conn(|conn| follows::mutuals(conn, user_id))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Friend-of-friend suggestions: candidates followed by people the user
/// follows, ranked by how many of those intermediaries follow them
/// (ties broken by user id). Never contains the user or anyone already
/// followed.
pub fn suggested_users(db: &Database, user_id: &str, limit: u32) -> Result<Vec<User>> {
    let limit = crate::check_limit(limit)?;
    let rows = db.with_conn(|conn| follows::suggestions(conn, user_id, limit))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Create the follow edge `follower -> following`. Idempotent: a repeat
/// call is absorbed silently and reported as no state change. On an
/// actual edge insert the two follow counters move in the same
/// transaction, and the target gets a follow notification.
pub fn follow(db: &Database, follower_id: &str, following_id: &str) -> Result<bool> {
    if follower_id == following_id {
        return Err(SocialError::invalid("cannot follow yourself"));
    }

    let changed = db.with_tx(|conn| {
        let Some(follower) = users::get_by_id(conn, follower_id)? else {
            return Err(SocialError::not_found("user", follower_id).into());
        };
        if users::get_by_id(conn, following_id)?.is_none() {
            return Err(SocialError::not_found("user", following_id).into());
        }

        let inserted = follows::insert(conn, follower_id, following_id, now_millis())?;
        if inserted {
            users::bump_following(conn, follower_id, 1)?;
            users::bump_followers(conn, following_id, 1)?;
            messaging::notify(
                conn,
                following_id,
                Some(follower_id),
                NotificationKind::Follow,
                "New follower",
                &format!("{} started following you", follower.username),
                Some(serde_json::json!({ "userId": follower_id })),
            )?;
        }
        Ok(inserted)
    })?;

    debug!(follower_id, following_id, changed, "follow");
    Ok(changed)
}

/// Remove the follow edge. A missing edge is a silent no-op; counters
/// move only when a row was actually deleted.
pub fn unfollow(db: &Database, follower_id: &str, following_id: &str) -> Result<bool> {
    if follower_id == following_id {
        return Err(SocialError::invalid("cannot unfollow yourself"));
    }

    let changed = db.with_tx(|conn| {
        let deleted = follows::delete(conn, follower_id, following_id)?;
        if deleted {
            users::bump_following(conn, follower_id, -1)?;
            users::bump_followers(conn, following_id, -1)?;
        }
        Ok(deleted)
    })?;

    debug!(follower_id, following_id, changed, "unfollow");
    Ok(changed)
}

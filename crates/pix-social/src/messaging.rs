//! Chat and notification boundary operations. These are thin CRUD over
//! the store; delivery (push, sockets) happens outside this core.

use rusqlite::Connection;
use uuid::Uuid;

use pix_db::{Database, chat, notifications, users};
use pix_db::models::{ChatMessageRow, NotificationRow};
use pix_types::api::NewMessage;
use pix_types::models::{ChatMessage, Notification, NotificationKind};
use pix_types::time::now_millis;

use crate::error::{Result, SocialError};

/// Queue a notification row for `recipient`. Used by the graph and
/// engagement services inside their own transactions so the notification
/// commits together with the event that caused it.
pub(crate) fn notify(
    conn: &Connection,
    recipient_id: &str,
    from_user_id: Option<&str>,
    kind: NotificationKind,
    title: &str,
    body: &str,
    data: Option<serde_json::Value>,
) -> anyhow::Result<()> {
    let now = now_millis();
    let row = NotificationRow {
        id: Uuid::new_v4().to_string(),
        user_id: recipient_id.to_string(),
        from_user_id: from_user_id.map(str::to_string),
        kind: kind.as_str().to_string(),
        title: title.to_string(),
        body: body.to_string(),
        data: data.map(|v| v.to_string()),
        is_read: false,
        created_at: now,
    };
    notifications::insert(conn, &row)
}

pub fn send_message(
    db: &Database,
    sender_id: &str,
    receiver_id: &str,
    message: NewMessage,
) -> Result<ChatMessage> {
    if sender_id == receiver_id {
        return Err(SocialError::invalid("cannot message yourself"));
    }
    if message.body.trim().is_empty() {
        return Err(SocialError::invalid("message body must not be empty"));
    }

    let row = db.with_tx(|conn| {
        if users::get_by_id(conn, sender_id)?.is_none() {
            return Err(SocialError::not_found("user", sender_id).into());
        }
        if users::get_by_id(conn, receiver_id)?.is_none() {
            return Err(SocialError::not_found("user", receiver_id).into());
        }

        let now = now_millis();
        let row = ChatMessageRow {
            id: Uuid::new_v4().to_string(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            body: message.body.clone(),
            kind: message.kind.as_str().to_string(),
            media_url: message.media_url.clone(),
            is_read: false,
            is_delivered: false,
            reply_to_message_id: message.reply_to_message_id.clone(),
            created_at: now,
            updated_at: now,
        };
        chat::insert(conn, &row)?;
        Ok(row)
    })?;

    Ok(row.into())
}

/// Messages between two users, newest first.
pub fn conversation(
    db: &Database,
    user_a: &str,
    user_b: &str,
    page: pix_types::api::Page,
) -> Result<Vec<ChatMessage>> {
    let page = crate::check_page(page)?;
    let rows = db.with_conn(|conn| chat::conversation(conn, user_a, user_b, page.limit, page.offset))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub fn mark_delivered(db: &Database, message_id: &str) -> Result<()> {
    let changed = db.with_conn(|conn| chat::mark_delivered(conn, message_id, now_millis()))?;
    if !changed {
        return Err(SocialError::not_found("message", message_id));
    }
    Ok(())
}

/// Mark everything `peer` sent to `reader` as read; returns how many
/// messages flipped.
pub fn mark_conversation_read(db: &Database, reader_id: &str, peer_id: &str) -> Result<u32> {
    Ok(db.with_conn(|conn| chat::mark_conversation_read(conn, reader_id, peer_id, now_millis()))?)
}

pub fn unread_message_count(db: &Database, user_id: &str) -> Result<i64> {
    Ok(db.with_conn(|conn| chat::unread_count(conn, user_id))?)
}

pub fn notifications_for(db: &Database, user_id: &str, limit: u32) -> Result<Vec<Notification>> {
    let limit = crate::check_limit(limit)?;
    let rows = db.with_conn(|conn| notifications::for_user(conn, user_id, limit))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub fn unread_notifications(db: &Database, user_id: &str) -> Result<Vec<Notification>> {
    let rows = db.with_conn(|conn| notifications::unread_for_user(conn, user_id))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub fn unread_notification_count(db: &Database, user_id: &str) -> Result<i64> {
    Ok(db.with_conn(|conn| notifications::unread_count(conn, user_id))?)
}

pub fn mark_notification_read(db: &Database, notification_id: &str) -> Result<()> {
    let changed = db.with_conn(|conn| notifications::mark_read(conn, notification_id))?;
    if !changed {
        return Err(SocialError::not_found("notification", notification_id));
    }
    Ok(())
}

pub fn mark_all_notifications_read(db: &Database, user_id: &str) -> Result<u32> {
    Ok(db.with_conn(|conn| notifications::mark_all_read(conn, user_id))?)
}

pub fn clear_notifications(db: &Database, user_id: &str) -> Result<u32> {
    Ok(db.with_conn(|conn| notifications::clear_for_user(conn, user_id))?)
}

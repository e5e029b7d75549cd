mod common;

use std::sync::Arc;
use std::thread;

use common::{db, insert_video, seed_user, seed_video, video_row};
use pix_social::{SocialError, accounts, engagement};
use pix_types::api::CommentThread;

#[test]
fn test_like_round_trip() {
    let db = db();
    seed_user(&db, "alice");
    seed_user(&db, "bob");
    seed_video(&db, "v1", "bob", 1_000);

    assert!(!engagement::is_liked(&db, "alice", "v1").unwrap());
    assert!(engagement::like(&db, "alice", "v1").unwrap());
    assert!(engagement::is_liked(&db, "alice", "v1").unwrap());

    let video = accounts::get_video(&db, "v1").unwrap();
    assert_eq!(video.likes_count, 1);
    // The owner's received-likes counter tracks the video counter.
    assert_eq!(accounts::get_user(&db, "bob").unwrap().likes_count, 1);

    assert!(!engagement::unlike(&db, "alice", "v1").unwrap());
    assert!(!engagement::is_liked(&db, "alice", "v1").unwrap());
    assert_eq!(accounts::get_video(&db, "v1").unwrap().likes_count, 0);
    assert_eq!(accounts::get_user(&db, "bob").unwrap().likes_count, 0);
}

#[test]
fn test_like_is_idempotent() {
    let db = db();
    seed_user(&db, "alice");
    seed_user(&db, "bob");
    seed_video(&db, "v1", "bob", 1_000);

    engagement::like(&db, "alice", "v1").unwrap();
    engagement::like(&db, "alice", "v1").unwrap();
    engagement::like(&db, "alice", "v1").unwrap();
    assert_eq!(accounts::get_video(&db, "v1").unwrap().likes_count, 1);

    // Removing a like that is already gone leaves counters alone.
    engagement::unlike(&db, "alice", "v1").unwrap();
    engagement::unlike(&db, "alice", "v1").unwrap();
    assert_eq!(accounts::get_video(&db, "v1").unwrap().likes_count, 0);
}

#[test]
fn test_like_unknown_video_is_not_found() {
    let db = db();
    seed_user(&db, "alice");

    let err = engagement::like(&db, "alice", "ghost").unwrap_err();
    assert!(matches!(err, SocialError::NotFound { .. }));
}

#[test]
fn test_concurrent_likers_apply_relative_deltas() {
    let db = Arc::new(db());
    seed_user(&db, "owner");
    for id in ["u1", "u2", "u3"] {
        seed_user(&db, id);
    }
    // The counter starts out ahead of the relation; deltas must build on
    // the stored value, not on a stale read.
    let mut row = video_row("v1", "owner", 1_000);
    row.likes_count = 5;
    insert_video(&db, &row);

    let handles: Vec<_> = ["u1", "u2", "u3"]
        .into_iter()
        .map(|user| {
            let db = Arc::clone(&db);
            thread::spawn(move || engagement::like(&db, user, "v1").unwrap())
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(accounts::get_video(&db, "v1").unwrap().likes_count, 8);
}

#[test]
fn test_liked_videos_ordering() {
    let db = db();
    seed_user(&db, "alice");
    seed_user(&db, "bob");
    seed_video(&db, "v1", "bob", 1_000);
    seed_video(&db, "v2", "bob", 2_000);

    db.with_conn(|conn| {
        pix_db::likes::insert(conn, "alice", "v1", 10)?;
        pix_db::likes::insert(conn, "alice", "v2", 20)?;
        Ok(())
    })
    .unwrap();

    let liked: Vec<String> = engagement::liked_videos(&db, "alice", Default::default())
        .unwrap()
        .into_iter()
        .map(|v| v.id)
        .collect();
    // Most recently liked first.
    assert_eq!(liked, vec!["v2".to_string(), "v1".to_string()]);
}

#[test]
fn test_comment_and_reply_bookkeeping() {
    let db = db();
    seed_user(&db, "alice");
    seed_user(&db, "bob");
    seed_video(&db, "v1", "bob", 1_000);

    let top = engagement::add_comment(&db, "v1", "alice", "first!", CommentThread::TopLevel).unwrap();
    assert!(top.parent_comment_id.is_none());
    assert_eq!(accounts::get_video(&db, "v1").unwrap().comments_count, 1);

    let reply =
        engagement::add_comment(&db, "v1", "bob", "welcome", CommentThread::ReplyTo(top.id.clone()))
            .unwrap();
    assert_eq!(reply.parent_comment_id.as_deref(), Some(top.id.as_str()));
    // Replies count toward the video total and the parent's reply counter.
    assert_eq!(accounts::get_video(&db, "v1").unwrap().comments_count, 2);

    let top_level = engagement::comments_for_video(&db, "v1").unwrap();
    assert_eq!(top_level.len(), 1);
    assert_eq!(top_level[0].replies_count, 1);

    let replies = engagement::replies_for(&db, &top.id).unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].id, reply.id);
}

#[test]
fn test_reply_to_reply_rejected() {
    let db = db();
    seed_user(&db, "alice");
    seed_user(&db, "bob");
    seed_video(&db, "v1", "bob", 1_000);

    let top = engagement::add_comment(&db, "v1", "alice", "top", CommentThread::TopLevel).unwrap();
    let reply =
        engagement::add_comment(&db, "v1", "bob", "reply", CommentThread::ReplyTo(top.id)).unwrap();

    let err = engagement::add_comment(&db, "v1", "alice", "nested", CommentThread::ReplyTo(reply.id))
        .unwrap_err();
    assert!(matches!(err, SocialError::InvalidOperation(_)));
    // The failed insert left no partial counter bump behind.
    assert_eq!(accounts::get_video(&db, "v1").unwrap().comments_count, 2);
}

#[test]
fn test_reply_to_comment_on_other_video_is_not_found() {
    let db = db();
    seed_user(&db, "alice");
    seed_user(&db, "bob");
    seed_video(&db, "v1", "bob", 1_000);
    seed_video(&db, "v2", "bob", 2_000);

    let top = engagement::add_comment(&db, "v1", "alice", "top", CommentThread::TopLevel).unwrap();
    let err = engagement::add_comment(&db, "v2", "alice", "cross", CommentThread::ReplyTo(top.id))
        .unwrap_err();
    assert!(matches!(err, SocialError::NotFound { .. }));
}

#[test]
fn test_comments_disabled_is_forbidden() {
    let db = db();
    seed_user(&db, "alice");
    seed_user(&db, "bob");
    let mut row = video_row("v1", "bob", 1_000);
    row.allow_comments = false;
    insert_video(&db, &row);

    let err = engagement::add_comment(&db, "v1", "alice", "hi", CommentThread::TopLevel).unwrap_err();
    assert!(matches!(err, SocialError::Forbidden(_)));
}

#[test]
fn test_edit_comment_author_only() {
    let db = db();
    seed_user(&db, "alice");
    seed_user(&db, "bob");
    seed_video(&db, "v1", "bob", 1_000);

    let c = engagement::add_comment(&db, "v1", "alice", "orig", CommentThread::TopLevel).unwrap();
    assert!(!c.is_edited);

    let err = engagement::edit_comment(&db, &c.id, "bob", "hacked").unwrap_err();
    assert!(matches!(err, SocialError::Forbidden(_)));

    let edited = engagement::edit_comment(&db, &c.id, "alice", "fixed").unwrap();
    assert_eq!(edited.text, "fixed");
    assert!(edited.is_edited);
}

#[test]
fn test_delete_comment_cascades_replies_and_counters() {
    let db = db();
    seed_user(&db, "alice");
    seed_user(&db, "bob");
    seed_video(&db, "v1", "bob", 1_000);

    let top = engagement::add_comment(&db, "v1", "alice", "top", CommentThread::TopLevel).unwrap();
    engagement::add_comment(&db, "v1", "bob", "r1", CommentThread::ReplyTo(top.id.clone())).unwrap();
    engagement::add_comment(&db, "v1", "bob", "r2", CommentThread::ReplyTo(top.id.clone())).unwrap();
    assert_eq!(accounts::get_video(&db, "v1").unwrap().comments_count, 3);

    let err = engagement::delete_comment(&db, &top.id, "bob").unwrap_err();
    assert!(matches!(err, SocialError::Forbidden(_)));

    engagement::delete_comment(&db, &top.id, "alice").unwrap();
    // Parent and both replies are gone, and the counter reflects all three.
    assert_eq!(accounts::get_video(&db, "v1").unwrap().comments_count, 0);
    assert!(engagement::comments_for_video(&db, "v1").unwrap().is_empty());
}

#[test]
fn test_record_view_share_download() {
    let db = db();
    seed_user(&db, "bob");
    let mut row = video_row("v1", "bob", 1_000);
    row.hashtags = Some(r#"["dance"]"#.to_string());
    insert_video(&db, &row);
    db.with_conn(|conn| pix_db::hashtags::upsert_for_video(conn, "h1", "dance", 1_000)).unwrap();

    engagement::record_view(&db, "v1").unwrap();
    engagement::record_view(&db, "v1").unwrap();
    engagement::record_share(&db, "v1").unwrap();
    engagement::record_download(&db, "v1").unwrap();

    let video = accounts::get_video(&db, "v1").unwrap();
    assert_eq!(video.views_count, 2);
    assert_eq!(video.shares_count, 1);
    assert_eq!(video.download_count, 1);

    // Views also credit the attached hashtag.
    let tag = db.with_conn(|conn| pix_db::hashtags::get_by_name(conn, "dance")).unwrap().unwrap();
    assert_eq!(tag.views_count, 2);
}

#[test]
fn test_download_disabled_is_forbidden() {
    let db = db();
    seed_user(&db, "bob");
    let mut row = video_row("v1", "bob", 1_000);
    row.allow_download = false;
    insert_video(&db, &row);

    let err = engagement::record_download(&db, "v1").unwrap_err();
    assert!(matches!(err, SocialError::Forbidden(_)));
}

mod common;

use common::{db, seed_user, seed_video};
use pix_social::{SocialError, accounts, engagement, graph};
use pix_types::api::{CommentThread, ProfileChanges, RegisterRequest, VideoChanges, VideoDraft};

fn register(db: &pix_db::Database, username: &str) -> pix_types::models::User {
    accounts::register(
        db,
        RegisterRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            full_name: username.to_string(),
        },
    )
    .unwrap()
}

#[test]
fn test_register_and_lookup() {
    let db = db();
    let alice = register(&db, "alice");

    assert_eq!(alice.followers_count, 0);
    assert!(alice.is_active);

    let by_id = accounts::get_user(&db, &alice.id).unwrap();
    assert_eq!(by_id.username, "alice");
    let by_name = accounts::get_user_by_username(&db, "alice").unwrap();
    assert_eq!(by_name.id, alice.id);

    let err = accounts::get_user(&db, "ghost").unwrap_err();
    assert!(matches!(err, SocialError::NotFound { .. }));
}

#[test]
fn test_register_rejects_duplicates() {
    let db = db();
    register(&db, "alice");

    let err = accounts::register(
        &db,
        RegisterRequest {
            username: "alice".into(),
            email: "other@example.com".into(),
            full_name: "Other".into(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, SocialError::InvalidOperation(_)));

    let err = accounts::register(
        &db,
        RegisterRequest {
            username: "alice2".into(),
            email: "alice@example.com".into(),
            full_name: "Other".into(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, SocialError::InvalidOperation(_)));
}

#[test]
fn test_register_validates_fields() {
    let db = db();
    let err = accounts::register(
        &db,
        RegisterRequest { username: "  ".into(), email: "a@b.c".into(), full_name: "X".into() },
    )
    .unwrap_err();
    assert!(matches!(err, SocialError::InvalidOperation(_)));

    let err = accounts::register(
        &db,
        RegisterRequest { username: "ok".into(), email: "not-an-email".into(), full_name: "X".into() },
    )
    .unwrap_err();
    assert!(matches!(err, SocialError::InvalidOperation(_)));
}

#[test]
fn test_update_profile_is_partial() {
    let db = db();
    let alice = register(&db, "alice");

    let updated = accounts::update_profile(
        &db,
        &alice.id,
        ProfileChanges { bio: Some("hello".into()), ..Default::default() },
    )
    .unwrap();
    assert_eq!(updated.bio.as_deref(), Some("hello"));
    assert_eq!(updated.full_name, "alice");

    let updated = accounts::update_profile(
        &db,
        &alice.id,
        ProfileChanges { website: Some("https://a.example".into()), ..Default::default() },
    )
    .unwrap();
    // Earlier edits survive later partial edits.
    assert_eq!(updated.bio.as_deref(), Some("hello"));
    assert_eq!(updated.website.as_deref(), Some("https://a.example"));
}

#[test]
fn test_publish_video_bumps_counters_and_tags() {
    let db = db();
    let alice = register(&db, "alice");

    let video = accounts::publish_video(
        &db,
        &alice.id,
        VideoDraft {
            video_url: "https://cdn.example.com/a.mp4".into(),
            hashtags: vec!["#Dance".into(), "dance".into(), "music".into()],
            ..VideoDraft::default()
        },
    )
    .unwrap();
    // "#Dance" and "dance" normalize to one tag.
    assert_eq!(video.hashtags, vec!["dance", "music"]);
    assert_eq!(accounts::get_user(&db, &alice.id).unwrap().videos_count, 1);

    accounts::publish_video(
        &db,
        &alice.id,
        VideoDraft {
            video_url: "https://cdn.example.com/b.mp4".into(),
            hashtags: vec!["dance".into()],
            ..VideoDraft::default()
        },
    )
    .unwrap();

    let tag = db.with_conn(|conn| pix_db::hashtags::get_by_name(conn, "dance")).unwrap().unwrap();
    assert_eq!(tag.videos_count, 2);
}

#[test]
fn test_publish_video_notifies_mentions() {
    let db = db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    accounts::publish_video(
        &db,
        &alice.id,
        VideoDraft {
            video_url: "https://cdn.example.com/a.mp4".into(),
            mentions: vec!["bob".into(), "nobody".into()],
            ..VideoDraft::default()
        },
    )
    .unwrap();

    let unread = pix_social::messaging::unread_notifications(&db, &bob.id).unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].from_user_id.as_deref(), Some(alice.id.as_str()));
}

#[test]
fn test_update_video_owner_only() {
    let db = db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");
    let video = accounts::publish_video(
        &db,
        &alice.id,
        VideoDraft { video_url: "https://cdn.example.com/a.mp4".into(), ..VideoDraft::default() },
    )
    .unwrap();

    let err = accounts::update_video(
        &db,
        &video.id,
        &bob.id,
        VideoChanges { is_public: Some(false), ..Default::default() },
    )
    .unwrap_err();
    assert!(matches!(err, SocialError::Forbidden(_)));

    let updated = accounts::update_video(
        &db,
        &video.id,
        &alice.id,
        VideoChanges { is_public: Some(false), description: Some("mine".into()), ..Default::default() },
    )
    .unwrap();
    assert!(!updated.is_public);
    assert_eq!(updated.description.as_deref(), Some("mine"));
    // Untouched settings keep their values.
    assert!(updated.allow_comments);
}

#[test]
fn test_delete_video_returns_counter_credit() {
    let db = db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");
    let video = accounts::publish_video(
        &db,
        &alice.id,
        VideoDraft {
            video_url: "https://cdn.example.com/a.mp4".into(),
            hashtags: vec!["dance".into()],
            ..VideoDraft::default()
        },
    )
    .unwrap();
    engagement::like(&db, &bob.id, &video.id).unwrap();
    assert_eq!(accounts::get_user(&db, &alice.id).unwrap().likes_count, 1);

    accounts::delete_video(&db, &video.id, &alice.id).unwrap();

    let alice_now = accounts::get_user(&db, &alice.id).unwrap();
    assert_eq!(alice_now.videos_count, 0);
    assert_eq!(alice_now.likes_count, 0);
    let tag = db.with_conn(|conn| pix_db::hashtags::get_by_name(conn, "dance")).unwrap().unwrap();
    assert_eq!(tag.videos_count, 0);
    assert!(matches!(
        accounts::get_video(&db, &video.id).unwrap_err(),
        SocialError::NotFound { .. }
    ));
}

#[test]
fn test_delete_user_repairs_surviving_counters() {
    let db = db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");
    let carol = register(&db, "carol");

    let video = accounts::publish_video(
        &db,
        &bob.id,
        VideoDraft { video_url: "https://cdn.example.com/b.mp4".into(), ..VideoDraft::default() },
    )
    .unwrap();

    graph::follow(&db, &alice.id, &bob.id).unwrap();
    graph::follow(&db, &carol.id, &alice.id).unwrap();
    engagement::like(&db, &alice.id, &video.id).unwrap();
    engagement::add_comment(&db, &video.id, &alice.id, "hi", CommentThread::TopLevel).unwrap();

    accounts::delete_user(&db, &alice.id).unwrap();

    // Bob lost a follower, a like and a comment; Carol follows nobody now.
    let bob_now = accounts::get_user(&db, &bob.id).unwrap();
    assert_eq!(bob_now.followers_count, 0);
    assert_eq!(bob_now.likes_count, 0);
    let video_now = accounts::get_video(&db, &video.id).unwrap();
    assert_eq!(video_now.likes_count, 0);
    assert_eq!(video_now.comments_count, 0);
    assert_eq!(accounts::get_user(&db, &carol.id).unwrap().following_count, 0);

    assert!(matches!(
        accounts::get_user(&db, &alice.id).unwrap_err(),
        SocialError::NotFound { .. }
    ));
}

#[test]
fn test_repair_recovers_from_counter_drift() {
    let db = db();
    seed_user(&db, "alice");
    seed_user(&db, "bob");
    seed_video(&db, "v1", "bob", 1_000);

    graph::follow(&db, "alice", "bob").unwrap();
    engagement::like(&db, "alice", "v1").unwrap();

    // Corrupt the cached counters behind the service's back.
    db.with_conn(|conn| {
        conn.execute("UPDATE users SET followers_count = 99 WHERE id = 'bob'", [])?;
        conn.execute("UPDATE videos SET likes_count = 42 WHERE id = 'v1'", [])?;
        Ok(())
    })
    .unwrap();

    accounts::repair_user_counters(&db, "bob").unwrap();
    accounts::repair_video_counters(&db, "v1").unwrap();

    assert_eq!(accounts::get_user(&db, "bob").unwrap().followers_count, 1);
    assert_eq!(accounts::get_video(&db, "v1").unwrap().likes_count, 1);

    // Repair on a consistent store is a no-op.
    accounts::repair_user_counters(&db, "bob").unwrap();
    assert_eq!(accounts::get_user(&db, "bob").unwrap().followers_count, 1);
}

#[test]
fn test_user_search_and_listings() {
    let db = db();
    register(&db, "alice");
    register(&db, "alicia");
    register(&db, "bob");

    let found: Vec<String> = accounts::search_users(&db, "ali", 10)
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(found.len(), 2);
    assert!(found.contains(&"alice".to_string()));
    assert!(found.contains(&"alicia".to_string()));

    let err = accounts::search_users(&db, "", 10).unwrap_err();
    assert!(matches!(err, SocialError::InvalidOperation(_)));
}

mod common;

use common::{db, seed_user};
use pix_social::{SocialError, accounts, graph};

#[test]
fn test_follow_creates_edge_and_bumps_counters() {
    let db = db();
    seed_user(&db, "alice");
    seed_user(&db, "bob");

    assert!(graph::follow(&db, "alice", "bob").unwrap());
    assert!(graph::is_following(&db, "alice", "bob").unwrap());
    // Directed: the reverse edge does not exist.
    assert!(!graph::is_following(&db, "bob", "alice").unwrap());

    let alice = accounts::get_user(&db, "alice").unwrap();
    let bob = accounts::get_user(&db, "bob").unwrap();
    assert_eq!(alice.following_count, 1);
    assert_eq!(alice.followers_count, 0);
    assert_eq!(bob.followers_count, 1);
    assert_eq!(bob.following_count, 0);
}

#[test]
fn test_follow_is_idempotent() {
    let db = db();
    seed_user(&db, "alice");
    seed_user(&db, "bob");

    assert!(graph::follow(&db, "alice", "bob").unwrap());
    assert!(!graph::follow(&db, "alice", "bob").unwrap());
    assert!(!graph::follow(&db, "alice", "bob").unwrap());

    // Counters moved exactly once.
    assert_eq!(accounts::get_user(&db, "bob").unwrap().followers_count, 1);
    assert_eq!(accounts::get_user(&db, "alice").unwrap().following_count, 1);
}

#[test]
fn test_self_follow_rejected() {
    let db = db();
    seed_user(&db, "alice");

    let err = graph::follow(&db, "alice", "alice").unwrap_err();
    assert!(matches!(err, SocialError::InvalidOperation(_)));
    assert_eq!(accounts::get_user(&db, "alice").unwrap().following_count, 0);
}

#[test]
fn test_follow_unknown_user_is_not_found() {
    let db = db();
    seed_user(&db, "alice");

    let err = graph::follow(&db, "alice", "ghost").unwrap_err();
    assert!(matches!(err, SocialError::NotFound { .. }));
    let err = graph::follow(&db, "ghost", "alice").unwrap_err();
    assert!(matches!(err, SocialError::NotFound { .. }));
}

#[test]
fn test_unfollow_removes_edge_and_is_silent_when_absent() {
    let db = db();
    seed_user(&db, "alice");
    seed_user(&db, "bob");

    graph::follow(&db, "alice", "bob").unwrap();
    assert!(graph::unfollow(&db, "alice", "bob").unwrap());
    assert!(!graph::is_following(&db, "alice", "bob").unwrap());
    assert_eq!(accounts::get_user(&db, "bob").unwrap().followers_count, 0);
    assert_eq!(accounts::get_user(&db, "alice").unwrap().following_count, 0);

    // Unfollowing again is a no-op, not an error, and counters hold.
    assert!(!graph::unfollow(&db, "alice", "bob").unwrap());
    assert_eq!(accounts::get_user(&db, "bob").unwrap().followers_count, 0);
}

#[test]
fn test_following_and_followers_listings() {
    let db = db();
    for id in ["alice", "bob", "carol"] {
        seed_user(&db, id);
    }
    graph::follow(&db, "alice", "bob").unwrap();
    graph::follow(&db, "carol", "bob").unwrap();
    graph::follow(&db, "alice", "carol").unwrap();

    let following: Vec<String> = graph::following(&db, "alice")
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(following.len(), 2);
    assert!(following.contains(&"bob".to_string()));
    assert!(following.contains(&"carol".to_string()));

    let followers: Vec<String> = graph::followers(&db, "bob")
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(followers.len(), 2);

    assert_eq!(graph::following_count(&db, "alice").unwrap(), 2);
    assert_eq!(graph::followers_count(&db, "bob").unwrap(), 2);
}

#[test]
fn test_mutual_follows() {
    let db = db();
    for id in ["alice", "bob", "carol"] {
        seed_user(&db, id);
    }
    graph::follow(&db, "alice", "bob").unwrap();
    graph::follow(&db, "bob", "alice").unwrap();
    graph::follow(&db, "alice", "carol").unwrap();

    let mutuals: Vec<String> = graph::mutual_follows(&db, "alice")
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(mutuals, vec!["bob".to_string()]);
}

#[test]
fn test_suggestions_exclude_self_and_already_followed() {
    let db = db();
    for id in ["me", "friend", "candidate"] {
        seed_user(&db, id);
    }
    graph::follow(&db, "me", "friend").unwrap();
    graph::follow(&db, "friend", "candidate").unwrap();
    graph::follow(&db, "friend", "me").unwrap();

    let suggested: Vec<String> = graph::suggested_users(&db, "me", 10)
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    // "me" and the already-followed "friend" never appear.
    assert_eq!(suggested, vec!["candidate".to_string()]);
}

#[test]
fn test_suggestions_ranked_by_intermediary_count() {
    let db = db();
    for id in ["me", "f1", "f2", "popular", "niche"] {
        seed_user(&db, id);
    }
    graph::follow(&db, "me", "f1").unwrap();
    graph::follow(&db, "me", "f2").unwrap();
    // Two intermediaries follow "popular", one follows "niche".
    graph::follow(&db, "f1", "popular").unwrap();
    graph::follow(&db, "f2", "popular").unwrap();
    graph::follow(&db, "f1", "niche").unwrap();

    let suggested: Vec<String> = graph::suggested_users(&db, "me", 10)
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(suggested, vec!["popular".to_string(), "niche".to_string()]);
}

#[test]
fn test_suggestions_zero_limit_rejected() {
    let db = db();
    seed_user(&db, "me");

    let err = graph::suggested_users(&db, "me", 0).unwrap_err();
    assert!(matches!(err, SocialError::InvalidOperation(_)));
}

//! Demo driver: seeds a handful of accounts and uploads, exercises the
//! social operations, and prints the resulting feeds as JSON.

use std::path::PathBuf;

use tracing::info;

use pix_db::Database;
use pix_social::{accounts, engagement, feed, graph};
use pix_types::api::{CommentThread, RegisterRequest, VideoDraft};
use pix_types::models::User;

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pix=debug".into()),
        )
        .init();

    // Config
    let db = match std::env::var("PIX_DB_PATH") {
        Ok(path) => Database::open(&PathBuf::from(path))?,
        Err(_) => Database::open_in_memory()?,
    };

    let [alice, bob, carol] = seed(&db)?;

    graph::follow(&db, &alice.id, &bob.id)?;
    graph::follow(&db, &alice.id, &carol.id)?;
    graph::follow(&db, &bob.id, &carol.id)?;

    let bob_videos = feed::videos_by_user(&db, &bob.id, &bob.id)?;
    for view in &bob_videos {
        engagement::like(&db, &alice.id, &view.video.id)?;
        engagement::record_view(&db, &view.video.id)?;
    }
    if let Some(first) = bob_videos.first() {
        let top = engagement::add_comment(
            &db,
            &first.video.id,
            &alice.id,
            "love this one",
            CommentThread::TopLevel,
        )?;
        engagement::add_comment(
            &db,
            &first.video.id,
            &bob.id,
            "thanks!",
            CommentThread::ReplyTo(top.id),
        )?;
    }

    info!("seeded {} users", 3);

    let following = feed::following_feed(&db, &alice.id, 20)?;
    println!("following feed for {}:", alice.username);
    println!("{}", serde_json::to_string_pretty(&following)?);

    let trending = feed::trending_feed(&db, &alice.id, 20)?;
    println!("trending feed:");
    println!("{}", serde_json::to_string_pretty(&trending)?);

    let suggestions = graph::suggested_users(&db, &alice.id, 10)?;
    println!("suggested for {}:", alice.username);
    println!("{}", serde_json::to_string_pretty(&suggestions)?);

    Ok(())
}

fn seed(db: &Database) -> anyhow::Result<[User; 3]> {
    let alice = accounts::register(
        db,
        RegisterRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            full_name: "Alice".into(),
        },
    )?;
    let bob = accounts::register(
        db,
        RegisterRequest {
            username: "bob".into(),
            email: "bob@example.com".into(),
            full_name: "Bob".into(),
        },
    )?;
    let carol = accounts::register(
        db,
        RegisterRequest {
            username: "carol".into(),
            email: "carol@example.com".into(),
            full_name: "Carol".into(),
        },
    )?;

    for (owner, n) in [(&bob, 2u32), (&carol, 1u32)] {
        for i in 0..n {
            accounts::publish_video(
                db,
                &owner.id,
                VideoDraft {
                    video_url: format!("https://cdn.example.com/{}/{}.mp4", owner.username, i),
                    description: Some(format!("{} clip {}", owner.username, i)),
                    duration: 15_000,
                    width: 1080,
                    height: 1920,
                    file_size: 2_000_000,
                    hashtags: vec!["#demo".into(), "dance".into()],
                    ..VideoDraft::default()
                },
            )?;
        }
    }

    Ok([alice, bob, carol])
}

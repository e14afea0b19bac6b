//! Behavior tests for the relational store, run against SQLite.

mod common;

use common::TestServer;
use murmur_db::DbError;
use murmur_db::models::NewAudio;
use murmur_db::repos::{AudioRepo, FollowRepo, MemberRepo};

fn letter(owner_id: i64, receiver_id: i64, title: &str) -> NewAudio {
    NewAudio {
        owner_id,
        receiver_id,
        title: title.to_string(),
        file_name: format!("{title}.m4a"),
        text: "raw".to_string(),
        process_text: "processed".to_string(),
    }
}

#[tokio::test]
async fn test_create_audio_then_get_matches_inputs() {
    let server = TestServer::new().await;
    let db = server.db();
    let alice = server.seed_member("alice").await;
    let bob = server.seed_member("bob").await;

    let created = db.create_audio(&letter(alice.id, bob.id, "hi")).await.unwrap();

    let fetched = db.get_audio(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "hi");
    assert_eq!(fetched.file_name, "hi.m4a");
    assert_eq!(fetched.text, "raw");
    assert_eq!(fetched.process_text, "processed");
    assert_eq!(fetched.owner.id, alice.id);
    assert_eq!(fetched.owner.username, "alice");
    assert_eq!(fetched.receiver.id, bob.id);
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn test_create_audio_unknown_owner_fails_without_row() {
    let server = TestServer::new().await;
    let db = server.db();
    let bob = server.seed_member("bob").await;

    let result = db.create_audio(&letter(99, bob.id, "hi")).await;
    assert!(matches!(result, Err(DbError::NotFound(_))));

    assert!(db.audios_by_receiver(bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_audio_unknown_receiver_fails_without_row() {
    let server = TestServer::new().await;
    let db = server.db();
    let alice = server.seed_member("alice").await;

    // The receiver lookup is checked the same way as the owner lookup
    let result = db.create_audio(&letter(alice.id, 99, "hi")).await;
    assert!(matches!(result, Err(DbError::NotFound(_))));

    assert!(db.audios_by_owner(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_created_at_is_non_decreasing() {
    let server = TestServer::new().await;
    let db = server.db();
    let alice = server.seed_member("alice").await;
    let bob = server.seed_member("bob").await;

    let first = db.create_audio(&letter(alice.id, bob.id, "one")).await.unwrap();
    let second = db.create_audio(&letter(alice.id, bob.id, "two")).await.unwrap();

    assert!(second.created_at >= first.created_at);
}

#[tokio::test]
async fn test_owner_and_receiver_queries_partition_letters() {
    let server = TestServer::new().await;
    let db = server.db();
    let alice = server.seed_member("alice").await;
    let bob = server.seed_member("bob").await;

    db.create_audio(&letter(alice.id, bob.id, "to-bob")).await.unwrap();
    db.create_audio(&letter(bob.id, alice.id, "to-alice")).await.unwrap();

    let sent = db.audios_by_owner(alice.id).await.unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "to-bob");

    let received = db.audios_by_receiver(alice.id).await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].title, "to-alice");
}

#[tokio::test]
async fn test_follow_creates_both_directions() {
    let server = TestServer::new().await;
    let db = server.db();
    let alice = server.seed_member("alice").await;
    let bob = server.seed_member("bob").await;

    db.create_follow(alice.id, bob.id).await.unwrap();

    let following = db.following_of(alice.id).await.unwrap();
    assert_eq!(following.len(), 1);
    assert_eq!(following[0].id, bob.id);

    // The reverse row exists too, so the relation reads as undirected
    let followers = db.followers_of(alice.id).await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].id, bob.id);

    let bob_following = db.following_of(bob.id).await.unwrap();
    assert_eq!(bob_following.len(), 1);
    assert_eq!(bob_following[0].id, alice.id);
}

#[tokio::test]
async fn test_follow_duplicate_fails_either_direction() {
    let server = TestServer::new().await;
    let db = server.db();
    let alice = server.seed_member("alice").await;
    let bob = server.seed_member("bob").await;

    db.create_follow(alice.id, bob.id).await.unwrap();

    let again = db.create_follow(alice.id, bob.id).await;
    assert!(matches!(again, Err(DbError::AlreadyExists(_))));

    // The dual insert already created the reverse edge
    let reverse = db.create_follow(bob.id, alice.id).await;
    assert!(matches!(reverse, Err(DbError::AlreadyExists(_))));

    // Still exactly one edge pair
    assert_eq!(db.following_of(alice.id).await.unwrap().len(), 1);
    assert_eq!(db.following_of(bob.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_follow_unknown_member_fails_without_rows() {
    let server = TestServer::new().await;
    let db = server.db();
    let alice = server.seed_member("alice").await;

    let result = db.create_follow(alice.id, 42).await;
    assert!(matches!(result, Err(DbError::NotFound(_))));

    assert!(db.following_of(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_returns_follow_lists() {
    let server = TestServer::new().await;
    let db = server.db();
    let alice = server.seed_member("alice").await;
    let bob = server.seed_member("bob").await;
    let carol = server.seed_member("carol").await;

    db.create_follow(alice.id, bob.id).await.unwrap();
    db.create_follow(carol.id, alice.id).await.unwrap();

    let logged_in = db.login(alice.id, "alice-password").await.unwrap();
    assert_eq!(logged_in.username, "alice");

    let mut following: Vec<i64> = logged_in.following.iter().map(|m| m.id).collect();
    following.sort();
    assert_eq!(following, vec![bob.id, carol.id]);

    let mut followers: Vec<i64> = logged_in.followers.iter().map(|m| m.id).collect();
    followers.sort();
    assert_eq!(followers, vec![bob.id, carol.id]);
}

#[tokio::test]
async fn test_login_wrong_password_is_not_found() {
    let server = TestServer::new().await;
    let db = server.db();
    let alice = server.seed_member("alice").await;

    let result = db.login(alice.id, "not-the-password").await;
    assert!(matches!(result, Err(DbError::NotFound(_))));

    let result = db.login(99, "alice-password").await;
    assert!(matches!(result, Err(DbError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_member_cascades_to_audios_and_follows() {
    let server = TestServer::new().await;
    let db = server.db();
    let alice = server.seed_member("alice").await;
    let bob = server.seed_member("bob").await;

    let audio = db.create_audio(&letter(alice.id, bob.id, "hi")).await.unwrap();
    db.create_follow(alice.id, bob.id).await.unwrap();

    db.delete_member(alice.id).await.unwrap();

    assert!(db.get_member(alice.id).await.unwrap().is_none());
    assert!(db.get_audio(audio.id).await.unwrap().is_none());
    assert!(db.following_of(bob.id).await.unwrap().is_empty());
    assert!(db.followers_of(bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_unknown_member_is_not_found() {
    let server = TestServer::new().await;

    let result = server.db().delete_member(123).await;
    assert!(matches!(result, Err(DbError::NotFound(_))));
}

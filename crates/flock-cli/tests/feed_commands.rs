//! Integration tests for feed, post, follow and unfollow.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// A FLOCK_HOME holding a signed-in session.
fn signed_in_home() -> TempDir {
    let home = TempDir::new().expect("create temp flock home");
    fs::write(
        home.path().join("session.json"),
        r#"{"token":"tok","display_name":"Ada"}"#,
    )
    .unwrap();
    home
}

fn feed_body() -> serde_json::Value {
    json!({
        "status": "success",
        "currentUserID": "me",
        "following": ["u1"],
        "data": [
            {"_id": "p1", "userID": "u1", "name": "Bob", "email": "bob@example.com",
             "post": "first post", "createdAt": "not-a-date"},
            null,
            {"_id": "p2", "userID": "me", "name": "Ada", "email": "ada@example.com",
             "post": "second post", "createdAt": "also-not-a-date"}
        ]
    })
}

#[tokio::test]
async fn test_feed_prints_newest_first_with_follow_state() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = signed_in_home();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/feed"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body()))
        .expect(1)
        .mount(&server)
        .await;

    let output = cargo_bin_cmd!("flock")
        .env("FLOCK_HOME", home.path())
        .env("FLOCK_BASE_URL", server.uri())
        .arg("feed")
        .assert()
        .success()
        .stdout(predicate::str::contains("All Posts"))
        .stdout(predicate::str::contains("by Bob (bob@example.com)  not-a-date"))
        .stdout(predicate::str::contains("[following: u1]"))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let second = stdout.find("second post").unwrap();
    let first = stdout.find("first post").unwrap();
    assert!(second < first, "newest post should print first:\n{stdout}");
    // No follow marker on the user's own post.
    assert!(!stdout.contains(": me]"));
}

#[tokio::test]
async fn test_feed_following_uses_following_endpoint() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = signed_in_home();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/following/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "currentUserID": "me",
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("flock")
        .env("FLOCK_HOME", home.path())
        .env("FLOCK_BASE_URL", server.uri())
        .args(["feed", "--following"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Following Posts"))
        .stdout(predicate::str::contains("No posts to show"));
}

#[tokio::test]
async fn test_feed_rejected_status_fails() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = signed_in_home();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/feed"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "error", "message": "nope"})),
        )
        .mount(&server)
        .await;

    cargo_bin_cmd!("flock")
        .env("FLOCK_HOME", home.path())
        .env("FLOCK_BASE_URL", server.uri())
        .arg("feed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load posts"));
}

#[test]
fn test_feed_requires_login() {
    let home = TempDir::new().unwrap();

    cargo_bin_cmd!("flock")
        .env("FLOCK_HOME", home.path())
        .env("FLOCK_BASE_URL", "http://127.0.0.1:9")
        .arg("feed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please log in."));
}

#[tokio::test]
async fn test_post_sends_text() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = signed_in_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/post"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({"post": "hello flock"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("flock")
        .env("FLOCK_HOME", home.path())
        .env("FLOCK_BASE_URL", server.uri())
        .args(["post", "hello flock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Posted."));
}

#[tokio::test]
async fn test_blank_post_makes_no_request() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = signed_in_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    cargo_bin_cmd!("flock")
        .env("FLOCK_HOME", home.path())
        .env("FLOCK_BASE_URL", server.uri())
        .args(["post", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Post cannot be empty."));
}

#[tokio::test]
async fn test_follow_and_unfollow_send_wire_status() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = signed_in_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/follow/u1"))
        .and(body_json(json!({"status": "follow"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/follow/u1"))
        .and(body_json(json!({"status": "unfollow"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "error", "message": "Not following"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("flock")
        .env("FLOCK_HOME", home.path())
        .env("FLOCK_BASE_URL", server.uri())
        .args(["follow", "u1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Following u1."));

    cargo_bin_cmd!("flock")
        .env("FLOCK_HOME", home.path())
        .env("FLOCK_BASE_URL", server.uri())
        .args(["unfollow", "u1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not following"));
}

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::{TempDir, tempdir};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn flogin(home: &TempDir, base_url: &str) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("flogin");
    cmd.env("FLOGIN_HOME", home.path())
        .env("FLOGIN_API_BASE_URL", base_url)
        .env_remove("FLOGIN_LOG");
    cmd
}

fn write_session(home: &Path, token: &str) {
    let record = json!({
        "token": token,
        "username": "admin",
        "logged_in_at": "2025-01-01T00:00:00Z"
    });
    fs::write(home.join("session.json"), record.to_string()).unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_stores_token_used_by_later_commands() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"username": "admin", "password": "secret123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Login successful",
            "token": "tok-abc-123"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(header("authorization", "Bearer tok-abc-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
        .expect(1)
        .mount(&server)
        .await;

    flogin(&home, &server.uri())
        .args(["login", "-u", "admin", "-p", "secret123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as admin."))
        .stdout(predicate::str::contains("Welcome to your dashboard!"));

    let session = fs::read_to_string(home.path().join("session.json")).unwrap();
    assert!(session.contains("tok-abc-123"));

    flogin(&home, &server.uri())
        .args(["products", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No products found."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_shows_server_message() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Invalid username or password"
        })))
        .mount(&server)
        .await;

    flogin(&home, &server.uri())
        .args(["login", "-u", "admin", "-p", "wrong123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username or password"));

    assert!(!home.path().join("session.json").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_unauthorized_shows_server_message() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Invalid username or password"
        })))
        .mount(&server)
        .await;

    flogin(&home, &server.uri())
        .args(["login", "-u", "admin", "-p", "wrong123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username or password"))
        .stderr(predicate::str::contains("Session expired").not())
        .stderr(predicate::str::contains("clearing session").not());
}

#[test]
fn test_corrupt_session_does_not_block_logout() {
    let home = tempdir().unwrap();
    let session = home.path().join("session.json");
    fs::write(&session, "not json").unwrap();

    flogin(&home, "http://127.0.0.1:9")
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));

    assert!(!session.exists());
}

#[test]
fn test_invalid_credentials_are_not_sent() {
    let home = tempdir().unwrap();

    // Nothing listens here; validation must fail before any request.
    flogin(&home, "http://127.0.0.1:9")
        .args(["login", "-u", "ab", "-p", "abcdef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Username must be at least 3 characters",
        ))
        .stderr(predicate::str::contains(
            "Password must contain at least one number",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_response_clears_session() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start().await;
    let home = tempdir().unwrap();
    write_session(home.path(), "stale-token");

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    flogin(&home, &server.uri())
        .args(["products", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session expired"));

    assert!(!home.path().join("session.json").exists());
}

#[test]
fn test_protected_commands_require_login() {
    let home = tempdir().unwrap();

    flogin(&home, "http://127.0.0.1:9")
        .args(["products", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_login_when_already_logged_in() {
    let home = tempdir().unwrap();
    write_session(home.path(), "tok");

    flogin(&home, "http://127.0.0.1:9")
        .args(["login", "-u", "admin", "-p", "secret123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already logged in as admin."));
}

#[test]
fn test_logout_removes_session() {
    let home = tempdir().unwrap();
    write_session(home.path(), "tok");

    flogin(&home, "http://127.0.0.1:9")
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    assert!(!home.path().join("session.json").exists());

    flogin(&home, "http://127.0.0.1:9")
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn test_dashboard_without_session_points_to_login() {
    let home = tempdir().unwrap();

    flogin(&home, "http://127.0.0.1:9")
        .assert()
        .success()
        .stdout(predicate::str::contains("flogin login"));
}

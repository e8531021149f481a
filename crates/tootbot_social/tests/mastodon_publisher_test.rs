//! Mastodon publisher against a local mock server.

use chrono::Utc;
use mockito::{Matcher, Server};
use tootbot_core::MediaHandle;
use tootbot_error::{PublishErrorKind, TootbotError, TootbotErrorKind};
use tootbot_interface::Publisher;
use tootbot_social::MastodonPublisher;

const TOKEN: &str = "secret-token";

fn publisher(server: &Server) -> MastodonPublisher {
    MastodonPublisher::new(server.url(), TOKEN, 500).unwrap()
}

fn publish_kind(err: &TootbotError) -> &PublishErrorKind {
    match err.kind() {
        TootbotErrorKind::Publish(e) => &e.kind,
        other => panic!("expected a publish error, got {}", other),
    }
}

fn status_json(id: &str, created_at: &str) -> String {
    format!(
        r#"{{"id":"{id}","uri":"https://mastodon.example/users/bot/statuses/{id}","url":"https://mastodon.example/@bot/{id}","created_at":"{created_at}"}}"#
    )
}

fn page_json(statuses: &[(&str, &str)]) -> String {
    let items: Vec<String> = statuses
        .iter()
        .map(|(id, created_at)| status_json(id, created_at))
        .collect();
    format!("[{}]", items.join(","))
}

async fn mock_account(server: &mut Server) -> mockito::Mock {
    server
        .mock("GET", "/api/v1/accounts/verify_credentials")
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"42","username":"bot","url":"https://mastodon.example/@bot"}"#)
        .create_async()
        .await
}

#[test]
fn test_empty_token_is_rejected() {
    let err = MastodonPublisher::new("https://mastodon.example", "  ", 500).unwrap_err();
    assert!(matches!(publish_kind(&err), PublishErrorKind::Auth(_)));
}

#[tokio::test]
async fn test_verify_reads_account() {
    let mut server = Server::new_async().await;
    let account = mock_account(&mut server).await;

    let verified = publisher(&server).verify().await.unwrap();

    assert_eq!(verified.id(), "42");
    assert_eq!(verified.username(), "bot");
    account.assert_async().await;
}

#[tokio::test]
async fn test_refused_credentials_map_to_auth() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/accounts/verify_credentials")
        .with_status(401)
        .with_body(r#"{"error":"The access token is invalid"}"#)
        .create_async()
        .await;
    let _mock = server
        .mock("POST", "/api/v1/statuses")
        .with_status(403)
        .with_body(r#"{"error":"This action is not allowed"}"#)
        .create_async()
        .await;
    let client = publisher(&server);

    let err = client.verify().await.unwrap_err();
    assert!(matches!(publish_kind(&err), PublishErrorKind::Auth(m) if m.contains("401")));

    let err = client.publish("caption", &[], false).await.unwrap_err();
    assert!(matches!(publish_kind(&err), PublishErrorKind::Auth(m) if m.contains("403")));
}

#[tokio::test]
async fn test_publish_sends_caption_media_and_sensitive_flag() {
    let mut server = Server::new_async().await;
    let statuses = server
        .mock("POST", "/api/v1/statuses")
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("status".into(), "Cool cat https://redd.it/abc123".into()),
            Matcher::UrlEncoded("media_ids[]".into(), "m1".into()),
            Matcher::UrlEncoded("media_ids[]".into(), "m2".into()),
            Matcher::UrlEncoded("sensitive".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(status_json("7", "2026-01-01T00:00:00.000Z"))
        .create_async()
        .await;

    let published = publisher(&server)
        .publish(
            "Cool cat https://redd.it/abc123",
            &[MediaHandle("m1".to_string()), MediaHandle("m2".to_string())],
            true,
        )
        .await
        .unwrap();

    assert_eq!(published.id, "7");
    assert_eq!(published.url, "https://mastodon.example/@bot/7");
    statuses.assert_async().await;
}

#[tokio::test]
async fn test_rejected_status_maps_to_status_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v1/statuses")
        .with_status(422)
        .with_body(r#"{"error":"Validation failed: Text character limit of 500 exceeded"}"#)
        .create_async()
        .await;

    let err = publisher(&server).publish("x", &[], false).await.unwrap_err();

    assert!(matches!(publish_kind(&err), PublishErrorKind::Status(m) if m.contains("422")));
}

#[tokio::test]
async fn test_upload_sends_file_part() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cat.jpg");
    std::fs::write(&path, b"cat pixels").unwrap();

    let mut server = Server::new_async().await;
    let upload = server
        .mock("POST", "/api/v2/media")
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="cat.jpg""#.to_string()),
            Matcher::Regex("image/jpeg".to_string()),
            Matcher::Regex("cat pixels".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"m1","url":"https://files.mastodon.example/m1.jpg"}"#)
        .create_async()
        .await;

    let handle = publisher(&server).upload_media(&path).await.unwrap();

    assert_eq!(handle, MediaHandle("m1".to_string()));
    upload.assert_async().await;
}

#[tokio::test]
async fn test_upload_waits_for_processing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.mp4");
    std::fs::write(&path, b"frames").unwrap();

    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v2/media")
        .with_status(202)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"m9","url":null}"#)
        .create_async()
        .await;
    let poll = server
        .mock("GET", "/api/v1/media/m9")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"m9","url":"https://files.mastodon.example/m9.mp4"}"#)
        .expect(1)
        .create_async()
        .await;

    let handle = publisher(&server).upload_media(&path).await.unwrap();

    assert_eq!(handle, MediaHandle("m9".to_string()));
    poll.assert_async().await;
}

#[tokio::test]
async fn test_missing_upload_file_is_an_upload_error() {
    let server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let err = publisher(&server)
        .upload_media(&dir.path().join("gone.jpg"))
        .await
        .unwrap_err();

    assert!(matches!(publish_kind(&err), PublishErrorKind::Upload(_)));
}

#[tokio::test]
async fn test_deletion_stops_at_first_page_with_old_statuses() {
    let recent = Utc::now().to_rfc3339();
    let old = "2001-01-01T00:00:00Z";

    let mut server = Server::new_async().await;
    let _account = mock_account(&mut server).await;
    let first_page = server
        .mock("GET", "/api/v1/accounts/42/statuses")
        .match_query(Matcher::Exact("limit=10".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page_json(&[("s1", &recent), ("s2", &recent)]))
        .expect(1)
        .create_async()
        .await;
    let second_page = server
        .mock("GET", "/api/v1/accounts/42/statuses")
        .match_query(Matcher::Exact("limit=10&max_id=s2".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page_json(&[("s3", &recent), ("s4", old), ("s5", old)]))
        .expect(1)
        .create_async()
        .await;
    let third_page = server
        .mock("GET", "/api/v1/accounts/42/statuses")
        .match_query(Matcher::Exact("limit=10&max_id=s5".to_string()))
        .with_status(200)
        .with_body("[]")
        .expect(0)
        .create_async()
        .await;
    let keep = server
        .mock("DELETE", "/api/v1/statuses/s3")
        .expect(0)
        .create_async()
        .await;
    let delete_s4 = server
        .mock("DELETE", "/api/v1/statuses/s4")
        .with_status(200)
        .with_body(status_json("s4", old))
        .expect(1)
        .create_async()
        .await;
    let delete_s5 = server
        .mock("DELETE", "/api/v1/statuses/s5")
        .with_status(200)
        .with_body(status_json("s5", old))
        .expect(1)
        .create_async()
        .await;

    let deleted = publisher(&server).delete_older_than(7).await.unwrap();

    assert_eq!(deleted, 2);
    first_page.assert_async().await;
    second_page.assert_async().await;
    third_page.assert_async().await;
    keep.assert_async().await;
    delete_s4.assert_async().await;
    delete_s5.assert_async().await;
}

#[tokio::test]
async fn test_deletion_with_only_recent_statuses_deletes_nothing() {
    let recent = Utc::now().to_rfc3339();

    let mut server = Server::new_async().await;
    let _account = mock_account(&mut server).await;
    let _mock = server
        .mock("GET", "/api/v1/accounts/42/statuses")
        .match_query(Matcher::Exact("limit=10".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page_json(&[("s1", &recent)]))
        .create_async()
        .await;
    let end = server
        .mock("GET", "/api/v1/accounts/42/statuses")
        .match_query(Matcher::Exact("limit=10&max_id=s1".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let deleted = publisher(&server).delete_older_than(7).await.unwrap();

    assert_eq!(deleted, 0);
    end.assert_async().await;
}

#[tokio::test]
async fn test_failed_single_deletion_is_skipped() {
    let old = "2001-01-01T00:00:00Z";

    let mut server = Server::new_async().await;
    let _account = mock_account(&mut server).await;
    let _mock = server
        .mock("GET", "/api/v1/accounts/42/statuses")
        .match_query(Matcher::Exact("limit=10".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page_json(&[("s1", old), ("s2", old)]))
        .create_async()
        .await;
    let _mock = server
        .mock("DELETE", "/api/v1/statuses/s1")
        .with_status(500)
        .create_async()
        .await;
    let _mock = server
        .mock("DELETE", "/api/v1/statuses/s2")
        .with_status(200)
        .with_body(status_json("s2", old))
        .create_async()
        .await;

    let deleted = publisher(&server).delete_older_than(30).await.unwrap();

    assert_eq!(deleted, 1);
}

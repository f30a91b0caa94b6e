//! Integration tests for the HTTP reward store against a mock backend.

use std::time::Duration;

use mockito::{Matcher, Server};
use zing_core::{CoreError, HttpRewardStore, RemoteError, RewardStore};

fn store(server: &Server) -> HttpRewardStore {
    HttpRewardStore::new(&server.url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_current_points_and_streak() {
    let mut server = Server::new_async().await;
    let points = server
        .mock("GET", "/points/alice")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"username":"alice","points":140}"#)
        .create_async()
        .await;
    let streak = server
        .mock("GET", "/streak/alice")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"streak":3}"#)
        .create_async()
        .await;

    let store = store(&server);
    assert_eq!(store.current_points("alice").await.unwrap(), 140);
    assert_eq!(store.current_streak("alice").await.unwrap(), 3);
    points.assert_async().await;
    streak.assert_async().await;
}

#[tokio::test]
async fn test_add_points_sends_query_parameters() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/points/update")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), "alice".into()),
            Matcher::UrlEncoded("points".into(), "12".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Points updated. New total: 52"}"#)
        .create_async()
        .await;

    let message = store(&server).add_points("alice", 12).await.unwrap();
    assert_eq!(message, "Points updated. New total: 52");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_mark_article_read_encodes_article_url() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/news/alice/mark_as_read")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "article_url".into(),
                "https://news.example/story?id=7&ref=feed".into(),
            ),
            Matcher::UrlEncoded("readingTime".into(), "25".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Article marked as read"}"#)
        .create_async()
        .await;

    let message = store(&server)
        .mark_article_read("alice", "https://news.example/story?id=7&ref=feed", 25)
        .await
        .unwrap();
    assert_eq!(message, "Article marked as read");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_reading_statistics() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/news/alice/statistics")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"articlesRead":4,"articlesLeft":6,"readingTime":180}"#)
        .create_async()
        .await;

    let stats = store(&server).reading_statistics("alice").await.unwrap();
    assert_eq!(stats.articles_read, 4);
    assert_eq!(stats.articles_left, 6);
    assert_eq!(stats.reading_time, 180);
}

#[tokio::test]
async fn test_error_status_is_reported_with_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/points/update")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("User not found.")
        .create_async()
        .await;

    let err = store(&server).add_points("nobody", 10).await.unwrap_err();
    match err {
        RemoteError::Status {
            endpoint,
            status,
            body,
        } => {
            assert_eq!(endpoint, "add-points");
            assert_eq!(status, 404);
            assert_eq!(body, "User not found.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/streak/alice")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"days":3}"#)
        .create_async()
        .await;

    let err = store(&server).current_streak("alice").await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode { endpoint: "current-streak", .. }));
    let core: CoreError = err.into();
    assert!(core.to_string().contains("current-streak"));
}

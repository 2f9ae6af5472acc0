use super::*;
use crate::config::Config;
use crate::error::ReplyDeskError;
use crate::graph::MockSocialClient;
use crate::models::{Comment, Post};
use crate::synth::MockReplySuggester;

use axum::body::Body;
use axum::http::Request;
use mockall::predicate::eq;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app(social: MockSocialClient, suggester: MockReplySuggester) -> Router {
    let mut config = Config::default();
    config.graph.page_id = "page-1".to_string();
    let service = ReplyDeskService::new(Arc::new(social), Arc::new(suggester), &config);
    build_router(service)
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 1 << 20).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_with_id(id: &str) -> Post {
    serde_json::from_value(serde_json::json!({ "id": id, "message": format!("post {id}") }))
        .unwrap()
}

#[tokio::test]
async fn test_list_posts_passes_limit() {
    let mut social = MockSocialClient::new();
    social
        .expect_list_posts()
        .with(eq("page-1"), eq(2u32))
        .times(1)
        .returning(|_, _| Ok(vec![post_with_id("1"), post_with_id("2")]));

    let (status, json) = send(
        app(social, MockReplySuggester::new()),
        get("/api/posts?limit=2"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["id"], "1");
}

#[tokio::test]
async fn test_list_posts_empty_is_array() {
    let mut social = MockSocialClient::new();
    social.expect_list_posts().returning(|_, _| Ok(vec![]));

    let (status, json) = send(app(social, MockReplySuggester::new()), get("/api/posts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_posts_failure() {
    let mut social = MockSocialClient::new();
    social.expect_list_posts().returning(|_, _| {
        Err(ReplyDeskError::Status {
            status: 400,
            body: "Invalid OAuth access token".to_string(),
        })
    });

    let (status, json) = send(app(social, MockReplySuggester::new()), get("/api/posts")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "error": "Failed to fetch posts." }));
}

#[tokio::test]
async fn test_non_numeric_limit_fails_without_upstream_call() {
    let mut social = MockSocialClient::new();
    social.expect_list_posts().never();

    let (status, json) = send(
        app(social, MockReplySuggester::new()),
        get("/api/posts?limit=abc"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to fetch posts.");
}

#[tokio::test]
async fn test_list_comments_routes_post_id() {
    let mut social = MockSocialClient::new();
    social
        .expect_list_comments()
        .with(eq("123_456"), eq(10u32))
        .times(1)
        .returning(|_, _| {
            let comment: Comment = serde_json::from_value(serde_json::json!({
                "id": "c1",
                "message": "Love this!",
                "from": { "id": "u1", "name": "Ari" }
            }))
            .unwrap();
            Ok(vec![comment])
        });

    let (status, json) = send(
        app(social, MockReplySuggester::new()),
        get("/api/posts/123_456/comments"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["id"], "c1");
    assert_eq!(json[0]["from"]["name"], "Ari");
}

#[tokio::test]
async fn test_list_comments_failure() {
    let mut social = MockSocialClient::new();
    social.expect_list_comments().returning(|_, _| {
        Err(ReplyDeskError::Status {
            status: 404,
            body: String::new(),
        })
    });

    let (status, json) = send(
        app(social, MockReplySuggester::new()),
        get("/api/posts/unknown/comments?limit=4"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "error": "Failed to fetch comments." }));
}

#[tokio::test]
async fn test_publish_reply_success() {
    let mut social = MockSocialClient::new();
    social
        .expect_publish_reply()
        .with(eq("c123"), eq("Thanks!"))
        .times(1)
        .returning(|_, _| Ok(true));

    let (status, json) = send(
        app(social, MockReplySuggester::new()),
        post_json("/api/comments/c123/reply", r#"{"text":"Thanks!"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "success": true }));
}

#[tokio::test]
async fn test_publish_reply_failure() {
    let mut social = MockSocialClient::new();
    social.expect_publish_reply().returning(|_, _| {
        Err(ReplyDeskError::Status {
            status: 403,
            body: String::new(),
        })
    });

    let (status, json) = send(
        app(social, MockReplySuggester::new()),
        post_json("/api/comments/c123/reply", r#"{"text":"Thanks!"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "error": "Failed to reply." }));
}

#[tokio::test]
async fn test_publish_reply_malformed_body() {
    let mut social = MockSocialClient::new();
    social.expect_publish_reply().never();

    let (status, json) = send(
        app(social, MockReplySuggester::new()),
        post_json("/api/comments/c123/reply", "{oops"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to reply.");
}

#[tokio::test]
async fn test_generate_reply_success() {
    let mut suggester = MockReplySuggester::new();
    suggester
        .expect_suggest_reply()
        .with(eq("When is this available?"))
        .times(1)
        .returning(|_| Ok("Very soon! Stay tuned 🚀".to_string()));

    let (status, json) = send(
        app(MockSocialClient::new(), suggester),
        post_json("/api/generate-reply", r#"{"text":"When is this available?"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!json["reply"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_reply_missing_text_is_empty_input() {
    let mut suggester = MockReplySuggester::new();
    suggester
        .expect_suggest_reply()
        .with(eq(""))
        .times(1)
        .returning(|_| Ok(String::new()));

    let (status, json) = send(
        app(MockSocialClient::new(), suggester),
        post_json("/api/generate-reply", "{}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "reply": "" }));
}

#[tokio::test]
async fn test_generate_reply_failure() {
    let mut suggester = MockReplySuggester::new();
    suggester
        .expect_suggest_reply()
        .returning(|_| Err(ReplyDeskError::Shape("no choices".to_string())));

    let (status, json) = send(
        app(MockSocialClient::new(), suggester),
        post_json("/api/generate-reply", r#"{"text":"hi"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "error": "OpenAI error." }));
}

#[tokio::test]
async fn test_undecodable_post_id_is_generic_error() {
    let mut social = MockSocialClient::new();
    social.expect_list_comments().never();

    let (status, json) = send(
        app(social, MockReplySuggester::new()),
        get("/api/posts/%FF/comments"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "error": "Failed to fetch comments." }));
}

#[tokio::test]
async fn test_undecodable_comment_id_is_generic_error() {
    let mut social = MockSocialClient::new();
    social.expect_publish_reply().never();

    let (status, json) = send(
        app(social, MockReplySuggester::new()),
        post_json("/api/comments/%FF/reply", r#"{"text":"Thanks!"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "error": "Failed to reply." }));
}

#[tokio::test]
async fn test_generate_reply_null_text_is_empty_input() {
    let mut suggester = MockReplySuggester::new();
    suggester
        .expect_suggest_reply()
        .with(eq(""))
        .times(1)
        .returning(|_| Ok(String::new()));

    let (status, json) = send(
        app(MockSocialClient::new(), suggester),
        post_json("/api/generate-reply", r#"{"text":null}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "reply": "" }));
}

#[tokio::test]
async fn test_generate_reply_without_json_content_type() {
    let mut suggester = MockReplySuggester::new();
    suggester.expect_suggest_reply().never();

    let req = Request::builder()
        .method("POST")
        .uri("/api/generate-reply")
        .header("content-type", "text/plain")
        .body(Body::from(r#"{"text":"hi"}"#))
        .unwrap();
    let (status, json) = send(app(MockSocialClient::new(), suggester), req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "error": "OpenAI error." }));
}

#[tokio::test]
async fn test_wrong_method_is_json_405() {
    let (status, json) = send(
        app(MockSocialClient::new(), MockReplySuggester::new()),
        get("/api/generate-reply"),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json, serde_json::json!({ "error": "Method not allowed." }));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (status, json) = send(
        app(MockSocialClient::new(), MockReplySuggester::new()),
        get("/api/nope"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Not found.");
}

#[tokio::test]
async fn test_health() {
    let app = app(MockSocialClient::new(), MockReplySuggester::new());
    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), 64).await.unwrap();
    assert_eq!(&body[..], b"ok");
}

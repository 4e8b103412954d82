//! REST integration tests
//!
//! Run with: cargo test -p integration-tests --test rest_tests

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use integration_tests::*;
use revolt_client::{Client, ClientConfig, Diagnostic, EditMessage, MemorySink, SendMessage};
use revolt_common::HttpConfig;
use revolt_http::{Method, StatusCode};
use serde_json::json;

async fn rest_client(sink: Arc<MemorySink>) -> Result<(MockRest, Client)> {
    let rest = MockRest::start().await?;
    let config = ClientConfig::new(TOKEN).with_http(HttpConfig {
        api_url: rest.url(),
        ..HttpConfig::default()
    });
    let client = Client::with_sink(config, sink)?;
    Ok((rest, client))
}

// ============================================================================
// Rate Limiting
// ============================================================================

#[tokio::test]
async fn test_exhausted_bucket_delays_only_its_endpoint() -> Result<()> {
    let (rest, client) = rest_client(Arc::new(MemorySink::new())).await?;
    rest.respond(
        Method::GET,
        "/channels/123/messages",
        MockResponse::json(json!([])).ratelimited(0, 2000),
    );
    rest.respond(
        Method::GET,
        "/servers/456",
        MockResponse::json(json!({"_id": "456", "owner": "U1", "name": "S"})),
    );

    client
        .http()
        .execute(Method::GET, "/channels/123/messages", None)
        .await?;

    let http = client.http();
    let started = Instant::now();
    let (limited, other) = tokio::join!(
        async {
            http.execute(Method::GET, "/channels/123/messages", None)
                .await
                .map(|_| started.elapsed())
        },
        async {
            http.execute(Method::GET, "/servers/456", None)
                .await
                .map(|_| started.elapsed())
        },
    );

    assert!(limited? >= Duration::from_millis(1900));
    assert!(other? < Duration::from_millis(1000));

    let exchanges = rest.requests_to("/channels/123/messages");
    assert_eq!(exchanges.len(), 2);
    assert!(exchanges[1].at - exchanges[0].at >= Duration::from_millis(2000));

    client.close().await;
    Ok(())
}

#[tokio::test]
async fn test_bucket_with_quota_left_is_not_delayed() -> Result<()> {
    let (rest, client) = rest_client(Arc::new(MemorySink::new())).await?;
    rest.respond(
        Method::GET,
        "/users/@me",
        MockResponse::json(user_json(SELF_ID, "me")).ratelimited(5, 10_000),
    );

    let started = Instant::now();
    client.fetch_self().await?;
    client.fetch_self().await?;
    assert!(started.elapsed() < Duration::from_millis(1000));

    client.close().await;
    Ok(())
}

#[tokio::test]
async fn test_malformed_ratelimit_headers_reported() -> Result<()> {
    let sink = Arc::new(MemorySink::new());
    let (rest, client) = rest_client(Arc::clone(&sink)).await?;
    rest.respond(
        Method::GET,
        "/users/U1",
        MockResponse::json(user_json("U1", "one"))
            .with_header("X-RateLimit-Remaining", "many")
            .with_header("X-RateLimit-Reset-After", "1000"),
    );
    rest.respond(
        Method::GET,
        "/users/U2",
        MockResponse::json(user_json("U2", "two")).with_header("X-RateLimit-Remaining", "0"),
    );

    // The responses still decode; only the quota is ignored
    assert_eq!(client.fetch_user("U1").await?.username, "one");
    assert_eq!(client.fetch_user("U2").await?.username, "two");

    let records = sink.records();
    assert!(records
        .iter()
        .any(|d| matches!(d, Diagnostic::InvalidRateLimitHeader { value, .. } if value == "many")));
    assert!(records
        .iter()
        .any(|d| matches!(d, Diagnostic::MissingResetAfter { .. })));

    client.close().await;
    Ok(())
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_bot_token_header() -> Result<()> {
    let (rest, client) = rest_client(Arc::new(MemorySink::new())).await?;
    rest.respond(Method::GET, "/users/@me", MockResponse::json(user_json(SELF_ID, "me")));

    let me = client.fetch_self().await?;
    assert_eq!(me.id, SELF_ID);

    let request = &rest.requests()[0];
    assert_eq!(request.header("x-bot-token"), Some(TOKEN));
    assert_eq!(request.header("x-session-token"), None);
    assert!(request.header("user-agent").is_some_and(|ua| ua.starts_with("revolt-rs/")));

    client.close().await;
    Ok(())
}

#[tokio::test]
async fn test_session_token_header() -> Result<()> {
    let rest = MockRest::start().await?;
    let config = ClientConfig::new(TOKEN).selfbot(true).with_http(HttpConfig {
        api_url: rest.url(),
        ..HttpConfig::default()
    });
    let client = Client::new(config)?;
    rest.respond(Method::GET, "/users/@me", MockResponse::json(user_json(SELF_ID, "me")));

    client.fetch_self().await?;

    let request = &rest.requests()[0];
    assert_eq!(request.header("x-session-token"), Some(TOKEN));
    assert_eq!(request.header("x-bot-token"), None);

    client.close().await;
    Ok(())
}

// ============================================================================
// Messages
// ============================================================================

#[tokio::test]
async fn test_send_message_attaches_nonce() -> Result<()> {
    let (rest, client) = rest_client(Arc::new(MemorySink::new())).await?;
    let path = format!("/channels/{CHANNEL_ID}/messages");
    rest.respond(Method::POST, &path, MockResponse::json(message_json("M1", "hello")));

    let message = client
        .send_message(CHANNEL_ID, SendMessage::new("hello").reply("M0", false))
        .await?;
    assert_eq!(message.id, "M1");
    assert_eq!(message.content.as_deref(), Some("hello"));

    let body = rest.requests_to(&path)[0].body.clone().unwrap_or_default();
    assert_eq!(body["content"], "hello");
    assert_eq!(body["replies"], json!([{"id": "M0", "mention": false}]));
    let nonce = body["nonce"].as_str().unwrap_or_default();
    assert!(uuid::Uuid::parse_str(nonce).is_ok());

    client.close().await;
    Ok(())
}

#[tokio::test]
async fn test_edit_and_delete_message() -> Result<()> {
    let (rest, client) = rest_client(Arc::new(MemorySink::new())).await?;
    let path = format!("/channels/{CHANNEL_ID}/messages/M1");
    rest.respond(Method::PATCH, &path, MockResponse::json(message_json("M1", "edited")));
    rest.respond(Method::DELETE, &path, MockResponse::status(StatusCode::NO_CONTENT));

    let edited = client
        .edit_message(CHANNEL_ID, "M1", EditMessage::content("edited"))
        .await?;
    assert_eq!(edited.content.as_deref(), Some("edited"));

    client.delete_message(CHANNEL_ID, "M1").await?;

    let methods: Vec<Method> = rest.requests_to(&path).into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::PATCH, Method::DELETE]);

    client.close().await;
    Ok(())
}

#[tokio::test]
async fn test_error_status_surfaces() -> Result<()> {
    let (_rest, client) = rest_client(Arc::new(MemorySink::new())).await?;

    let err = client.fetch_channel("missing").await.unwrap_err();
    assert!(err.is_not_found());

    client.close().await;
    Ok(())
}

#[tokio::test]
async fn test_fetch_member_and_server() -> Result<()> {
    let (rest, client) = rest_client(Arc::new(MemorySink::new())).await?;
    rest.respond(
        Method::GET,
        &format!("/servers/{SERVER_ID}/members/{SELF_ID}"),
        MockResponse::json(json!({
            "_id": {"server": SERVER_ID, "user": SELF_ID},
            "nickname": "nick"
        })),
    );
    rest.respond(
        Method::GET,
        &format!("/servers/{SERVER_ID}"),
        MockResponse::json(json!({"_id": SERVER_ID, "owner": SELF_ID, "name": "Test Server"})),
    );

    let member = client.fetch_member(SERVER_ID, SELF_ID).await?;
    assert_eq!(member.nickname.as_deref(), Some("nick"));
    assert_eq!(member.id.user, SELF_ID);

    let server = client.fetch_server(SERVER_ID).await?;
    assert_eq!(server.name, "Test Server");

    client.close().await;
    Ok(())
}

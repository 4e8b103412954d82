//! Gateway integration tests
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Result};
use integration_tests::*;
use parking_lot::Mutex;
use revolt_client::{Client, ClientError, ConnectionState, Event, EventKind, MemorySink};
use revolt_gateway::GatewayError;
use serde_json::json;

const WAIT: Duration = Duration::from_secs(5);

async fn connected_client() -> Result<(MockRest, MockGateway, Client)> {
    let rest = MockRest::start().await?;
    let gateway = MockGateway::start().await?;
    let client = Client::with_sink(
        client_config(&rest, &gateway),
        Arc::new(MemorySink::new()),
    )?;
    client.open()?;

    tokio::time::timeout(
        WAIT,
        client.gateway().wait_for_state(ConnectionState::Connected),
    )
    .await?;
    let cache = client.cache().clone();
    ensure!(
        wait_until(WAIT, || cache.current_user().is_some()).await,
        "Ready never reached the cache"
    );
    Ok((rest, gateway, client))
}

#[tokio::test]
async fn test_authenticate_and_populate_cache() -> Result<()> {
    let (_rest, gateway, client) = connected_client().await?;

    assert_eq!(gateway.tokens(), vec![TOKEN.to_string()]);
    assert_eq!(
        client.cache().current_user().map(|u| u.id).as_deref(),
        Some(SELF_ID)
    );
    assert_eq!(client.cache().server_channels(SERVER_ID).len(), 1);
    assert!(client.cache().member(SERVER_ID, SELF_ID).is_some());

    client.close().await;
    assert_eq!(client.state(), ConnectionState::Disconnected);
    Ok(())
}

#[tokio::test]
async fn test_heartbeat_ping_pong() -> Result<()> {
    let (_rest, gateway, client) = connected_client().await?;

    let handle = client.gateway().clone();
    assert!(wait_until(WAIT, || handle.latency().is_some()).await);

    let pings = gateway.received_of("Ping");
    assert!(!pings.is_empty());
    assert_eq!(pings[0]["data"], 0);

    client.close().await;
    Ok(())
}

#[tokio::test]
async fn test_events_reach_cache_before_observers() -> Result<()> {
    let (_rest, gateway, client) = connected_client().await?;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    client.on(EventKind::ServerUpdate, move |ctx, _| {
        let name = ctx.cache().server(SERVER_ID).map(|s| s.name);
        log.lock().push(name);
    });

    gateway.push(&server_update_frame("Renamed"));

    assert!(wait_until(WAIT, || !seen.lock().is_empty()).await);
    assert_eq!(seen.lock()[0].as_deref(), Some("Renamed"));

    client.close().await;
    Ok(())
}

#[tokio::test]
async fn test_bulk_and_unknown_frames() -> Result<()> {
    let (_rest, gateway, client) = connected_client().await?;

    let kinds = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&kinds);
    client.on_all(move |_, event| match event {
        // Heartbeat acks arrive on their own schedule
        Event::Pong(_) => {}
        Event::Unknown { kind, .. } => log.lock().push(kind.clone()),
        _ => log.lock().push(event.type_name().to_string()),
    });

    gateway.push(&json!({
        "type": "Bulk",
        "v": [
            server_update_frame("First"),
            {"type": "SomethingNew", "id": "X"},
            server_update_frame("Second")
        ]
    }));

    assert!(wait_until(WAIT, || kinds.lock().len() == 3).await);
    assert_eq!(
        *kinds.lock(),
        vec!["ServerUpdate", "SomethingNew", "ServerUpdate"]
    );
    assert_eq!(
        client.cache().server(SERVER_ID).map(|s| s.name).as_deref(),
        Some("Second")
    );

    client.close().await;
    Ok(())
}

#[tokio::test]
async fn test_reconnect_after_server_drop() -> Result<()> {
    let (_rest, gateway, client) = connected_client().await?;

    let mut changes = client.gateway().state_changes();
    gateway.disconnect_all();

    tokio::time::timeout(
        WAIT,
        changes.wait_for(|state| *state == ConnectionState::Reconnecting),
    )
    .await??;
    tokio::time::timeout(
        WAIT,
        changes.wait_for(|state| *state == ConnectionState::Connected),
    )
    .await??;

    assert_eq!(gateway.connections(), 2);
    assert_eq!(gateway.tokens().len(), 2);

    client.close().await;
    Ok(())
}

#[tokio::test]
async fn test_unanswered_heartbeat_forces_reconnect() -> Result<()> {
    let (_rest, gateway, client) = connected_client().await?;
    gateway.set_answer_pings(false);

    assert!(wait_until(WAIT, || gateway.connections() >= 2).await);

    client.close().await;
    Ok(())
}

#[tokio::test]
async fn test_typing_frames_sent() -> Result<()> {
    let (_rest, gateway, client) = connected_client().await?;

    client.begin_typing(CHANNEL_ID).await?;
    client.end_typing(CHANNEL_ID).await?;

    assert!(wait_until(WAIT, || !gateway.received_of("EndTyping").is_empty()).await);
    assert_eq!(gateway.received_of("BeginTyping")[0]["channel"], CHANNEL_ID);

    client.close().await;
    Ok(())
}

#[tokio::test]
async fn test_closed_client_cannot_reopen() -> Result<()> {
    let (_rest, _gateway, client) = connected_client().await?;

    client.close().await;

    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert!(matches!(
        client.open(),
        Err(ClientError::Gateway(GatewayError::Closed))
    ));
    assert!(matches!(
        client.begin_typing(CHANNEL_ID).await,
        Err(ClientError::Gateway(GatewayError::NotConnected))
    ));
    Ok(())
}

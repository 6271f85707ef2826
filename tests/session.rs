// Session behavior against an unreachable backend: every contract here is
// about state the core must keep (or refuse to touch) when fetches fail.

use aurascan::{
    app::{App, LoadStatus},
    config::Config,
    types::{AppEvent, ChannelState, WsPayload},
    views::ResourceKind,
};
use serde_json::json;

fn unreachable_config() -> Config {
    Config {
        // Discard port; connections are refused immediately.
        api_url: "http://127.0.0.1:9".to_string(),
        ws_url: "ws://127.0.0.1:9/ws".to_string(),
        cache_ttl_ms: 5000,
        poll_interval_ms: 10000,
        reconnect_delay_ms: 5000,
        page_size: 20,
        fetch_timeout_ms: 1000,
        fetch_retries: 0,
    }
}

#[tokio::test]
async fn failed_fetch_degrades_pane_explicitly() {
    let mut app = App::new(&unreachable_config());
    app.refresh(ResourceKind::Blocks).await;

    match &app.blocks().status {
        LoadStatus::Failed(msg) => assert!(msg.contains("transport")),
        other => panic!("expected failed pane, got {other:?}"),
    }
    // The failure is isolated: no other pane was touched.
    assert_eq!(app.transactions().status, LoadStatus::Idle);
    assert_eq!(app.stats().status, LoadStatus::Idle);
}

#[tokio::test]
async fn search_transport_failure_is_not_downgraded_to_not_found() {
    let app = App::new(&unreachable_config());
    let result = app.search("12345").await;
    assert!(result.is_err(), "transport failure must surface as an error");
}

#[tokio::test]
async fn prev_page_at_first_page_is_a_complete_noop() {
    let mut app = App::new(&unreachable_config());
    app.prev_page(ResourceKind::Blocks).await;

    assert_eq!(app.page(ResourceKind::Blocks), 1);
    // No fetch was issued: the pane never left its initial state.
    assert_eq!(app.blocks().status, LoadStatus::Idle);
}

#[tokio::test]
async fn pagination_walk_survives_fetch_failures() {
    let mut app = App::new(&unreachable_config());
    app.next_page(ResourceKind::Blocks).await;
    app.next_page(ResourceKind::Blocks).await;
    app.next_page(ResourceKind::Blocks).await;
    assert_eq!(app.page(ResourceKind::Blocks), 4);

    app.prev_page(ResourceKind::Blocks).await;
    assert_eq!(app.page(ResourceKind::Blocks), 3);
}

#[tokio::test]
async fn new_block_push_off_first_page_skips_blocks_refetch() {
    let mut app = App::new(&unreachable_config());
    app.next_page(ResourceKind::Blocks).await; // now on page 2, pane Failed
    let before = app.blocks().status.clone();

    app.handle_event(AppEvent::FromWs(WsPayload::NewBlock(json!({"height": 5}))))
        .await;

    // Stats refresh was attempted (and failed), blocks were left alone.
    assert!(matches!(app.stats().status, LoadStatus::Failed(_)));
    assert_eq!(app.blocks().status, before);
    assert_eq!(app.page(ResourceKind::Blocks), 2);
}

#[tokio::test]
async fn filter_change_resets_page() {
    let mut app = App::new(&unreachable_config());
    app.next_page(ResourceKind::Transactions).await;
    app.next_page(ResourceKind::Transactions).await;
    app.set_filter(ResourceKind::Transactions, "status", "failed")
        .await;
    assert_eq!(app.page(ResourceKind::Transactions), 1);
}

#[tokio::test]
async fn channel_status_events_update_state() {
    let mut app = App::new(&unreachable_config());
    assert_eq!(app.channel_state(), ChannelState::Connecting);

    app.handle_event(AppEvent::ChannelStatus(ChannelState::Connected))
        .await;
    assert_eq!(app.channel_state(), ChannelState::Connected);

    app.handle_event(AppEvent::ChannelStatus(ChannelState::Errored))
        .await;
    assert_eq!(app.channel_state(), ChannelState::Errored);
}

//! Push channel to the explorer backend.
//!
//! Owns the websocket connection for the lifetime of the session:
//! connect, subscribe, receive, and on any close or error reconnect after
//! a fixed delay, forever. Subscriptions are not persisted server-side, so
//! they are resent every time the connection is (re-)established, before
//! any inbound traffic is processed.

use crate::{
    config::Config,
    error::ChannelError,
    types::{AppEvent, ChannelState, WsPayload, WsRequest},
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::UnboundedSender;
use tokio_tungstenite::connect_async;
use tungstenite::protocol::Message;

/// Channels the session subscribes to on every connect.
pub const SUBSCRIBED_CHANNELS: [&str; 2] = ["blocks", "transactions"];

/// Parse one inbound frame. `None` means the frame was malformed; the
/// caller logs and moves on, one bad frame never takes the channel down.
pub fn parse_frame(text: &str) -> Option<WsPayload> {
    serde_json::from_str::<WsPayload>(text).ok()
}

/// Runs the channel until the session ends. Never returns under normal
/// operation; every disconnect or error schedules a reconnect attempt
/// after the configured fixed delay.
pub async fn run_channel(cfg: Config, tx: UnboundedSender<AppEvent>) {
    let delay = std::time::Duration::from_millis(cfg.reconnect_delay_ms);
    loop {
        let _ = tx.send(AppEvent::ChannelStatus(ChannelState::Connecting));
        match connect_and_stream(&cfg.ws_url, &tx).await {
            Ok(()) => {
                log::info!("[ws] channel closed by server");
                let _ = tx.send(AppEvent::ChannelStatus(ChannelState::Disconnected));
            }
            Err(e) => {
                log::warn!("[ws] {e}");
                let _ = tx.send(AppEvent::ChannelStatus(ChannelState::Errored));
            }
        }
        log::info!("[ws] reconnecting in {}ms", cfg.reconnect_delay_ms);
        tokio::time::sleep(delay).await;
    }
}

async fn connect_and_stream(
    ws_url: &str,
    tx: &UnboundedSender<AppEvent>,
) -> Result<(), ChannelError> {
    let (ws, _) = connect_async(ws_url)
        .await
        .map_err(|e| ChannelError(format!("connect {ws_url}: {e}")))?;
    let (mut ws_write, mut ws_read) = ws.split();

    let _ = tx.send(AppEvent::ChannelStatus(ChannelState::Connected));

    for channel in SUBSCRIBED_CHANNELS {
        let frame = WsRequest::subscribe(channel).to_json();
        ws_write
            .send(Message::Text(frame))
            .await
            .map_err(|e| ChannelError(format!("subscribe {channel}: {e}")))?;
    }
    log::info!("[ws] connected, subscriptions sent");

    while let Some(msg) = ws_read.next().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => return Err(ChannelError(format!("receive: {e}"))),
        };
        if !msg.is_text() {
            continue;
        }
        let text = msg.into_text().unwrap_or_default();
        match parse_frame(&text) {
            Some(WsPayload::Unknown) => {
                log::debug!("[ws] ignoring unknown frame: {text}");
            }
            Some(payload) => {
                let _ = tx.send(AppEvent::FromWs(payload));
            }
            None => {
                log::warn!("[ws] malformed frame: {text}");
            }
        }
    }
    Ok(())
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server -> client push frame. Every frame carries a `type` discriminator
/// and a `data` payload; the discriminator set is open, so anything we do
/// not recognize decodes as `Unknown` and is ignored upstream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsPayload {
    #[serde(rename = "new_block")]
    NewBlock(Value),
    #[serde(rename = "new_transaction")]
    NewTransaction(Value),
    /// Subscription acknowledgement; no state change.
    #[serde(rename = "subscribed")]
    Subscribed { channel: String },
    Unknown,
}

// Manual impl because `#[serde(other)]` in an adjacently tagged enum only
// accepts a unit `data` payload, which would reject unknown frames that
// carry a body instead of mapping them to `Unknown`.
impl<'de> Deserialize<'de> for WsPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Frame {
            #[serde(rename = "type")]
            kind: String,
            data: Option<Value>,
        }

        let frame = Frame::deserialize(deserializer)?;
        let data = |frame: Frame| {
            frame
                .data
                .ok_or_else(|| serde::de::Error::missing_field("data"))
        };
        Ok(match frame.kind.as_str() {
            "new_block" => WsPayload::NewBlock(data(frame)?),
            "new_transaction" => WsPayload::NewTransaction(data(frame)?),
            "subscribed" => {
                #[derive(Deserialize)]
                struct Ack {
                    channel: String,
                }
                let ack: Ack =
                    serde_json::from_value(data(frame)?).map_err(serde::de::Error::custom)?;
                WsPayload::Subscribed {
                    channel: ack.channel,
                }
            }
            _ => WsPayload::Unknown,
        })
    }
}

/// Client -> server frame.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum WsRequest {
    Subscribe { channel: String },
}

impl WsRequest {
    pub fn subscribe(channel: &str) -> Self {
        WsRequest::Subscribe {
            channel: channel.to_string(),
        }
    }

    pub fn to_json(&self) -> String {
        // Serialization of these frames cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Lifecycle of the push connection, surfaced to the presentation layer as
/// the connection status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Connected,
    Disconnected,
    Errored,
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelState::Connecting => write!(f, "connecting"),
            ChannelState::Connected => write!(f, "connected"),
            ChannelState::Disconnected => write!(f, "disconnected"),
            ChannelState::Errored => write!(f, "error"),
        }
    }
}

/// Events delivered to the session loop over the app channel.
#[derive(Debug, Clone)]
pub enum AppEvent {
    FromWs(WsPayload),
    ChannelStatus(ChannelState),
    PollTick,
    Quit,
}

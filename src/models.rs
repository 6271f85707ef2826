//! Response records for the explorer REST API.
//!
//! The backend omits fields it cannot compute (e.g. proposer on a pruned
//! block), so every optional field defaults instead of failing the decode.
//! Absent optionals are a display concern, never an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockRow {
    pub height: u64,
    #[serde(default)]
    pub hash: String,
    /// ISO-8601 block time as reported by the backend.
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub proposer: Option<String>,
    #[serde(default)]
    pub num_txs: u64,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlocksPage {
    #[serde(default)]
    pub blocks: Vec<BlockRow>,
    #[serde(default)]
    pub latest_height: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TxRow {
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub height: u64,
    /// Friendly message type ("Send", "Delegate", ...).
    #[serde(default, rename = "type")]
    pub tx_type: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    /// "success" or "failed".
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub fee: Option<String>,
    #[serde(default)]
    pub time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TxsPage {
    #[serde(default)]
    pub transactions: Vec<TxRow>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorRow {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub moniker: String,
    #[serde(default)]
    pub voting_power: u64,
    #[serde(default)]
    pub commission: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub jailed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorsPage {
    #[serde(default)]
    pub validators: Vec<ValidatorRow>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallyResult {
    #[serde(default)]
    pub yes: String,
    #[serde(default)]
    pub no: String,
    #[serde(default)]
    pub abstain: String,
    #[serde(default)]
    pub no_with_veto: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProposalRow {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub submit_time: Option<String>,
    #[serde(default)]
    pub voting_end_time: Option<String>,
    #[serde(default)]
    pub tally: Option<TallyResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProposalsPage {
    #[serde(default)]
    pub proposals: Vec<ProposalRow>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Aggregate counters for the dashboard header. Refreshed on every poll
/// tick and on every `new_block` push event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSummary {
    #[serde(default)]
    pub latest_block: Option<u64>,
    #[serde(default)]
    pub latest_block_time: Option<String>,
    #[serde(default)]
    pub avg_block_time: Option<f64>,
    #[serde(default)]
    pub total_txs: Option<u64>,
    #[serde(default)]
    pub active_validators: Option<u64>,
}

/// Relative "3m ago" rendering of an ISO-8601 timestamp, for list rows.
/// Falls back to the raw string when the backend sent something odd.
pub fn format_when(iso: &str) -> String {
    let Ok(parsed) = iso.parse::<DateTime<Utc>>() else {
        return iso.to_string();
    };
    let delta = Utc::now().signed_duration_since(parsed);
    let secs = delta.num_seconds();
    if secs < 0 {
        return "now".to_string();
    }
    match secs {
        0..=59 => format!("{secs}s ago"),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86_399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn block_row_tolerates_missing_optionals() {
        let row: BlockRow = serde_json::from_value(json!({"height": 12, "hash": "AB"})).unwrap();
        assert_eq!(row.height, 12);
        assert_eq!(row.proposer, None);
        assert_eq!(row.num_txs, 0);
    }

    #[test]
    fn tx_row_maps_type_field() {
        let row: TxRow = serde_json::from_value(json!({
            "hash": "DEAD",
            "height": 5,
            "type": "Send",
            "status": "success"
        }))
        .unwrap();
        assert_eq!(row.tx_type, "Send");
        assert_eq!(row.fee, None);
    }

    #[test]
    fn format_when_passes_through_garbage() {
        assert_eq!(format_when("not-a-time"), "not-a-time");
    }

    #[test]
    fn format_when_renders_relative_buckets() {
        let minute_ago = (Utc::now() - chrono::Duration::seconds(90)).to_rfc3339();
        assert_eq!(format_when(&minute_ago), "1m ago");

        let hours_ago = (Utc::now() - chrono::Duration::hours(3)).to_rfc3339();
        assert_eq!(format_when(&hours_ago), "3h ago");

        let future = (Utc::now() + chrono::Duration::seconds(30)).to_rfc3339();
        assert_eq!(format_when(&future), "now");
    }
}

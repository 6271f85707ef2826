//! Free-text search resolver.
//!
//! Classifies a query into the one entity kind it can denote, then issues
//! exactly that lookup. Results are produced fresh on every call and are
//! never cached. "No match" and "lookup failed" are distinct outcomes:
//! the first is a normal displayable result, the second propagates as an
//! error the caller renders as a failure.

use crate::api::ExplorerApi;
use crate::error::FetchError;
use serde_json::Value;

/// What a query string can denote. First match wins, in this order:
/// decimal digits -> block height, 64 hex chars (optional `0x`) -> tx
/// hash, anything else non-empty -> address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchKind {
    BlockHeight(u64),
    /// Normalized: uppercase hex with a `0x` prefix.
    TxHash(String),
    Address(String),
}

#[derive(Debug, Clone)]
pub enum SearchResult {
    Block { height: u64, data: Value },
    Transaction { hash: String, data: Value },
    Address { address: String, data: Value },
    NotFound { query: String },
}

pub fn classify(query: &str) -> Option<SearchKind> {
    let q = query.trim();
    if q.is_empty() {
        return None;
    }

    if q.bytes().all(|b| b.is_ascii_digit()) {
        // Absurdly long digit runs overflow u64 and fall through to the
        // address arm rather than failing the whole search.
        if let Ok(height) = q.parse::<u64>() {
            return Some(SearchKind::BlockHeight(height));
        }
    }

    let bare = q.strip_prefix("0x").or_else(|| q.strip_prefix("0X")).unwrap_or(q);
    if bare.len() == 64 && bare.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Some(SearchKind::TxHash(format!("0x{}", bare.to_uppercase())));
    }

    Some(SearchKind::Address(q.to_string()))
}

pub async fn resolve(api: &ExplorerApi, query: &str) -> Result<SearchResult, FetchError> {
    let Some(kind) = classify(query) else {
        return Ok(SearchResult::NotFound {
            query: query.to_string(),
        });
    };

    log::debug!("[search] {query:?} classified as {kind:?}");

    match kind {
        SearchKind::BlockHeight(height) => match api.block_by_height(height).await? {
            Some(data) => Ok(SearchResult::Block { height, data }),
            None => Ok(SearchResult::NotFound {
                query: query.to_string(),
            }),
        },
        SearchKind::TxHash(hash) => match api.transaction_by_hash(&hash).await? {
            Some(data) => Ok(SearchResult::Transaction { hash, data }),
            None => Ok(SearchResult::NotFound {
                query: query.to_string(),
            }),
        },
        SearchKind::Address(address) => match api.account(&address).await? {
            Some(data) => Ok(SearchResult::Address { address, data }),
            None => Ok(SearchResult::NotFound {
                query: query.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0c1d2e3f4a5b6c7d8e9f0a1b2";

    #[test]
    fn digits_classify_as_block_height() {
        assert_eq!(classify("12345"), Some(SearchKind::BlockHeight(12345)));
        assert_eq!(classify("  42  "), Some(SearchKind::BlockHeight(42)));
    }

    #[test]
    fn hex64_classifies_as_tx_hash_with_normalization() {
        let expected = format!("0x{}", HASH.to_uppercase());
        assert_eq!(
            classify(&format!("0x{HASH}")),
            Some(SearchKind::TxHash(expected.clone()))
        );
        // Bare 64-hex also counts, and is given the 0x prefix.
        assert_eq!(classify(HASH), Some(SearchKind::TxHash(expected)));
    }

    #[test]
    fn anything_else_is_an_address() {
        assert_eq!(
            classify("aura1qqpex2s5j2k3l4m5n6o7p8q9r0s1t2u3v4w5x"),
            Some(SearchKind::Address(
                "aura1qqpex2s5j2k3l4m5n6o7p8q9r0s1t2u3v4w5x".to_string()
            ))
        );
        // 63 hex chars is not a hash.
        assert_eq!(
            classify(&HASH[..63]),
            Some(SearchKind::Address(HASH[..63].to_string()))
        );
        // Hex-ish but with a non-hex char.
        let bad = format!("{}g", &HASH[..63]);
        assert_eq!(classify(&bad), Some(SearchKind::Address(bad.clone())));
    }

    #[test]
    fn digit_overflow_falls_through_to_address() {
        let huge = "9".repeat(30);
        assert_eq!(classify(&huge), Some(SearchKind::Address(huge.clone())));
    }

    #[test]
    fn empty_query_classifies_as_nothing() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
    }

    #[test]
    fn height_wins_over_address() {
        // A numeric string never reaches the address arm.
        assert_eq!(classify("100"), Some(SearchKind::BlockHeight(100)));
    }
}

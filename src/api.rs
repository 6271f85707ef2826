//! Fetch gateway over the explorer REST API.
//!
//! Every listing request goes through the cache: a valid entry is served
//! as-is, a miss issues the HTTP call and writes the result back before
//! returning it. Detail lookups used by search bypass the cache entirely.
//!
//! Concurrent calls with the same signature are NOT coalesced; each caller
//! issues its own request and the last completed write to the cache wins.

use crate::cache::{CacheStore, QuerySignature};
use crate::error::FetchError;
use crate::models::{BlocksPage, ProposalsPage, StatsSummary, TxsPage, ValidatorsPage};
use crate::views::ResourceView;
use rand::Rng;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const STATS_SIGNATURE: &str = "/api/stats";
pub const VALIDATORS_SIGNATURE: &str = "/api/validators";

pub struct ExplorerApi {
    base_url: String,
    client: reqwest::Client,
    cache: Arc<CacheStore>,
    timeout: Duration,
    retries: u8,
}

impl ExplorerApi {
    pub fn new(base_url: &str, cache: Arc<CacheStore>, timeout_ms: u64, retries: u8) -> Self {
        ExplorerApi {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            cache,
            timeout: Duration::from_millis(timeout_ms),
            retries,
        }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Cache-checked fetch: serve a valid cached payload, otherwise issue
    /// the request and populate the cache before returning.
    pub async fn fetch_cached(&self, sig: &QuerySignature) -> Result<Value, FetchError> {
        if let Some(hit) = self.cache.get(sig) {
            log::debug!("[api] cache hit {sig}");
            return Ok(hit);
        }
        let value = self.get_json(sig.as_str()).await?;
        self.cache.put(sig, value.clone());
        Ok(value)
    }

    pub async fn list_blocks(&self, view: &ResourceView) -> Result<BlocksPage, FetchError> {
        let value = self.fetch_cached(&view.signature()).await?;
        serde_json::from_value(value).map_err(FetchError::decode)
    }

    pub async fn list_transactions(&self, view: &ResourceView) -> Result<TxsPage, FetchError> {
        let value = self.fetch_cached(&view.signature()).await?;
        serde_json::from_value(value).map_err(FetchError::decode)
    }

    pub async fn list_proposals(&self, view: &ResourceView) -> Result<ProposalsPage, FetchError> {
        let value = self.fetch_cached(&view.signature()).await?;
        serde_json::from_value(value).map_err(FetchError::decode)
    }

    /// Validators are fetched whole; they carry no pagination state.
    pub async fn validators(&self) -> Result<ValidatorsPage, FetchError> {
        let sig = QuerySignature::new(VALIDATORS_SIGNATURE);
        let value = self.fetch_cached(&sig).await?;
        serde_json::from_value(value).map_err(FetchError::decode)
    }

    pub async fn stats(&self) -> Result<StatsSummary, FetchError> {
        let sig = QuerySignature::new(STATS_SIGNATURE);
        let value = self.fetch_cached(&sig).await?;
        serde_json::from_value(value).map_err(FetchError::decode)
    }

    /// Detail lookups below are produced fresh on every call (search is
    /// never cached). A 404 maps to `Ok(None)`; any other failure is a
    /// transport error the caller must surface, not a "no results".
    pub async fn block_by_height(&self, height: u64) -> Result<Option<Value>, FetchError> {
        self.get_json_opt(&format!("/api/blocks/{height}")).await
    }

    pub async fn transaction_by_hash(&self, hash: &str) -> Result<Option<Value>, FetchError> {
        self.get_json_opt(&format!("/api/transactions/{}", segment(hash)))
            .await
    }

    pub async fn account(&self, address: &str) -> Result<Option<Value>, FetchError> {
        self.get_json_opt(&format!("/api/account/{}", segment(address)))
            .await
    }

    async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        let response = self.send_with_retry(path).await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Transport(format!(
                "GET {path} failed ({status}): {body}"
            )));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(format!("GET {path}: {e}")))
    }

    async fn get_json_opt(&self, path: &str) -> Result<Option<Value>, FetchError> {
        let response = self.send_with_retry(path).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(FetchError::Transport(format!("GET {path} failed ({status})")));
        }
        response
            .json::<Value>()
            .await
            .map(Some)
            .map_err(|e| FetchError::Decode(format!("GET {path}: {e}")))
    }

    /// GET with small jittered backoff on 429 and connection failures.
    async fn send_with_retry(&self, path: &str) -> Result<reqwest::Response, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0u8;
        loop {
            let result = self
                .client
                .get(&url)
                .timeout(self.timeout)
                .send()
                .await;
            match result {
                Ok(r) => {
                    if r.status().as_u16() == 429 && attempt < self.retries {
                        attempt += 1;
                        let back_ms = backoff_delay_ms(attempt);
                        log::warn!("[api] 429 {path} retry={attempt} backoff={back_ms}ms");
                        tokio::time::sleep(Duration::from_millis(back_ms)).await;
                        continue;
                    }
                    return Ok(r);
                }
                Err(e) => {
                    if attempt < self.retries {
                        attempt += 1;
                        let back_ms = backoff_delay_ms(attempt);
                        log::warn!("[api] err {path} retry={attempt} backoff={back_ms}ms : {e}");
                        tokio::time::sleep(Duration::from_millis(back_ms)).await;
                        continue;
                    }
                    return Err(FetchError::transport(e));
                }
            }
        }
    }
}

fn backoff_delay_ms(attempt: u8) -> u64 {
    let base = 300u64.saturating_mul(1u64 << (attempt.min(5) - 1)); // 300,600,1200,2400,4800,9600
    let jitter: u64 = rand::thread_rng().gen_range(0..=250);
    base + jitter
}

/// Percent-encode a user-supplied identifier used as a URL path segment,
/// so a query containing `/`, `?` or `#` cannot reshape the request.
fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_with_attempts() {
        let first = backoff_delay_ms(1);
        let third = backoff_delay_ms(3);
        assert!((300..=550).contains(&first));
        assert!((1200..=1450).contains(&third));
    }

    #[test]
    fn path_segment_cannot_reshape_the_request() {
        assert_eq!(segment("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(segment("aura1qqpex2s5j2k3l4m5n"), "aura1qqpex2s5j2k3l4m5n");
    }
}

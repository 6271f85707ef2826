use anyhow::{anyhow, Result};
use clap::Parser;
use std::env;

/// Aurascan - AURA Block Explorer Client
///
/// Terminal client for the AURA explorer backend with live updates.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "aurascan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AURA Block Explorer Client", long_about = None)]
pub struct CliArgs {
    /// Explorer backend base URL
    #[arg(long, env = "API_URL")]
    pub api_url: Option<String>,

    /// Explorer push channel URL
    #[arg(long, env = "WS_URL")]
    pub ws_url: Option<String>,

    /// Cache TTL in milliseconds (100-60000)
    #[arg(long, env = "CACHE_TTL_MS")]
    pub cache_ttl_ms: Option<u64>,

    /// Poll interval in milliseconds (1000-120000)
    #[arg(long, env = "POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,

    /// Push channel reconnect delay in milliseconds (500-60000)
    #[arg(long, env = "RECONNECT_DELAY_MS")]
    pub reconnect_delay_ms: Option<u64>,

    /// Rows per page for listings (1-50)
    #[arg(long, env = "PAGE_SIZE")]
    pub page_size: Option<u64>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "FETCH_TIMEOUT_MS")]
    pub fetch_timeout_ms: Option<u64>,

    /// Number of retry attempts for failed HTTP requests (0-10)
    #[arg(long, env = "FETCH_RETRIES")]
    pub fetch_retries: Option<u8>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub ws_url: String,
    pub cache_ttl_ms: u64,
    pub poll_interval_ms: u64,
    pub reconnect_delay_ms: u64,
    pub page_size: u64,
    pub fetch_timeout_ms: u64,
    pub fetch_retries: u8,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Load configuration from CLI args and environment variables
/// Priority: CLI args > Environment variables > Defaults
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

pub fn from_args(args: CliArgs) -> Result<Config> {
    let api_url = args
        .api_url
        .or_else(|| env::var("API_URL").ok())
        .unwrap_or_else(|| "http://localhost:8082".to_string());
    validate_url(&api_url, "API_URL")?;
    // Trailing slash would double up when endpoint paths are appended.
    let api_url = api_url.trim_end_matches('/').to_string();

    let ws_url = args
        .ws_url
        .or_else(|| env::var("WS_URL").ok())
        .unwrap_or_else(|| "ws://localhost:8082/ws".to_string());
    validate_url(&ws_url, "WS_URL")?;

    let cache_ttl_ms = args
        .cache_ttl_ms
        .or_else(|| env::var("CACHE_TTL_MS").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(5000);
    let cache_ttl_ms = validate_in_range(cache_ttl_ms, 100, 60000, "CACHE_TTL_MS")?;

    let poll_interval_ms = args
        .poll_interval_ms
        .or_else(|| {
            env::var("POLL_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
        })
        .unwrap_or(10000);
    let poll_interval_ms =
        validate_in_range(poll_interval_ms, 1000, 120_000, "POLL_INTERVAL_MS")?;

    let reconnect_delay_ms = args
        .reconnect_delay_ms
        .or_else(|| {
            env::var("RECONNECT_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
        })
        .unwrap_or(5000);
    let reconnect_delay_ms =
        validate_in_range(reconnect_delay_ms, 500, 60000, "RECONNECT_DELAY_MS")?;

    let page_size = args
        .page_size
        .or_else(|| env::var("PAGE_SIZE").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(20);
    let page_size = validate_in_range(page_size, 1, 50, "PAGE_SIZE")?;

    let fetch_timeout_ms = args
        .fetch_timeout_ms
        .or_else(|| {
            env::var("FETCH_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
        })
        .unwrap_or(8000);
    let fetch_timeout_ms =
        validate_in_range(fetch_timeout_ms, 1000, 60000, "FETCH_TIMEOUT_MS")?;

    let fetch_retries = args
        .fetch_retries
        .or_else(|| env::var("FETCH_RETRIES").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(2);
    let fetch_retries = validate_in_range(fetch_retries, 0, 10, "FETCH_RETRIES")?;

    Ok(Config {
        api_url,
        ws_url,
        cache_ttl_ms,
        poll_interval_ms,
        reconnect_delay_ms,
        page_size,
        fetch_timeout_ms,
        fetch_retries,
    })
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }

    // Basic scheme validation
    if url.starts_with("ws://")
        || url.starts_with("wss://")
        || url.starts_with("http://")
        || url.starts_with("https://")
    {
        Ok(())
    } else {
        Err(anyhow!(
            "{name} must start with ws://, wss://, http://, or https://"
        ))
    }
}

/// Print current configuration (useful for debugging)
impl Config {
    pub fn print_summary(&self) {
        eprintln!("Aurascan Configuration:");
        eprintln!("  API URL: {}", self.api_url);
        eprintln!("  WS URL: {}", self.ws_url);
        eprintln!("  Cache TTL: {}ms", self.cache_ttl_ms);
        eprintln!("  Poll Interval: {}ms", self.poll_interval_ms);
        eprintln!("  Reconnect Delay: {}ms", self.reconnect_delay_ms);
        eprintln!("  Page Size: {}", self.page_size);
        eprintln!("  Fetch Timeout: {}ms", self.fetch_timeout_ms);
        eprintln!("  Fetch Retries: {}", self.fetch_retries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs {
            api_url: None,
            ws_url: None,
            cache_ttl_ms: None,
            poll_interval_ms: None,
            reconnect_delay_ms: None,
            page_size: None,
            fetch_timeout_ms: None,
            fetch_retries: None,
        }
    }

    #[test]
    fn defaults_are_applied() {
        let cfg = from_args(empty_args()).unwrap();
        assert_eq!(cfg.cache_ttl_ms, 5000);
        assert_eq!(cfg.poll_interval_ms, 10000);
        assert_eq!(cfg.reconnect_delay_ms, 5000);
        assert_eq!(cfg.page_size, 20);
    }

    #[test]
    fn api_url_trailing_slash_is_trimmed() {
        let mut args = empty_args();
        args.api_url = Some("http://example.com:8082/".to_string());
        let cfg = from_args(args).unwrap();
        assert_eq!(cfg.api_url, "http://example.com:8082");
    }

    #[test]
    fn rejects_out_of_range_page_size() {
        let mut args = empty_args();
        args.page_size = Some(500);
        assert!(from_args(args).is_err());
    }

    #[test]
    fn rejects_bad_url_scheme() {
        let mut args = empty_args();
        args.ws_url = Some("ftp://example.com".to_string());
        assert!(from_args(args).is_err());
    }
}

//! Aurascan - AURA Block Explorer Client
//!
//! Client-side core for presenting a continuously-changing ledger
//! (blocks, transactions, validators, governance proposals) while
//! minimizing redundant network calls and staying consistent with a live
//! event stream.
//!
//! ## Architecture
//!
//! Two independent freshness sources feed one read cache:
//! - a fixed-interval poll scheduler that refreshes only the pages the
//!   user is currently viewing, plus summary statistics
//! - a websocket push channel whose events invalidate cache entries and
//!   conditionally trigger immediate re-fetches
//!
//! Paginated/filtered queries and the free-text search resolver sit on
//! top of the same fetch gateway.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod poller;
pub mod search;
pub mod source_ws;
pub mod types;
pub mod views;

// Re-export commonly used types
pub use app::{App, LoadStatus, Pane};
pub use cache::{CacheStore, QuerySignature};
pub use config::Config;
pub use error::{ChannelError, FetchError};
pub use search::{SearchKind, SearchResult};
pub use types::{AppEvent, ChannelState, WsPayload};
pub use views::{ResourceKind, ResourceView};

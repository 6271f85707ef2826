//! Session object tying the core together.
//!
//! Owns the cache, the per-resource views, the latest fetched pages and
//! the push-channel status. All mutation happens on the session task via
//! `handle_event` and the imperative triggers (`next_page`, `prev_page`,
//! `set_filter`, `search`) the presentation layer calls. The session never
//! reaches into presentation state; it only exposes current page data and
//! status for the presentation layer to read.

use crate::api::{ExplorerApi, STATS_SIGNATURE};
use crate::cache::{CacheStore, QuerySignature};
use crate::config::Config;
use crate::error::FetchError;
use crate::models::{BlocksPage, ProposalsPage, StatsSummary, TxsPage, ValidatorsPage};
use crate::search::{self, SearchResult};
use crate::types::{AppEvent, ChannelState, WsPayload};
use crate::views::{ResourceKind, ResourceView};
use std::sync::Arc;

/// Load status of one pane, so the presentation layer can tell "stale or
/// blank" apart from "explicitly failed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct Pane<T> {
    pub data: T,
    pub status: LoadStatus,
}

/// One unit of refresh work derived from a push event or a poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Resource(ResourceKind),
    Stats,
}

/// Refresh plan for one inbound push payload. Page-1-only rule: a change
/// announcement refreshes a listing only when the user is looking at its
/// first page; deeper pages stay as they are until navigated.
pub fn push_refresh_plan(
    payload: &WsPayload,
    blocks_on_first_page: bool,
    txs_on_first_page: bool,
) -> Vec<Refresh> {
    match payload {
        WsPayload::NewBlock(_) => {
            let mut plan = Vec::new();
            if blocks_on_first_page {
                plan.push(Refresh::Resource(ResourceKind::Blocks));
            }
            plan.push(Refresh::Stats);
            plan
        }
        WsPayload::NewTransaction(_) => {
            if txs_on_first_page {
                vec![Refresh::Resource(ResourceKind::Transactions)]
            } else {
                Vec::new()
            }
        }
        WsPayload::Subscribed { .. } | WsPayload::Unknown => Vec::new(),
    }
}

/// Refresh plan for one poll tick: first-page listings plus statistics.
pub fn poll_refresh_plan(blocks_on_first_page: bool, txs_on_first_page: bool) -> Vec<Refresh> {
    let mut plan = Vec::new();
    if blocks_on_first_page {
        plan.push(Refresh::Resource(ResourceKind::Blocks));
    }
    if txs_on_first_page {
        plan.push(Refresh::Resource(ResourceKind::Transactions));
    }
    plan.push(Refresh::Stats);
    plan
}

pub struct App {
    api: ExplorerApi,
    cache: Arc<CacheStore>,

    blocks_view: ResourceView,
    txs_view: ResourceView,
    proposals_view: ResourceView,

    blocks: Pane<BlocksPage>,
    transactions: Pane<TxsPage>,
    proposals: Pane<ProposalsPage>,
    validators: Pane<ValidatorsPage>,
    stats: Pane<StatsSummary>,

    channel_state: ChannelState,
}

impl App {
    pub fn new(cfg: &Config) -> Self {
        let cache = Arc::new(CacheStore::new(std::time::Duration::from_millis(
            cfg.cache_ttl_ms,
        )));
        let api = ExplorerApi::new(
            &cfg.api_url,
            Arc::clone(&cache),
            cfg.fetch_timeout_ms,
            cfg.fetch_retries,
        );
        App {
            api,
            cache,
            blocks_view: ResourceView::new(ResourceKind::Blocks, cfg.page_size),
            txs_view: ResourceView::new(ResourceKind::Transactions, cfg.page_size),
            proposals_view: ResourceView::new(ResourceKind::Proposals, cfg.page_size),
            blocks: Pane::default(),
            transactions: Pane::default(),
            proposals: Pane::default(),
            validators: Pane::default(),
            stats: Pane::default(),
            channel_state: ChannelState::Connecting,
        }
    }

    // ---- read side for the presentation layer ----

    pub fn channel_state(&self) -> ChannelState {
        self.channel_state
    }

    pub fn page(&self, kind: ResourceKind) -> u64 {
        self.view(kind).page()
    }

    pub fn blocks(&self) -> &Pane<BlocksPage> {
        &self.blocks
    }

    pub fn transactions(&self) -> &Pane<TxsPage> {
        &self.transactions
    }

    pub fn proposals(&self) -> &Pane<ProposalsPage> {
        &self.proposals
    }

    pub fn validators(&self) -> &Pane<ValidatorsPage> {
        &self.validators
    }

    pub fn stats(&self) -> &Pane<StatsSummary> {
        &self.stats
    }

    fn view(&self, kind: ResourceKind) -> &ResourceView {
        match kind {
            ResourceKind::Blocks => &self.blocks_view,
            ResourceKind::Transactions => &self.txs_view,
            ResourceKind::Proposals => &self.proposals_view,
        }
    }

    fn view_mut(&mut self, kind: ResourceKind) -> &mut ResourceView {
        match kind {
            ResourceKind::Blocks => &mut self.blocks_view,
            ResourceKind::Transactions => &mut self.txs_view,
            ResourceKind::Proposals => &mut self.proposals_view,
        }
    }

    // ---- imperative triggers ----

    /// Advance one page and re-fetch. No client-side upper bound; the
    /// server answers an overrun with an empty page.
    pub async fn next_page(&mut self, kind: ResourceKind) {
        self.view_mut(kind).next_page();
        self.refresh(kind).await;
    }

    /// Retreat one page. At page 1 this is a no-op and issues no fetch.
    pub async fn prev_page(&mut self, kind: ResourceKind) {
        if self.view_mut(kind).prev_page() {
            self.refresh(kind).await;
        }
    }

    /// Store or clear a filter (empty value clears), snap to page 1 and
    /// re-fetch. Filters are scoped to one resource and never leak into
    /// another resource's signature.
    pub async fn set_filter(&mut self, kind: ResourceKind, name: &str, value: &str) {
        self.view_mut(kind).set_filter(name, value);
        self.refresh(kind).await;
    }

    /// One-shot classified lookup. Bypasses pagination, filters and the
    /// cache. A transport failure propagates; it is never downgraded to
    /// `NotFound`.
    pub async fn search(&self, query: &str) -> Result<SearchResult, FetchError> {
        search::resolve(&self.api, query).await
    }

    // ---- event dispatch ----

    /// Handles one session event. Fetch failures are isolated per pane:
    /// the affected pane degrades to `Failed`, everything else continues.
    pub async fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::FromWs(payload) => self.on_push(payload).await,
            AppEvent::ChannelStatus(state) => {
                if state != self.channel_state {
                    log::info!("[app] channel {state}");
                }
                self.channel_state = state;
            }
            AppEvent::PollTick => self.on_poll_tick().await,
            AppEvent::Quit => {}
        }
    }

    async fn on_push(&mut self, payload: WsPayload) {
        // Invalidation happens unconditionally; the conditional part is
        // only whether a re-fetch follows right away.
        match &payload {
            WsPayload::NewBlock(_) => {
                self.cache.invalidate_prefix(ResourceKind::Blocks.endpoint());
                self.cache.invalidate(&QuerySignature::new(STATS_SIGNATURE));
            }
            WsPayload::NewTransaction(_) => {
                self.cache
                    .invalidate_prefix(ResourceKind::Transactions.endpoint());
            }
            WsPayload::Subscribed { channel } => {
                log::info!("[app] subscription acknowledged: {channel}");
            }
            WsPayload::Unknown => {}
        }

        let plan = push_refresh_plan(
            &payload,
            self.blocks_view.is_first_page(),
            self.txs_view.is_first_page(),
        );
        self.execute(plan).await;
    }

    async fn on_poll_tick(&mut self) {
        let plan = poll_refresh_plan(
            self.blocks_view.is_first_page(),
            self.txs_view.is_first_page(),
        );
        self.execute(plan).await;
    }

    async fn execute(&mut self, plan: Vec<Refresh>) {
        for step in plan {
            match step {
                Refresh::Resource(kind) => self.refresh(kind).await,
                Refresh::Stats => self.refresh_stats().await,
            }
        }
    }

    // ---- fetch side ----

    /// Re-fetches the current page of one resource and stores the result.
    /// On failure the pane is explicitly marked failed rather than left
    /// showing stale content without a signal.
    pub async fn refresh(&mut self, kind: ResourceKind) {
        match kind {
            ResourceKind::Blocks => {
                match self.api.list_blocks(&self.blocks_view).await {
                    Ok(page) => {
                        self.blocks = Pane {
                            data: page,
                            status: LoadStatus::Loaded,
                        };
                    }
                    Err(e) => self.fail(kind, e),
                }
            }
            ResourceKind::Transactions => {
                match self.api.list_transactions(&self.txs_view).await {
                    Ok(page) => {
                        self.transactions = Pane {
                            data: page,
                            status: LoadStatus::Loaded,
                        };
                    }
                    Err(e) => self.fail(kind, e),
                }
            }
            ResourceKind::Proposals => {
                match self.api.list_proposals(&self.proposals_view).await {
                    Ok(page) => {
                        self.proposals = Pane {
                            data: page,
                            status: LoadStatus::Loaded,
                        };
                    }
                    Err(e) => self.fail(kind, e),
                }
            }
        }
    }

    fn fail(&mut self, kind: ResourceKind, e: FetchError) {
        log::warn!("[app] {kind} fetch failed: {e}");
        let status = LoadStatus::Failed(e.to_string());
        match kind {
            ResourceKind::Blocks => self.blocks.status = status,
            ResourceKind::Transactions => self.transactions.status = status,
            ResourceKind::Proposals => self.proposals.status = status,
        }
    }

    pub async fn refresh_stats(&mut self) {
        match self.api.stats().await {
            Ok(stats) => {
                self.stats = Pane {
                    data: stats,
                    status: LoadStatus::Loaded,
                };
            }
            Err(e) => {
                log::warn!("[app] stats fetch failed: {e}");
                self.stats.status = LoadStatus::Failed(e.to_string());
            }
        }
    }

    pub async fn refresh_validators(&mut self) {
        match self.api.validators().await {
            Ok(page) => {
                self.validators = Pane {
                    data: page,
                    status: LoadStatus::Loaded,
                };
            }
            Err(e) => {
                log::warn!("[app] validators fetch failed: {e}");
                self.validators.status = LoadStatus::Failed(e.to_string());
            }
        }
    }

    /// Initial load at session start: every pane plus stats.
    pub async fn load_all(&mut self) {
        self.refresh(ResourceKind::Blocks).await;
        self.refresh(ResourceKind::Transactions).await;
        self.refresh(ResourceKind::Proposals).await;
        self.refresh_validators().await;
        self.refresh_stats().await;
    }
}

//! Per-resource pagination and filter state.
//!
//! One `ResourceView` exists per paginated resource kind and is mutated
//! only through the pagination/filter operations below. The view also
//! derives the query signature the gateway and cache key on, so any state
//! change here shows up as a different signature.

use crate::cache::QuerySignature;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Blocks,
    Transactions,
    Proposals,
}

impl ResourceKind {
    /// Listing endpoint path; doubles as the cache invalidation prefix for
    /// this resource class.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ResourceKind::Blocks => "/api/blocks",
            ResourceKind::Transactions => "/api/transactions",
            ResourceKind::Proposals => "/api/proposals",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Blocks => write!(f, "blocks"),
            ResourceKind::Transactions => write!(f, "transactions"),
            ResourceKind::Proposals => write!(f, "proposals"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResourceView {
    kind: ResourceKind,
    page: u64,
    page_size: u64,
    // BTreeMap keeps filter params in a stable order inside the signature.
    filters: BTreeMap<String, String>,
}

impl ResourceView {
    pub fn new(kind: ResourceKind, page_size: u64) -> Self {
        ResourceView {
            kind,
            page: 1,
            page_size: page_size.max(1),
            filters: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn is_first_page(&self) -> bool {
        self.page == 1
    }

    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }

    /// Advances one page. There is no client-side upper bound; the server
    /// answers an overrun with an empty page and the consumer renders that.
    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// Retreats one page. Returns whether the page actually moved; at page
    /// 1 this is a no-op and the caller must not re-fetch.
    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Stores or clears a filter and snaps back to page 1. An empty value
    /// clears the filter entirely so it never appears in the signature.
    pub fn set_filter(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.filters.remove(name);
        } else {
            self.filters.insert(name.to_string(), value.to_string());
        }
        self.page = 1;
    }

    /// Canonical signature for the current page: endpoint + pagination +
    /// active filters in stable order.
    pub fn signature(&self) -> QuerySignature {
        let offset = (self.page - 1) * self.page_size;
        let mut s = format!("{}?limit={}&offset={}", self.kind.endpoint(), self.page_size, offset);
        for (name, value) in &self.filters {
            s.push('&');
            s.push_str(name);
            s.push('=');
            s.push_str(&urlencoding::encode(value));
        }
        QuerySignature::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        let view = ResourceView::new(ResourceKind::Blocks, 20);
        assert_eq!(view.page(), 1);
        assert!(view.is_first_page());
        assert_eq!(view.signature().as_str(), "/api/blocks?limit=20&offset=0");
    }

    #[test]
    fn pagination_walk() {
        let mut view = ResourceView::new(ResourceKind::Blocks, 20);
        view.next_page();
        view.next_page();
        view.next_page();
        assert_eq!(view.page(), 4);
        assert!(view.prev_page());
        assert_eq!(view.page(), 3);
    }

    #[test]
    fn prev_page_clamps_at_one() {
        let mut view = ResourceView::new(ResourceKind::Transactions, 20);
        assert!(!view.prev_page());
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn signature_tracks_offset() {
        let mut view = ResourceView::new(ResourceKind::Transactions, 20);
        view.next_page();
        assert_eq!(
            view.signature().as_str(),
            "/api/transactions?limit=20&offset=20"
        );
    }

    #[test]
    fn set_filter_resets_page_and_changes_signature() {
        let mut view = ResourceView::new(ResourceKind::Transactions, 20);
        view.next_page();
        view.next_page();
        view.set_filter("status", "failed");
        assert_eq!(view.page(), 1);
        assert_eq!(
            view.signature().as_str(),
            "/api/transactions?limit=20&offset=0&status=failed"
        );
    }

    #[test]
    fn pagination_never_touches_filters() {
        let mut view = ResourceView::new(ResourceKind::Transactions, 20);
        view.set_filter("type", "msg-send");
        view.next_page();
        view.prev_page();
        assert_eq!(view.filter("type"), Some("msg-send"));
    }

    #[test]
    fn empty_value_clears_filter() {
        let mut view = ResourceView::new(ResourceKind::Proposals, 20);
        view.set_filter("status", "voting");
        view.set_filter("status", "");
        assert_eq!(view.filter("status"), None);
        assert_eq!(view.signature().as_str(), "/api/proposals?limit=20&offset=0");
    }

    #[test]
    fn filters_are_ordered_and_encoded() {
        let mut view = ResourceView::new(ResourceKind::Transactions, 10);
        view.set_filter("type", "msg send");
        view.set_filter("status", "success");
        assert_eq!(
            view.signature().as_str(),
            "/api/transactions?limit=10&offset=0&status=success&type=msg%20send"
        );
    }
}

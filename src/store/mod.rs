//! Exchange ledger.
//!
//! # Responsibilities
//! - Record every completed exchange under its minted identifier
//! - Support concurrent inserts from many simultaneous forwards
//! - Allow safe concurrent reads for in-process consumers
//!
//! # Design Decisions
//! - DashMap provides internal synchronization; callers never lock
//! - Inserts are atomic at the granularity of one full record
//! - No eviction, no TTL, no capacity bound: the ledger lives for the
//!   process lifetime (known limitation of this scope)

use dashmap::DashMap;
use std::sync::Arc;

use crate::forward::{Exchange, ProxyRequest, ProxyResponse};

/// A thread-safe ledger of completed exchanges.
///
/// Cloning the store clones a handle to the same underlying map, so it can
/// be shared freely between the server, the forwarder, and tests.
#[derive(Clone, Default)]
pub struct ExchangeStore {
    inner: Arc<DashMap<String, Exchange>>,
}

impl ExchangeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Record a completed exchange. Inserts unconditionally; on an
    /// identifier collision the newer record wins.
    pub fn put(&self, id: String, request: ProxyRequest, response: ProxyResponse) {
        self.inner.insert(id, Exchange { request, response });
    }

    /// Look up a recorded exchange by identifier.
    pub fn get(&self, id: &str) -> Option<Exchange> {
        self.inner.get(id).map(|r| r.value().clone())
    }

    /// Number of recorded exchanges.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

//! Response router: maps request ids to waiting callers.
//!
//! Every outgoing call parks a oneshot sender here under its request id.
//! The reader task feeds responses in; the matching slot is removed and
//! completed. Responses with no matching slot (late replies after a
//! timeout, server push frames) are dropped.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use strand_proto::{Method, RequestId, RpcResponse};

use crate::error::Error;

/// A call waiting for its response
struct PendingCall {
    /// Channel to the awaiting caller
    sender: oneshot::Sender<RpcResponse>,
    /// Verb, for logging
    method: Method,
    /// When the call was registered
    issued_at: Instant,
}

/// Statistics for the response router
#[derive(Debug, Default)]
pub struct RouterStats {
    /// Total calls registered
    pub total_registered: AtomicU64,
    /// Total responses delivered to a waiting caller
    pub total_delivered: AtomicU64,
    /// Total responses dropped (no matching slot)
    pub total_dropped: AtomicU64,
    /// Total calls cancelled before a response arrived
    pub total_cancelled: AtomicU64,
}

/// Correlation table for in-flight calls.
///
/// Flow:
/// 1. Call pipeline calls `register()` and gets an id plus a receiver
/// 2. Pipeline sends the request frame carrying that id
/// 3. Reader task parses the response and calls `deliver()`
/// 4. Pipeline awaits the receiver under its timeout
pub struct ResponseRouter {
    /// Map of request id to waiting caller
    pending: DashMap<RequestId, PendingCall>,
    /// Statistics
    stats: Arc<RouterStats>,
}

impl ResponseRouter {
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
            stats: Arc::new(RouterStats::default()),
        }
    }

    /// Register a call and get a receiver for its response.
    ///
    /// Generates the request id. An id collision means the uuid source is
    /// broken; it trips a debug assertion and surfaces as a typed error
    /// rather than silently replacing the earlier call's slot.
    pub fn register(&self, method: Method) -> Result<(RequestId, oneshot::Receiver<RpcResponse>), Error> {
        let id = RequestId::generate();
        let (tx, rx) = oneshot::channel();

        match self.pending.entry(id) {
            Entry::Occupied(_) => {
                debug_assert!(false, "request id collision: {id}");
                Err(Error::DuplicateId { id })
            }
            Entry::Vacant(slot) => {
                slot.insert(PendingCall {
                    sender: tx,
                    method,
                    issued_at: Instant::now(),
                });
                self.stats.total_registered.fetch_add(1, Ordering::Relaxed);

                debug!(id = %id, method = %method, "registered call");
                Ok((id, rx))
            }
        }
    }

    /// Route a response to its waiting caller.
    ///
    /// Returns true if a caller received it. Late or unknown responses are
    /// logged and discarded; the connection stays healthy.
    pub fn deliver(&self, response: RpcResponse) -> bool {
        let Some(id) = response.id else {
            debug!("dropping frame without request id");
            self.stats.total_dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        };

        if let Some((_, call)) = self.pending.remove(&id) {
            let waited = call.issued_at.elapsed();
            match call.sender.send(response) {
                Ok(()) => {
                    self.stats.total_delivered.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        id = %id,
                        method = %call.method,
                        waited_ms = waited.as_millis(),
                        "delivered response"
                    );
                    true
                }
                Err(_) => {
                    // Caller gave up between timeout and this delivery
                    self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
                    debug!(id = %id, method = %call.method, "caller no longer waiting");
                    false
                }
            }
        } else {
            warn!(id = %id, "response for unknown or expired request id");
            self.stats.total_dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Remove a call that will never get its response delivered (send
    /// failure, timeout). Returns false if it already completed.
    pub fn cancel(&self, id: &RequestId) -> bool {
        if self.pending.remove(id).is_some() {
            self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Drop every pending slot. Waiting callers see their receiver close.
    ///
    /// Returns the number of calls abandoned.
    pub fn drain(&self) -> usize {
        let orphaned = self.pending.len();
        self.pending.clear();
        if orphaned > 0 {
            self.stats
                .total_cancelled
                .fetch_add(orphaned as u64, Ordering::Relaxed);
        }
        orphaned
    }

    /// Number of calls currently in flight
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check whether an id is still waiting
    pub fn is_pending(&self, id: &RequestId) -> bool {
        self.pending.contains_key(id)
    }

    /// Get statistics
    pub fn stats(&self) -> &RouterStats {
        &self.stats
    }
}

impl Default for ResponseRouter {
    fn default() -> Self {
        Self::new()
    }
}

//! Fetch correlation
//!
//! Matches `fetch_done` replies back to the request that caused them.

use dashmap::DashMap;
use uuid::Uuid;

use crate::protocol::OutboundOp;

/// Outstanding fetch ids and the op each was issued for
#[derive(Debug, Default)]
pub struct FetchCorrelator {
    pending: DashMap<String, OutboundOp>,
}

impl FetchCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh id for `op` and record it
    pub fn issue(&self, op: OutboundOp) -> String {
        let id = Uuid::new_v4().to_string();
        self.pending.insert(id.clone(), op);
        id
    }

    /// Consume a reply id. Unknown or already-resolved ids yield `None`.
    pub fn resolve(&self, id: &str) -> Option<OutboundOp> {
        self.pending.remove(id).map(|(_, op)| op)
    }

    /// Forget an id whose request never went out
    pub fn cancel(&self, id: &str) {
        self.pending.remove(id);
    }

    /// Number of outstanding fetches
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&self) {
        self.pending.clear();
    }
}

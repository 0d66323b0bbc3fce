//! Load generations.
//!
//! Every load attempt takes a ticket. Only the most recently issued ticket may
//! commit; results arriving for an older ticket are discarded.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LoadTicket(pub u64);

#[derive(Default, Debug)]
pub struct LoadTracker {
    latest: u64,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding all earlier ones.
    #[inline]
    pub fn begin(&mut self) -> LoadTicket {
        self.latest = self.latest.wrapping_add(1);
        LoadTicket(self.latest)
    }

    #[inline]
    pub fn current(&self) -> LoadTicket {
        LoadTicket(self.latest)
    }

    #[inline]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest
    }
}

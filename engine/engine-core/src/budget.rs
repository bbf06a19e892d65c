//! Per-decision simulation budget.
//!
//! The budget is the only resource shared by every node and candidate a
//! planner touches during one decision. It only ever counts down: once it
//! reaches zero it stays there until the caller starts a new decision.

/// Counter of remaining `step` calls for the current decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    limit: u64,
    remaining: u64,
}

impl Budget {
    /// Create a budget allowing `limit` simulation calls.
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    /// A budget that never runs out.
    pub fn unlimited() -> Self {
        Self::new(u64::MAX)
    }

    /// Spend one call. Returns false, without changing anything, once exhausted.
    #[inline]
    pub fn try_consume(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Calls still available.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Calls spent so far.
    #[inline]
    pub fn used(&self) -> u64 {
        self.limit - self.remaining
    }

    /// The limit this budget started from.
    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

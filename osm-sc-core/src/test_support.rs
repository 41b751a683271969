//! Deterministic collaborators for unit and behaviour tests.

use std::cell::Cell;

use crate::{EdgeIdGenerator, Interrupt, Interrupted};

/// Issues `e000000001`, `e000000002`, … so tests can predict edge ids.
#[derive(Debug, Default, Clone)]
pub struct SequentialEdgeIds {
    issued: u64,
}

impl SequentialEdgeIds {
    /// Start a fresh sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EdgeIdGenerator for SequentialEdgeIds {
    fn next_id(&mut self) -> String {
        self.issued += 1;
        format!("e{:09}", self.issued)
    }
}

/// Passes the first `allowed` polls, then reports [`Interrupted`].
///
/// Every poll is counted, including the failing ones.
#[derive(Debug)]
pub struct InterruptAfter {
    allowed: usize,
    polls: Cell<usize>,
}

impl InterruptAfter {
    /// Allow `allowed` successful polls.
    #[must_use]
    pub const fn new(allowed: usize) -> Self {
        Self {
            allowed,
            polls: Cell::new(0),
        }
    }

    /// An interrupt that never fires but still counts polls.
    #[must_use]
    pub const fn never() -> Self {
        Self::new(usize::MAX)
    }

    /// Number of polls observed.
    #[must_use]
    pub fn polls(&self) -> usize {
        self.polls.get()
    }
}

impl Interrupt for InterruptAfter {
    fn check(&self) -> Result<(), Interrupted> {
        let seen = self.polls.get();
        self.polls.set(seen.saturating_add(1));
        if seen < self.allowed {
            Ok(())
        } else {
            Err(Interrupted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_edge_id;

    #[test]
    fn sequential_ids_are_valid_edge_ids() {
        let mut ids = SequentialEdgeIds::new();
        assert_eq!(ids.next_id(), "e000000001");
        assert!(is_edge_id(&ids.next_id()));
    }

    #[test]
    fn interrupt_after_fires_on_the_next_poll() {
        let interrupt = InterruptAfter::new(2);
        assert_eq!(interrupt.check(), Ok(()));
        assert_eq!(interrupt.check(), Ok(()));
        assert_eq!(interrupt.check(), Err(Interrupted));
        assert_eq!(interrupt.polls(), 3);
    }
}

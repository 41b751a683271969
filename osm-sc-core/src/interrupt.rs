//! Cooperative cancellation polled by long traversals.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use thiserror::Error;

/// Returned when a traversal observes a cancellation request.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("operation interrupted")]
pub struct Interrupted;

/// A host-provided cancellation poll.
///
/// Traversals call [`Interrupt::check`] periodically and abort with
/// [`Interrupted`] as soon as it fails. No partial output is returned.
pub trait Interrupt {
    /// Fail with [`Interrupted`] once cancellation has been requested.
    fn check(&self) -> Result<(), Interrupted>;
}

impl<T: Interrupt + ?Sized> Interrupt for &T {
    fn check(&self) -> Result<(), Interrupted> {
        (**self).check()
    }
}

/// An [`Interrupt`] that never fires.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverInterrupt;

impl Interrupt for NeverInterrupt {
    fn check(&self) -> Result<(), Interrupted> {
        Ok(())
    }
}

/// A shareable cancellation flag.
///
/// Clones observe the same flag, so another thread can call
/// [`CancellationFlag::cancel`] while a traversal polls it.
///
/// # Examples
/// ```
/// use osm_sc_core::{CancellationFlag, Interrupt, Interrupted};
///
/// let flag = CancellationFlag::new();
/// let handle = flag.clone();
/// assert_eq!(flag.check(), Ok(()));
/// handle.cancel();
/// assert_eq!(flag.check(), Err(Interrupted));
/// ```
#[derive(Debug, Default, Clone)]
pub struct CancellationFlag {
    raised: Arc<AtomicBool>,
}

impl CancellationFlag {
    /// Create a flag that has not been raised.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Return whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

impl Interrupt for CancellationFlag {
    fn check(&self) -> Result<(), Interrupted> {
        if self.is_cancelled() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}

use std::sync::{atomic::{AtomicBool, Ordering}, Arc};

/// A flag that asks a running search to stop early.
///
/// Clones share the same flag, so one clone can be handed to a [`Solver`](super::Solver) while
/// another is kept (possibly on another thread) to cancel it. The solver checks the flag between
/// candidates and between rounds, and returns the best candidate found so far.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

//! Concurrency ceiling for in-flight connections.
//!
//! A counting gate over `tokio::sync::Semaphore`. Every socket the scanner
//! opens lives inside a slot, and the slot is released when its guard is
//! dropped, whichever way the holder exits.

use tokio::sync::{Semaphore, SemaphorePermit};

/// Default number of simultaneous probes.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Bounded admission for probe and banner phases.
#[derive(Debug)]
pub struct ConcurrencyGate {
    semaphore: Semaphore,
    ceiling: usize,
}

impl ConcurrencyGate {
    /// Create a gate admitting at most `ceiling` holders (minimum 1).
    pub fn new(ceiling: usize) -> Self {
        let ceiling = ceiling.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            semaphore: Semaphore::new(ceiling),
            ceiling,
        }
    }

    /// Wait for a free slot.
    ///
    /// Returns `None` only if the gate has been closed, which the scanner
    /// never does.
    pub async fn enter(&self) -> Option<SemaphorePermit<'_>> {
        self.semaphore.acquire().await.ok()
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Slots currently held.
    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.ceiling - self.semaphore.available_permits()
    }
}

impl Default for ConcurrencyGate {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

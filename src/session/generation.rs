use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter used to drop stale responses.
///
/// In-flight requests are never cancelled. Instead each one holds a
/// [`GenerationTicket`], and its result is only installed if no newer
/// generation has started in the meantime.
#[derive(Debug, Clone, Default)]
pub struct RequestGenerations {
    current: Arc<AtomicU64>,
}

/// Snapshot of the generation a request was started in
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, making every outstanding ticket stale
    pub fn begin(&self) -> GenerationTicket {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        GenerationTicket {
            generation,
            current: Arc::clone(&self.current),
        }
    }

    /// Mark every outstanding ticket stale without issuing a new one
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

impl GenerationTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether no newer generation has started since this ticket was issued
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

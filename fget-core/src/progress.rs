use std::sync::atomic::{AtomicU64, Ordering};

/// Receives byte-count updates from the download engine.
///
/// One handle is shared by every chunk worker, so implementations must
/// tolerate concurrent `add` calls. Updates are additive counter
/// semantics only; nothing in the engine depends on them.
pub trait ProgressObserver: Send + Sync {
    /// Called once after the probe, before any bytes move. `total` is
    /// None when the server did not report a usable content length.
    fn start(&self, total: Option<u64>);

    /// Called after each span of bytes is written to disk.
    fn add(&self, bytes: u64);

    /// Called once after the integrity check passes.
    fn finish(&self);
}

/// Observer that discards all updates.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn start(&self, _total: Option<u64>) {}
    fn add(&self, _bytes: u64) {}
    fn finish(&self) {}
}

/// Observer that only accumulates a byte counter.
#[derive(Debug, Default)]
pub struct CountingProgress {
    bytes: AtomicU64,
}

impl CountingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

impl ProgressObserver for CountingProgress {
    fn start(&self, _total: Option<u64>) {}

    fn add(&self, bytes: u64) {
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    fn finish(&self) {}
}

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Generates unique trade identifiers within a private namespace.
///
/// Each generator owns a random v4 namespace; ids are derived as v5 uuids from a
/// monotonically increasing counter, so two generators never collide and a single
/// generator never repeats.
#[derive(Debug)]
pub struct TradeIdGenerator {
    namespace: Uuid,
    counter: AtomicU64,
}

impl TradeIdGenerator {
    pub fn new(namespace: Uuid) -> Self {
        Self {
            namespace,
            counter: AtomicU64::new(0),
        }
    }

    pub fn next_id(&self) -> Uuid {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Uuid::new_v5(&self.namespace, &n.to_le_bytes())
    }
}

impl Default for TradeIdGenerator {
    fn default() -> Self {
        Self::new(Uuid::new_v4())
    }
}

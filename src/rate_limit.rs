use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Counter state for one identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitRecord {
    pub count: u32,
    pub reset_at: DateTime<Utc>,
}

/// Backing store for rate-limit counters.
///
/// `get`, `increment` and `reset` are separate calls, so a limiter over a
/// shared store can over- or under-count by a request near window edges.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn get(&self, identifier: &str) -> Option<RateLimitRecord>;
    /// Bumps the counter and returns the new count.
    async fn increment(&self, identifier: &str) -> u32;
    /// Starts a fresh window with a count of 1.
    async fn reset(&self, identifier: &str, reset_at: DateTime<Utc>);
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Process-local store. Only correct within a single instance; entries are
/// never evicted, so the key set grows with every distinct identifier.
#[derive(Default)]
pub struct InMemoryStore {
    entries: DashMap<String, RateLimitRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryStore {
    async fn get(&self, identifier: &str) -> Option<RateLimitRecord> {
        self.entries.get(identifier).map(|e| *e.value())
    }

    async fn increment(&self, identifier: &str) -> u32 {
        match self.entries.get_mut(identifier) {
            Some(mut entry) => {
                entry.count += 1;
                entry.count
            }
            None => 0,
        }
    }

    async fn reset(&self, identifier: &str, reset_at: DateTime<Utc>) {
        self.entries
            .insert(identifier.to_string(), RateLimitRecord { count: 1, reset_at });
    }
}

/// Fixed-window limiter: the count resets wholesale once `reset_at` passes.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()), Arc::new(SystemClock))
    }

    pub async fn allow(&self, identifier: &str, max_requests: u32, window: Duration) -> bool {
        let now = self.clock.now();

        let record = match self.store.get(identifier).await {
            Some(record) if now < record.reset_at => record,
            _ => {
                self.store.reset(identifier, window_end(now, window)).await;
                return true;
            }
        };

        if record.count >= max_requests {
            tracing::debug!(identifier, count = record.count, "Rate limit exceeded");
            return false;
        }

        // A zero count means the entry vanished after `get`; start it again.
        if self.store.increment(identifier).await == 0 {
            self.store.reset(identifier, window_end(now, window)).await;
        }
        true
    }
}

fn window_end(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    now.checked_add_signed(window).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Mutex::new(Utc::now()))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn limiter() -> (RateLimiter, Arc<ManualClock>, Arc<InMemoryStore>) {
        let clock = Arc::new(ManualClock::new());
        let store = Arc::new(InMemoryStore::new());
        let limiter = RateLimiter::new(store.clone(), clock.clone());
        (limiter, clock, store)
    }

    #[tokio::test]
    async fn allows_up_to_limit_then_denies() {
        let (limiter, _, _) = limiter();
        let window = Duration::milliseconds(60_000);

        for _ in 0..3 {
            assert!(limiter.allow("10.0.0.1", 3, window).await);
        }
        assert!(!limiter.allow("10.0.0.1", 3, window).await);
        assert!(!limiter.allow("10.0.0.1", 3, window).await);
    }

    #[tokio::test]
    async fn window_expiry_starts_fresh_count() {
        let (limiter, clock, store) = limiter();
        let window = Duration::milliseconds(60_000);

        for _ in 0..3 {
            assert!(limiter.allow("10.0.0.1", 3, window).await);
        }
        assert!(!limiter.allow("10.0.0.1", 3, window).await);

        clock.advance(Duration::milliseconds(60_001));
        assert!(limiter.allow("10.0.0.1", 3, window).await);

        let record = store.get("10.0.0.1").await.unwrap();
        assert_eq!(record.count, 1);
        assert_eq!(record.reset_at, clock.now() + window);
    }

    #[tokio::test]
    async fn denied_requests_do_not_extend_window() {
        let (limiter, clock, store) = limiter();
        let window = Duration::milliseconds(1_000);

        assert!(limiter.allow("a", 1, window).await);
        let first_reset = store.get("a").await.unwrap().reset_at;

        clock.advance(Duration::milliseconds(500));
        assert!(!limiter.allow("a", 1, window).await);
        assert_eq!(store.get("a").await.unwrap().reset_at, first_reset);
    }

    #[tokio::test]
    async fn identifiers_are_counted_independently() {
        let (limiter, _, store) = limiter();
        let window = Duration::milliseconds(60_000);

        assert!(limiter.allow("a", 1, window).await);
        assert!(!limiter.allow("a", 1, window).await);
        assert!(limiter.allow("b", 1, window).await);
        assert!(limiter.allow("unknown", 1, window).await);
        assert_eq!(store.len(), 3);
    }

    /// Reports a live record but has lost it by the time it is incremented.
    struct EvictingStore {
        inner: InMemoryStore,
        reset_at: DateTime<Utc>,
    }

    #[async_trait]
    impl RateLimitStore for EvictingStore {
        async fn get(&self, _identifier: &str) -> Option<RateLimitRecord> {
            Some(RateLimitRecord {
                count: 1,
                reset_at: self.reset_at,
            })
        }

        async fn increment(&self, identifier: &str) -> u32 {
            self.inner.increment(identifier).await
        }

        async fn reset(&self, identifier: &str, reset_at: DateTime<Utc>) {
            self.inner.reset(identifier, reset_at).await;
        }
    }

    #[tokio::test]
    async fn vanished_entry_is_recreated_on_increment() {
        let clock = Arc::new(ManualClock::new());
        let store = Arc::new(EvictingStore {
            inner: InMemoryStore::new(),
            reset_at: clock.now() + Duration::milliseconds(60_000),
        });
        let limiter = RateLimiter::new(store.clone(), clock.clone());

        assert!(limiter.allow("a", 3, Duration::milliseconds(60_000)).await);

        let record = store.inner.get("a").await.unwrap();
        assert_eq!(record.count, 1);
        assert_eq!(record.reset_at, clock.now() + Duration::milliseconds(60_000));
    }

    #[tokio::test]
    async fn oversized_window_saturates_instead_of_overflowing() {
        let (limiter, _, store) = limiter();

        assert!(limiter.allow("a", 1, Duration::MAX).await);
        assert_eq!(store.get("a").await.unwrap().reset_at, DateTime::<Utc>::MAX_UTC);
        assert!(!limiter.allow("a", 1, Duration::MAX).await);
    }
}

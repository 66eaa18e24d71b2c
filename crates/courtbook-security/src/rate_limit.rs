use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// Idle time after which a client's bucket is forgotten.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

struct Bucket {
    tokens: f64,
    last_seen: Instant,
}

impl Bucket {
    fn refill(&mut self, now: Instant, rate: f64, cap: f64) {
        let elapsed = now.duration_since(self.last_seen).as_secs_f64();
        self.tokens = (self.tokens + elapsed * rate).min(cap);
        self.last_seen = now;
    }
}

/// Token-bucket throttle with one bucket per client address.
///
/// Buckets idle for longer than the idle timeout are dropped by
/// [`RateLimiter::prune_idle`]; [`RateLimiter::spawn_pruner`] runs that on a
/// timer for the lifetime of a server.
pub struct RateLimiter {
    burst: f64,
    per_second: f64,
    idle_timeout: Duration,
    buckets: Mutex<HashMap<IpAddr, Bucket>>,
}

impl RateLimiter {
    /// `burst` requests at once, refilled at `per_second`.
    pub fn new(burst: f64, per_second: f64) -> Self {
        Self {
            burst,
            per_second,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Overrides [`DEFAULT_IDLE_TIMEOUT`].
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Idle time after which a bucket is dropped.
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Takes one token for `client`.
    ///
    /// On refusal returns how long until the next token is available.
    pub async fn check(&self, client: IpAddr) -> Result<(), Duration> {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;
        let bucket = buckets.entry(client).or_insert(Bucket {
            tokens: self.burst,
            last_seen: now,
        });
        bucket.refill(now, self.per_second, self.burst);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            return Ok(());
        }
        let missing = 1.0 - bucket.tokens;
        Err(Duration::try_from_secs_f64(missing / self.per_second).unwrap_or(Duration::MAX))
    }

    /// Drops buckets not touched within the idle timeout; returns how many went.
    pub async fn prune_idle(&self) -> usize {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;
        let before = buckets.len();
        buckets.retain(|_, b| now.duration_since(b.last_seen) < self.idle_timeout);
        let removed = before - buckets.len();
        if removed > 0 {
            debug!(removed, remaining = buckets.len(), "Pruned idle rate-limit buckets");
        }
        removed
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.buckets.lock().await.len()
    }

    /// Prunes idle buckets every half idle timeout until the handle is aborted.
    pub fn spawn_pruner(self: Arc<Self>) -> JoinHandle<()> {
        let period = (self.idle_timeout / 2).max(Duration::from_millis(10));
        tokio::spawn(async move {
            let mut timer = tokio::time::interval(period);
            loop {
                timer.tick().await;
                self.prune_idle().await;
            }
        })
    }
}

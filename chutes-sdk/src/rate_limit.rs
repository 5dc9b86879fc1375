//! Token-bucket rate limiting
//!
//! A single continuously-refilling bucket. The bucket is owned by whichever
//! component constructs it and is mutated only through [`TokenBucket::check_limit`];
//! callers wanting shared access put it behind a `Mutex`.

use std::time::{Duration, Instant};

/// A token bucket holding up to `capacity` tokens, refilled evenly over the
/// configured window.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u32,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket that refills `capacity` tokens per `window`.
    pub fn new(capacity: u32, window: Duration) -> Self {
        let window_secs = window.as_secs_f64().max(f64::EPSILON);
        Self {
            capacity,
            tokens: capacity as f64,
            refill_per_sec: capacity as f64 / window_secs,
            last_refill: Instant::now(),
        }
    }

    /// Consume one token if available. Returns `false` when the bucket is
    /// empty, signalling the caller to deny the operation.
    pub fn check_limit(&mut self) -> bool {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Whole tokens currently available.
    pub fn remaining(&self) -> u32 {
        self.tokens as u32
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity as f64);
        self.last_refill = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_bucket_allows_capacity_calls() {
        let mut bucket = TokenBucket::new(3, Duration::from_secs(60));
        assert!(bucket.check_limit());
        assert!(bucket.check_limit());
        assert!(bucket.check_limit());
        assert!(!bucket.check_limit());
    }

    #[test]
    fn test_bucket_refills_over_time() {
        let mut bucket = TokenBucket::new(10, Duration::from_millis(100));
        for _ in 0..10 {
            assert!(bucket.check_limit());
        }
        assert!(!bucket.check_limit());

        std::thread::sleep(Duration::from_millis(50));
        assert!(bucket.check_limit());
    }

    #[test]
    fn test_remaining_never_exceeds_capacity() {
        let mut bucket = TokenBucket::new(5, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        bucket.check_limit();
        assert!(bucket.remaining() <= 5);
    }
}

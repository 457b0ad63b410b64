// Graceful shutdown module
// Waits for in-flight connections after the listener is closed

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Wait until no connection is active or `timeout` elapses.
///
/// Returns the number of connections still open when this returns.
/// Open connections are not aborted; they end with the runtime.
pub async fn drain_connections(conn_counter: &AtomicUsize, timeout: Duration) -> usize {
    let active = conn_counter.load(Ordering::SeqCst);
    if active == 0 {
        logger::log_drain_finished(0);
        return 0;
    }

    logger::log_drain_started(active, timeout);
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        let remaining = conn_counter.load(Ordering::SeqCst);
        if remaining == 0 || tokio::time::Instant::now() >= deadline {
            logger::log_drain_finished(remaining);
            return remaining;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL.min(timeout)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_drain_idle_returns_immediately() {
        let counter = AtomicUsize::new(0);
        assert_eq!(drain_connections(&counter, Duration::from_secs(30)).await, 0);
    }

    #[tokio::test]
    async fn test_drain_gives_up_at_deadline() {
        let counter = AtomicUsize::new(2);
        let remaining = drain_connections(&counter, Duration::from_millis(150)).await;
        assert_eq!(remaining, 2);
    }

    #[tokio::test]
    async fn test_drain_waits_for_close() {
        let counter = Arc::new(AtomicUsize::new(1));
        let closer = Arc::clone(&counter);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            closer.fetch_sub(1, Ordering::SeqCst);
        });
        assert_eq!(drain_connections(&counter, Duration::from_secs(5)).await, 0);
    }
}

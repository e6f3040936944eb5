use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Repeating background task with an explicit cancellation handle.
///
/// Replaces ambient interval timers: the caller owns a [`PollerHandle`] and
/// cancellation is guaranteed on every exit path because dropping the handle
/// stops the loop. A tick that is in flight when cancellation arrives runs to
/// completion and its result is discarded; the next loop iteration observes
/// the cancellation and exits.
pub struct Poller;

impl Poller {
    /// Spawns `task` on the runtime: once immediately, then every `interval`.
    /// Ticks never overlap; a slow tick delays the next one.
    pub fn spawn<F, Fut>(interval: Duration, mut task: F) -> PollerHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => task().await,
                    _ = stop_rx.changed() => {
                        debug!("Poller cancelled");
                        break;
                    }
                }
            }
        });
        PollerHandle { stop: stop_tx }
    }
}

pub struct PollerHandle {
    stop: watch::Sender<bool>,
}

impl PollerHandle {
    /// Stops the loop. Equivalent to dropping the handle, spelled out for
    /// call sites where the cancellation is the point.
    pub fn shutdown(self) {
        let _ = self.stop.send(true);
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        let _ = self.stop.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::Poller;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    fn counting_task(count: Arc<AtomicUsize>) -> impl FnMut() -> std::future::Ready<()> {
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_immediately_then_on_interval() {
        let count = Arc::new(AtomicUsize::new(0));
        let _handle = Poller::spawn(Duration::from_secs(5), counting_task(count.clone()));

        sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Poller::spawn(Duration::from_secs(5), counting_task(count.clone()));

        sleep(Duration::from_millis(1)).await;
        handle.shutdown();
        sleep(Duration::from_secs(30)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_too() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let _handle = Poller::spawn(Duration::from_secs(5), counting_task(count.clone()));
            sleep(Duration::from_millis(1)).await;
        }
        sleep(Duration::from_secs(30)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}

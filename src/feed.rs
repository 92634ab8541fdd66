//! Periodic live price feed.
//!
//! A [`LiveFeed`] samples immediately when started and then once per interval,
//! broadcasting every reading to all current subscribers. Stopping the feed
//! (or dropping its handle) ends the task.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::error::GoldcastError;
use crate::domain::live::{LivePriceSampler, PricePoint};

/// Readings buffered per subscriber before the slowest one starts lagging.
pub const DEFAULT_CAPACITY: usize = 16;

pub struct LiveFeed<R = StdRng> {
    sampler: LivePriceSampler<R>,
    interval: Duration,
    sender: broadcast::Sender<PricePoint>,
}

impl<R: Rng + Send + 'static> LiveFeed<R> {
    pub fn new(sampler: LivePriceSampler<R>, interval: Duration) -> Result<Self, GoldcastError> {
        Self::with_capacity(sampler, interval, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(
        sampler: LivePriceSampler<R>,
        interval: Duration,
        capacity: usize,
    ) -> Result<Self, GoldcastError> {
        if interval.is_zero() {
            return Err(GoldcastError::Feed {
                reason: "interval must be non-zero".into(),
            });
        }
        if capacity == 0 {
            return Err(GoldcastError::Feed {
                reason: "capacity must be non-zero".into(),
            });
        }
        let (sender, _) = broadcast::channel(capacity);
        Ok(Self {
            sampler,
            interval,
            sender,
        })
    }

    /// Subscribe before `start` to receive the first reading.
    pub fn subscribe(&self) -> broadcast::Receiver<PricePoint> {
        self.sender.subscribe()
    }

    /// Spawn the sampling task on the current tokio runtime.
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(self) -> LiveFeedHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "starting live feed");
        let task = tokio::spawn(run(
            self.sampler,
            self.interval,
            self.sender.clone(),
            shutdown_rx,
        ));
        LiveFeedHandle {
            sender: self.sender,
            shutdown: shutdown_tx,
            task,
        }
    }
}

pub struct LiveFeedHandle {
    sender: broadcast::Sender<PricePoint>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl LiveFeedHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<PricePoint> {
        self.sender.subscribe()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Signal shutdown and wait for the task. Returns the number of readings
    /// sampled over the feed's lifetime.
    pub async fn stop(self) -> Result<u64, GoldcastError> {
        let _ = self.shutdown.send(true);
        let sampled = self.task.await.map_err(|e| GoldcastError::Feed {
            reason: e.to_string(),
        })?;
        tracing::info!(sampled, "live feed stopped");
        Ok(sampled)
    }
}

async fn run<R: Rng>(
    mut sampler: LivePriceSampler<R>,
    interval: Duration,
    sender: broadcast::Sender<PricePoint>,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sampled = 0u64;

    loop {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let point = sampler.sample();
                tracing::debug!(price = point.price, change = point.change, "live price");
                // no subscribers is not an error
                let _ = sender.send(point);
                sampled += 1;
            }
        }
    }
    sampled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::live::LiveParams;
    use crate::ports::clock_port::Clock;
    use chrono::{DateTime, NaiveDate, Utc};
    use std::sync::Arc;

    struct FixedClock;

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        }

        fn now(&self) -> DateTime<Utc> {
            self.today().and_hms_opt(10, 0, 0).unwrap().and_utc()
        }
    }

    fn sampler(seed: u64) -> LivePriceSampler {
        LivePriceSampler::seeded(seed, Arc::new(FixedClock), LiveParams::default())
    }

    #[test]
    fn zero_interval_rejected() {
        let err = LiveFeed::new(sampler(1), Duration::ZERO).err().unwrap();
        assert!(matches!(err, GoldcastError::Feed { .. }));
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(LiveFeed::with_capacity(sampler(1), Duration::from_secs(1), 0).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn first_reading_is_immediate() {
        let feed = LiveFeed::new(sampler(3), Duration::from_secs(5)).unwrap();
        let mut rx = feed.subscribe();
        let started = tokio::time::Instant::now();
        let handle = feed.start();

        rx.recv().await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(handle.is_running());

        handle.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_stream_for_subscribers() {
        let feed = LiveFeed::new(sampler(3), Duration::from_secs(1)).unwrap();
        let handle = feed.start();
        let mut rx = handle.subscribe();
        rx.recv().await.unwrap();

        let sampled = handle.stop().await.unwrap();
        assert!(sampled >= 1);

        loop {
            match rx.recv().await {
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
    }
}

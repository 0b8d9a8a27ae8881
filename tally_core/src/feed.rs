//! Background crossing-event feed.
//!
//! Spawns a thread that owns the `CrossingDetector` and forwards crossing
//! events over a bounded channel to the single session owner. Unlike a
//! sensor sample stream, crossings are discrete events that must not be
//! dropped, so the producer blocks when the channel is full instead of
//! overwriting.
//!
//! Safety: each `CrossingFeed` spawns exactly one thread that is shut down
//! and joined when the feed is dropped, preventing thread leaks.

use crossbeam_channel as xch;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tally_traits::clock::Clock;
use tally_traits::{CrossingDetector, Direction};

const FEED_CAPACITY: usize = 64;

pub struct CrossingFeed {
    rx: xch::Receiver<Direction>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl CrossingFeed {
    /// Rate-paced feed: polls the detector at `hz`, sleeping between polls.
    pub fn spawn<D, C>(mut detector: D, hz: u32, timeout: Duration, clock: C) -> Self
    where
        D: CrossingDetector + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let (tx, rx) = xch::bounded(FEED_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let period = poll_period(hz);

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("crossing feed received shutdown signal");
                    break;
                }
                if !forward(&mut detector, timeout, &tx) {
                    break;
                }
                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                clock.sleep(period);
            }
            tracing::trace!("crossing feed thread exiting cleanly");
        });

        Self {
            rx,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Event-driven feed: relies on the detector's own blocking `poll`
    /// timing and adds no extra sleeps.
    pub fn spawn_event<D>(mut detector: D, timeout: Duration) -> Self
    where
        D: CrossingDetector + Send + 'static,
    {
        let (tx, rx) = xch::bounded(FEED_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("crossing feed received shutdown signal");
                    break;
                }
                if !forward(&mut detector, timeout, &tx) {
                    break;
                }
                // No sleep: the next iteration blocks in poll() until the
                // detector reports a crossing or times out.
            }
            tracing::trace!("crossing feed thread exiting cleanly");
        });

        Self {
            rx,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Next queued crossing, if any.
    pub fn next(&self) -> Option<Direction> {
        self.rx.try_recv().ok()
    }

    /// Block up to `timeout` for the next crossing.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Direction> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Drain everything currently queued.
    pub fn drain(&self) -> impl Iterator<Item = Direction> + '_ {
        self.rx.try_iter()
    }
}

/// Sleep between paced polls; clamps `hz` to at least 1 and the period to
/// at least one microsecond.
fn poll_period(hz: u32) -> Duration {
    Duration::from_micros((1_000_000 / u64::from(hz.max(1))).max(1))
}

/// Poll once and forward the event; returns false when the consumer is
/// gone and the thread should exit.
fn forward(
    detector: &mut (impl CrossingDetector + Send),
    timeout: Duration,
    tx: &xch::Sender<Direction>,
) -> bool {
    match detector.poll(timeout) {
        Ok(Some(direction)) => {
            // Blocking send: crossings are discrete and must not be lost.
            if tx.send(direction).is_err() {
                tracing::debug!("crossing feed consumer disconnected, exiting thread");
                return false;
            }
            true
        }
        Ok(None) => true,
        Err(e) => {
            // Transient detector faults are the collaborator's concern;
            // keep polling and let the operator see the log.
            tracing::warn!(error = %e, "crossing detector poll failed");
            true
        }
    }
}

impl Drop for CrossingFeed {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Thread exits between polls, or after the current blocking poll
        // returns (bounded by the detector timeout).
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("crossing feed thread joined successfully");
                }
                Err(e) => {
                    tracing::warn!(?e, "crossing feed thread panicked during shutdown");
                }
            }
        }
    }
}

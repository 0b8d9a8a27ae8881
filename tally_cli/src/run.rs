//! Session driver: simulator assembly and the crossing-consumption loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tally_config::Config;
use tally_core::error::Result as CoreResult;
use tally_core::feed::CrossingFeed;
use tally_core::{AggregateSnapshot, StationBuilder};
use tally_hardware::{SimulatedDetector, SimulatedScale};
use tally_traits::clock::MonotonicClock;

use crate::export;

pub struct RunOpts {
    pub crossings: u32,
    pub partial_every: u32,
    pub lot: Option<String>,
    pub seed: Option<u64>,
    pub history: Option<PathBuf>,
    pub rate_hz: u32,
}

/// Drive one simulated session: consume crossings from the feed, capture a
/// partial every `partial_every` applied crossings, then finalize in two
/// steps (request, confirm).
pub fn run_session(
    cfg: &Config,
    opts: &RunOpts,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<AggregateSnapshot> {
    let scale = match opts.seed.or(cfg.weight.seed) {
        Some(seed) => SimulatedScale::seeded(cfg.weight.min_kg, cfg.weight.max_kg, seed),
        None => SimulatedScale::new(cfg.weight.min_kg, cfg.weight.max_kg),
    };
    let detector = match opts.seed.or(cfg.detector.seed) {
        Some(seed) => SimulatedDetector::seeded(cfg.detector.out_ratio, seed),
        None => SimulatedDetector::new(cfg.detector.out_ratio),
    };

    let mut builder = StationBuilder::new()
        .with_scale(scale)
        .with_sample_timeout(Duration::from_millis(cfg.weight.sample_timeout_ms));
    if let Some(lot) = &opts.lot {
        builder = builder.with_lot(lot);
    }
    if let Some(history) = opts.history.clone() {
        let station_name = cfg.station.name.clone();
        builder = builder.on_complete(Box::new(move |event| {
            if let Err(e) = export::append_history(&history, station_name.as_deref(), event) {
                tracing::warn!(error = %e, "failed to append history row");
            }
        }));
    }
    let mut station = builder.build()?;

    let feed = CrossingFeed::spawn(
        detector,
        opts.rate_hz,
        Duration::from_millis(cfg.detector.poll_timeout_ms),
        MonotonicClock::new(),
    );

    let mut applied = 0u32;
    while applied < opts.crossings {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!(applied, "shutdown requested, finalizing early");
            break;
        }
        let Some(direction) = feed.recv_timeout(Duration::from_millis(200)) else {
            continue;
        };
        // Rejected deltas (outbound at zero) are soft; keep consuming.
        if !station.record_crossing(direction) {
            continue;
        }
        applied += 1;
        if applied % opts.partial_every == 0 && station.live_count() > 0 {
            let partial = station.capture_partial()?;
            tracing::info!(
                ordinal = partial.ordinal,
                count = partial.captured_count,
                kg = partial.weight_kg,
                "partial captured"
            );
        }
    }
    // Stop and join the detector thread before finalizing.
    drop(feed);

    // Cover short or interrupted runs that never reached the capture cadence.
    if station.session().partials().is_empty() && station.live_count() > 0 {
        let partial = station.capture_partial()?;
        tracing::info!(
            ordinal = partial.ordinal,
            count = partial.captured_count,
            kg = partial.weight_kg,
            "final partial captured"
        );
    }

    let summary = station.request_finalize()?;
    tracing::info!(
        partials = summary.partial_count,
        total_count = summary.sum_of_captured_counts,
        total_kg = summary.total_weight_kg,
        "finalize requested"
    );
    station.confirm_finalize()
}

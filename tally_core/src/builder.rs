//! Builder for assembling a `Station` from its injected collaborators.

use std::sync::Arc;
use std::time::Duration;

use tally_traits::WeightSource;
use tally_traits::clock::{Clock, MonotonicClock};

use crate::error::{BuildError, Result};
use crate::mocks::NoScale;
use crate::session::CountingSession;
use crate::station::{CompletionHook, Station};

const DEFAULT_SAMPLE_TIMEOUT: Duration = Duration::from_millis(500);

pub struct StationBuilder<W> {
    scale: Option<W>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    sample_timeout: Duration,
    lot: Option<String>,
    on_complete: Option<CompletionHook>,
}

impl StationBuilder<NoScale> {
    pub fn new() -> Self {
        Self {
            scale: None,
            clock: None,
            sample_timeout: DEFAULT_SAMPLE_TIMEOUT,
            lot: None,
            on_complete: None,
        }
    }
}

impl Default for StationBuilder<NoScale> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: WeightSource> StationBuilder<W> {
    /// Weight source sampled on every partial capture. Required.
    pub fn with_scale<T: WeightSource>(self, scale: T) -> StationBuilder<T> {
        StationBuilder {
            scale: Some(scale),
            clock: self.clock,
            sample_timeout: self.sample_timeout,
            lot: self.lot,
            on_complete: self.on_complete,
        }
    }

    /// Clock for partial timestamps; defaults to `MonotonicClock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Per-sample scale timeout; must be non-zero.
    pub fn with_sample_timeout(mut self, timeout: Duration) -> Self {
        self.sample_timeout = timeout;
        self
    }

    /// Pre-set the lot tag on the fresh session.
    pub fn with_lot(mut self, lot: &str) -> Self {
        self.lot = Some(lot.to_string());
        self
    }

    /// Hook invoked with the completion event of every confirmed finalize.
    pub fn on_complete(mut self, hook: CompletionHook) -> Self {
        self.on_complete = Some(hook);
        self
    }

    pub fn build(self) -> Result<Station<W>> {
        let scale = self
            .scale
            .ok_or_else(|| eyre::Report::new(BuildError::MissingWeightSource))?;
        if self.sample_timeout.is_zero() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "sample timeout must be non-zero",
            )));
        }
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));
        let epoch = clock.now();
        let mut session = CountingSession::new(clock.ms_since(epoch));
        if let Some(lot) = &self.lot {
            session.set_lot(lot);
        }
        Ok(Station {
            session,
            scale,
            clock,
            epoch,
            sample_timeout: self.sample_timeout,
            on_complete: self.on_complete,
        })
    }
}

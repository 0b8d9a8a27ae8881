//! The station facade: one owner for all session mutation.
//!
//! `Station` wires the `CountingSession` to its injected collaborators —
//! the weight source sampled on capture, the clock used for timestamps,
//! and the completion hook fired by a confirmed finalize. Crossing events
//! from a detector are expected to arrive through a single caller (see
//! `feed::CrossingFeed`), which serializes all mutation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use eyre::WrapErr;
use tally_traits::clock::Clock;
use tally_traits::{Direction, WeightSource};

use crate::aggregate::{AggregateSnapshot, CompletionEvent};
use crate::builder::StationBuilder;
use crate::error::{Result, map_scale_error};
use crate::partial::{Partial, PartialId};
use crate::session::{CountingSession, SessionStatus};

/// Callback invoked with the final snapshot of every confirmed finalize.
pub type CompletionHook = Box<dyn Fn(&CompletionEvent) + Send>;

pub struct Station<W: WeightSource> {
    pub(crate) session: CountingSession,
    pub(crate) scale: W,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,
    pub(crate) sample_timeout: Duration,
    pub(crate) on_complete: Option<CompletionHook>,
}

impl<W: WeightSource> core::fmt::Debug for Station<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Station")
            .field("status", &self.session.status())
            .field("live_count", &self.session.live_count())
            .field("partials", &self.session.partials().len())
            .finish()
    }
}

impl Station<crate::mocks::NoScale> {
    /// Start building a station; see `StationBuilder`.
    pub fn builder() -> StationBuilder<crate::mocks::NoScale> {
        StationBuilder::new()
    }
}

impl<W: WeightSource> Station<W> {
    /// Read-only view of the underlying session.
    pub fn session(&self) -> &CountingSession {
        &self.session
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn live_count(&self) -> u32 {
        self.session.live_count()
    }

    fn now_ms(&self) -> u64 {
        self.clock.ms_since(self.epoch)
    }

    /// Apply one crossing from the detector. Returns whether the delta was
    /// applied (rejections are soft, per the session contract).
    pub fn record_crossing(&mut self, direction: Direction) -> bool {
        self.session.apply_crossing(direction)
    }

    /// Rejections a capture would hit, checked before any collaborator or
    /// session mutation: a rejected capture must leave everything
    /// untouched, including the scale.
    fn ensure_capturable(&self) -> Result<()> {
        if self.session.status() == SessionStatus::AwaitingConfirmation {
            return Err(crate::error::TallyError::InvalidState(
                "cannot capture while a finalize is pending",
            )
            .into());
        }
        if self.session.live_count() == 0 {
            return Err(crate::error::TallyError::EmptyCount.into());
        }
        Ok(())
    }

    /// Snapshot the live tally with a fresh weight sample.
    ///
    /// The tally and state are validated before the scale is touched, so a
    /// rejected attempt never blocks on hardware.
    pub fn capture_partial(&mut self) -> Result<Partial> {
        self.ensure_capturable()?;
        let weight_kg = self
            .scale
            .sample(self.sample_timeout)
            .map_err(|e| eyre::Report::new(map_scale_error(&*e)))
            .wrap_err("sampling weight")?;
        let now = self.now_ms();
        let partial = self.session.capture_partial(weight_kg, now)?;
        Ok(partial.clone())
    }

    /// Capture with a lot tag attached first. The tag lands on the session
    /// (and therefore on all later partials too), matching the operator
    /// flow of labelling a batch at capture time. A rejected capture
    /// leaves the previous lot in place.
    pub fn capture_partial_tagged(&mut self, lot: &str) -> Result<Partial> {
        self.ensure_capturable()?;
        self.session.set_lot(lot);
        self.capture_partial()
    }

    /// Remove a captured partial; absent ids are an idempotent no-op.
    pub fn remove_partial(&mut self, id: PartialId) -> bool {
        self.session.remove_partial(id)
    }

    pub fn pause(&mut self) -> bool {
        self.session.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.session.resume()
    }

    pub fn set_lot(&mut self, tag: &str) {
        self.session.set_lot(tag);
    }

    pub fn zero_tally(&mut self) -> bool {
        self.session.zero_tally()
    }

    pub fn undo_last(&mut self) -> bool {
        self.session.undo_last()
    }

    /// Validate and open the finalize gate; returns the summary to show
    /// the operator.
    pub fn request_finalize(&mut self) -> Result<AggregateSnapshot> {
        Ok(self.session.request_finalize()?)
    }

    /// Confirm the pending finalize: emits the completion event, resets
    /// the session, and returns the final snapshot.
    pub fn confirm_finalize(&mut self) -> Result<AggregateSnapshot> {
        let lot = self.session.lot().map(str::to_owned);
        let snapshot = self.session.confirm_finalize()?;
        if let Some(hook) = &self.on_complete {
            let event = CompletionEvent {
                snapshot: snapshot.clone(),
                lot,
                finished_at_ms: self.now_ms(),
            };
            hook(&event);
        }
        Ok(snapshot)
    }

    pub fn cancel_finalize(&mut self) -> bool {
        self.session.cancel_finalize()
    }

    /// Derived totals for the current state; recomputed on every call.
    pub fn current_aggregate(&self) -> AggregateSnapshot {
        self.session.aggregate()
    }
}

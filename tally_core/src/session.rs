//! The counting session state machine.
//!
//! One `CountingSession` is the single source of truth per station: the
//! live tally, the pause/finalize status, the optional lot tag, and the
//! ordered collection of captured partials. Every mutation is
//! validate-then-apply and atomic with respect to the session; rejected
//! operations leave it untouched.

use tally_traits::Direction;

use crate::aggregate::{AggregateSnapshot, compute_aggregate};
use crate::error::TallyError;
use crate::partial::{Partial, PartialId};

/// Lifecycle status of a counting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Created, no crossing applied yet.
    Idle,
    /// Accumulating crossings.
    Running,
    /// Crossings are rejected until resumed.
    Paused,
    /// A finalize summary is pending operator confirmation; all mutation
    /// is frozen so the confirmed snapshot matches what was shown.
    AwaitingConfirmation,
}

#[derive(Debug, Clone)]
pub struct CountingSession {
    status: SessionStatus,
    live_count: u32,
    lot: Option<String>,
    partials: Vec<Partial>,
    created_at_ms: u64,
    // 1-based capture-order counter; reset() brings it back to 1.
    next_ordinal: u32,
    // Never reset; keeps partial ids unique across runs.
    next_partial_id: u64,
}

impl CountingSession {
    /// Fresh Idle session with a zero tally.
    pub fn new(created_at_ms: u64) -> Self {
        Self {
            status: SessionStatus::Idle,
            live_count: 0,
            lot: None,
            partials: Vec::new(),
            created_at_ms,
            next_ordinal: 1,
            next_partial_id: 1,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn live_count(&self) -> u32 {
        self.live_count
    }

    pub fn lot(&self) -> Option<&str> {
        self.lot.as_deref()
    }

    /// Captured partials in capture order.
    pub fn partials(&self) -> &[Partial] {
        &self.partials
    }

    pub fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    /// Apply one crossing to the live tally. Returns whether the delta was
    /// applied. Rejected (non-fatal) while Paused or AwaitingConfirmation,
    /// and when an outbound crossing would take the tally below zero.
    /// The first applied crossing starts an Idle session.
    pub fn apply_crossing(&mut self, direction: Direction) -> bool {
        match self.status {
            SessionStatus::Paused => {
                tracing::trace!(?direction, "crossing rejected: session paused");
                return false;
            }
            SessionStatus::AwaitingConfirmation => {
                tracing::trace!(?direction, "crossing rejected: awaiting confirmation");
                return false;
            }
            SessionStatus::Idle => {
                if direction == Direction::Out {
                    tracing::trace!("outbound crossing rejected at zero tally");
                    return false;
                }
                self.status = SessionStatus::Running;
            }
            SessionStatus::Running => {}
        }
        match direction {
            Direction::In => self.live_count += 1,
            Direction::Out => {
                if self.live_count == 0 {
                    tracing::trace!("outbound crossing rejected at zero tally");
                    return false;
                }
                self.live_count -= 1;
            }
        }
        tracing::trace!(live_count = self.live_count, ?direction, "crossing applied");
        true
    }

    /// Running -> Paused. No-op from any other status.
    pub fn pause(&mut self) -> bool {
        if self.status == SessionStatus::Running {
            self.status = SessionStatus::Paused;
            tracing::debug!("session paused");
            true
        } else {
            false
        }
    }

    /// Paused -> Running. No-op from any other status.
    pub fn resume(&mut self) -> bool {
        if self.status == SessionStatus::Paused {
            self.status = SessionStatus::Running;
            tracing::debug!("session resumed");
            true
        } else {
            false
        }
    }

    /// Attach a free-text lot tag to the in-progress session. An empty or
    /// whitespace-only tag clears it. Cleared on reset.
    pub fn set_lot(&mut self, tag: &str) {
        let trimmed = tag.trim();
        self.lot = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Clamp the live tally back to zero without touching partials
    /// (operator "zero" button). No-op while AwaitingConfirmation.
    pub fn zero_tally(&mut self) -> bool {
        if self.status == SessionStatus::AwaitingConfirmation {
            return false;
        }
        if self.live_count != 0 {
            tracing::debug!(discarded = self.live_count, "tally zeroed");
        }
        self.live_count = 0;
        true
    }

    /// Reverse the last increment: decrement the tally by one when it is
    /// positive. Never touches already-captured partials. No-op at zero or
    /// while AwaitingConfirmation.
    pub fn undo_last(&mut self) -> bool {
        if self.status == SessionStatus::AwaitingConfirmation || self.live_count == 0 {
            return false;
        }
        self.live_count -= 1;
        tracing::trace!(live_count = self.live_count, "undo applied");
        true
    }

    /// Capture the current tally plus an independently sampled weight into
    /// an immutable `Partial`. The live tally is cumulative across the
    /// session and is NOT reset by capture. Negative samples clamp to 0.
    pub fn capture_partial(
        &mut self,
        weight_kg: f32,
        now_ms: u64,
    ) -> Result<&Partial, TallyError> {
        if self.status == SessionStatus::AwaitingConfirmation {
            return Err(TallyError::InvalidState(
                "cannot capture while a finalize is pending",
            ));
        }
        if self.live_count == 0 {
            return Err(TallyError::EmptyCount);
        }
        let weight_kg = if weight_kg.is_finite() && weight_kg >= 0.0 {
            weight_kg
        } else {
            tracing::warn!(weight_kg, "invalid weight sample clamped to 0");
            0.0
        };

        let partial = Partial {
            id: PartialId(self.next_partial_id),
            ordinal: self.next_ordinal,
            captured_count: self.live_count,
            weight_kg,
            captured_at_ms: now_ms,
            lot: self.lot.clone(),
        };
        self.next_partial_id += 1;
        self.next_ordinal += 1;
        tracing::info!(
            ordinal = partial.ordinal,
            captured_count = partial.captured_count,
            weight_kg = partial.weight_kg,
            "partial captured"
        );
        self.partials.push(partial);
        // push cannot leave the vec empty
        Ok(self.partials.last().unwrap_or_else(|| unreachable!()))
    }

    /// Remove the matching partial if present. Absent ids are an
    /// idempotent no-op, not an error. Surviving ordinals are unchanged.
    pub fn remove_partial(&mut self, id: PartialId) -> bool {
        let before = self.partials.len();
        self.partials.retain(|p| p.id != id);
        let removed = self.partials.len() != before;
        if removed {
            tracing::info!(%id, "partial removed");
        } else {
            tracing::trace!(%id, "remove ignored: no such partial");
        }
        removed
    }

    /// First half of the finalize gate: validate and expose the summary.
    /// Fails (state unchanged) when no partials have been captured. Valid
    /// from Running or Paused.
    pub fn request_finalize(&mut self) -> Result<AggregateSnapshot, TallyError> {
        match self.status {
            SessionStatus::AwaitingConfirmation => {
                return Err(TallyError::InvalidState("finalize already pending"));
            }
            SessionStatus::Idle => {
                return Err(TallyError::InvalidState("session has not started"));
            }
            SessionStatus::Running | SessionStatus::Paused => {}
        }
        if self.partials.is_empty() {
            return Err(TallyError::EmptyPartials);
        }
        self.status = SessionStatus::AwaitingConfirmation;
        let summary = compute_aggregate(self);
        tracing::info!(
            partials = summary.partial_count,
            total_weight_kg = summary.total_weight_kg,
            "finalize requested"
        );
        Ok(summary)
    }

    /// Second half of the finalize gate: atomically reset the session and
    /// return the pre-reset snapshot. Only valid while a finalize summary
    /// is pending.
    pub fn confirm_finalize(&mut self) -> Result<AggregateSnapshot, TallyError> {
        if self.status != SessionStatus::AwaitingConfirmation {
            return Err(TallyError::InvalidState("no finalize pending"));
        }
        let snapshot = compute_aggregate(self);
        self.reset();
        tracing::info!(
            partials = snapshot.partial_count,
            sum_of_captured_counts = snapshot.sum_of_captured_counts,
            "session finalized"
        );
        Ok(snapshot)
    }

    /// Back out of a pending finalize with no other state change.
    pub fn cancel_finalize(&mut self) -> bool {
        if self.status == SessionStatus::AwaitingConfirmation {
            self.status = SessionStatus::Running;
            tracing::debug!("finalize cancelled");
            true
        } else {
            false
        }
    }

    /// Derived totals for the current state.
    pub fn aggregate(&self) -> AggregateSnapshot {
        compute_aggregate(self)
    }

    // Internal: reachable only through confirm_finalize. Partial ids keep
    // counting up so exported history rows never collide.
    pub(crate) fn reset(&mut self) {
        self.live_count = 0;
        self.partials.clear();
        self.lot = None;
        self.next_ordinal = 1;
        self.status = SessionStatus::Idle;
    }
}

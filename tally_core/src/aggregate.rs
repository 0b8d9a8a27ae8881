//! Pure, stateless derivation of totals and averages from the partial set.

use crate::session::CountingSession;

/// Derived totals for a session. Never persisted; recomputed on every call
/// since the partial set per run is small and mutation is infrequent.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSnapshot {
    pub total_weight_kg: f32,
    pub average_weight_kg: f32,
    pub partial_count: usize,
    pub sum_of_captured_counts: u64,
    pub current_live_count: u32,
}

/// Payload of the completion signal emitted by a confirmed finalize,
/// consumed by the history/export collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionEvent {
    pub snapshot: AggregateSnapshot,
    pub lot: Option<String>,
    pub finished_at_ms: u64,
}

/// Compute the aggregate view of `session`.
pub fn compute_aggregate(session: &CountingSession) -> AggregateSnapshot {
    let partials = session.partials();
    let partial_count = partials.len();
    let total_weight_kg: f32 = partials.iter().map(|p| p.weight_kg).sum();
    let average_weight_kg = if partial_count > 0 {
        total_weight_kg / partial_count as f32
    } else {
        0.0
    };
    let sum_of_captured_counts: u64 = partials.iter().map(|p| u64::from(p.captured_count)).sum();

    AggregateSnapshot {
        total_weight_kg,
        average_weight_kg,
        partial_count,
        sum_of_captured_counts,
        current_live_count: session.live_count(),
    }
}

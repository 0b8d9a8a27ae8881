//! Immutable weighed-batch snapshots recorded mid-session.

/// Opaque unique identifier for a captured partial.
///
/// Ids are allocated from a monotonically increasing counter that survives
/// session resets, so rows exported to history never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartialId(pub u64);

impl core::fmt::Display for PartialId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of the live tally plus one independently sampled weight.
///
/// `captured_count` is the cumulative live tally at capture time; capture
/// does not reset the tally. `ordinal` is a 1-based capture-order
/// identifier and is never re-indexed when other partials are removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Partial {
    pub id: PartialId,
    pub ordinal: u32,
    pub captured_count: u32,
    pub weight_kg: f32,
    pub captured_at_ms: u64,
    pub lot: Option<String>,
}

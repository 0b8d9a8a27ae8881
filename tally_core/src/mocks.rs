//! Test and helper fakes for tally_core.

use std::collections::VecDeque;
use std::time::Duration;

use tally_traits::{CrossingDetector, Direction, WeightSource};

/// A weight source that always errors; placeholder type parameter for the
/// builder before a real source is attached.
pub struct NoScale;

impl WeightSource for NoScale {
    fn sample(
        &mut self,
        _timeout: Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("no weight source")))
    }
}

/// A weight source whose platform is permanently offline.
pub struct FailingScale;

impl WeightSource for FailingScale {
    fn sample(
        &mut self,
        _timeout: Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("weighing platform offline")))
    }
}

/// Deterministic weight source returning a fixed reading.
pub struct ConstScale(pub f32);

impl WeightSource for ConstScale {
    fn sample(
        &mut self,
        _timeout: Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.0)
    }
}

/// Weight source that replays a fixed sequence, then repeats the last
/// value. Panics if constructed empty.
pub struct SequenceScale {
    readings: Vec<f32>,
    idx: usize,
}

impl SequenceScale {
    pub fn new(readings: Vec<f32>) -> Self {
        assert!(!readings.is_empty(), "SequenceScale needs at least one reading");
        Self { readings, idx: 0 }
    }
}

impl WeightSource for SequenceScale {
    fn sample(
        &mut self,
        _timeout: Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        let i = self.idx.min(self.readings.len() - 1);
        self.idx = self.idx.saturating_add(1);
        Ok(self.readings[i])
    }
}

/// Detector that replays a scripted list of poll outcomes, then reports
/// quiet polls forever.
pub struct ScriptedDetector {
    events: VecDeque<Option<Direction>>,
}

impl ScriptedDetector {
    pub fn new(events: impl IntoIterator<Item = Option<Direction>>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Convenience: a burst of `n` inbound crossings.
    pub fn inbound(n: usize) -> Self {
        Self::new(std::iter::repeat_n(Some(Direction::In), n))
    }
}

impl CrossingDetector for ScriptedDetector {
    fn poll(
        &mut self,
        _timeout: Duration,
    ) -> Result<Option<Direction>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.events.pop_front().flatten())
    }
}

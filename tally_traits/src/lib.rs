pub mod clock;

pub use clock::{Clock, MonotonicClock, TestClock};

/// Direction of a single crossing event over the camera line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Animal crossed into the counted area (+1).
    In,
    /// Animal crossed back out (-1).
    Out,
}

impl Direction {
    /// Signed delta this crossing applies to the live tally.
    #[inline]
    pub fn delta(self) -> i32 {
        match self {
            Direction::In => 1,
            Direction::Out => -1,
        }
    }
}

/// Weighing platform abstraction. `sample` returns one independent weight
/// reading in kilograms for whatever is on the platform right now.
pub trait WeightSource {
    fn sample(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>>;
}

/// Crossing detector abstraction (camera line sensor or simulator).
///
/// `poll` blocks up to `timeout` waiting for the next crossing; `Ok(None)`
/// means no crossing occurred within the window (not an error).
pub trait CrossingDetector {
    fn poll(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Option<Direction>, Box<dyn std::error::Error + Send + Sync>>;
}

use serde::{Deserialize, Serialize};

/// The measurement window a snapshot was captured over.
///
/// Times are nanoseconds from an arbitrary monotonic origin. Ticks come from
/// the host's fixed-rate simulation clock and are unrelated to wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunWindow {
    pub start_time: u64,
    pub end_time: u64,
    pub start_tick: u64,
    pub end_tick: u64,
}

impl RunWindow {
    pub fn new(start_time: u64, end_time: u64, start_tick: u64, end_tick: u64) -> Self {
        Self {
            start_time,
            end_time,
            start_tick,
            end_tick,
        }
    }

    /// Elapsed wall time in nanoseconds, saturating at zero.
    pub fn time_span(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }

    /// Elapsed ticks, saturating at zero.
    pub fn tick_span(&self) -> u64 {
        self.end_tick.saturating_sub(self.start_tick)
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountdownState {
    Running,
    Expired,
}

/// Per-question countdown advanced explicitly by the caller's ticks.
///
/// Dropping or replacing the value is the only way to cancel it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    limit_ms: u64,
    elapsed_ms: u64,
}

impl Countdown {
    pub fn new(limit_secs: u32) -> Self {
        Self {
            limit_ms: limit_secs as u64 * 1000,
            elapsed_ms: 0,
        }
    }

    pub fn advance(&mut self, dt: Duration) -> CountdownState {
        let dt_ms = u64::try_from(dt.as_millis()).unwrap_or(u64::MAX);
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms).min(self.limit_ms);
        self.state()
    }

    pub fn state(&self) -> CountdownState {
        if self.elapsed_ms >= self.limit_ms {
            CountdownState::Expired
        } else {
            CountdownState::Running
        }
    }

    pub fn is_expired(&self) -> bool {
        self.state() == CountdownState::Expired
    }

    pub fn limit_secs(&self) -> u32 {
        (self.limit_ms / 1000) as u32
    }

    /// Whole seconds spent so far, rounded down
    pub fn elapsed_secs(&self) -> u32 {
        (self.elapsed_ms / 1000) as u32
    }

    /// Whole seconds left, rounded up so the display only reads 0 once expired
    pub fn remaining_secs(&self) -> u32 {
        let remaining = self.limit_ms.saturating_sub(self.elapsed_ms);
        remaining.div_ceil(1000) as u32
    }

    pub fn fraction_remaining(&self) -> f64 {
        if self.limit_ms == 0 {
            return 0.0;
        }
        self.limit_ms.saturating_sub(self.elapsed_ms) as f64 / self.limit_ms as f64
    }
}

/// Per-column rate limiter for haptic/audio ticks.
///
/// Each column owns one, so ticks from different columns never hold each
/// other back.
#[derive(Debug, Clone)]
pub struct TickThrottle {
    min_interval_ms: f64,
    last_tick_at: Option<f64>,
}

impl TickThrottle {
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms: min_interval_ms.max(0.0),
            last_tick_at: None,
        }
    }

    /// Returns true (and records the tick) if enough time has passed.
    pub fn try_tick(&mut self, now: f64) -> bool {
        match self.last_tick_at {
            Some(last) if now - last < self.min_interval_ms && now >= last => false,
            _ => {
                self.last_tick_at = Some(now);
                true
            }
        }
    }

    pub fn min_interval_ms(&self) -> f64 {
        self.min_interval_ms
    }
}

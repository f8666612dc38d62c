//! Velocity tracking for fling classification.
//!
//! Offsets arrive once per frame and are noisy. Each accepted sample updates
//! an exponentially smoothed velocity, which is pushed into a short FIFO; the
//! mean of that FIFO is what classifies a release as slow or fast.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::PickerConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Slow,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityConfig {
    /// FIFO capacity.
    pub history_size: usize,
    /// Weight of the previous smoothed value, in `[0, 1)`.
    pub smoothing: f64,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            history_size: 5,
            smoothing: 0.85,
        }
    }
}

impl VelocityConfig {
    pub fn validate(&self) -> Result<(), PickerConfigError> {
        if self.history_size == 0 {
            return Err(PickerConfigError::InvalidTunable {
                field: "history_size",
                message: "must be at least 1".into(),
            });
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(PickerConfigError::InvalidTunable {
                field: "smoothing",
                message: "must be in [0, 1)".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Anchor {
    offset: f64,
    at: f64,
}

/// Smoothed, windowed velocity in px/ms.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    config: VelocityConfig,
    fast_threshold: f64,
    samples: VecDeque<f64>,
    anchor: Option<Anchor>,
    smoothed: f64,
    windowed_average: f64,
}

impl VelocityTracker {
    pub fn new(config: VelocityConfig, fast_threshold: f64) -> Result<Self, PickerConfigError> {
        config.validate()?;
        Ok(Self {
            samples: VecDeque::with_capacity(config.history_size),
            config,
            fast_threshold,
            anchor: None,
            smoothed: 0.0,
            windowed_average: 0.0,
        })
    }

    /// Feed an absolute offset observed at `timestamp` (ms).
    ///
    /// Returns the raw velocity when the sample was accepted. Non-finite
    /// input and non-increasing timestamps are dropped without touching
    /// any state.
    pub fn record(&mut self, offset: f64, timestamp: f64) -> Option<f64> {
        if !offset.is_finite() || !timestamp.is_finite() {
            tracing::trace!(offset, timestamp, "dropping non-finite velocity sample");
            return None;
        }
        let Some(anchor) = self.anchor else {
            self.anchor = Some(Anchor {
                offset,
                at: timestamp,
            });
            return None;
        };
        let dt = timestamp - anchor.at;
        if dt <= 0.0 {
            tracing::trace!(dt, "dropping velocity sample with non-positive time delta");
            return None;
        }
        let raw = (offset - anchor.offset) / dt;
        let alpha = self.config.smoothing;
        self.smoothed = alpha * self.smoothed + (1.0 - alpha) * raw;

        if self.samples.len() == self.config.history_size {
            self.samples.pop_front();
        }
        self.samples.push_back(self.smoothed);
        self.windowed_average = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        self.anchor = Some(Anchor {
            offset,
            at: timestamp,
        });
        Some(raw)
    }

    /// Move the anchor along with a rehome so the jump is not read as motion.
    pub fn shift(&mut self, delta: f64) {
        if let Some(anchor) = &mut self.anchor {
            anchor.offset += delta;
        }
    }

    pub fn classify(&self) -> Speed {
        if self.windowed_average.abs() > self.fast_threshold {
            Speed::Fast
        } else {
            Speed::Slow
        }
    }

    /// Forget everything from the previous gesture.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.anchor = None;
        self.smoothed = 0.0;
        self.windowed_average = 0.0;
    }

    pub fn smoothed_velocity(&self) -> f64 {
        self.smoothed
    }

    pub fn windowed_average(&self) -> f64 {
        self.windowed_average
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn fast_threshold(&self) -> f64 {
        self.fast_threshold
    }
}

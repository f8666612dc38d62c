//! Deterministic replay of gesture scripts.
//!
//! A script names a preset picker, optional starting values and a list of
//! timed gestures. Replaying it drives the picker with a synthetic frame
//! clock and records every event, which makes picker behaviour reproducible
//! from the CLI and in regression tests.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, SelectionError};
use crate::events::Event;
use crate::picker::CompositePicker;
use crate::presets::{PresetKind, PresetOptions, WheelValue};

/// Longest scripted drag; each frame of a drag produces one sample.
const MAX_DRAG_MS: f64 = 60_000.0;

fn default_frame_ms() -> f64 {
    16.0
}

fn default_max_settle_ms() -> f64 {
    10_000.0
}

/// One timed host input. Times are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gesture {
    DragStart {
        column: String,
        at: f64,
    },
    /// Absolute offset sample.
    Sample {
        column: String,
        offset: f64,
        at: f64,
    },
    /// Drag start followed by one sample per frame covering `distance` px
    /// in `duration_ms`. Does not release.
    Drag {
        column: String,
        distance: f64,
        duration_ms: f64,
        at: f64,
    },
    DragEnd {
        column: String,
        at: f64,
    },
    MomentumEnd {
        column: String,
        at: f64,
    },
    Tap {
        column: String,
        value: WheelValue,
        at: f64,
    },
    /// Run frames up to `until`.
    Frames {
        until: f64,
    },
    /// Run frames until every column is at rest.
    Settle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureScript {
    pub picker: PresetKind,
    #[serde(default)]
    pub initial: Option<Vec<WheelValue>>,
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
    #[serde(default = "default_max_settle_ms")]
    pub max_settle_ms: f64,
    pub gestures: Vec<Gesture>,
}

impl GestureScript {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let script: Self = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    /// Reject timings that would stall or corrupt the frame clock.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.frame_ms.is_finite() || self.frame_ms <= 0.0 {
            return Err(CoreError::Script(format!(
                "frame_ms must be positive, got {}",
                self.frame_ms
            )));
        }
        if !self.max_settle_ms.is_finite() || self.max_settle_ms < 0.0 {
            return Err(CoreError::Script(format!(
                "max_settle_ms must be finite and non-negative, got {}",
                self.max_settle_ms
            )));
        }
        for (i, gesture) in self.gestures.iter().enumerate() {
            let times = match gesture {
                Gesture::Drag {
                    distance,
                    duration_ms,
                    at,
                    ..
                } => {
                    if !(0.0..=MAX_DRAG_MS).contains(duration_ms) {
                        return Err(CoreError::Script(format!(
                            "gesture {i}: drag duration must be within 0..={MAX_DRAG_MS} ms"
                        )));
                    }
                    vec![*at, *distance]
                }
                Gesture::Sample { offset, at, .. } => vec![*at, *offset],
                Gesture::DragStart { at, .. }
                | Gesture::DragEnd { at, .. }
                | Gesture::MomentumEnd { at, .. }
                | Gesture::Tap { at, .. } => vec![*at],
                Gesture::Frames { until } => vec![*until],
                Gesture::Settle => Vec::new(),
            };
            if times.iter().any(|t| !t.is_finite()) {
                return Err(CoreError::Script(format!(
                    "gesture {i} has a non-finite time or offset"
                )));
            }
        }
        Ok(())
    }
}

/// Everything a replay produced.
#[derive(Debug, Clone, Serialize)]
pub struct Replay {
    pub events: Vec<Event<WheelValue>>,
    pub commit: Vec<WheelValue>,
    pub at_rest: bool,
    pub ended_at: f64,
}

/// Drives a picker with a fixed-step frame clock.
#[derive(Debug)]
pub struct Simulator {
    picker: CompositePicker<WheelValue>,
    frame_ms: f64,
    max_settle_ms: f64,
    now: f64,
    events: Vec<Event<WheelValue>>,
}

impl Simulator {
    pub fn new(picker: CompositePicker<WheelValue>, frame_ms: f64) -> Self {
        Self {
            picker,
            frame_ms: if frame_ms > 0.0 { frame_ms } else { default_frame_ms() },
            max_settle_ms: default_max_settle_ms(),
            now: 0.0,
            events: Vec::new(),
        }
    }

    pub fn with_max_settle_ms(mut self, max_settle_ms: f64) -> Self {
        self.max_settle_ms = max_settle_ms;
        self
    }

    pub fn picker(&self) -> &CompositePicker<WheelValue> {
        &self.picker
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn events(&self) -> &[Event<WheelValue>] {
        &self.events
    }

    /// Run whole frames up to `until`, then park the clock there.
    ///
    /// Frames only run while some column animates. Idle and dragging
    /// columns ignore frames, so the clock jumps straight to `until`.
    pub fn run_until(&mut self, until: f64) {
        while self.now + self.frame_ms <= until && self.is_animating() {
            self.now += self.frame_ms;
            let frame = self.picker.on_frame(self.now);
            self.events.extend(frame);
        }
        if until > self.now {
            self.now = until;
        }
    }

    fn is_animating(&self) -> bool {
        self.picker
            .columns()
            .iter()
            .any(|c| c.state().is_animating())
    }

    /// Run frames until every column is at rest or the settle cap runs out.
    pub fn settle(&mut self) -> bool {
        let deadline = self.now + self.max_settle_ms;
        while !self.picker.is_at_rest() && self.now < deadline {
            self.run_until(self.now + self.frame_ms);
        }
        self.picker.is_at_rest()
    }

    pub fn apply(&mut self, gesture: &Gesture) -> Result<(), SelectionError> {
        match gesture {
            Gesture::DragStart { column, at } => {
                self.run_until(*at);
                let events = self.picker.on_drag_start(column, self.now)?;
                self.events.extend(events);
            }
            Gesture::Sample { column, offset, at } => {
                self.run_until(*at);
                let events = self.picker.on_scroll_sample(column, *offset, self.now)?;
                self.events.extend(events);
            }
            Gesture::Drag {
                column,
                distance,
                duration_ms,
                at,
            } => self.drag(column, *distance, *duration_ms, *at)?,
            Gesture::DragEnd { column, at } => {
                self.run_until(*at);
                let events = self.picker.on_drag_end(column, self.now)?;
                self.events.extend(events);
            }
            Gesture::MomentumEnd { column, at } => {
                self.run_until(*at);
                let events = self.picker.on_momentum_end(column, self.now)?;
                self.events.extend(events);
            }
            Gesture::Tap { column, value, at } => {
                self.run_until(*at);
                let events = self.picker.on_item_tap(column, value, self.now)?;
                self.events.extend(events);
            }
            Gesture::Frames { until } => self.run_until(*until),
            Gesture::Settle => {
                if !self.settle() {
                    tracing::warn!(now = self.now, "picker did not settle within the cap");
                }
            }
        }
        Ok(())
    }

    fn drag(
        &mut self,
        column: &str,
        distance: f64,
        duration_ms: f64,
        at: f64,
    ) -> Result<(), SelectionError> {
        self.run_until(at);
        let events = self.picker.on_drag_start(column, self.now)?;
        self.events.extend(events);

        let steps = (duration_ms / self.frame_ms).ceil().max(1.0) as usize;
        let per_step = distance / steps as f64;
        let start = self.now;
        for step in 1..=steps {
            self.run_until(start + duration_ms * step as f64 / steps as f64);
            let current = self
                .picker
                .column(column)
                .map(|c| c.offset())
                .ok_or_else(|| SelectionError::UnknownColumn(column.to_string()))?;
            let events = self
                .picker
                .on_scroll_sample(column, current + per_step, self.now)?;
            self.events.extend(events);
        }
        Ok(())
    }

    pub fn finish(self) -> Replay {
        Replay {
            commit: self.picker.commit(),
            at_rest: self.picker.is_at_rest(),
            ended_at: self.now,
            events: self.events,
        }
    }
}

/// Build the script's picker and replay every gesture in order.
pub fn replay(script: &GestureScript, options: &PresetOptions) -> Result<Replay, CoreError> {
    script.validate()?;
    let mut picker = script.picker.build(options)?;
    if let Some(initial) = &script.initial {
        picker.reset(initial)?;
    }
    let mut sim = Simulator::new(picker, script.frame_ms).with_max_settle_ms(script.max_settle_ms);
    for gesture in &script.gestures {
        sim.apply(gesture)?;
    }
    tracing::debug!(
        gestures = script.gestures.len(),
        events = sim.events().len(),
        "replay finished"
    );
    Ok(sim.finish())
}

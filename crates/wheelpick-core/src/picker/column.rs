//! One picker column: value sequence, offset, velocity and snap state.
//!
//! The column is the only writer of its offset. Every input method returns
//! the events it produced, in order.

use serde::{Deserialize, Serialize};

use super::feedback::TickThrottle;
use super::index_space::{IndexSpace, Rehome};
use super::sequence::ValueSequence;
use super::snap::{DampingProfile, SnapController, SnapState, SnapTiming, Step};
use super::transform::{visible_items, TransformProfile, VisibleItem};
use super::velocity::{VelocityConfig, VelocityTracker};
use crate::error::{PickerConfigError, SelectionError};
use crate::events::Event;

/// Construction parameters for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Length of one item along the scroll axis, px.
    pub item_extent: f64,
    /// Items visible at once; odd so one sits in the middle.
    pub visible_window: usize,
    /// Padding copies beyond each edge of a circular sequence.
    pub boundary_margin: usize,
    /// Minimum spacing between feedback ticks.
    pub tick_interval_ms: f64,
    pub velocity: VelocityConfig,
    /// Used when the sequence carries no profile of its own.
    pub damping: DampingProfile,
    pub snap: SnapTiming,
    pub transform: TransformProfile,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            item_extent: 40.0,
            visible_window: 5,
            boundary_margin: 3,
            velocity: VelocityConfig::default(),
            damping: DampingProfile::numeric(),
            snap: SnapTiming::default(),
            tick_interval_ms: 35.0,
            transform: TransformProfile::default(),
        }
    }
}

impl ColumnConfig {
    pub fn with_item_extent(mut self, item_extent: f64) -> Self {
        self.item_extent = item_extent;
        self
    }

    pub fn with_boundary_margin(mut self, boundary_margin: usize) -> Self {
        self.boundary_margin = boundary_margin;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PickerColumn<V> {
    name: String,
    sequence: ValueSequence<V>,
    space: IndexSpace,
    visible_window: usize,
    transform: TransformProfile,
    tracker: VelocityTracker,
    controller: SnapController,
    throttle: TickThrottle,
    offset: f64,
    current_index: usize,
}

impl<V: Clone + PartialEq> PickerColumn<V> {
    /// Build a column showing `initial`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a non-positive item extent, an even
    /// visible window, a zero margin on a circular sequence, invalid
    /// tunables, or an initial value outside the sequence.
    pub fn new(
        name: impl Into<String>,
        sequence: ValueSequence<V>,
        initial: &V,
        config: &ColumnConfig,
    ) -> Result<Self, PickerConfigError> {
        let name = name.into();
        if config.visible_window == 0 || config.visible_window % 2 == 0 {
            return Err(PickerConfigError::InvalidVisibleWindow(config.visible_window));
        }
        let space = IndexSpace::new(
            sequence.len(),
            config.item_extent,
            config.boundary_margin,
            sequence.is_circular(),
        )?;
        let damping = sequence.damping().copied().unwrap_or(config.damping);
        let tracker = VelocityTracker::new(config.velocity, damping.fast_threshold)?;
        let controller = SnapController::new(damping, config.snap)?;
        let current_index = sequence
            .position(initial)
            .ok_or_else(|| PickerConfigError::InitialValueMissing {
                column: name.clone(),
            })?;

        Ok(Self {
            offset: space.home_offset(current_index),
            name,
            sequence,
            space,
            visible_window: config.visible_window,
            transform: config.transform,
            tracker,
            controller,
            throttle: TickThrottle::new(config.tick_interval_ms),
            current_index,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence(&self) -> &ValueSequence<V> {
        &self.sequence
    }

    pub fn index_space(&self) -> &IndexSpace {
        &self.space
    }

    pub fn state(&self) -> SnapState {
        self.controller.state()
    }

    pub fn controller(&self) -> &SnapController {
        &self.controller
    }

    pub fn velocity(&self) -> &VelocityTracker {
        &self.tracker
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Value under the selection center for the offset currently shown.
    pub fn current_value(&self) -> &V {
        &self.sequence.values()[self.current_index]
    }

    pub fn visible_window(&self) -> usize {
        self.visible_window
    }

    /// Slots the host should paint this frame, with their transforms.
    pub fn visible_items(&self) -> Vec<VisibleItem> {
        visible_items(&self.space, self.offset, self.visible_window, &self.transform)
    }

    // ── Input ────────────────────────────────────────────────────────

    pub fn on_drag_start(&mut self, now: f64) -> Vec<Event<V>> {
        let mut events = Vec::new();
        let superseded = self.controller.begin_drag();
        self.push_cancelled(superseded, &mut events);
        self.tracker.reset();
        self.tracker.record(self.offset, now);
        self.push_transitions(&mut events);
        events
    }

    /// Absolute scroll offset reported by the host surface.
    ///
    /// While dragging the sample moves the column and feeds the velocity
    /// tracker. At rest it is applied passively, clamped to the ends of a
    /// bounded sequence. During momentum or snapping the engine owns the
    /// offset and the sample is ignored.
    pub fn on_scroll_sample(&mut self, offset: f64, now: f64) -> Vec<Event<V>> {
        let mut events = Vec::new();
        if !offset.is_finite() || !now.is_finite() {
            tracing::trace!(column = %self.name, offset, now, "discarding malformed sample");
            return events;
        }
        match self.state() {
            SnapState::Dragging => {
                self.tracker.record(offset, now);
                self.apply_offset(offset, now, true, &mut events);
            }
            SnapState::AtRest => {
                // Bounded columns only overscroll while dragging.
                let offset = self.space.clamp_offset(offset);
                self.apply_offset(offset, now, false, &mut events);
            }
            state => {
                tracing::trace!(column = %self.name, ?state, "ignoring sample during animation");
            }
        }
        events
    }

    pub fn on_drag_end(&mut self, now: f64) -> Vec<Event<V>> {
        let mut events = Vec::new();
        if self.state() != SnapState::Dragging {
            return events;
        }
        let speed = self.tracker.classify();
        let velocity = self.tracker.windowed_average();
        tracing::debug!(column = %self.name, ?speed, velocity, "drag released");
        self.controller.release(speed, velocity, now);
        self.push_transitions(&mut events);
        events
    }

    /// Host-driven momentum finished; settle from the current offset.
    pub fn on_momentum_end(&mut self, now: f64) -> Vec<Event<V>> {
        let mut events = Vec::new();
        let step = self.controller.end_momentum(self.offset, now, &self.space);
        self.apply_step(step, now, false, &mut events);
        events
    }

    /// Advance momentum/snapping to frame time `now`.
    pub fn on_frame(&mut self, now: f64) -> Vec<Event<V>> {
        let mut events = Vec::new();
        let state = self.state();
        if !state.is_animating() {
            return events;
        }
        let step = self.controller.advance(self.offset, now, &self.space);
        self.apply_step(step, now, state == SnapState::Momentum, &mut events);
        events
    }

    /// Animate to `value` along the shortest path.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::ValueNotInSequence`] and leaves the column
    /// untouched if `value` is not part of the sequence.
    pub fn select_value(&mut self, value: &V, now: f64) -> Result<Vec<Event<V>>, SelectionError> {
        let index = self.index_of(value)?;
        let mut events = Vec::new();
        let target = self.space.nearest_offset_for(index, self.offset);
        let (superseded, step) = self.controller.select(self.offset, target, now);
        self.tracker.reset();
        self.push_cancelled(superseded, &mut events);
        self.apply_step(step, now, false, &mut events);
        Ok(events)
    }

    /// Tap on a visible item.
    pub fn on_item_tap(&mut self, value: &V, now: f64) -> Result<Vec<Event<V>>, SelectionError> {
        self.select_value(value, now)
    }

    /// Jump to `value` immediately, without animation.
    pub fn reset(&mut self, value: &V) -> Result<Vec<Event<V>>, SelectionError> {
        let index = self.index_of(value)?;
        let mut events = Vec::new();
        let superseded = self.controller.cancel();
        self.push_cancelled(superseded, &mut events);
        self.push_transitions(&mut events);
        self.tracker.reset();
        self.offset = self.space.home_offset(index);
        self.refresh_value(0.0, false, &mut events);
        events.push(Event::RenderFrame {
            column: self.name.clone(),
            offset: self.offset,
        });
        Ok(events)
    }

    /// Check a value without touching state.
    pub fn index_of(&self, value: &V) -> Result<usize, SelectionError> {
        self.sequence
            .position(value)
            .ok_or_else(|| SelectionError::ValueNotInSequence {
                column: self.name.clone(),
            })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply_step(&mut self, step: Step, now: f64, tick: bool, events: &mut Vec<Event<V>>) {
        if step.offset != self.offset {
            self.apply_offset(step.offset, now, tick, events);
        } else if self.space.needs_rehome(self.offset) != Rehome::None {
            self.apply_offset(self.offset, now, false, events);
        }
        self.push_transitions(events);
        if let Some(generation) = step.settled {
            events.push(Event::Settled {
                column: self.name.clone(),
                generation,
                value: self.current_value().clone(),
            });
        }
    }

    fn apply_offset(&mut self, offset: f64, now: f64, tick: bool, events: &mut Vec<Event<V>>) {
        self.offset = offset;
        if self.space.needs_rehome(offset) != Rehome::None {
            let rehomed = self.space.rehome(offset);
            let delta = self.space.rehome_shift(offset);
            self.offset = rehomed;
            self.tracker.shift(delta);
            self.controller.shift(delta);
            tracing::debug!(column = %self.name, from = offset, to = rehomed, "rehomed");
            events.push(Event::Rehomed {
                column: self.name.clone(),
                from: offset,
                offset: rehomed,
            });
        }
        self.refresh_value(now, tick, events);
        events.push(Event::RenderFrame {
            column: self.name.clone(),
            offset: self.offset,
        });
    }

    fn refresh_value(&mut self, now: f64, tick: bool, events: &mut Vec<Event<V>>) {
        let index = self.space.index_at(self.offset);
        if index == self.current_index {
            return;
        }
        self.current_index = index;
        events.push(Event::ValueChanged {
            column: self.name.clone(),
            index,
            value: self.current_value().clone(),
        });
        if tick && self.throttle.try_tick(now) {
            events.push(Event::Tick {
                column: self.name.clone(),
                at: now,
            });
        }
    }

    fn push_cancelled(&self, superseded: Option<u64>, events: &mut Vec<Event<V>>) {
        if let Some(generation) = superseded {
            events.push(Event::AnimationCancelled {
                column: self.name.clone(),
                generation,
            });
        }
    }

    fn push_transitions(&mut self, events: &mut Vec<Event<V>>) {
        for state in self.controller.take_transitions() {
            events.push(Event::PhaseChanged {
                column: self.name.clone(),
                state,
            });
        }
    }
}

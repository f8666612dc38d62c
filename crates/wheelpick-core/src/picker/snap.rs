//! Drag → momentum → snap state machine.
//!
//! Like the rest of the engine this has no internal clock: the caller feeds
//! frame timestamps through [`SnapController::advance`] and applies the
//! returned offset.
//!
//! ## State Transitions
//!
//! ```text
//! AtRest -> Dragging -> (Momentum | SettlingDirect) -> Snapping -> AtRest
//! ```
//!
//! Starting a drag or an explicit selection while an animation is active
//! drops that animation on the spot. Each logical settle carries a generation
//! number, and only the generation that is still current can complete.

use serde::{Deserialize, Serialize};

use super::index_space::IndexSpace;
use super::velocity::Speed;
use crate::error::PickerConfigError;

/// Distances below this are treated as already aligned.
const ALIGNED_EPSILON: f64 = 1e-6;

/// Momentum tunables for one kind of column.
///
/// Velocities are in px/ms. Period columns damp harder and classify flings
/// at a lower threshold since they only have two stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampingProfile {
    /// Velocity multiplier applied once per reference frame.
    pub damping_factor: f64,
    /// Momentum hands over to snapping below this speed.
    pub exit_threshold: f64,
    /// Release speed above which momentum starts.
    ///
    /// Compared against the tracker's windowed average of smoothed samples,
    /// which starts from zero each gesture and lags the raw finger speed.
    /// A three-frame flick at 1.5 px/ms averages roughly 0.4 px/ms.
    pub fast_threshold: f64,
    /// Hard cap on a single momentum run.
    pub max_momentum_ms: f64,
    /// Frame length the damping factor is expressed against.
    pub frame_ms: f64,
}

impl DampingProfile {
    /// Hours, minutes, seconds.
    pub fn numeric() -> Self {
        Self {
            damping_factor: 0.95,
            exit_threshold: 0.02,
            fast_threshold: 0.5,
            max_momentum_ms: 2500.0,
            frame_ms: 16.0,
        }
    }

    /// AM/PM and other two-state columns.
    pub fn period() -> Self {
        Self {
            damping_factor: 0.8,
            exit_threshold: 0.05,
            fast_threshold: 0.3,
            max_momentum_ms: 600.0,
            frame_ms: 16.0,
        }
    }

    pub fn validate(&self) -> Result<(), PickerConfigError> {
        if !(self.damping_factor > 0.0 && self.damping_factor < 1.0) {
            return Err(invalid("damping_factor", "must be in (0, 1)"));
        }
        for (field, value) in [
            ("exit_threshold", self.exit_threshold),
            ("fast_threshold", self.fast_threshold),
            ("max_momentum_ms", self.max_momentum_ms),
            ("frame_ms", self.frame_ms),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, "must be positive and finite"));
            }
        }
        Ok(())
    }
}

impl Default for DampingProfile {
    fn default() -> Self {
        Self::numeric()
    }
}

/// Snap duration model: `min + distance·ms_per_px + |velocity|·ms_per_velocity`,
/// clamped to `[min_duration_ms, max_duration_ms]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapTiming {
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    pub ms_per_px: f64,
    pub ms_per_velocity: f64,
}

impl Default for SnapTiming {
    fn default() -> Self {
        Self {
            min_duration_ms: 150.0,
            max_duration_ms: 800.0,
            ms_per_px: 6.0,
            ms_per_velocity: 250.0,
        }
    }
}

impl SnapTiming {
    pub fn duration_for(&self, distance: f64, velocity: f64) -> f64 {
        let raw = self.min_duration_ms
            + distance.abs() * self.ms_per_px
            + velocity.abs() * self.ms_per_velocity;
        raw.clamp(self.min_duration_ms, self.max_duration_ms)
    }

    /// Settles longer than this get the stronger deceleration curve.
    pub fn long_settle_ms(&self) -> f64 {
        (self.min_duration_ms + self.max_duration_ms) / 2.0
    }

    pub fn validate(&self) -> Result<(), PickerConfigError> {
        if !self.min_duration_ms.is_finite() || self.min_duration_ms <= 0.0 {
            return Err(invalid("min_duration_ms", "must be positive and finite"));
        }
        if !self.max_duration_ms.is_finite() || self.max_duration_ms < self.min_duration_ms {
            return Err(invalid("max_duration_ms", "must be >= min_duration_ms"));
        }
        if self.ms_per_px < 0.0 || self.ms_per_velocity < 0.0 {
            return Err(invalid("ms_per_px", "coefficients must not be negative"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, message: &str) -> PickerConfigError {
    PickerConfigError::InvalidTunable {
        field,
        message: message.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    EaseOutQuad,
    EaseOutCubic,
}

impl Easing {
    /// Map linear progress `t ∈ [0, 1]` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let inv = 1.0 - t;
        match self {
            Easing::EaseOutQuad => 1.0 - inv * inv,
            Easing::EaseOutCubic => 1.0 - inv * inv * inv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapState {
    AtRest,
    Dragging,
    Momentum,
    SettlingDirect,
    Snapping,
}

impl SnapState {
    /// Momentum, settling and snapping are engine-driven.
    pub fn is_animating(self) -> bool {
        matches!(
            self,
            SnapState::Momentum | SnapState::SettlingDirect | SnapState::Snapping
        )
    }
}

/// An in-flight settle animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapAnimation {
    pub from: f64,
    pub to: f64,
    pub started_at: f64,
    pub duration_ms: f64,
    pub easing: Easing,
    pub entry_velocity: f64,
    pub generation: u64,
}

impl SnapAnimation {
    fn offset_at(&self, now: f64) -> (f64, bool) {
        let t = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (now - self.started_at) / self.duration_ms
        };
        if t >= 1.0 {
            (self.to, true)
        } else {
            let eased = self.easing.apply(t.max(0.0));
            (self.from + (self.to - self.from) * eased, false)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MomentumRun {
    velocity: f64,
    last_frame_at: f64,
    started_at: f64,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    AtRest,
    Dragging,
    Momentum(MomentumRun),
    SettlingDirect { velocity: f64, generation: u64 },
    Snapping(SnapAnimation),
}

/// Result of one controller step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Offset the column should show after this step.
    pub offset: f64,
    /// Generation whose settle completed during this step.
    pub settled: Option<u64>,
}

impl Step {
    fn unchanged(offset: f64) -> Self {
        Self {
            offset,
            settled: None,
        }
    }
}

/// Per-column momentum and snap state machine.
#[derive(Debug, Clone)]
pub struct SnapController {
    profile: DampingProfile,
    timing: SnapTiming,
    phase: Phase,
    next_generation: u64,
    transitions: Vec<SnapState>,
}

impl SnapController {
    pub fn new(profile: DampingProfile, timing: SnapTiming) -> Result<Self, PickerConfigError> {
        profile.validate()?;
        timing.validate()?;
        Ok(Self {
            profile,
            timing,
            phase: Phase::AtRest,
            next_generation: 1,
            transitions: Vec::new(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SnapState {
        match self.phase {
            Phase::AtRest => SnapState::AtRest,
            Phase::Dragging => SnapState::Dragging,
            Phase::Momentum(_) => SnapState::Momentum,
            Phase::SettlingDirect { .. } => SnapState::SettlingDirect,
            Phase::Snapping(_) => SnapState::Snapping,
        }
    }

    pub fn profile(&self) -> &DampingProfile {
        &self.profile
    }

    pub fn timing(&self) -> &SnapTiming {
        &self.timing
    }

    /// Current momentum velocity in px/ms, if momentum is running.
    pub fn momentum_velocity(&self) -> Option<f64> {
        match self.phase {
            Phase::Momentum(run) => Some(run.velocity),
            _ => None,
        }
    }

    pub fn animation(&self) -> Option<&SnapAnimation> {
        match &self.phase {
            Phase::Snapping(anim) => Some(anim),
            _ => None,
        }
    }

    /// Generation of the settle in flight, if any.
    pub fn active_generation(&self) -> Option<u64> {
        match self.phase {
            Phase::Momentum(run) => Some(run.generation),
            Phase::SettlingDirect { generation, .. } => Some(generation),
            Phase::Snapping(anim) => Some(anim.generation),
            Phase::AtRest | Phase::Dragging => None,
        }
    }

    /// States entered since the last call, in order.
    pub fn take_transitions(&mut self) -> Vec<SnapState> {
        std::mem::take(&mut self.transitions)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enter `Dragging`. Returns the generation of any animation it superseded.
    pub fn begin_drag(&mut self) -> Option<u64> {
        if self.phase == Phase::Dragging {
            return None;
        }
        let superseded = self.cancel();
        self.enter(Phase::Dragging);
        superseded
    }

    /// Finish a drag. Fast releases coast, slow ones settle on the next frame.
    ///
    /// Ignored unless dragging.
    pub fn release(&mut self, speed: Speed, velocity: f64, now: f64) {
        if self.phase != Phase::Dragging {
            return;
        }
        let generation = self.allocate_generation();
        match speed {
            Speed::Fast => {
                tracing::debug!(velocity, generation, "release: momentum");
                self.enter(Phase::Momentum(MomentumRun {
                    velocity,
                    last_frame_at: now,
                    started_at: now,
                    generation,
                }));
            }
            Speed::Slow => {
                tracing::debug!(velocity, generation, "release: settling directly");
                self.enter(Phase::SettlingDirect {
                    velocity,
                    generation,
                });
            }
        }
    }

    /// Host-side momentum finished: settle from where we are.
    pub fn end_momentum(&mut self, offset: f64, now: f64, space: &IndexSpace) -> Step {
        match self.phase {
            Phase::Momentum(run) => {
                self.start_snap(offset, space.snap_target(offset), run.velocity, now, run.generation)
            }
            Phase::SettlingDirect {
                velocity,
                generation,
            } => self.start_snap(offset, space.snap_target(offset), velocity, now, generation),
            Phase::AtRest if (space.snap_target(offset) - offset).abs() > ALIGNED_EPSILON => {
                let generation = self.allocate_generation();
                self.start_snap(offset, space.snap_target(offset), 0.0, now, generation)
            }
            _ => Step::unchanged(offset),
        }
    }

    /// Animate straight to `target`, superseding anything in flight.
    ///
    /// Returns the superseded generation and the step taken (which already
    /// reports a settle when `offset` is on target).
    pub fn select(&mut self, offset: f64, target: f64, now: f64) -> (Option<u64>, Step) {
        let superseded = self.cancel();
        let generation = self.allocate_generation();
        (superseded, self.start_snap(offset, target, 0.0, now, generation))
    }

    /// Drop any animation without completing it.
    pub fn cancel(&mut self) -> Option<u64> {
        let superseded = self.active_generation();
        if let Some(generation) = superseded {
            tracing::debug!(generation, "animation superseded");
        }
        if self.phase != Phase::AtRest {
            self.enter(Phase::AtRest);
        }
        superseded
    }

    /// Move animation endpoints after the column rehomed by `delta`.
    pub fn shift(&mut self, delta: f64) {
        if let Phase::Snapping(anim) = &mut self.phase {
            anim.from += delta;
            anim.to += delta;
        }
    }

    /// Advance engine-driven phases to frame time `now`.
    pub fn advance(&mut self, offset: f64, now: f64, space: &IndexSpace) -> Step {
        if !now.is_finite() {
            return Step::unchanged(offset);
        }
        match self.phase {
            Phase::AtRest | Phase::Dragging => Step::unchanged(offset),
            Phase::SettlingDirect {
                velocity,
                generation,
            } => self.start_snap(offset, space.snap_target(offset), velocity, now, generation),
            Phase::Momentum(run) => self.advance_momentum(run, offset, now, space),
            Phase::Snapping(anim) => {
                let (next, done) = anim.offset_at(now);
                if done {
                    tracing::debug!(generation = anim.generation, offset = next, "snap complete");
                    self.enter(Phase::AtRest);
                    Step {
                        offset: next,
                        settled: Some(anim.generation),
                    }
                } else {
                    Step::unchanged(next)
                }
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance_momentum(
        &mut self,
        mut run: MomentumRun,
        offset: f64,
        now: f64,
        space: &IndexSpace,
    ) -> Step {
        let dt = now - run.last_frame_at;
        if dt <= 0.0 {
            return Step::unchanged(offset);
        }
        let mut next = offset + run.velocity * dt;
        run.velocity *= self.profile.damping_factor.powf(dt / self.profile.frame_ms);
        run.last_frame_at = now;

        let mut exhausted = run.velocity.abs() < self.profile.exit_threshold
            || now - run.started_at >= self.profile.max_momentum_ms;
        if space.is_out_of_bounds(next) {
            next = space.clamp_offset(next);
            exhausted = true;
        }
        if exhausted {
            tracing::debug!(velocity = run.velocity, offset = next, "momentum exhausted");
            return self.start_snap(next, space.snap_target(next), run.velocity, now, run.generation);
        }
        self.phase = Phase::Momentum(run);
        Step::unchanged(next)
    }

    fn start_snap(
        &mut self,
        offset: f64,
        target: f64,
        velocity: f64,
        now: f64,
        generation: u64,
    ) -> Step {
        let distance = (target - offset).abs();
        if distance <= ALIGNED_EPSILON {
            self.enter(Phase::AtRest);
            return Step {
                offset: target,
                settled: Some(generation),
            };
        }
        let duration_ms = self.timing.duration_for(distance, velocity);
        let easing = if velocity.abs() > self.profile.fast_threshold
            || duration_ms > self.timing.long_settle_ms()
        {
            Easing::EaseOutCubic
        } else {
            Easing::EaseOutQuad
        };
        let anim = SnapAnimation {
            from: offset,
            to: target,
            started_at: now,
            duration_ms,
            easing,
            entry_velocity: velocity,
            generation,
        };
        tracing::debug!(
            from = anim.from,
            to = anim.to,
            duration_ms = anim.duration_ms,
            generation,
            "snapping"
        );
        self.enter(Phase::Snapping(anim));
        Step::unchanged(offset)
    }

    fn allocate_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    fn enter(&mut self, phase: Phase) {
        let before = self.state();
        self.phase = phase;
        if self.state() != before {
            self.transitions.push(self.state());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SnapController {
        SnapController::new(DampingProfile::numeric(), SnapTiming::default()).unwrap()
    }

    fn hours() -> IndexSpace {
        IndexSpace::new(12, 30.0, 3, true).unwrap()
    }

    #[test]
    fn rejects_bad_profiles() {
        let mut profile = DampingProfile::numeric();
        profile.damping_factor = 1.0;
        assert!(SnapController::new(profile, SnapTiming::default()).is_err());
        let timing = SnapTiming {
            max_duration_ms: 100.0,
            ..SnapTiming::default()
        };
        assert!(SnapController::new(DampingProfile::numeric(), timing).is_err());
    }

    #[test]
    fn easing_curves_hit_endpoints() {
        for easing in [Easing::EaseOutQuad, Easing::EaseOutCubic] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            // Ease-out: ahead of linear in the middle.
            assert!(easing.apply(0.5) > 0.5);
        }
    }

    #[test]
    fn duration_grows_with_distance_and_velocity() {
        let timing = SnapTiming::default();
        assert_eq!(timing.duration_for(0.0, 0.0), 150.0);
        assert!(timing.duration_for(10.0, 0.0) > timing.duration_for(2.0, 0.0));
        assert!(timing.duration_for(10.0, 1.0) > timing.duration_for(10.0, 0.0));
        assert_eq!(timing.duration_for(10_000.0, 50.0), 800.0);
    }

    #[test]
    fn slow_release_settles_on_nearest_item() {
        let space = hours();
        let mut ctl = controller();
        ctl.begin_drag();
        ctl.release(Speed::Slow, 0.0, 0.0);
        assert_eq!(ctl.state(), SnapState::SettlingDirect);

        let step = ctl.advance(398.0, 16.0, &space);
        assert_eq!(ctl.state(), SnapState::Snapping);
        assert_eq!(step.offset, 398.0);
        let anim = *ctl.animation().unwrap();
        assert_eq!(anim.to, 390.0);

        let mut offset = step.offset;
        let mut settled = None;
        let mut now = 16.0;
        while settled.is_none() {
            now += 16.0;
            let step = ctl.advance(offset, now, &space);
            offset = step.offset;
            settled = step.settled;
        }
        assert_eq!(offset, 390.0);
        assert_eq!(settled, Some(anim.generation));
        assert_eq!(ctl.state(), SnapState::AtRest);
        assert_eq!(
            ctl.take_transitions(),
            vec![
                SnapState::Dragging,
                SnapState::SettlingDirect,
                SnapState::Snapping,
                SnapState::AtRest
            ]
        );
    }

    #[test]
    fn momentum_decays_then_snaps() {
        let space = hours();
        let mut ctl = controller();
        ctl.begin_drag();
        ctl.release(Speed::Fast, 1.5, 0.0);
        assert_eq!(ctl.state(), SnapState::Momentum);

        let mut offset = 390.0;
        let mut now = 0.0;
        let mut last_velocity = 1.5;
        while ctl.state() == SnapState::Momentum {
            now += 16.0;
            offset = ctl.advance(offset, now, &space).offset;
            if let Some(v) = ctl.momentum_velocity() {
                assert!(v < last_velocity);
                last_velocity = v;
            }
        }
        assert!(offset > 390.0);
        assert!(matches!(ctl.state(), SnapState::Snapping | SnapState::AtRest));
        assert!(now <= DampingProfile::numeric().max_momentum_ms + 16.0);
    }

    #[test]
    fn momentum_is_capped_in_time() {
        let space = hours();
        let mut profile = DampingProfile::numeric();
        profile.damping_factor = 0.999_999;
        profile.max_momentum_ms = 100.0;
        let mut ctl = SnapController::new(profile, SnapTiming::default()).unwrap();
        ctl.begin_drag();
        ctl.release(Speed::Fast, 3.0, 0.0);
        let mut offset = 390.0;
        for frame in 1..=7 {
            offset = ctl.advance(offset, frame as f64 * 16.0, &space).offset;
        }
        assert_eq!(ctl.state(), SnapState::Snapping);
    }

    #[test]
    fn new_drag_supersedes_snap() {
        let space = hours();
        let mut ctl = controller();
        ctl.begin_drag();
        ctl.release(Speed::Slow, 0.0, 0.0);
        ctl.advance(400.0, 16.0, &space);
        let generation = ctl.active_generation().unwrap();

        assert_eq!(ctl.begin_drag(), Some(generation));
        assert_eq!(ctl.state(), SnapState::Dragging);
        // The old animation no longer produces frames.
        let step = ctl.advance(400.0, 2000.0, &space);
        assert_eq!(step, Step::unchanged(400.0));
    }

    #[test]
    fn select_on_target_settles_immediately() {
        let mut ctl = controller();
        let (superseded, step) = ctl.select(390.0, 390.0, 0.0);
        assert_eq!(superseded, None);
        assert!(step.settled.is_some());
        assert_eq!(ctl.state(), SnapState::AtRest);
    }

    #[test]
    fn shift_moves_animation_endpoints() {
        let mut ctl = controller();
        ctl.select(60.0, 90.0, 0.0);
        ctl.shift(360.0);
        let anim = ctl.animation().unwrap();
        assert_eq!((anim.from, anim.to), (420.0, 450.0));
    }

    #[test]
    fn release_outside_drag_is_ignored() {
        let mut ctl = controller();
        ctl.release(Speed::Fast, 2.0, 0.0);
        assert_eq!(ctl.state(), SnapState::AtRest);
        assert!(ctl.take_transitions().is_empty());
    }
}

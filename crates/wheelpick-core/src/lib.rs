//! # Wheelpick Core Library
//!
//! This library provides the engine behind circular scroll-wheel pickers:
//! the hour/minute/AM-PM wheels used to enter block times, durations and
//! countdown timers. It owns all of the motion logic and none of the
//! painting, so any host (CLI, desktop shell, tests) can drive it.
//!
//! ## Architecture
//!
//! - **Picker engine**: per-column state machines driven by the caller. The
//!   host forwards drag samples and frame ticks; each call returns the
//!   events it produced.
//! - **Presets**: ready-made block-time, duration and timer pickers
//! - **Storage**: TOML-based configuration of the engine's tunables
//! - **Simulation**: deterministic replay of scripted gestures
//!
//! ## Key Components
//!
//! - [`PickerColumn`]: One wheel with its offset, velocity and snap state
//! - [`CompositePicker`]: Independent named columns committed together
//! - [`IndexSpace`]: Offset to value mapping, including the circular re-home
//! - [`SnapController`]: Drag, momentum and snap-to-item state machine
//! - [`Config`]: Picker configuration management

pub mod picker;
pub mod presets;
pub mod simulation;
pub mod storage;
pub mod events;
pub mod error;

pub use picker::{
    ColumnConfig, CompositePicker, DampingProfile, IndexSpace, PickerColumn, SnapController,
    SnapState, SnapTiming, ValueSequence, VelocityConfig, VelocityTracker,
};
pub use presets::{Period, PresetKind, PresetOptions, WheelValue};
pub use simulation::{Gesture, GestureScript, Replay, Simulator};
pub use storage::{Config, FeedbackConfig};
pub use events::Event;
pub use error::{ConfigError, CoreError, PickerConfigError, SelectionError};

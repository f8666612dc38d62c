//! Ready-made pickers: block time (hour:minute:AM/PM), duration (h:m) and
//! countdown timer (h:m:s).
//!
//! All columns share one value type, [`WheelValue`], so a single
//! [`CompositePicker`] can hold numbers and the AM/PM period side by side.

use std::fmt;
use std::time::Duration;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::PickerConfigError;
use crate::picker::{ColumnConfig, CompositePicker, DampingProfile, PickerColumn, ValueSequence};

pub const HOUR: &str = "hour";
pub const MINUTE: &str = "minute";
pub const SECOND: &str = "second";
pub const PERIOD: &str = "period";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Period {
    Am,
    Pm,
}

/// A value shown on any preset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WheelValue {
    Number(u32),
    Period(Period),
}

impl WheelValue {
    pub fn as_number(&self) -> Option<u32> {
        match self {
            WheelValue::Number(n) => Some(*n),
            WheelValue::Period(_) => None,
        }
    }

    pub fn as_period(&self) -> Option<Period> {
        match self {
            WheelValue::Period(p) => Some(*p),
            WheelValue::Number(_) => None,
        }
    }
}

impl fmt::Display for WheelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelValue::Number(n) => write!(f, "{n:02}"),
            WheelValue::Period(Period::Am) => f.write_str("AM"),
            WheelValue::Period(Period::Pm) => f.write_str("PM"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetKind {
    BlockTime,
    Duration,
    Timer,
}

impl PresetKind {
    /// Build the picker at its default starting value.
    pub fn build(
        self,
        options: &PresetOptions,
    ) -> Result<CompositePicker<WheelValue>, PickerConfigError> {
        match self {
            PresetKind::BlockTime => {
                let nine = NaiveTime::from_hms_opt(9, 0, 0).ok_or_else(|| {
                    PickerConfigError::InvalidTunable {
                        field: "initial",
                        message: "invalid default time".into(),
                    }
                })?;
                block_time_picker(nine, options)
            }
            PresetKind::Duration => duration_picker(Duration::from_secs(30 * 60), options),
            PresetKind::Timer => timer_picker(Duration::from_secs(5 * 60), options),
        }
    }
}

/// Geometry and tunables for preset columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetOptions {
    pub numeric: ColumnConfig,
    pub period: ColumnConfig,
    /// Minute granularity for block-time and duration pickers.
    pub minute_step: u32,
}

impl Default for PresetOptions {
    fn default() -> Self {
        Self {
            numeric: ColumnConfig::default(),
            period: ColumnConfig {
                damping: DampingProfile::period(),
                ..ColumnConfig::default()
            },
            minute_step: 1,
        }
    }
}

// ── Sequences ────────────────────────────────────────────────────────

type Sequence = Result<ValueSequence<WheelValue>, PickerConfigError>;

fn numbers(range: impl Iterator<Item = u32>, damping: DampingProfile) -> Sequence {
    Ok(ValueSequence::circular(range.map(WheelValue::Number).collect())?.with_damping(damping))
}

/// 1..=12
pub fn hours_12(damping: DampingProfile) -> Sequence {
    numbers(1..=12, damping)
}

/// 0..=23
pub fn hours_24(damping: DampingProfile) -> Sequence {
    numbers(0..=23, damping)
}

/// 0..60 in steps of `step` minutes.
pub fn minutes(step: u32, damping: DampingProfile) -> Sequence {
    if step == 0 || step > 30 || 60 % step != 0 {
        return Err(PickerConfigError::InvalidTunable {
            field: "minute_step",
            message: format!("{step} does not divide an hour into at least 2 stops"),
        });
    }
    numbers((0..60).step_by(step as usize), damping)
}

/// 0..60
pub fn seconds(damping: DampingProfile) -> Sequence {
    numbers(0..60, damping)
}

/// AM, PM (bounded).
pub fn periods(damping: DampingProfile) -> Sequence {
    Ok(ValueSequence::bounded(vec![
        WheelValue::Period(Period::Am),
        WheelValue::Period(Period::Pm),
    ])?
    .with_damping(damping))
}

fn snap_down(value: u32, step: u32) -> u32 {
    value - value % step.max(1)
}

// ── Pickers ──────────────────────────────────────────────────────────

/// hour (1-12) : minute : AM/PM, starting at `initial`.
pub fn block_time_picker(
    initial: NaiveTime,
    options: &PresetOptions,
) -> Result<CompositePicker<WheelValue>, PickerConfigError> {
    let hour24 = initial.hour();
    let hour12 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    let period = if hour24 < 12 { Period::Am } else { Period::Pm };
    let minute = snap_down(initial.minute(), options.minute_step);

    CompositePicker::new(vec![
        PickerColumn::new(
            HOUR,
            hours_12(options.numeric.damping)?,
            &WheelValue::Number(hour12),
            &options.numeric,
        )?,
        PickerColumn::new(
            MINUTE,
            minutes(options.minute_step, options.numeric.damping)?,
            &WheelValue::Number(minute),
            &options.numeric,
        )?,
        PickerColumn::new(
            PERIOD,
            periods(options.period.damping)?,
            &WheelValue::Period(period),
            &options.period,
        )?,
    ])
}

/// hours (0-23) : minutes, starting at `initial` (capped at 23:59).
pub fn duration_picker(
    initial: Duration,
    options: &PresetOptions,
) -> Result<CompositePicker<WheelValue>, PickerConfigError> {
    let total_min = (initial.as_secs() / 60).min(23 * 60 + 59) as u32;
    CompositePicker::new(vec![
        PickerColumn::new(
            HOUR,
            hours_24(options.numeric.damping)?,
            &WheelValue::Number(total_min / 60),
            &options.numeric,
        )?,
        PickerColumn::new(
            MINUTE,
            minutes(options.minute_step, options.numeric.damping)?,
            &WheelValue::Number(snap_down(total_min % 60, options.minute_step)),
            &options.numeric,
        )?,
    ])
}

/// hours : minutes : seconds countdown, starting at `initial` (capped at 23:59:59).
pub fn timer_picker(
    initial: Duration,
    options: &PresetOptions,
) -> Result<CompositePicker<WheelValue>, PickerConfigError> {
    let secs = initial.as_secs().min(24 * 3600 - 1) as u32;
    CompositePicker::new(vec![
        PickerColumn::new(
            HOUR,
            hours_24(options.numeric.damping)?,
            &WheelValue::Number(secs / 3600),
            &options.numeric,
        )?,
        PickerColumn::new(
            MINUTE,
            minutes(1, options.numeric.damping)?,
            &WheelValue::Number(secs / 60 % 60),
            &options.numeric,
        )?,
        PickerColumn::new(
            SECOND,
            seconds(options.numeric.damping)?,
            &WheelValue::Number(secs % 60),
            &options.numeric,
        )?,
    ])
}

// ── Commit conversions ───────────────────────────────────────────────

fn number_at(values: &[WheelValue], i: usize) -> Option<u32> {
    values.get(i).and_then(WheelValue::as_number)
}

/// Interpret a block-time commit (`[hour12, minute, period]`).
pub fn block_time_from_commit(values: &[WheelValue]) -> Result<NaiveTime, PickerConfigError> {
    let shape = PickerConfigError::CommitShape {
        expected: 3,
        got: values.len(),
    };
    if values.len() != 3 {
        return Err(shape);
    }
    let (Some(hour12), Some(minute), Some(period)) = (
        number_at(values, 0),
        number_at(values, 1),
        values[2].as_period(),
    ) else {
        return Err(shape);
    };
    let hour24 = hour12 % 12 + if period == Period::Pm { 12 } else { 0 };
    NaiveTime::from_hms_opt(hour24, minute, 0).ok_or(shape)
}

/// Interpret a duration (`[h, m]`) or timer (`[h, m, s]`) commit.
pub fn duration_from_commit(values: &[WheelValue]) -> Result<Duration, PickerConfigError> {
    let shape = PickerConfigError::CommitShape {
        expected: if values.len() == 3 { 3 } else { 2 },
        got: values.len(),
    };
    if !(2..=3).contains(&values.len()) {
        return Err(shape);
    }
    let mut secs: u64 = 0;
    for (i, unit) in [3600u64, 60, 1].iter().take(values.len()).enumerate() {
        let n = number_at(values, i).ok_or_else(|| shape.clone())?;
        secs += n as u64 * unit;
    }
    Ok(Duration::from_secs(secs))
}

use serde::{Deserialize, Serialize};

use crate::picker::SnapState;

/// Every observable change in a picker produces an Event.
///
/// The host drains them after each input or frame: `RenderFrame` and
/// `Rehomed` drive the scroll surface, `Tick` drives haptics/audio,
/// `ValueChanged`/`Settled` drive labels and callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event<V> {
    /// The value under the selection center changed.
    ValueChanged {
        column: String,
        index: usize,
        value: V,
    },
    /// An item boundary was crossed while dragging or coasting.
    Tick { column: String, at: f64 },
    /// The column's offset for this frame.
    RenderFrame { column: String, offset: f64 },
    /// The offset moved by whole cycles; apply without any transition.
    Rehomed {
        column: String,
        from: f64,
        offset: f64,
    },
    PhaseChanged { column: String, state: SnapState },
    /// An in-flight settle was abandoned; it will never report `Settled`.
    AnimationCancelled { column: String, generation: u64 },
    /// A settle finished on an exact item boundary.
    Settled {
        column: String,
        generation: u64,
        value: V,
    },
}

impl<V> Event<V> {
    pub fn column(&self) -> &str {
        match self {
            Event::ValueChanged { column, .. }
            | Event::Tick { column, .. }
            | Event::RenderFrame { column, .. }
            | Event::Rehomed { column, .. }
            | Event::PhaseChanged { column, .. }
            | Event::AnimationCancelled { column, .. }
            | Event::Settled { column, .. } => column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event: Event<u32> = Event::Settled {
            column: "hour".into(),
            generation: 3,
            value: 12,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "settled");
        assert_eq!(json["value"], 12);

        let back: Event<u32> = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.column(), "hour");
    }

    #[test]
    fn phase_changes_use_snake_case_states() {
        let event: Event<u32> = Event::PhaseChanged {
            column: "minute".into(),
            state: SnapState::SettlingDirect,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"settling_direct\""));
    }
}

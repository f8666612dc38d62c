//! Several columns read as one selection (e.g. hour:minute:period).

use super::column::PickerColumn;
use super::snap::SnapState;
use crate::error::{PickerConfigError, SelectionError};
use crate::events::Event;

#[derive(Debug, Clone)]
pub struct CompositePicker<V> {
    columns: Vec<PickerColumn<V>>,
}

impl<V: Clone + PartialEq> CompositePicker<V> {
    /// # Errors
    ///
    /// Fails on zero columns or two columns sharing a name.
    pub fn new(columns: Vec<PickerColumn<V>>) -> Result<Self, PickerConfigError> {
        if columns.is_empty() {
            return Err(PickerConfigError::NoColumns);
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name() == column.name()) {
                return Err(PickerConfigError::DuplicateColumn(column.name().to_string()));
            }
        }
        Ok(Self { columns })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn columns(&self) -> &[PickerColumn<V>] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&PickerColumn<V>> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    /// Every column's current value, in column order.
    ///
    /// Values track the displayed offsets frame by frame, so this is safe to
    /// call mid-animation; once [`is_at_rest`](Self::is_at_rest) holds,
    /// repeated calls return the same tuple.
    pub fn commit(&self) -> Vec<V> {
        self.columns
            .iter()
            .map(|c| c.current_value().clone())
            .collect()
    }

    pub fn is_at_rest(&self) -> bool {
        self.columns.iter().all(|c| c.state() == SnapState::AtRest)
    }

    // ── Input routing ────────────────────────────────────────────────

    pub fn on_drag_start(&mut self, column: &str, now: f64) -> Result<Vec<Event<V>>, SelectionError> {
        Ok(self.column_mut(column)?.on_drag_start(now))
    }

    pub fn on_scroll_sample(
        &mut self,
        column: &str,
        offset: f64,
        now: f64,
    ) -> Result<Vec<Event<V>>, SelectionError> {
        Ok(self.column_mut(column)?.on_scroll_sample(offset, now))
    }

    pub fn on_drag_end(&mut self, column: &str, now: f64) -> Result<Vec<Event<V>>, SelectionError> {
        Ok(self.column_mut(column)?.on_drag_end(now))
    }

    pub fn on_momentum_end(
        &mut self,
        column: &str,
        now: f64,
    ) -> Result<Vec<Event<V>>, SelectionError> {
        Ok(self.column_mut(column)?.on_momentum_end(now))
    }

    pub fn select_value(
        &mut self,
        column: &str,
        value: &V,
        now: f64,
    ) -> Result<Vec<Event<V>>, SelectionError> {
        self.column_mut(column)?.select_value(value, now)
    }

    pub fn on_item_tap(
        &mut self,
        column: &str,
        value: &V,
        now: f64,
    ) -> Result<Vec<Event<V>>, SelectionError> {
        self.column_mut(column)?.on_item_tap(value, now)
    }

    /// Advance every animating column to frame time `now`.
    pub fn on_frame(&mut self, now: f64) -> Vec<Event<V>> {
        self.columns
            .iter_mut()
            .flat_map(|c| c.on_frame(now))
            .collect()
    }

    /// Jump every column to the given values, in column order.
    ///
    /// All values are checked before any column moves.
    pub fn reset(&mut self, values: &[V]) -> Result<Vec<Event<V>>, SelectionError> {
        if values.len() != self.columns.len() {
            return Err(SelectionError::ArityMismatch {
                expected: self.columns.len(),
                got: values.len(),
            });
        }
        for (column, value) in self.columns.iter().zip(values) {
            column.index_of(value)?;
        }
        let mut events = Vec::new();
        for (column, value) in self.columns.iter_mut().zip(values) {
            events.extend(column.reset(value)?);
        }
        Ok(events)
    }

    fn column_mut(&mut self, name: &str) -> Result<&mut PickerColumn<V>, SelectionError> {
        self.columns
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| SelectionError::UnknownColumn(name.to_string()))
    }
}

//! Offset ↔ index mapping for a picker column.
//!
//! A circular sequence of `N` values is laid out as `N + 2·m` slots, where `m`
//! is the boundary margin: `m` padding copies before the real values and `m`
//! after. Slot `s` shows value `(s − m) mod N`. While the rounded slot stays in
//! `[m, N + m)` nothing happens; once it leaves that band the offset is moved
//! by whole cycles ("rehomed") so the padding never runs out.
//!
//! Bounded sequences use slot `i` for value `i` and clamp instead of wrapping.

use serde::{Deserialize, Serialize};

use crate::error::PickerConfigError;

/// Outcome of a rehome check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rehome {
    None,
    /// Offset is at/above the upper bound: subtract whole cycles.
    ShiftBack,
    /// Offset is below the lower bound: add whole cycles.
    ShiftForward,
}

/// Round half up, the same way for negative and positive inputs.
///
/// `f64::round` rounds half away from zero, which would make `-2.5` and `9.5`
/// (one cycle apart for N = 12) land on different values.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexSpace {
    len: usize,
    item_extent: f64,
    boundary_margin: usize,
    circular: bool,
}

impl IndexSpace {
    pub fn new(
        len: usize,
        item_extent: f64,
        boundary_margin: usize,
        circular: bool,
    ) -> Result<Self, PickerConfigError> {
        if len == 0 {
            return Err(PickerConfigError::EmptySequence);
        }
        if circular && len < 2 {
            return Err(PickerConfigError::DegenerateCircular { len });
        }
        if !item_extent.is_finite() || item_extent <= 0.0 {
            return Err(PickerConfigError::InvalidItemExtent(item_extent));
        }
        if circular && boundary_margin == 0 {
            return Err(PickerConfigError::ZeroBoundaryMargin);
        }
        Ok(Self {
            len,
            item_extent,
            boundary_margin: if circular { boundary_margin } else { 0 },
            circular,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn item_extent(&self) -> f64 {
        self.item_extent
    }

    pub fn boundary_margin(&self) -> usize {
        self.boundary_margin
    }

    pub fn is_circular(&self) -> bool {
        self.circular
    }

    /// Length of one full cycle along the scroll axis.
    pub fn cycle_extent(&self) -> f64 {
        self.len as f64 * self.item_extent
    }

    /// Slot under the selection center for `offset`.
    pub fn slot_at(&self, offset: f64) -> i64 {
        round_half_up(offset / self.item_extent)
    }

    /// Index into the value sequence selected at `offset`.
    pub fn index_at(&self, offset: f64) -> usize {
        let slot = self.slot_at(offset);
        let n = self.len as i64;
        if self.circular {
            (slot - self.boundary_margin as i64).rem_euclid(n) as usize
        } else {
            slot.clamp(0, n - 1) as usize
        }
    }

    pub fn needs_rehome(&self, offset: f64) -> Rehome {
        if !self.circular {
            return Rehome::None;
        }
        let slot = self.slot_at(offset);
        let lower = self.boundary_margin as i64;
        let upper = lower + self.len as i64;
        if slot < lower {
            Rehome::ShiftForward
        } else if slot >= upper {
            Rehome::ShiftBack
        } else {
            Rehome::None
        }
    }

    /// Move `offset` back into the home band without changing the selected value.
    ///
    /// Circular: shifts by as many whole cycles as needed and keeps the
    /// position within the item. Bounded: clamps to the valid range.
    pub fn rehome(&self, offset: f64) -> f64 {
        if !self.circular {
            return self.clamp_offset(offset);
        }
        let shift = self.rehome_shift(offset);
        if shift == 0.0 {
            return offset;
        }
        let rehomed = offset + shift;
        let target_slot = self.slot_at(offset) + round_half_up(shift / self.item_extent);
        if self.slot_at(rehomed) == target_slot {
            rehomed
        } else {
            // Float error pushed a half-item fraction over the rounding edge.
            let fraction = offset / self.item_extent - self.slot_at(offset) as f64;
            let nudged = fraction.clamp(-0.499_999, 0.499_999);
            (target_slot as f64 + nudged) * self.item_extent
        }
    }

    /// Whole-cycle distance [`rehome`](Self::rehome) moves a circular offset.
    ///
    /// Always a multiple of [`cycle_extent`](Self::cycle_extent), so anything
    /// aligned to an item stays aligned after shifting by it.
    pub fn rehome_shift(&self, offset: f64) -> f64 {
        if !self.circular || self.needs_rehome(offset) == Rehome::None {
            return 0.0;
        }
        let n = self.len as i64;
        let cycles = (self.slot_at(offset) - self.boundary_margin as i64).div_euclid(n);
        -(cycles as f64) * self.cycle_extent()
    }

    /// Clamp to `[0, (N − 1)·extent]` for bounded sequences; identity otherwise.
    pub fn clamp_offset(&self, offset: f64) -> f64 {
        if self.circular {
            offset
        } else {
            offset.clamp(0.0, self.max_bounded_offset())
        }
    }

    /// Whether a bounded offset lies past either end.
    pub fn is_out_of_bounds(&self, offset: f64) -> bool {
        !self.circular && (offset < 0.0 || offset > self.max_bounded_offset())
    }

    fn max_bounded_offset(&self) -> f64 {
        (self.len - 1) as f64 * self.item_extent
    }

    /// Canonical offset of `index` inside the home band.
    pub fn home_offset(&self, index: usize) -> f64 {
        (index + self.boundary_margin) as f64 * self.item_extent
    }

    /// Offset that shows `index` reached by the shortest path from `reference`.
    ///
    /// For circular sequences this picks the homologous slot nearest to the
    /// reference slot; with an even cycle and an exact half-cycle distance the
    /// forward slot wins.
    pub fn nearest_offset_for(&self, index: usize, reference: f64) -> f64 {
        if !self.circular {
            return (index.min(self.len - 1)) as f64 * self.item_extent;
        }
        let n = self.len as i64;
        let current = self.index_at(reference) as i64;
        let mut delta = (index as i64 - current).rem_euclid(n);
        if delta > n / 2 {
            delta -= n;
        }
        (self.slot_at(reference) + delta) as f64 * self.item_extent
    }

    /// Nearest item boundary for `offset`, clamped for bounded sequences.
    pub fn snap_target(&self, offset: f64) -> f64 {
        let slot = self.slot_at(offset);
        let slot = if self.circular {
            slot
        } else {
            slot.clamp(0, self.len as i64 - 1)
        };
        slot as f64 * self.item_extent
    }

    /// Number of slots the host renders.
    pub fn slot_count(&self) -> usize {
        self.len + 2 * self.boundary_margin
    }

    /// Value index shown in `slot`, `None` for slots outside a bounded list.
    pub fn value_index_of_slot(&self, slot: i64) -> Option<usize> {
        let n = self.len as i64;
        if self.circular {
            Some((slot - self.boundary_margin as i64).rem_euclid(n) as usize)
        } else if (0..n).contains(&slot) {
            Some(slot as usize)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours() -> IndexSpace {
        IndexSpace::new(12, 30.0, 3, true).unwrap()
    }

    #[test]
    fn rejects_bad_parameters() {
        assert_eq!(
            IndexSpace::new(12, 0.0, 3, true).unwrap_err(),
            PickerConfigError::InvalidItemExtent(0.0)
        );
        assert!(IndexSpace::new(12, f64::NAN, 3, true).is_err());
        assert_eq!(
            IndexSpace::new(12, 30.0, 0, true).unwrap_err(),
            PickerConfigError::ZeroBoundaryMargin
        );
        assert!(IndexSpace::new(2, 30.0, 0, false).is_ok());
    }

    #[test]
    fn index_at_wraps_through_margin() {
        let space = hours();
        // Home of index 10 (value 11).
        assert_eq!(space.home_offset(10), 390.0);
        assert_eq!(space.index_at(390.0), 10);
        assert_eq!(space.index_at(420.0), 11);
        // Padding slots repeat the cycle.
        assert_eq!(space.index_at(0.0), 9);
        assert_eq!(space.index_at(60.0), 11);
        assert_eq!(space.index_at(450.0), 0);
    }

    #[test]
    fn rounding_is_half_up_on_both_sides_of_zero() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        let space = hours();
        assert_eq!(space.index_at(-75.0), space.index_at(-75.0 + 360.0));
    }

    #[test]
    fn rehome_forward_below_margin() {
        let space = hours();
        assert_eq!(space.needs_rehome(60.0), Rehome::ShiftForward);
        let rehomed = space.rehome(60.0);
        assert_eq!(rehomed, 420.0);
        assert_eq!(space.index_at(rehomed), space.index_at(60.0));
        assert_eq!(space.needs_rehome(rehomed), Rehome::None);
    }

    #[test]
    fn rehome_back_at_upper_bound() {
        let space = hours();
        // Slot 15 == N + m is the first out-of-band slot.
        assert_eq!(space.needs_rehome(449.0), Rehome::ShiftBack);
        assert_eq!(space.needs_rehome(434.0), Rehome::None);
        let rehomed = space.rehome(450.0);
        assert_eq!(rehomed, 90.0);
        assert_eq!(space.needs_rehome(rehomed), Rehome::None);
    }

    #[test]
    fn rehome_keeps_fraction_and_handles_many_cycles() {
        let space = hours();
        let far = -10_000.0 + 7.0;
        let rehomed = space.rehome(far);
        assert_eq!(space.needs_rehome(rehomed), Rehome::None);
        assert_eq!(space.index_at(rehomed), space.index_at(far));
        let within = rehomed - space.snap_target(rehomed);
        let original = far - space.snap_target(far);
        assert!((within - original).abs() < 1e-9);
    }

    #[test]
    fn rehome_shift_is_whole_cycles() {
        let space = hours();
        assert_eq!(space.rehome_shift(390.0), 0.0);
        assert_eq!(space.rehome_shift(60.0), 360.0);
        assert_eq!(space.rehome_shift(450.0), -360.0);
        assert_eq!(space.rehome_shift(-10_000.0 + 7.0), 28.0 * 360.0);
        // An item-aligned target moved by the shift stays aligned.
        assert_eq!((1234.0 * 30.0 + space.rehome_shift(1234.5 * 30.0)) % 30.0, 0.0);
    }

    #[test]
    fn bounded_never_rehomes_and_clamps() {
        let space = IndexSpace::new(2, 30.0, 3, false).unwrap();
        assert_eq!(space.boundary_margin(), 0);
        assert_eq!(space.needs_rehome(-100.0), Rehome::None);
        assert_eq!(space.rehome(-100.0), 0.0);
        assert_eq!(space.rehome(100.0), 30.0);
        assert_eq!(space.index_at(47.0), 1);
        assert_eq!(space.snap_target(47.0), 30.0);
        assert!(space.is_out_of_bounds(47.0));
    }

    #[test]
    fn nearest_offset_takes_shortest_path() {
        let space = hours();
        // At value 1 (index 0), picking 12 goes one slot back, not eleven forward.
        let at_one = space.home_offset(0);
        assert_eq!(space.nearest_offset_for(11, at_one), at_one - 30.0);
        assert_eq!(space.nearest_offset_for(2, at_one), at_one + 60.0);
        // Exact half cycle goes forward.
        assert_eq!(space.nearest_offset_for(6, at_one), at_one + 180.0);
    }

    #[test]
    fn slots_for_rendering() {
        let space = hours();
        assert_eq!(space.slot_count(), 18);
        assert_eq!(space.value_index_of_slot(0), Some(9));
        assert_eq!(space.value_index_of_slot(17), Some(2));
        let bounded = IndexSpace::new(2, 30.0, 1, false).unwrap();
        assert_eq!(bounded.value_index_of_slot(-1), None);
        assert_eq!(bounded.value_index_of_slot(1), Some(1));
    }
}

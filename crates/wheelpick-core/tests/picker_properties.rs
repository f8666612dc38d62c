//! Property tests for offset mapping and settling.

use proptest::prelude::*;
use wheelpick_core::picker::{ColumnConfig, IndexSpace, PickerColumn, Rehome, ValueSequence};
use wheelpick_core::SnapState;

fn space_strategy() -> impl Strategy<Value = IndexSpace> {
    (2usize..=60, 10u32..=80, 1usize..=5)
        .prop_map(|(len, extent, margin)| IndexSpace::new(len, extent as f64, margin, true).unwrap())
}

proptest! {
    #[test]
    fn rehome_never_changes_the_selected_value(
        space in space_strategy(),
        offset in -20_000.0f64..20_000.0,
    ) {
        let rehomed = space.rehome(offset);
        prop_assert_eq!(space.index_at(rehomed), space.index_at(offset));
    }

    #[test]
    fn rehomed_offsets_are_stable(
        space in space_strategy(),
        offset in -20_000.0f64..20_000.0,
    ) {
        let rehomed = space.rehome(offset);
        prop_assert_eq!(space.needs_rehome(rehomed), Rehome::None);
        prop_assert_eq!(space.rehome(rehomed), rehomed);
    }

    #[test]
    fn threshold_slots_rehome_exactly_once(space in space_strategy(), below in proptest::bool::ANY) {
        let margin = space.boundary_margin() as i64;
        let slot = if below { margin - 1 } else { margin + space.len() as i64 };
        let offset = slot as f64 * space.item_extent();
        prop_assert_ne!(space.needs_rehome(offset), Rehome::None);
        let once = space.rehome(offset);
        prop_assert_eq!(space.needs_rehome(once), Rehome::None);
    }

    #[test]
    fn nearest_offset_selects_the_index(
        space in space_strategy(),
        index_seed in 0usize..1000,
        reference in -5_000.0f64..5_000.0,
    ) {
        let index = index_seed % space.len();
        let target = space.nearest_offset_for(index, reference);
        prop_assert_eq!(space.index_at(target), index);
        let items = (target - space.snap_target(reference)).abs() / space.item_extent();
        prop_assert!(items <= (space.len() / 2) as f64 + 1e-9);
    }

    #[test]
    fn slow_release_always_lands_on_an_item(
        start in 0u32..24,
        moves in proptest::collection::vec(-40.0f64..40.0, 1..12),
    ) {
        let config = ColumnConfig::default().with_item_extent(30.0);
        let mut column = PickerColumn::new(
            "hour",
            ValueSequence::circular((0..24).collect()).unwrap(),
            &start,
            &config,
        )
        .unwrap();

        let mut now = 0.0;
        column.on_drag_start(now);
        for delta in &moves {
            now += 200.0;
            let next = column.offset() + delta;
            column.on_scroll_sample(next, now);
        }
        column.on_drag_end(now);

        let deadline = now + 10_000.0;
        while column.state() != SnapState::AtRest && now < deadline {
            now += 16.0;
            column.on_frame(now);
        }

        prop_assert_eq!(column.state(), SnapState::AtRest);
        prop_assert_eq!(column.offset() % 30.0, 0.0);
        prop_assert_eq!(column.current_index(), column.index_space().index_at(column.offset()));
    }
}

//! Per-item visual transform as a function of distance from the center.
//!
//! Pure math only: the host paints.

use serde::{Deserialize, Serialize};

use super::index_space::IndexSpace;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformProfile {
    /// Scale lost per item of distance.
    pub scale_falloff: f64,
    pub min_scale: f64,
    /// Opacity lost per item of distance.
    pub opacity_falloff: f64,
    pub min_opacity: f64,
    /// Wheel rotation per item of distance, degrees.
    pub rotation_per_item_deg: f64,
    pub max_rotation_deg: f64,
}

impl Default for TransformProfile {
    fn default() -> Self {
        Self {
            scale_falloff: 0.12,
            min_scale: 0.6,
            opacity_falloff: 0.35,
            min_opacity: 0.15,
            rotation_per_item_deg: 22.0,
            max_rotation_deg: 80.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemTransform {
    pub scale: f64,
    pub opacity: f64,
    /// Signed: items before the center tilt one way, after it the other.
    pub rotation_deg: f64,
}

/// Transform for an item `distance` items away from the center (signed, fractional).
pub fn item_transform(distance: f64, profile: &TransformProfile) -> ItemTransform {
    let d = distance.abs();
    let rotation = (distance * profile.rotation_per_item_deg)
        .clamp(-profile.max_rotation_deg, profile.max_rotation_deg);
    ItemTransform {
        scale: (1.0 - d * profile.scale_falloff).max(profile.min_scale),
        opacity: (1.0 - d * profile.opacity_falloff).max(profile.min_opacity),
        rotation_deg: rotation,
    }
}

/// One slot inside the visible window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleItem {
    pub slot: i64,
    pub value_index: usize,
    pub distance: f64,
    pub transform: ItemTransform,
}

/// The `visible_window` slots around the selection center at `offset`.
///
/// Bounded columns skip slots past either end.
pub fn visible_items(
    space: &IndexSpace,
    offset: f64,
    visible_window: usize,
    profile: &TransformProfile,
) -> Vec<VisibleItem> {
    let center = space.slot_at(offset);
    let half = (visible_window / 2) as i64;
    let position = offset / space.item_extent();
    (center - half..=center + half)
        .filter_map(|slot| {
            let value_index = space.value_index_of_slot(slot)?;
            let distance = slot as f64 - position;
            Some(VisibleItem {
                slot,
                value_index,
                distance,
                transform: item_transform(distance, profile),
            })
        })
        .collect()
}

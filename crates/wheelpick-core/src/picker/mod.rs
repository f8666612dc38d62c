mod column;
mod composite;
mod feedback;
mod index_space;
mod sequence;
mod snap;
mod transform;
mod velocity;

pub use column::{ColumnConfig, PickerColumn};
pub use composite::CompositePicker;
pub use feedback::TickThrottle;
pub use index_space::{round_half_up, IndexSpace, Rehome};
pub use sequence::ValueSequence;
pub use snap::{DampingProfile, Easing, SnapAnimation, SnapController, SnapState, SnapTiming, Step};
pub use transform::{item_transform, visible_items, ItemTransform, TransformProfile, VisibleItem};
pub use velocity::{Speed, VelocityConfig, VelocityTracker};

use serde::Serialize;

use super::snap::DampingProfile;
use crate::error::PickerConfigError;

/// Ordered list of selectable values for one picker column.
///
/// Circular sequences (hours, minutes, seconds) wrap at both ends; bounded
/// ones (AM/PM) clamp. Immutable once built: a different value set means a
/// different column.
#[derive(Debug, Clone, Serialize)]
pub struct ValueSequence<V> {
    values: Vec<V>,
    circular: bool,
    damping: Option<DampingProfile>,
}

impl<V: PartialEq> ValueSequence<V> {
    /// Build a wrapping sequence. Needs at least two unique values.
    pub fn circular(values: Vec<V>) -> Result<Self, PickerConfigError> {
        Self::build(values, true)
    }

    /// Build a clamping sequence. Needs at least one unique value.
    pub fn bounded(values: Vec<V>) -> Result<Self, PickerConfigError> {
        Self::build(values, false)
    }

    fn build(values: Vec<V>, circular: bool) -> Result<Self, PickerConfigError> {
        if values.is_empty() {
            return Err(PickerConfigError::EmptySequence);
        }
        if circular && values.len() < 2 {
            return Err(PickerConfigError::DegenerateCircular { len: values.len() });
        }
        for (index, value) in values.iter().enumerate() {
            if let Some(first) = values[..index].iter().position(|v| v == value) {
                return Err(PickerConfigError::DuplicateValue { index, first });
            }
        }
        Ok(Self {
            values,
            circular,
            damping: None,
        })
    }

    /// Tag the sequence with its own momentum/threshold profile.
    pub fn with_damping(mut self, profile: DampingProfile) -> Self {
        self.damping = Some(profile);
        self
    }

    /// Index of `value`, if present.
    pub fn position(&self, value: &V) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }
}

impl<V> ValueSequence<V> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed sequence.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_circular(&self) -> bool {
        self.circular
    }

    pub fn damping(&self) -> Option<&DampingProfile> {
        self.damping.as_ref()
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_sequence() {
        let err = ValueSequence::<u32>::bounded(vec![]).unwrap_err();
        assert_eq!(err, PickerConfigError::EmptySequence);
        let err = ValueSequence::<u32>::circular(vec![]).unwrap_err();
        assert_eq!(err, PickerConfigError::EmptySequence);
    }

    #[test]
    fn rejects_single_item_circular() {
        let err = ValueSequence::circular(vec![7]).unwrap_err();
        assert_eq!(err, PickerConfigError::DegenerateCircular { len: 1 });
        assert!(ValueSequence::bounded(vec![7]).is_ok());
    }

    #[test]
    fn rejects_duplicates() {
        let err = ValueSequence::circular(vec![1, 2, 3, 2]).unwrap_err();
        assert_eq!(err, PickerConfigError::DuplicateValue { index: 3, first: 1 });
    }

    #[test]
    fn position_and_get() {
        let seq = ValueSequence::circular((1..=12).collect()).unwrap();
        assert_eq!(seq.len(), 12);
        assert!(seq.is_circular());
        assert_eq!(seq.position(&11), Some(10));
        assert_eq!(seq.position(&13), None);
        assert_eq!(seq.get(11), Some(&12));
    }

    #[test]
    fn damping_tag_is_optional() {
        let seq = ValueSequence::bounded(vec!["AM", "PM"]).unwrap();
        assert!(seq.damping().is_none());
        let seq = seq.with_damping(DampingProfile::period());
        assert_eq!(seq.damping(), Some(&DampingProfile::period()));
    }
}

//! Layered travel preferences for one hop.

use crate::{EdgeTypes, Error, Result};

/// Up to four tag masks, in priority order.
///
/// Empty slots are skipped when querying the graph, so
/// `[OUTBOUND, LOOP2 | COUNTERCLOCKWISE, ∅, ∅]` means "prefer leaving the
/// spiral, otherwise follow the secondary helix".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionSet {
    slots: [EdgeTypes; DirectionSet::MAX_SLOTS],
}

impl DirectionSet {
    /// Number of masks a direction set can hold.
    pub const MAX_SLOTS: usize = 4;

    /// No preferences at all. Matches nothing.
    pub const EMPTY: Self = Self {
        slots: [EdgeTypes::empty(); Self::MAX_SLOTS],
    };

    /// A direction set with a single mask in the first slot.
    pub const fn single(mask: EdgeTypes) -> Self {
        Self {
            slots: [mask, EdgeTypes::empty(), EdgeTypes::empty(), EdgeTypes::empty()],
        }
    }

    /// Build from up to four masks.
    pub fn from_slice(masks: &[EdgeTypes]) -> Result<Self> {
        if masks.len() > Self::MAX_SLOTS {
            return Err(Error::TooManyDirections {
                max: Self::MAX_SLOTS,
                got: masks.len(),
            });
        }
        let mut slots = [EdgeTypes::empty(); Self::MAX_SLOTS];
        slots[..masks.len()].copy_from_slice(masks);
        Ok(Self { slots })
    }

    /// The mask in slot `index` (empty for out-of-range slots).
    pub fn slot(&self, index: usize) -> EdgeTypes {
        self.slots.get(index).copied().unwrap_or_default()
    }

    /// Replace the mask in slot `index`. Out-of-range slots are ignored.
    pub fn set_slot(&mut self, index: usize, mask: EdgeTypes) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = mask;
        }
    }

    /// All four slots, including empty ones.
    pub fn slots(&self) -> &[EdgeTypes; Self::MAX_SLOTS] {
        &self.slots
    }

    /// The non-empty masks in priority order.
    pub fn iter(&self) -> impl Iterator<Item = EdgeTypes> + '_ {
        self.slots.iter().copied().filter(|m| !m.is_empty())
    }

    /// True when every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|m| m.is_empty())
    }
}

impl From<EdgeTypes> for DirectionSet {
    fn from(mask: EdgeTypes) -> Self {
        Self::single(mask)
    }
}

impl From<[EdgeTypes; DirectionSet::MAX_SLOTS]> for DirectionSet {
    fn from(slots: [EdgeTypes; DirectionSet::MAX_SLOTS]) -> Self {
        Self { slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_pads_with_empty() {
        let set = DirectionSet::from_slice(&[EdgeTypes::OUTBOUND, EdgeTypes::LOOP1]).unwrap();
        assert_eq!(set.slot(0), EdgeTypes::OUTBOUND);
        assert_eq!(set.slot(1), EdgeTypes::LOOP1);
        assert_eq!(set.slot(2), EdgeTypes::empty());
        assert_eq!(set.slot(3), EdgeTypes::empty());
    }

    #[test]
    fn from_slice_rejects_five() {
        let masks = [EdgeTypes::INBOUND; 5];
        assert_eq!(
            DirectionSet::from_slice(&masks),
            Err(Error::TooManyDirections { max: 4, got: 5 })
        );
    }

    #[test]
    fn iter_skips_empty_slots_and_keeps_order() {
        let set = DirectionSet::from([
            EdgeTypes::empty(),
            EdgeTypes::CLOCKWISE,
            EdgeTypes::empty(),
            EdgeTypes::INBOUND,
        ]);
        let masks: Vec<_> = set.iter().collect();
        assert_eq!(masks, vec![EdgeTypes::CLOCKWISE, EdgeTypes::INBOUND]);
    }

    #[test]
    fn set_slot_out_of_range_is_ignored() {
        let mut set = DirectionSet::single(EdgeTypes::LOOP2);
        set.set_slot(7, EdgeTypes::INBOUND);
        assert_eq!(set, DirectionSet::single(EdgeTypes::LOOP2));
        assert_eq!(set.slot(7), EdgeTypes::empty());
    }

    #[test]
    fn empty_set() {
        assert!(DirectionSet::EMPTY.is_empty());
        assert!(DirectionSet::default().is_empty());
        assert!(!DirectionSet::single(EdgeTypes::SPIRAL).is_empty());
    }
}

//! Tagged directed edges between pixels.
//!
//! Every physical link between two pixels carries a set of tags describing
//! which logical loop it belongs to, whether it leads toward or away from a
//! spiral centre, and which way it turns around the helix. Tags from the
//! three categories coexist on the same edge.
//!
//! Reversing an edge does not keep its tags as they are: an `OUTBOUND` link
//! walked backwards is `INBOUND`. How each tag reverses is data, supplied
//! through a [`TransposeTable`], so the vocabulary can be reused for other
//! wirings.

use crate::{Error, Result};

/// Index of a pixel on the strip, `0..N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PixelIndex(pub u16);

impl PixelIndex {
    /// Create from a raw index.
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// The raw index value.
    #[inline]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// The index as a `usize`, for slice access.
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u16> for PixelIndex {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<PixelIndex> for u16 {
    fn from(value: PixelIndex) -> Self {
        value.0
    }
}

impl std::fmt::Display for PixelIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

bitflags::bitflags! {
    /// Tags attached to a directed edge.
    ///
    /// Combine with bitwise OR: `EdgeTypes::LOOP2 | EdgeTypes::COUNTERCLOCKWISE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct EdgeTypes: u8 {
        /// Toward a spiral centre.
        const INBOUND = 1 << 0;
        /// Away from a spiral centre.
        const OUTBOUND = 1 << 1;
        const CLOCKWISE = 1 << 2;
        const COUNTERCLOCKWISE = 1 << 3;
        /// Member of the primary helix loop.
        const LOOP1 = 1 << 4;
        /// Member of the secondary helix loop.
        const LOOP2 = 1 << 5;
        /// Member of a spiral arm.
        const SPIRAL = 1 << 6;
        const RESERVED = 1 << 7;
    }
}

impl EdgeTypes {
    /// Number of tags in the vocabulary.
    pub const TAG_COUNT: usize = 8;

    /// The single-tag mask for bit position `bit`.
    #[inline]
    pub const fn tag(bit: u32) -> Self {
        Self::from_bits_retain(1 << bit)
    }

    /// Subset match: the edge carries at least one tag of `mask`.
    #[inline]
    pub const fn matches_any(self, mask: Self) -> bool {
        self.bits() & mask.bits() != 0
    }

    /// Exact match: the edge carries every tag of `mask`.
    #[inline]
    pub const fn matches_all(self, mask: Self) -> bool {
        self.bits() & mask.bits() == mask.bits()
    }
}

/// How each tag reverses when an edge is walked backwards.
///
/// Entry `i` is the tag that tag bit `i` becomes. Entries must be single
/// tags and the mapping must be its own inverse, so that transposing an
/// edge twice restores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransposeTable {
    entries: [EdgeTypes; EdgeTypes::TAG_COUNT],
}

impl TransposeTable {
    /// Direction and rotation tags swap with their opposite, topology tags
    /// are unchanged.
    pub const STANDARD: Self = Self {
        entries: [
            EdgeTypes::OUTBOUND,         // INBOUND
            EdgeTypes::INBOUND,          // OUTBOUND
            EdgeTypes::COUNTERCLOCKWISE, // CLOCKWISE
            EdgeTypes::CLOCKWISE,        // COUNTERCLOCKWISE
            EdgeTypes::LOOP1,
            EdgeTypes::LOOP2,
            EdgeTypes::SPIRAL,
            EdgeTypes::RESERVED,
        ],
    };

    /// Every tag maps to itself.
    pub const IDENTITY: Self = Self {
        entries: [
            EdgeTypes::tag(0),
            EdgeTypes::tag(1),
            EdgeTypes::tag(2),
            EdgeTypes::tag(3),
            EdgeTypes::tag(4),
            EdgeTypes::tag(5),
            EdgeTypes::tag(6),
            EdgeTypes::tag(7),
        ],
    };

    /// Validate and wrap a custom table.
    pub fn new(entries: [EdgeTypes; EdgeTypes::TAG_COUNT]) -> Result<Self> {
        for (bit, target) in entries.iter().enumerate() {
            if target.bits().count_ones() != 1 {
                return Err(Error::TransposeNotSingleTag {
                    bit: bit as u32,
                    target: *target,
                });
            }
        }
        for (bit, target) in entries.iter().enumerate() {
            let back = entries[target.bits().trailing_zeros() as usize];
            if back != EdgeTypes::tag(bit as u32) {
                return Err(Error::TransposeNotInvolution { bit: bit as u32 });
            }
        }
        Ok(Self { entries })
    }

    /// The tag that tag bit `bit` becomes on reversal.
    #[inline]
    pub fn entry(&self, bit: u32) -> EdgeTypes {
        self.entries[bit as usize]
    }

    /// Reverse every tag in `types`.
    pub fn transpose(&self, types: EdgeTypes) -> EdgeTypes {
        let mut out = EdgeTypes::empty();
        let mut bits = types.bits();
        while bits != 0 {
            let bit = bits.trailing_zeros();
            out |= self.entries[bit as usize];
            bits &= bits - 1;
        }
        out
    }
}

impl Default for TransposeTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// A directed, tagged link from one pixel to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from: PixelIndex,
    pub to: PixelIndex,
    pub types: EdgeTypes,
}

impl Edge {
    /// Create an edge between raw pixel indices.
    pub const fn new(from: u16, to: u16, types: EdgeTypes) -> Self {
        Self {
            from: PixelIndex(from),
            to: PixelIndex(to),
            types,
        }
    }

    /// The same link walked backwards.
    pub fn transpose(&self, table: &TransposeTable) -> Self {
        Self {
            from: self.to,
            to: self.from,
            types: table.transpose(self.types),
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} [{:#010b}]", self.from, self.to, self.types.bits())
    }
}

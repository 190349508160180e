//! Group-state bitmask codec.
//!
//! A group-state vector is a fixed-width bit sequence where bit `i` lives in
//! byte `i / 8` at offset `i % 8`:
//!
//! ```text
//!  byte 0                    byte 1
//! ┌─┬─┬─┬─┬─┬─┬─┬─┐         ┌──┬──┬──┬──┬──┬──┬──┬──┐
//! │7│6│5│4│3│2│1│0│         │15│14│13│12│11│10│ 9│ 8│   ...
//! └─┴─┴─┴─┴─┴─┴─┴─┘         └──┴──┴──┴──┴──┴──┴──┴──┘
//! ```
//!
//! Two widths are in use on the wire:
//!
//! - [`ActionGroupBits`]: 1 byte, the seven legacy groups in bits 0..=6
//!   (see [`ActionGroup`]).
//! - [`CustomGroupBits`]: 32 bytes, custom groups 1..=255. Bit 0 is never
//!   set by this crate since there is no group zero.
//!
//! Decoding never fails. Bits this crate does not interpret are carried
//! through untouched, because an extended backend on the other side may
//! define groups we know nothing about. Equality is plain byte equality.

/// Fixed-width group-state vector of `N` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupBits<const N: usize> {
    bytes: [u8; N],
}

/// Legacy action-group vector (one byte).
pub type ActionGroupBits = GroupBits<1>;

/// Custom action-group vector (up to 256 bits).
pub type CustomGroupBits = GroupBits<32>;

impl<const N: usize> GroupBits<N> {
    /// Number of addressable bits.
    pub const WIDTH: usize = N * 8;

    /// All-zero vector.
    pub const fn new() -> Self {
        Self { bytes: [0; N] }
    }

    /// Decode from wire bytes. Missing bytes read as zero; extra bytes are
    /// ignored.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut bytes = [0u8; N];
        let n = data.len().min(N);
        bytes[..n].copy_from_slice(&data[..n]);
        Self { bytes }
    }

    /// Encode a set of bit indices. Indices outside the width are dropped.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut bits = Self::new();
        for i in indices {
            bits.set(i, true);
        }
        bits
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Set or clear bit `index`. Out-of-range indices are a no-op.
    pub fn set(&mut self, index: usize, on: bool) {
        if index >= Self::WIDTH {
            return;
        }
        let mask = 1u8 << (index % 8);
        if on {
            self.bytes[index / 8] |= mask;
        } else {
            self.bytes[index / 8] &= !mask;
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        index < Self::WIDTH && self.bytes[index / 8] & (1u8 << (index % 8)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }

    /// Indices of all set bits, ascending.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..Self::WIDTH).filter(move |i| self.contains(*i))
    }
}

impl<const N: usize> Default for GroupBits<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionGroupBits {
    /// The raw legacy bitmask byte.
    pub const fn mask(&self) -> u8 {
        self.bytes[0]
    }

    pub const fn from_mask(mask: u8) -> Self {
        Self { bytes: [mask] }
    }
}

// ---------------------------------------------------------------------------
// Legacy action groups
// ---------------------------------------------------------------------------

/// The seven legacy action groups, in wire bit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActionGroup {
    Stage = 0,
    Gear = 1,
    Light = 2,
    Rcs = 3,
    Sas = 4,
    Brakes = 5,
    Abort = 6,
}

impl ActionGroup {
    /// All groups, lowest bit first.
    pub const ALL: [Self; 7] = [
        Self::Stage,
        Self::Gear,
        Self::Light,
        Self::Rcs,
        Self::Sas,
        Self::Brakes,
        Self::Abort,
    ];

    pub const fn bit(self) -> usize {
        self as usize
    }

    /// Return the bitmask for this group.
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }

    /// Groups whose bit is set in `mask`, in bit order. Bit 7 is ignored.
    pub fn in_mask(mask: u8) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |g| mask & g.mask() != 0)
    }
}

impl core::fmt::Display for ActionGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Stage => write!(f, "stage"),
            Self::Gear => write!(f, "gear"),
            Self::Light => write!(f, "light"),
            Self::Rcs => write!(f, "RCS"),
            Self::Sas => write!(f, "SAS"),
            Self::Brakes => write!(f, "brakes"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

// ---------------------------------------------------------------------------
// Custom group ranges
// ---------------------------------------------------------------------------

/// Custom groups the simulation supports natively.
pub const NATIVE_CUSTOM_GROUPS: core::ops::RangeInclusive<u8> = 1..=10;

/// Custom groups only an extended backend can provide.
pub const EXTENDED_CUSTOM_GROUPS: core::ops::RangeInclusive<u8> = 11..=250;

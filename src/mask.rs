use core::ops::{BitOr, BitOrAssign};

/// Maximum number of channels a single driver can handle
pub const MAX_CHANNELS: usize = 32;

/// Number of bytes needed to hold a mask for every output position
pub const MASK_BYTES: usize = MAX_CHANNELS / 8;

/// Set of physical output positions that are switched on
///
/// Bit `n` is output position `n` of the shift register chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChannelMask(u32);

impl ChannelMask {
    pub const EMPTY: Self = Self(0);

    /// Mask with the first `count` positions set
    pub const fn first(count: usize) -> Self {
        if count >= MAX_CHANNELS {
            return Self(u32::MAX);
        }
        Self((1 << count) - 1)
    }

    /// Mask with a single position set
    pub const fn position(position: u8) -> Self {
        Self(1 << (position as usize % MAX_CHANNELS))
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, position: u8) -> bool {
        self.0 & Self::position(position).0 != 0
    }

    /// Check if every position of `other` is also set here
    pub const fn is_superset_of(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Byte-packed form, bit `n` of byte `k` is position `8k + n`
    pub const fn to_bytes(self) -> [u8; MASK_BYTES] {
        self.0.to_le_bytes()
    }
}

impl BitOr for ChannelMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ChannelMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

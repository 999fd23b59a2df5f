//! Per-channel brightness state.
//!
//! Brightness values use the inverted "activation delay" encoding: `0` turns
//! a channel on at the start of every frame (full brightness), the off level
//! (`steps_per_frame - 1`) never turns it on. Each channel is wired to a
//! physical position in the shift register chain; compiled masks address
//! positions, setters address channels.

use crate::mask::{ChannelMask, MAX_CHANNELS};

/// Raw selector value addressing every channel at once.
pub const ALL_CHANNELS: u8 = 255;

/// Brightness value that keeps a channel on for the whole frame.
pub const ON_LEVEL: u8 = 0;

/// Which channels a setter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSelector {
    All,
    Single(u8),
}

impl From<u8> for ChannelSelector {
    fn from(value: u8) -> Self {
        match value {
            ALL_CHANNELS => Self::All,
            channel => Self::Single(channel),
        }
    }
}

/// Error returned for a channel index or output position that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidChannel(pub u8);

/// Brightness of `N` channels plus their output positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelState<const N: usize> {
    levels: [u8; N],
    positions: [u8; N],
    off_level: u8,
}

impl<const N: usize> ChannelState<N> {
    /// Create a state with every channel off, wired in index order.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(off_level: u8) -> Self {
        const { assert!(N > 0 && N <= MAX_CHANNELS) };

        let mut positions = [0; N];
        let mut i = 0;
        while i < N {
            positions[i] = i as u8;
            i += 1;
        }

        Self {
            levels: [off_level; N],
            positions,
            off_level,
        }
    }

    /// Create a state with a custom channel to output position wiring.
    ///
    /// `positions[channel]` is the output the channel is connected to. Every
    /// position must be below `N` and used once.
    pub fn with_positions(off_level: u8, positions: [u8; N]) -> Result<Self, InvalidChannel> {
        let mut seen = ChannelMask::EMPTY;
        for &position in &positions {
            if usize::from(position) >= N || seen.contains(position) {
                return Err(InvalidChannel(position));
            }
            seen |= ChannelMask::position(position);
        }

        let mut state = Self::new(off_level);
        state.positions = positions;
        Ok(state)
    }

    /// Set brightness for the selected channels, clamped to the off level.
    pub fn set(&mut self, selector: ChannelSelector, value: u8) -> Result<(), InvalidChannel> {
        let value = value.min(self.off_level);
        match selector {
            ChannelSelector::All => self.levels.fill(value),
            ChannelSelector::Single(channel) => {
                let level = self
                    .levels
                    .get_mut(usize::from(channel))
                    .ok_or(InvalidChannel(channel))?;
                *level = value;
            }
        }
        Ok(())
    }

    /// Get brightness of a channel
    pub fn get(&self, channel: u8) -> Option<u8> {
        self.levels.get(usize::from(channel)).copied()
    }

    /// Get the output position a channel is wired to
    pub fn position(&self, channel: u8) -> Option<u8> {
        self.positions.get(usize::from(channel)).copied()
    }

    pub const fn off_level(&self) -> u8 {
        self.off_level
    }

    /// Mask of every wired output position
    pub fn wired(&self) -> ChannelMask {
        self.positions
            .iter()
            .fold(ChannelMask::EMPTY, |mask, &position| {
                mask | ChannelMask::position(position)
            })
    }

    /// Iterate over `(position, value)` pairs in channel order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.positions.iter().copied().zip(self.levels.iter().copied())
    }

    /// Number of channels
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

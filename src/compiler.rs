//! Brightness to event compiler
//!
//! Turns the brightness of every channel into the shortest list of timer
//! events that reproduces it. Channels only ever switch on during a frame
//! and all of them switch off together at the frame wrap, so one event per
//! distinct brightness value is enough: sorting the values gives the event
//! order and the scaled differences between neighbours give the delays.

use heapless::Vec;

use crate::channel::{ChannelState, ON_LEVEL};
use crate::config::TimingConfig;
use crate::frame::FrameBuffer;
use crate::mask::{ChannelMask, MAX_CHANNELS};

/// Compiles [`ChannelState`] into a [`FrameBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCompiler {
    ticks_per_step: u16,
    off_level: u8,
}

impl EventCompiler {
    pub const fn new(config: &TimingConfig) -> Self {
        Self {
            ticks_per_step: config.ticks_per_step(),
            off_level: config.off_level(),
        }
    }

    pub const fn ticks_per_step(&self) -> u16 {
        self.ticks_per_step
    }

    pub const fn off_level(&self) -> u8 {
        self.off_level
    }

    /// Compile channel brightness into `frame`, replacing its contents
    pub fn compile<const N: usize>(&self, channels: &ChannelState<N>, frame: &mut FrameBuffer) {
        frame.clear();

        // (value, position) pairs: ties are ordered by position, which keeps
        // the output deterministic even though the sort is unstable
        let mut sorted: Vec<(u8, u8), MAX_CHANNELS> = Vec::new();
        for (position, value) in channels.iter() {
            let _ = sorted.push((value.min(self.off_level), position));
        }
        sorted.sort_unstable();

        let (Some(&(lowest, _)), Some(&(highest, _))) = (sorted.first(), sorted.last()) else {
            return;
        };
        let wired = channels.wired();

        if lowest == self.off_level {
            return;
        }
        if highest == ON_LEVEL {
            frame.add_always_on(wired);
            return;
        }
        if lowest == highest {
            frame.push_event(self.scale(lowest), wired);
            frame.push_wrap(self.scale(self.off_level - lowest));
            return;
        }

        let mut active = ChannelMask::EMPTY;
        let mut previous = None;
        for &(value, position) in &sorted {
            let output = ChannelMask::position(position);
            if value == ON_LEVEL {
                active |= output;
                frame.add_always_on(output);
                continue;
            }
            if value == self.off_level {
                // Everything after this one is off as well
                break;
            }

            active |= output;
            if previous == Some(value) {
                frame.extend_last(output);
            } else {
                let since = previous.unwrap_or(ON_LEVEL);
                frame.push_event(self.scale(value - since), active);
                previous = Some(value);
            }
        }

        if let Some(last) = previous {
            frame.push_wrap(self.scale(self.off_level - last));
        }
    }

    fn scale(&self, steps: u8) -> u16 {
        u16::from(steps).saturating_mul(self.ticks_per_step)
    }
}

//! Compiled frame tables.
//!
//! A [`FrameBuffer`] is one complete frame definition: the tick delays
//! between consecutive events, the output mask asserted at each event and
//! the always-on mask asserted at every frame wrap. Two of them live in a
//! [`FrameBufferSet`], one replayed by the sequencer and one being rebuilt
//! by the publisher.

use heapless::Vec;

use crate::mask::{ChannelMask, MAX_CHANNELS};

/// Maximum number of events in one frame (one per distinct brightness)
pub const MAX_EVENTS: usize = MAX_CHANNELS;

/// Event table and mask table of one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Ticks until each event, plus the trailing delay until frame wrap
    deltas: Vec<u16, { MAX_EVENTS + 1 }>,
    /// Outputs switched on after each event
    masks: Vec<ChannelMask, MAX_EVENTS>,
    /// Outputs on for the whole frame
    always_on: ChannelMask,
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            deltas: Vec::new(),
            masks: Vec::new(),
            always_on: ChannelMask::EMPTY,
        }
    }

    /// Number of events in the frame
    pub fn event_count(&self) -> usize {
        self.masks.len()
    }

    /// Check if the frame has no events, so the output is static
    pub fn is_idle(&self) -> bool {
        self.masks.is_empty()
    }

    /// Tick deltas: one per event followed by the frame wrap delay.
    ///
    /// Empty for an idle frame.
    pub fn deltas(&self) -> &[u16] {
        &self.deltas
    }

    /// Output masks, one per event
    pub fn masks(&self) -> &[ChannelMask] {
        &self.masks
    }

    pub const fn always_on(&self) -> ChannelMask {
        self.always_on
    }

    /// Delay programmed after reaching `index`
    pub(crate) fn delta(&self, index: usize) -> u16 {
        self.deltas.get(index).copied().unwrap_or(0)
    }

    /// Mask asserted by event `index`
    pub(crate) fn mask(&self, index: usize) -> ChannelMask {
        self.masks.get(index).copied().unwrap_or(self.always_on)
    }

    /// Total number of ticks in the frame (zero when idle)
    pub fn frame_ticks(&self) -> u32 {
        self.deltas.iter().copied().map(u32::from).sum()
    }

    /// Ticks per frame during which an output position is on.
    ///
    /// An idle frame has no period, this returns zero for it; check
    /// [`Self::always_on`] instead.
    pub fn on_ticks(&self, position: u8) -> u32 {
        let frame = self.frame_ticks();
        if self.always_on.contains(position) {
            return frame;
        }

        let mut elapsed = 0;
        for (delta, mask) in self.deltas.iter().zip(self.masks.iter()) {
            elapsed += u32::from(*delta);
            if mask.contains(position) {
                return frame - elapsed;
            }
        }
        0
    }

    pub(crate) fn clear(&mut self) {
        self.deltas.clear();
        self.masks.clear();
        self.always_on = ChannelMask::EMPTY;
    }

    /// Append an event `delta` ticks after the previous one
    pub(crate) fn push_event(&mut self, delta: u16, mask: ChannelMask) {
        // Bounded by MAX_EVENTS: there is at most one event per channel
        if self.masks.push(mask).is_ok() {
            let _ = self.deltas.push(delta);
        }
    }

    /// Add outputs to the most recent event
    pub(crate) fn extend_last(&mut self, mask: ChannelMask) {
        if let Some(last) = self.masks.last_mut() {
            *last |= mask;
        }
    }

    /// Close the frame with the delay from the last event to frame wrap
    pub(crate) fn push_wrap(&mut self, delta: u16) {
        if !self.is_idle() {
            let _ = self.deltas.push(delta);
        }
    }

    pub(crate) fn add_always_on(&mut self, mask: ChannelMask) {
        self.always_on |= mask;
    }
}

/// Statically allocated pair of frame buffers
///
/// Allocate it once (e.g. in a `static` cell) and hand it to
/// [`ShiftPwm::initialize`](crate::ShiftPwm::initialize).
#[derive(Debug, Default)]
pub struct FrameBufferSet {
    slots: [FrameBuffer; 2],
}

impl FrameBufferSet {
    pub const fn new() -> Self {
        Self {
            slots: [FrameBuffer::new(), FrameBuffer::new()],
        }
    }

    /// Split into the two independently owned slots
    pub fn split(&mut self) -> (&mut FrameBuffer, &mut FrameBuffer) {
        let [first, second] = &mut self.slots;
        (first, second)
    }
}

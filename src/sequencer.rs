//! Interrupt-driven frame sequencer
//!
//! The sequencer replays the active [`FrameBuffer`] from the timer's
//! compare-match interrupt. Each firing shifts out the mask for the current
//! event and programs the delay until the next one, so the timer never waits
//! for software.
//!
//! The sequencer lives in a [`SequencerCell`] guarded by a critical section,
//! which the application keeps in a `static` and calls from its interrupt
//! vector:
//!
//! ```ignore
//! static SEQUENCER: SequencerCell<'static, Timer1, Chain> = SequencerCell::new();
//!
//! #[interrupt]
//! fn TIMER1_COMPA() {
//!     SEQUENCER.on_compare_match();
//! }
//! ```

use core::cell::RefCell;
use core::mem;

use critical_section::Mutex;

use crate::config::Prescaler;
use crate::frame::FrameBuffer;
use crate::mask::ChannelMask;
use crate::{CompareTimer, ShiftOutput};

/// Error returned when a cell already holds a running sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyRegistered;

/// Snapshot of the sequencer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerStatus {
    /// Index of the next event to fire
    pub cursor: usize,
    /// Number of events in the active frame
    pub event_count: usize,
    /// Whether the compare-match interrupt is enabled
    pub armed: bool,
}

/// Frame replay state owned by the interrupt side
struct Sequencer<'a, T, S> {
    timer: T,
    output: S,
    frame: &'a mut FrameBuffer,
    cursor: usize,
    event_count: usize,
    bits: usize,
}

impl<'a, T: CompareTimer, S: ShiftOutput> Sequencer<'a, T, S> {
    fn step(&mut self) {
        let mask = if self.cursor >= self.event_count {
            // Frame wrap: back to the outputs that are on all frame long
            self.cursor = 0;
            self.frame.always_on()
        } else {
            let mask = self.frame.mask(self.cursor);
            self.cursor += 1;
            mask
        };

        self.timer.set_compare(self.frame.delta(self.cursor));
        self.emit(mask);
    }

    const fn is_at_safe_point(&self) -> bool {
        self.cursor >= self.event_count
    }

    /// Make `staging` the active frame and hand the old one back
    fn swap(&mut self, staging: &mut &'a mut FrameBuffer) {
        mem::swap(&mut self.frame, staging);
        self.event_count = self.frame.event_count();

        if self.event_count == 0 {
            self.timer.disable_interrupt();
            self.cursor = 0;
            self.emit(self.frame.always_on());
            return;
        }

        if self.timer.is_interrupt_enabled() {
            // The pending compare match ends the old frame and wraps into
            // the new one
            self.cursor = self.event_count;
        } else {
            self.cursor = 0;
            self.timer.set_compare(self.frame.delta(0));
            self.emit(self.frame.always_on());
            self.timer.enable_interrupt();
        }
    }

    fn emit(&mut self, mask: ChannelMask) {
        self.output.shift_out(&mask.to_bytes(), self.bits);
    }

    fn status(&self) -> SequencerStatus {
        SequencerStatus {
            cursor: self.cursor,
            event_count: self.event_count,
            armed: self.timer.is_interrupt_enabled(),
        }
    }
}

/// Shared home of the sequencer
///
/// Both the foreground and the interrupt handler only touch the sequencer
/// inside a critical section.
pub struct SequencerCell<'a, T, S> {
    inner: Mutex<RefCell<Option<Sequencer<'a, T, S>>>>,
}

impl<T, S> SequencerCell<'_, T, S> {
    /// Create an empty cell
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Check if a sequencer is registered
    pub fn is_registered(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().is_some())
    }
}

impl<T, S> Default for SequencerCell<'_, T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: CompareTimer, S: ShiftOutput> SequencerCell<'a, T, S> {
    /// Compare-match interrupt handler
    ///
    /// Does nothing until a driver has been initialized on this cell.
    pub fn on_compare_match(&self) {
        critical_section::with(|cs| {
            if let Some(sequencer) = self.inner.borrow(cs).borrow_mut().as_mut() {
                sequencer.step();
            }
        });
    }

    /// Get a snapshot of the sequencer state
    pub fn status(&self) -> Option<SequencerStatus> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().as_ref().map(Sequencer::status))
    }

    /// Install an idle sequencer replaying `frame`
    ///
    /// The timer and the output are only configured once the cell is known
    /// to be free; on error they are dropped untouched.
    pub(crate) fn register(
        &self,
        mut timer: T,
        mut output: S,
        prescaler: Prescaler,
        frame: &'a mut FrameBuffer,
        bits: usize,
    ) -> Result<(), AlreadyRegistered> {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow(cs).borrow_mut();
            if slot.is_some() {
                return Err(AlreadyRegistered);
            }

            timer.disable_interrupt();
            timer.configure(prescaler);
            output.reset();
            frame.clear();
            *slot = Some(Sequencer {
                timer,
                output,
                frame,
                cursor: 0,
                event_count: 0,
                bits,
            });
            Ok(())
        })
    }

    /// Swap `staging` in if the sequencer sits at the frame wrap
    ///
    /// Returns `false` without touching anything otherwise; interrupts are
    /// enabled again once this returns, letting the sequencer advance.
    pub(crate) fn try_swap(&self, staging: &mut &'a mut FrameBuffer) -> bool {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow(cs).borrow_mut();
            let Some(sequencer) = slot.as_mut() else {
                return false;
            };
            if !sequencer.is_at_safe_point() {
                return false;
            }
            sequencer.swap(staging);
            true
        })
    }

    /// Stop the timer, blank the outputs and take the peripherals back
    pub(crate) fn release(&self) -> Option<(T, S)> {
        critical_section::with(|cs| {
            let mut sequencer = self.inner.borrow(cs).borrow_mut().take()?;
            sequencer.timer.disable_interrupt();
            sequencer.emit(ChannelMask::EMPTY);
            Some((sequencer.timer, sequencer.output))
        })
    }
}

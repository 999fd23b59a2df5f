//! Bit-banged shift register output
//!
//! Drives a chain of serial-in/parallel-out registers (74HC595 style) with
//! three GPIO lines: data, clock and latch. The outputs change only when the
//! latch rises, so a frame is applied atomically.

use core::convert::Infallible;

use embedded_hal::digital::{OutputPin, PinState};

use crate::ShiftOutput;

/// Shift register chain on three output pins
#[derive(Debug)]
pub struct ShiftRegister<D, C, L> {
    data: D,
    clock: C,
    latch: L,
}

impl<D, C, L> ShiftRegister<D, C, L>
where
    D: OutputPin<Error = Infallible>,
    C: OutputPin<Error = Infallible>,
    L: OutputPin<Error = Infallible>,
{
    pub const fn new(data: D, clock: C, latch: L) -> Self {
        Self { data, clock, latch }
    }

    /// Give the pins back
    pub fn release(self) -> (D, C, L) {
        (self.data, self.clock, self.latch)
    }

    /// Clock one bit into the chain
    #[inline]
    fn shift_bit(&mut self, high: bool) {
        drive(&mut self.data, false);
        drive(&mut self.clock, false);
        if high {
            drive(&mut self.data, true);
        }
        drive(&mut self.clock, true);
    }
}

impl<D, C, L> ShiftOutput for ShiftRegister<D, C, L>
where
    D: OutputPin<Error = Infallible>,
    C: OutputPin<Error = Infallible>,
    L: OutputPin<Error = Infallible>,
{
    fn reset(&mut self) {
        drive(&mut self.latch, false);
        drive(&mut self.clock, false);
    }

    fn shift_out(&mut self, data: &[u8], bits: usize) {
        drive(&mut self.latch, false);

        let mut remaining = bits;
        for &byte in data {
            if remaining == 0 {
                break;
            }
            // A partial byte only carries its low bits
            let width = remaining.min(8);
            for bit in (0..width).rev() {
                self.shift_bit(byte & (1 << bit) != 0);
            }
            remaining -= width;
        }

        drive(&mut self.latch, true);
    }
}

#[inline]
fn drive<P: OutputPin<Error = Infallible>>(pin: &mut P, high: bool) {
    match pin.set_state(PinState::from(high)) {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

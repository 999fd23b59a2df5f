#![no_std]

pub mod channel;
pub mod compiler;
pub mod config;
pub mod driver;
pub mod frame;
pub mod mask;
pub mod sequencer;
pub mod shift_register;

pub use channel::{ALL_CHANNELS, ChannelSelector, ChannelState, InvalidChannel, ON_LEVEL};
pub use compiler::EventCompiler;
pub use config::{ConfigError, Prescaler, TimingConfig};
pub use driver::{InitError, ShiftPwm, WouldBlock};
pub use frame::{FrameBuffer, FrameBufferSet};
pub use mask::{ChannelMask, MAX_CHANNELS};
pub use sequencer::{SequencerCell, SequencerStatus};
pub use shift_register::ShiftRegister;

pub use embassy_time::Duration;

/// Compare-match timer driving the sequencer
///
/// The timer counts up from zero, raises its interrupt once when the counter
/// reaches the compare value and starts over (CTC behaviour).
pub trait CompareTimer {
    /// Switch to clear-on-compare mode with the given prescaler
    fn configure(&mut self, prescaler: Prescaler);

    /// Program the number of ticks until the next compare match
    fn set_compare(&mut self, ticks: u16);

    fn enable_interrupt(&mut self);

    fn disable_interrupt(&mut self);

    fn is_interrupt_enabled(&self) -> bool;
}

/// Serial output into the shift register chain
///
/// Implement this trait to support different wiring (bit-banged GPIO, SPI).
pub trait ShiftOutput {
    /// Put the clock and latch lines into their idle state
    fn reset(&mut self) {}

    /// Shift out the first `bits` bits of a byte-packed mask and latch them
    ///
    /// Bit `n` of byte `k` is output position `8k + n`. Each byte goes out
    /// most significant bit first. Must finish well within one timer tick.
    fn shift_out(&mut self, data: &[u8], bits: usize);
}

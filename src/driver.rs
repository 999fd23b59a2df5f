//! Foreground driver
//!
//! [`ShiftPwm`] owns the channel state and the staging frame buffer. Setters
//! only change the state; [`ShiftPwm::publish`] compiles it and hands the
//! result to the sequencer at the next frame wrap.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::channel::{ChannelSelector, ChannelState, InvalidChannel};
use crate::compiler::EventCompiler;
use crate::config::{ConfigError, TimingConfig};
use crate::frame::{FrameBuffer, FrameBufferSet};
use crate::sequencer::{AlreadyRegistered, SequencerCell};
use crate::{CompareTimer, ShiftOutput};

/// Reasons [`ShiftPwm::initialize`] can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// Timing does not fit the timer
    Config(ConfigError),
    /// Channel wiring is invalid
    InvalidChannel(InvalidChannel),
    /// The sequencer cell is already in use
    AlreadyRegistered,
}

impl From<ConfigError> for InitError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}

impl From<InvalidChannel> for InitError {
    fn from(error: InvalidChannel) -> Self {
        Self::InvalidChannel(error)
    }
}

impl From<AlreadyRegistered> for InitError {
    fn from(_: AlreadyRegistered) -> Self {
        Self::AlreadyRegistered
    }
}

/// Error returned by [`ShiftPwm::try_publish`] when the sequencer is mid-frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WouldBlock;

/// Software PWM for `N` channels behind a shift register chain
pub struct ShiftPwm<'a, T, S, const N: usize> {
    config: TimingConfig,
    compiler: EventCompiler,
    channels: ChannelState<N>,
    staging: &'a mut FrameBuffer,
    sequencer: &'a SequencerCell<'a, T, S>,
}

impl<'a, T: CompareTimer, S: ShiftOutput, const N: usize> ShiftPwm<'a, T, S, N> {
    /// Configure the hardware and start with every channel off
    ///
    /// Channel `n` is wired to output position `n`.
    pub fn initialize(
        config: TimingConfig,
        sequencer: &'a SequencerCell<'a, T, S>,
        buffers: &'a mut FrameBufferSet,
        timer: T,
        output: S,
    ) -> Result<Self, InitError> {
        let channels = ChannelState::new(config.off_level());
        Self::start(config, channels, sequencer, buffers, timer, output)
    }

    /// Same as [`Self::initialize`] with a custom channel wiring
    ///
    /// `positions[channel]` is the output position the channel drives.
    pub fn initialize_with_positions(
        config: TimingConfig,
        positions: [u8; N],
        sequencer: &'a SequencerCell<'a, T, S>,
        buffers: &'a mut FrameBufferSet,
        timer: T,
        output: S,
    ) -> Result<Self, InitError> {
        let channels = ChannelState::with_positions(config.off_level(), positions)?;
        Self::start(config, channels, sequencer, buffers, timer, output)
    }

    fn start(
        config: TimingConfig,
        channels: ChannelState<N>,
        sequencer: &'a SequencerCell<'a, T, S>,
        buffers: &'a mut FrameBufferSet,
        timer: T,
        output: S,
    ) -> Result<Self, InitError> {
        let config = config.validate()?;

        let (active, staging) = buffers.split();
        sequencer.register(timer, output, config.prescaler, active, N)?;

        #[cfg(feature = "esp32-log")]
        println!(
            "[ShiftPwm.initialize] {:?} channels, {:?} ticks per step",
            N,
            config.ticks_per_step()
        );

        let mut pwm = Self {
            config,
            compiler: EventCompiler::new(&config),
            channels,
            staging,
            sequencer,
        };
        pwm.publish();
        Ok(pwm)
    }

    /// Set brightness without touching the output
    ///
    /// `channel` is a channel index or [`ALL_CHANNELS`](crate::ALL_CHANNELS).
    /// `0` is full brightness, the off level (`steps_per_frame - 1`) is off;
    /// larger values are clamped. Call [`Self::publish`] to apply.
    pub fn set_brightness(&mut self, channel: u8, value: u8) -> Result<(), InvalidChannel> {
        self.channels.set(ChannelSelector::from(channel), value)
    }

    /// Set brightness and publish it
    pub fn set_brightness_and_apply(
        &mut self,
        channel: u8,
        value: u8,
    ) -> Result<(), InvalidChannel> {
        self.set_brightness(channel, value)?;
        self.publish();
        Ok(())
    }

    /// Set brightness as an intensity, where larger means brighter
    ///
    /// Intensity `0` is off, the off level is full brightness.
    pub fn set_intensity(&mut self, channel: u8, intensity: u8) -> Result<(), InvalidChannel> {
        let value = self.channels.off_level().saturating_sub(intensity);
        self.set_brightness(channel, value)
    }

    /// Get the brightness value of a channel
    pub fn brightness(&self, channel: u8) -> Option<u8> {
        self.channels.get(channel)
    }

    pub fn channels(&self) -> &ChannelState<N> {
        &self.channels
    }

    pub const fn config(&self) -> &TimingConfig {
        &self.config
    }

    /// Compile the current state and apply it at the next frame wrap
    ///
    /// Spins until the sequencer reaches the end of the frame it is playing,
    /// which takes at most one frame. Interrupts stay enabled between checks.
    pub fn publish(&mut self) {
        self.compiler.compile(&self.channels, self.staging);

        #[cfg(feature = "esp32-log")]
        println!(
            "[ShiftPwm.publish] {:?} events, always on {:?}",
            self.staging.event_count(),
            self.staging.always_on()
        );

        while !self.sequencer.try_swap(&mut self.staging) {
            core::hint::spin_loop();
        }
    }

    /// Like [`Self::publish`], but gives up instead of waiting for the wrap
    ///
    /// The compiled frame is discarded on failure; calling again recompiles.
    pub fn try_publish(&mut self) -> Result<(), WouldBlock> {
        self.compiler.compile(&self.channels, self.staging);
        if self.sequencer.try_swap(&mut self.staging) {
            Ok(())
        } else {
            Err(WouldBlock)
        }
    }

    /// Stop the timer, switch every output off and return the peripherals
    ///
    /// The sequencer cell can be initialized again afterwards.
    pub fn shutdown(self) -> Option<(T, S)> {
        #[cfg(feature = "esp32-log")]
        println!("[ShiftPwm.shutdown] releasing sequencer");

        self.sequencer.release()
    }
}

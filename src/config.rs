//! Timing configuration
//!
//! Everything the compiler and the sequencer need to know about time is
//! derived from four numbers: the timer input clock, its prescaler, the
//! frame rate and the number of brightness steps per frame.

use embassy_time::Duration;

/// Default frame rate (60 FPS).
pub const DEFAULT_FPS: u16 = 60;

/// Default number of brightness steps per frame.
pub const DEFAULT_STEPS_PER_FRAME: u16 = 256;

/// Largest value the 16-bit compare register can hold.
pub const MAX_COMPARE_TICKS: u32 = u16::MAX as u32;

/// Timer clock prescaler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prescaler {
    Div1,
    Div8,
    Div64,
    Div256,
    Div1024,
}

impl Prescaler {
    /// Clock divisor applied to the timer input
    pub const fn divisor(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div8 => 8,
            Self::Div64 => 64,
            Self::Div256 => 256,
            Self::Div1024 => 1024,
        }
    }
}

/// Reasons a [`TimingConfig`] cannot drive the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Frame rate is zero
    ZeroFrameRate,
    /// Steps per frame must be within `2..=256`
    StepsOutOfRange,
    /// Timer is too slow to count at least one tick per step
    TimerTooSlow,
    /// A full frame does not fit the compare register
    FrameTooLong,
}

/// Compile-time timing parameters of the PWM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// Timer input clock in Hz (usually the CPU clock)
    pub timer_clock_hz: u32,
    /// Timer prescaler
    pub prescaler: Prescaler,
    /// Output frames per second
    pub frames_per_second: u16,
    /// Brightness resolution, i.e. number of levels per frame
    pub steps_per_frame: u16,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::new(16_000_000, Prescaler::Div8, DEFAULT_FPS, DEFAULT_STEPS_PER_FRAME)
    }
}

impl TimingConfig {
    pub const fn new(
        timer_clock_hz: u32,
        prescaler: Prescaler,
        frames_per_second: u16,
        steps_per_frame: u16,
    ) -> Self {
        Self {
            timer_clock_hz,
            prescaler,
            frames_per_second,
            steps_per_frame,
        }
    }

    /// Check that the configuration fits the hardware
    ///
    /// Returns the configuration itself so it can be chained in a `const`.
    #[allow(clippy::cast_lossless)]
    pub const fn validate(self) -> Result<Self, ConfigError> {
        if self.frames_per_second == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if self.steps_per_frame < 2 || self.steps_per_frame > 256 {
            return Err(ConfigError::StepsOutOfRange);
        }
        if self.raw_ticks_per_step() == 0 {
            return Err(ConfigError::TimerTooSlow);
        }
        let frame_ticks = self.raw_ticks_per_step() as u64 * (self.steps_per_frame as u64 - 1);
        if frame_ticks > MAX_COMPARE_TICKS as u64 {
            return Err(ConfigError::FrameTooLong);
        }
        Ok(self)
    }

    /// Timer ticks per brightness step (`tickScale`)
    ///
    /// Only meaningful for a configuration that passed [`Self::validate`].
    #[allow(clippy::cast_possible_truncation)]
    pub const fn ticks_per_step(&self) -> u16 {
        let ticks = self.raw_ticks_per_step();
        if ticks > MAX_COMPARE_TICKS {
            return u16::MAX;
        }
        ticks as u16
    }

    /// Brightness value meaning "never on" (`LEVELS - 1`)
    #[allow(clippy::cast_possible_truncation)]
    pub const fn off_level(&self) -> u8 {
        if self.steps_per_frame == 0 {
            return 0;
        }
        if self.steps_per_frame > 256 {
            return u8::MAX;
        }
        (self.steps_per_frame - 1) as u8
    }

    /// Timer ticks in one full frame
    #[allow(clippy::cast_lossless)]
    pub const fn frame_ticks(&self) -> u32 {
        self.off_level() as u32 * self.ticks_per_step() as u32
    }

    /// Wall-clock length of one frame
    pub fn frame_duration(&self) -> Duration {
        Duration::from_hz(u64::from(self.frames_per_second.max(1)))
    }

    /// Wall-clock length of one brightness step
    pub fn step_duration(&self) -> Duration {
        let steps_per_second =
            u64::from(self.frames_per_second) * u64::from(self.steps_per_frame);
        Duration::from_hz(steps_per_second.max(1))
    }

    #[allow(clippy::cast_lossless)]
    const fn raw_ticks_per_step(&self) -> u32 {
        let timer_hz = self.timer_clock_hz / self.prescaler.divisor();
        let steps_per_second = self.frames_per_second as u32 * self.steps_per_frame as u32;
        if steps_per_second == 0 {
            return 0;
        }
        (timer_hz / steps_per_second).saturating_sub(1)
    }
}

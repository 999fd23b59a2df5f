mod tests {
    use myrtio_shift_pwm::{ConfigError, Duration, Prescaler, TimingConfig};

    #[test]
    fn test_default_timing() {
        let config = TimingConfig::default();
        assert_eq!(config.validate(), Ok(config));
        // 16 MHz / 8 / (60 * 256) - 1
        assert_eq!(config.ticks_per_step(), 129);
        assert_eq!(config.off_level(), 255);
        assert_eq!(config.frame_ticks(), 255 * 129);
    }

    #[test]
    fn test_coarse_timing() {
        let config = TimingConfig::new(16_000_000, Prescaler::Div64, 100, 64);
        assert!(config.validate().is_ok());
        assert_eq!(config.ticks_per_step(), 38);
        assert_eq!(config.off_level(), 63);
        assert_eq!(config.frame_ticks(), 63 * 38);
    }

    #[test]
    fn test_validate_rejects_bad_timing() {
        assert_eq!(
            TimingConfig::new(16_000_000, Prescaler::Div8, 0, 256).validate(),
            Err(ConfigError::ZeroFrameRate)
        );
        assert_eq!(
            TimingConfig::new(16_000_000, Prescaler::Div8, 60, 1).validate(),
            Err(ConfigError::StepsOutOfRange)
        );
        assert_eq!(
            TimingConfig::new(16_000_000, Prescaler::Div8, 60, 300).validate(),
            Err(ConfigError::StepsOutOfRange)
        );
        assert_eq!(
            TimingConfig::new(1_000_000, Prescaler::Div1024, 60, 256).validate(),
            Err(ConfigError::TimerTooSlow)
        );
        assert_eq!(
            TimingConfig::new(16_000_000, Prescaler::Div1, 60, 256).validate(),
            Err(ConfigError::FrameTooLong)
        );
    }

    #[test]
    fn test_prescaler_divisor() {
        assert_eq!(Prescaler::Div1.divisor(), 1);
        assert_eq!(Prescaler::Div8.divisor(), 8);
        assert_eq!(Prescaler::Div64.divisor(), 64);
        assert_eq!(Prescaler::Div256.divisor(), 256);
        assert_eq!(Prescaler::Div1024.divisor(), 1024);
    }

    #[test]
    fn test_durations() {
        let config = TimingConfig::default();
        assert_eq!(config.frame_duration(), Duration::from_hz(60));
        assert_eq!(config.step_duration(), Duration::from_hz(60 * 256));
    }
}

mod tests {
    use myrtio_shift_pwm::{ChannelMask, ChannelSelector, ChannelState, InvalidChannel};

    #[test]
    fn test_new_state_is_off() {
        let state = ChannelState::<4>::new(255);
        assert_eq!(state.len(), 4);
        for channel in 0..4 {
            assert_eq!(state.get(channel), Some(255));
            assert_eq!(state.position(channel), Some(channel));
        }
        assert_eq!(state.get(4), None);
        assert_eq!(state.wired(), ChannelMask::first(4));
    }

    #[test]
    fn test_set_single_and_all() {
        let mut state = ChannelState::<3>::new(255);
        state.set(ChannelSelector::Single(1), 40).unwrap();
        assert_eq!(state.get(0), Some(255));
        assert_eq!(state.get(1), Some(40));

        state.set(ChannelSelector::All, 7).unwrap();
        assert!((0..3).all(|channel| state.get(channel) == Some(7)));
    }

    #[test]
    fn test_set_clamps_to_off_level() {
        let mut state = ChannelState::<2>::new(63);
        state.set(ChannelSelector::Single(0), 200).unwrap();
        assert_eq!(state.get(0), Some(63));
    }

    #[test]
    fn test_set_unknown_channel() {
        let mut state = ChannelState::<2>::new(255);
        assert_eq!(
            state.set(ChannelSelector::Single(2), 0),
            Err(InvalidChannel(2))
        );
        assert_eq!(state.get(0), Some(255));
    }

    #[test]
    fn test_selector_from_raw() {
        assert_eq!(ChannelSelector::from(255), ChannelSelector::All);
        assert_eq!(ChannelSelector::from(3), ChannelSelector::Single(3));
    }

    #[test]
    fn test_custom_positions() {
        let state = ChannelState::<3>::with_positions(255, [2, 0, 1]).unwrap();
        assert_eq!(state.position(0), Some(2));
        assert_eq!(state.wired(), ChannelMask::first(3));

        let pairs: Vec<_> = state.iter().collect();
        assert_eq!(pairs, [(2, 255), (0, 255), (1, 255)]);
    }

    #[test]
    fn test_invalid_positions() {
        assert_eq!(
            ChannelState::<3>::with_positions(255, [0, 0, 1]),
            Err(InvalidChannel(0))
        );
        assert_eq!(
            ChannelState::<3>::with_positions(255, [0, 1, 3]),
            Err(InvalidChannel(3))
        );
    }
}

mod tests {
    use triac_dimmer_core::ramp::step_toward;

    #[test]
    fn test_steps_down_toward_target() {
        assert_eq!(step_toward(12_000, 3_264, 50), 11_950);
    }

    #[test]
    fn test_steps_up_toward_target() {
        assert_eq!(step_toward(3_264, 7_232, 50), 3_314);
    }

    #[test]
    fn test_snaps_within_one_step() {
        assert_eq!(step_toward(3_300, 3_264, 50), 3_264);
        assert_eq!(step_toward(3_230, 3_264, 50), 3_264);
        assert_eq!(step_toward(3_314, 3_264, 50), 3_264);
        assert_eq!(step_toward(3_264, 3_264, 50), 3_264);
    }

    #[test]
    fn test_converges_without_overshoot() {
        let mut delay = 12_000u16;
        let mut boundaries = 0;
        while delay != 3_264 {
            let next = step_toward(delay, 3_264, 50);
            assert!(next < delay);
            assert!(next >= 3_264);
            delay = next;
            boundaries += 1;
        }
        assert_eq!(boundaries, 175);
    }

    #[test]
    fn test_reaches_zero_exactly() {
        let mut delay = 120u16;
        for _ in 0..3 {
            delay = step_toward(delay, 0, 50);
        }
        assert_eq!(delay, 0);
    }
}

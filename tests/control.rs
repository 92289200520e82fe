mod tests {
    use triac_dimmer_core::{
        Boundary, CHANNEL_COUNT, Calibration, CommandDecoder, CommandMailbox, CycleSensor, Dimmer,
        FaultLatch, OutputDriver, ReceiverDriver, RxFault, Setpoint, SetpointCommand,
    };

    struct SimSensor {
        sample: u8,
        elapsed: u16,
    }

    impl SimSensor {
        fn new() -> Self {
            Self {
                sample: 200,
                elapsed: 0,
            }
        }
    }

    impl CycleSensor for SimSensor {
        fn sample_zero_cross(&mut self) -> u8 {
            self.sample
        }

        fn elapsed_ticks(&self) -> u16 {
            self.elapsed
        }

        fn restart_cycle(&mut self) {
            self.elapsed = 0;
        }
    }

    struct SimReceiver;

    impl ReceiverDriver for SimReceiver {
        fn restart(&mut self) {}

        fn feed_watchdog(&mut self) {}
    }

    #[derive(Default)]
    struct SimOutput {
        gates: [bool; CHANNEL_COUNT],
        fires: usize,
        status: bool,
        status_writes: usize,
    }

    impl OutputDriver for SimOutput {
        fn set_gate(&mut self, channel: usize, active: bool) {
            if active {
                self.fires += 1;
            }
            self.gates[channel] = active;
        }

        fn set_status(&mut self, lit: bool) {
            self.status = lit;
            self.status_writes += 1;
        }
    }

    /// Run one pass that crosses zero and starts a new half-cycle.
    fn cross(dimmer: &mut Dimmer<'_, 8>, sense: &mut SimSensor, out: &mut SimOutput) {
        sense.sample = 10;
        sense.elapsed = 6_500;
        assert_eq!(dimmer.run(sense, out), Some(Boundary::ZeroCross));
        sense.sample = 200;
    }

    /// Calibration with a ramp step wide enough to settle in one
    /// boundary, keeping scenario tests short.
    fn snappy() -> Calibration {
        Calibration {
            ramp_step_ticks: 12_000,
            ..Calibration::default()
        }
    }

    #[test]
    fn test_starts_dark_until_commanded() {
        let mailbox: CommandMailbox<8> = CommandMailbox::new();
        let fault = FaultLatch::new();
        let mut dimmer = Dimmer::new(mailbox.receiver(), &fault, Calibration::default());
        let mut sense = SimSensor::new();
        let mut out = SimOutput::default();

        for _ in 0..12 {
            sense.elapsed = 12_001;
            assert_eq!(dimmer.run(&mut sense, &mut out), None);
            cross(&mut dimmer, &mut sense, &mut out);
        }

        assert_eq!(out.fires, 0);
        assert_eq!(out.gates, [false; CHANNEL_COUNT]);
    }

    #[test]
    fn test_command_ramps_then_fires() {
        let mailbox: CommandMailbox<8> = CommandMailbox::new();
        let fault = FaultLatch::new();
        let mut dimmer = Dimmer::new(mailbox.receiver(), &fault, Calibration::default());
        let mut sense = SimSensor::new();
        let mut out = SimOutput::default();

        mailbox.send(SetpointCommand {
            channel: 0,
            setpoint: Setpoint::At(3_264),
        });

        cross(&mut dimmer, &mut sense, &mut out);
        assert_eq!(dimmer.channel(0).active_delay(), 11_950);
        for _ in 0..174 {
            cross(&mut dimmer, &mut sense, &mut out);
        }
        assert_eq!(dimmer.channel(0).active_delay(), 3_264);
        assert_eq!(out.fires, 0);

        sense.elapsed = 3_263;
        dimmer.run(&mut sense, &mut out);
        assert_eq!(out.gates[0], false);

        sense.elapsed = 3_264;
        dimmer.run(&mut sense, &mut out);
        assert_eq!(out.gates[0], true);
        assert_eq!(out.fires, 1);

        sense.elapsed = 5_000;
        dimmer.run(&mut sense, &mut out);
        assert_eq!(out.fires, 1);

        cross(&mut dimmer, &mut sense, &mut out);
        assert_eq!(out.gates[0], false);
    }

    #[test]
    fn test_off_command_wins_over_elapsed_delay() {
        let mailbox: CommandMailbox<8> = CommandMailbox::new();
        let fault = FaultLatch::new();
        let mut dimmer = Dimmer::new(mailbox.receiver(), &fault, snappy());
        let mut sense = SimSensor::new();
        let mut out = SimOutput::default();

        mailbox.send(SetpointCommand {
            channel: 0,
            setpoint: Setpoint::Off,
        });
        cross(&mut dimmer, &mut sense, &mut out);
        assert_eq!(dimmer.channel(0).active_delay(), 0);

        sense.elapsed = 9_000;
        dimmer.run(&mut sense, &mut out);
        assert_eq!(out.fires, 0);
        assert_eq!(out.gates[0], false);
    }

    #[test]
    fn test_only_the_addressed_channel_changes() {
        let mailbox: CommandMailbox<8> = CommandMailbox::new();
        let fault = FaultLatch::new();
        let mut dimmer = Dimmer::new(mailbox.receiver(), &fault, snappy());
        let mut sense = SimSensor::new();
        let mut out = SimOutput::default();

        mailbox.send(SetpointCommand {
            channel: 2,
            setpoint: Setpoint::At(3_264),
        });
        cross(&mut dimmer, &mut sense, &mut out);

        sense.elapsed = 4_000;
        dimmer.run(&mut sense, &mut out);
        assert_eq!(out.gates, [false, false, true, false]);
    }

    #[test]
    fn test_newest_queued_command_wins() {
        let mailbox: CommandMailbox<8> = CommandMailbox::new();
        let fault = FaultLatch::new();
        let mut dimmer = Dimmer::new(mailbox.receiver(), &fault, Calibration::default());
        let mut sense = SimSensor::new();
        let mut out = SimOutput::default();

        mailbox.send(SetpointCommand {
            channel: 2,
            setpoint: Setpoint::At(7_232),
        });
        mailbox.send(SetpointCommand {
            channel: 2,
            setpoint: Setpoint::At(3_264),
        });

        sense.elapsed = 1_000;
        dimmer.run(&mut sense, &mut out);
        assert_eq!(dimmer.channel(2).setpoint(), Setpoint::At(3_264));
        assert_eq!(dimmer.channel(2).active_delay(), 12_000);
    }

    #[test]
    fn test_receive_fault_leaves_setpoints() {
        let mailbox: CommandMailbox<8> = CommandMailbox::new();
        let fault = FaultLatch::new();
        let mut dimmer = Dimmer::new(mailbox.receiver(), &fault, snappy());
        let mut decoder = CommandDecoder::new(mailbox.sender(), &fault, snappy());
        let mut rx = SimReceiver;
        let mut sense = SimSensor::new();
        let mut out = SimOutput::default();

        decoder.on_event(&mut rx, Ok(0b0000_0101));
        cross(&mut dimmer, &mut sense, &mut out);
        assert_eq!(dimmer.channel(1).setpoint(), Setpoint::At(3_264));

        decoder.on_event(&mut rx, Err(RxFault::Overrun));
        cross(&mut dimmer, &mut sense, &mut out);
        assert_eq!(dimmer.channel(1).setpoint(), Setpoint::At(3_264));
        assert_eq!(fault.is_raised(), true);
        assert_eq!(out.status, true);
    }

    #[test]
    fn test_forced_boundary_drops_every_gate() {
        let mailbox: CommandMailbox<8> = CommandMailbox::new();
        let fault = FaultLatch::new();
        let mut dimmer = Dimmer::new(mailbox.receiver(), &fault, snappy());
        let mut sense = SimSensor::new();
        let mut out = SimOutput::default();

        mailbox.send(SetpointCommand {
            channel: 1,
            setpoint: Setpoint::At(3_264),
        });
        cross(&mut dimmer, &mut sense, &mut out);

        sense.elapsed = 4_000;
        dimmer.run(&mut sense, &mut out);
        assert_eq!(out.gates[1], true);

        sense.elapsed = 60_001;
        assert_eq!(dimmer.run(&mut sense, &mut out), Some(Boundary::Forced));
        assert_eq!(out.gates, [false; CHANNEL_COUNT]);
        assert_eq!(sense.elapsed, 0);
    }

    #[test]
    fn test_status_heartbeat_and_fault_latch() {
        let mailbox: CommandMailbox<8> = CommandMailbox::new();
        let fault = FaultLatch::new();
        let mut dimmer = Dimmer::new(mailbox.receiver(), &fault, Calibration::default());
        let mut sense = SimSensor::new();
        let mut out = SimOutput::default();

        sense.elapsed = 1_000;
        dimmer.run(&mut sense, &mut out);
        dimmer.run(&mut sense, &mut out);
        assert_eq!(out.status, false);
        assert_eq!(out.status_writes, 0);

        cross(&mut dimmer, &mut sense, &mut out);
        assert_eq!(out.status, false);
        cross(&mut dimmer, &mut sense, &mut out);
        assert_eq!(out.status, false);
        cross(&mut dimmer, &mut sense, &mut out);
        assert_eq!(out.status, true);

        let writes = out.status_writes;
        dimmer.run(&mut sense, &mut out);
        assert_eq!(out.status_writes, writes);

        cross(&mut dimmer, &mut sense, &mut out);
        assert_eq!(out.status, false);

        fault.raise();
        cross(&mut dimmer, &mut sense, &mut out);
        assert_eq!(out.status, true);

        fault.clear();
        cross(&mut dimmer, &mut sense, &mut out);
        assert_eq!(out.status, false);
    }
}

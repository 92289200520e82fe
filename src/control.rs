//! The per-pass control loop tying the pieces together.

use crate::calibration::Calibration;
use crate::channel::Channel;
use crate::cycle::{self, Boundary};
use crate::decoder::CommandReceiver;
use crate::indicator::{FaultLatch, StatusIndicator};
use crate::{CHANNEL_COUNT, CycleSensor, OutputDriver};

/// Four-channel phase-control core driven by one non-blocking loop.
///
/// Each [`Self::run`] pass drains pending setpoint commands, watches the
/// zero-crossing sense for a half-cycle boundary, asserts gate lines
/// whose ramped delay has elapsed and keeps the status line up to date.
pub struct Dimmer<'a, const COMMANDS: usize> {
    channels: [Channel; CHANNEL_COUNT],
    commands: CommandReceiver<'a, COMMANDS>,
    fault: &'a FaultLatch,
    indicator: StatusIndicator,
    cal: Calibration,
}

impl<'a, const COMMANDS: usize> Dimmer<'a, COMMANDS> {
    /// Create a core in the safe startup state: every channel commanded
    /// off, every active delay parked at the certainly-off mark, gates
    /// low.
    pub const fn new(
        commands: CommandReceiver<'a, COMMANDS>,
        fault: &'a FaultLatch,
        cal: Calibration,
    ) -> Self {
        Self {
            channels: [Channel::new(cal.certainly_off_ticks); CHANNEL_COUNT],
            commands,
            fault,
            indicator: StatusIndicator::new(),
            cal,
        }
    }

    /// One pass of the control loop.
    ///
    /// Never sleeps and never waits for a boundary; the only blocking
    /// piece is the analog conversion inside
    /// [`CycleSensor::sample_zero_cross`]. Call from the platform's main
    /// loop as fast as it will go. Returns the boundary that started a
    /// new half-cycle, if this pass did.
    pub fn run<S, O>(&mut self, sense: &mut S, out: &mut O) -> Option<Boundary>
    where
        S: CycleSensor,
        O: OutputDriver,
    {
        self.drain_commands();

        let sample = sense.sample_zero_cross();
        let boundary = cycle::detect(&self.cal, sample, sense.elapsed_ticks());
        if boundary.is_some() {
            #[cfg(feature = "defmt")]
            if boundary == Some(Boundary::Forced) {
                defmt::warn!("no zero-crossing seen, forcing a half-cycle boundary");
            }
            self.start_half_cycle(sense, out);
        }

        let now = sense.elapsed_ticks();
        for (index, channel) in self.channels.iter_mut().enumerate() {
            if channel.fire_due(now) {
                channel.mark_fired();
                out.set_gate(index, true);
            }
        }

        self.indicator.drive(self.fault.is_raised(), out);
        boundary
    }

    /// Apply every pending setpoint command. With several commands
    /// queued for one channel the newest ends up in effect; commands
    /// addressing a channel index past the array are dropped.
    fn drain_commands(&mut self) {
        while let Some(command) = self.commands.recv() {
            if let Some(channel) = self.channels.get_mut(command.channel) {
                channel.set_setpoint(command.setpoint);
            }
        }
    }

    /// Boundary housekeeping: restart the cycle counter, drop every
    /// gate, ramp each active delay one step and advance the blink
    /// pattern.
    fn start_half_cycle<S, O>(&mut self, sense: &mut S, out: &mut O)
    where
        S: CycleSensor,
        O: OutputDriver,
    {
        sense.restart_cycle();
        for (index, channel) in self.channels.iter_mut().enumerate() {
            channel.clear_gate();
            out.set_gate(index, false);
            channel.ramp_toward(self.cal.ramp_step_ticks);
        }
        self.indicator.advance();
    }

    /// State of one channel.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`CHANNEL_COUNT`].
    pub fn channel(&self, index: usize) -> &Channel {
        &self.channels[index]
    }

    /// State of all channels.
    pub const fn channels(&self) -> &[Channel; CHANNEL_COUNT] {
        &self.channels
    }

    /// The calibration this core runs with.
    pub const fn calibration(&self) -> &Calibration {
        &self.cal
    }
}

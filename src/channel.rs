//! Per-channel dimmer state.

use crate::ramp;

/// Commanded target for one channel.
///
/// `Off` is the reserved zero-magnitude command: the channel never fires
/// while it holds, whatever the ramped delay underneath says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setpoint {
    /// Never fire this channel.
    #[default]
    Off,
    /// Fire once this many ticks have elapsed in the half-cycle.
    At(u16),
}

impl Setpoint {
    /// Whether firing is enabled at all.
    pub const fn is_on(self) -> bool {
        matches!(self, Self::At(_))
    }

    /// The delay the ramp works toward. Zero while off.
    pub const fn target(self) -> u16 {
        match self {
            Self::Off => 0,
            Self::At(ticks) => ticks,
        }
    }
}

/// One dimmer channel: the commanded setpoint, the ramped active delay
/// and the state of its gate line within the current half-cycle.
#[derive(Debug, Clone, Copy)]
pub struct Channel {
    setpoint: Setpoint,
    active_delay: u16,
    gate: bool,
}

impl Channel {
    /// A channel in the safe startup state: commanded off, active delay
    /// parked past the end of any real half-cycle, gate low.
    pub const fn new(certainly_off_ticks: u16) -> Self {
        Self {
            setpoint: Setpoint::Off,
            active_delay: certainly_off_ticks,
            gate: false,
        }
    }

    /// The commanded setpoint.
    pub const fn setpoint(&self) -> Setpoint {
        self.setpoint
    }

    /// The delay actually used for firing this half-cycle.
    pub const fn active_delay(&self) -> u16 {
        self.active_delay
    }

    /// Whether the gate line is asserted in the current half-cycle.
    pub const fn gate(&self) -> bool {
        self.gate
    }

    /// Replace the commanded setpoint. The active delay is left alone
    /// and keeps ramping from wherever it is.
    pub fn set_setpoint(&mut self, setpoint: Setpoint) {
        self.setpoint = setpoint;
    }

    /// Advance the active delay one bounded step toward the setpoint.
    pub fn ramp_toward(&mut self, step: u16) {
        self.active_delay = ramp::step_toward(self.active_delay, self.setpoint.target(), step);
    }

    /// Whether the gate must be asserted at this elapsed time.
    ///
    /// At most once per half-cycle: after [`Self::mark_fired`] this stays
    /// false until the gate is cleared at a boundary.
    pub const fn fire_due(&self, elapsed_ticks: u16) -> bool {
        !self.gate && self.setpoint.is_on() && elapsed_ticks >= self.active_delay
    }

    /// Record that the gate line has been asserted.
    pub fn mark_fired(&mut self) {
        self.gate = true;
    }

    /// Drop the gate at a half-cycle boundary.
    pub fn clear_gate(&mut self) {
        self.gate = false;
    }
}

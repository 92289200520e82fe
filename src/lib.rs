#![no_std]

pub mod calibration;
pub mod channel;
pub mod command;
pub mod control;
pub mod cycle;
pub mod decoder;
pub mod indicator;
pub mod mailbox;
pub mod ramp;

pub use calibration::Calibration;
pub use channel::{Channel, Setpoint};
pub use command::{Command, MAGNITUDE_MAX};
pub use control::Dimmer;
pub use cycle::Boundary;
pub use decoder::{
    CommandDecoder, CommandMailbox, CommandReceiver, CommandSender, RxFault, SetpointCommand,
};
pub use indicator::FaultLatch;

/// Number of dimmer channels, fixed by the two channel-index bits of the
/// command frame.
pub const CHANNEL_COUNT: usize = 4;

/// Zero-crossing sense and cycle timing as the control loop sees them.
///
/// Implement this over the platform's analog input and free-running
/// counter. One tick of the counter is also the unit of every delay in
/// [`Calibration`].
pub trait CycleSensor {
    /// Blocking read of the conditioned zero-crossing level.
    ///
    /// Small values mean the mains waveform is near zero volts. The
    /// platform owns the raw encoding, scaling and any inversion.
    fn sample_zero_cross(&mut self) -> u8;

    /// Ticks since the cycle counter was last restarted.
    fn elapsed_ticks(&self) -> u16;

    /// Zero the cycle counter at a half-cycle boundary.
    fn restart_cycle(&mut self);
}

/// Gate and status lines driven by the control loop.
///
/// Implement this trait to support different hardware platforms.
pub trait OutputDriver {
    /// Drive one gate line. While asserted the external gate-drive
    /// hardware keeps the switching device triggered.
    fn set_gate(&mut self, channel: usize, active: bool);

    /// Drive the diagnostic status line.
    fn set_status(&mut self, lit: bool);
}

/// Receive-side hardware services used from the receive interrupt.
pub trait ReceiverDriver {
    /// Restart the receiver after a framing or overrun fault.
    fn restart(&mut self);

    /// Touch the external liveness signal after a clean decode.
    fn feed_watchdog(&mut self);
}

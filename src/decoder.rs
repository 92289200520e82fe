//! Receive-path command decoding.
//!
//! Runs inside the platform's receive interrupt, one event per byte.
//! Clean bytes become setpoint commands in the mailbox for the control
//! loop to drain; faulted bytes are discarded while the receiver is
//! restarted and the fault latch raised.

use crate::ReceiverDriver;
use crate::calibration::Calibration;
use crate::channel::Setpoint;
use crate::command::Command;
use crate::indicator::FaultLatch;
use crate::mailbox::{Mailbox, Receiver, Sender};

/// Receive fault reported by the serial hardware alongside a byte slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxFault {
    /// Stop bit missing or sampled wrong.
    Framing,
    /// A byte arrived before the previous one was read out.
    Overrun,
}

/// A decoded setpoint update on its way to the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetpointCommand {
    /// Target channel, `0..=3`.
    pub channel: usize,
    /// The mapped setpoint to apply.
    pub setpoint: Setpoint,
}

/// Mailbox carrying setpoint commands toward the control loop.
pub type CommandMailbox<const SIZE: usize> = Mailbox<SetpointCommand, SIZE>;

/// Producer handle of a [`CommandMailbox`].
pub type CommandSender<'a, const SIZE: usize> = Sender<'a, SetpointCommand, SIZE>;

/// Consumer handle of a [`CommandMailbox`].
pub type CommandReceiver<'a, const SIZE: usize> = Receiver<'a, SetpointCommand, SIZE>;

/// Interrupt-side decoder for the one-byte command frames.
pub struct CommandDecoder<'a, const SIZE: usize> {
    commands: CommandSender<'a, SIZE>,
    fault: &'a FaultLatch,
    cal: Calibration,
}

impl<'a, const SIZE: usize> CommandDecoder<'a, SIZE> {
    /// Create a decoder publishing into `commands`.
    pub const fn new(
        commands: CommandSender<'a, SIZE>,
        fault: &'a FaultLatch,
        cal: Calibration,
    ) -> Self {
        Self {
            commands,
            fault,
            cal,
        }
    }

    /// Handle one receive event.
    ///
    /// Call once per received byte from the receive interrupt. A fault
    /// raises the latch and restarts the receiver; the byte is discarded
    /// and every setpoint keeps its previous value. A clean byte is
    /// decoded, published, acknowledged to the liveness supervisor, and
    /// drops the latch.
    pub fn on_event<R: ReceiverDriver>(&mut self, rx: &mut R, event: Result<u8, RxFault>) {
        match event {
            Err(_fault) => {
                self.fault.raise();
                rx.restart();
                #[cfg(feature = "defmt")]
                defmt::warn!("serial receive fault {}, receiver restarted", _fault);
            }
            Ok(raw) => {
                let command = Command::decode(raw);
                self.commands.send(SetpointCommand {
                    channel: command.channel,
                    setpoint: command.setpoint(&self.cal),
                });
                self.fault.clear();
                rx.feed_watchdog();
            }
        }
    }
}

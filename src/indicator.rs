//! Fault latch and status blink sharing the one indicator line.

use core::cell::Cell;

use critical_section::Mutex;

use crate::OutputDriver;

/// Mask over the blink counter. Two bits give a pattern lit one
/// half-cycle out of four.
const BLINK_MASK: u8 = 0b11;

/// Receive-fault flag shared between the receive interrupt and the
/// control loop.
///
/// Raised on any receive fault, dropped again by the next clean decode.
pub struct FaultLatch {
    inner: Mutex<Cell<bool>>,
}

impl FaultLatch {
    /// Create a new lowered latch.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(false)),
        }
    }

    /// Latch a receive fault.
    pub fn raise(&self) {
        critical_section::with(|cs| self.inner.borrow(cs).set(true));
    }

    /// Drop the latch after a clean decode.
    pub fn clear(&self) {
        critical_section::with(|cs| self.inner.borrow(cs).set(false));
    }

    /// Whether a fault is currently latched.
    pub fn is_raised(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }
}

impl Default for FaultLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Blink pattern and level cache for the status line.
///
/// The line carries two signals over time: the fault latch, which holds
/// the line solid while raised, and a background heartbeat lit one
/// half-cycle out of four.
#[derive(Debug)]
pub struct StatusIndicator {
    blink: u8,
    line: bool,
}

impl StatusIndicator {
    /// Create an indicator with a dark line and the pattern at its
    /// start.
    pub const fn new() -> Self {
        Self {
            blink: 0,
            line: false,
        }
    }

    /// Advance the blink pattern. Call at every half-cycle boundary.
    pub fn advance(&mut self) {
        self.blink = self.blink.wrapping_add(1) & BLINK_MASK;
    }

    /// Whether the background pattern is in its lit phase.
    ///
    /// The lit phase is the last of the four, so a fresh indicator
    /// stays dark until boundaries start arriving.
    pub const fn blink_lit(&self) -> bool {
        self.blink == BLINK_MASK
    }

    /// Drive the physical line, touching it only on level changes.
    pub fn drive<O: OutputDriver>(&mut self, fault: bool, out: &mut O) {
        let lit = fault || self.blink_lit();
        if lit != self.line {
            out.set_status(lit);
            self.line = lit;
        }
    }
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self::new()
    }
}

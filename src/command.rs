//! Serial command frame codec.
//!
//! One byte per setpoint update, magnitude in the high six bits and the
//! channel index in the low two:
//!
//! ```text
//! bit 7            2 1   0
//!    [ magnitude    |chan ]
//! ```
//!
//! There is no framing byte, checksum or acknowledgement; the link relies
//! on the hardware receiver's own framing and overrun detection.

use crate::calibration::Calibration;
use crate::channel::Setpoint;

/// Number of low bits holding the channel index.
const CHANNEL_BITS: u8 = 2;
/// Mask over the channel index bits.
const CHANNEL_MASK: u8 = (1 << CHANNEL_BITS) - 1;

/// Highest encodable delay magnitude.
pub const MAGNITUDE_MAX: u8 = 0x3F;

/// One command frame, decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Target channel, `0..=3`.
    pub channel: usize,
    /// Raw delay magnitude, `0..=MAGNITUDE_MAX`. Zero is the reserved
    /// "channel off" value.
    pub magnitude: u8,
}

impl Command {
    /// Decode a raw frame byte. Every byte value is a valid frame.
    pub const fn decode(raw: u8) -> Self {
        Self {
            channel: (raw & CHANNEL_MASK) as usize,
            magnitude: raw >> CHANNEL_BITS,
        }
    }

    /// Encode back into a frame byte.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn encode(self) -> u8 {
        ((self.magnitude & MAGNITUDE_MAX) << CHANNEL_BITS) | (self.channel as u8 & CHANNEL_MASK)
    }

    /// Map the magnitude onto a channel setpoint.
    ///
    /// Magnitude zero turns the channel off. Nonzero magnitudes map
    /// monotonically onto firing delays, magnitude 1 being the shortest
    /// delay (brightest) the link can command.
    pub const fn setpoint(self, cal: &Calibration) -> Setpoint {
        if self.magnitude == 0 {
            Setpoint::Off
        } else {
            Setpoint::At(cal.delay_for_magnitude(self.magnitude))
        }
    }
}

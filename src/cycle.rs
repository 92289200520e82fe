//! Half-cycle boundary detection.

use crate::calibration::Calibration;

/// Why a new half-cycle was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Boundary {
    /// The sense line dipped under the near-zero level past the guard
    /// time.
    ZeroCross,
    /// No qualifying sample arrived before the ceiling. The cycle is
    /// restarted anyway so a lost sense signal fails toward "off"
    /// instead of leaving stale gates running open.
    Forced,
}

/// Decide whether the current pass starts a new half-cycle.
///
/// The guard time rejects near-zero samples early in the half-cycle,
/// where the waveform is still close to the previous crossing. A real
/// crossing wins over the staleness ceiling when both hold at once.
pub const fn detect(cal: &Calibration, sample: u8, elapsed_ticks: u16) -> Option<Boundary> {
    if elapsed_ticks > cal.crossing_guard_ticks && sample < cal.near_zero_level {
        Some(Boundary::ZeroCross)
    } else if elapsed_ticks > cal.forced_boundary_ticks {
        Some(Boundary::Forced)
    } else {
        None
    }
}

//! Platform calibration data.
//!
//! The thresholds and the magnitude-to-delay transform encode assumptions
//! about the controlled waveform and the tick rate of the platform's
//! elapsed-time counter. They are data, not design: the defaults describe
//! the reference platform (1 µs ticks watching 50/60 Hz mains, where a
//! half-cycle lasts 8333 to 10000 ticks).

/// Calibration of the core against the platform's counter and sense line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Conditioned zero-cross samples below this level count as "mains
    /// near zero volts".
    pub near_zero_level: u8,
    /// Near-zero samples are ignored until this many ticks have passed
    /// since the previous boundary. Suppresses re-triggering on sense
    /// noise within the same half-cycle.
    pub crossing_guard_ticks: u16,
    /// A boundary is forced once this many ticks pass without a
    /// qualifying sample, bounding staleness when the sense signal is
    /// lost.
    pub forced_boundary_ticks: u16,
    /// A delay long enough that it cannot elapse inside a real
    /// half-cycle. Startup value of every channel's active delay.
    pub certainly_off_ticks: u16,
    /// An active delay moves at most this many ticks per boundary.
    pub ramp_step_ticks: u16,
    /// Additive part of the magnitude-to-delay transform.
    pub delay_offset: u16,
    /// Left shift applied after the offset.
    pub delay_shift: u8,
}

impl Calibration {
    /// Delay in ticks for a nonzero command magnitude.
    ///
    /// Monotone in the magnitude. Saturates toward the longest delay, so
    /// a miscalibrated transform fails dark rather than bright.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn delay_for_magnitude(&self, magnitude: u8) -> u16 {
        let base = magnitude as u64 + self.delay_offset as u64;
        // A nonzero base shifted by 16 or more exceeds the longest
        // representable delay.
        if self.delay_shift >= 16 {
            return if base == 0 { 0 } else { u16::MAX };
        }
        let ticks = base << self.delay_shift;
        if ticks > u16::MAX as u64 {
            u16::MAX
        } else {
            ticks as u16
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            near_zero_level: 50,
            crossing_guard_ticks: 6_000,
            forced_boundary_ticks: 60_000,
            certainly_off_ticks: 12_000,
            ramp_step_ticks: 50,
            delay_offset: 50,
            delay_shift: 6,
        }
    }
}

//! Bounded-step smoothing of delay changes.

/// Move `current` toward `target` by at most `step` ticks.
///
/// Snaps exactly onto `target` once within one step of it, so a settled
/// value stays settled and never oscillates around the target.
pub const fn step_toward(current: u16, target: u16, step: u16) -> u16 {
    if current > target && current - target > step {
        current - step
    } else if current < target && target - current > step {
        current + step
    } else {
        target
    }
}

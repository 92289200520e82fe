//! Bounded command hand-off for `no_std` environments.
//!
//! A small FIFO between one producer (the receive interrupt) and one
//! consumer (the control loop), built on `critical-section` and
//! `heapless::Deque`. A full mailbox displaces its oldest entry, so the
//! newest command is never the one that gets lost.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// A bounded, interrupt-safe command queue.
///
/// Backed by a fixed-size `heapless::Deque` and synchronized with
/// critical sections, so it can sit in a `static` and be shared between
/// an interrupt handler and the main loop.
pub struct Mailbox<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> Mailbox<T, SIZE> {
    /// Create a new empty mailbox.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a producer handle for this mailbox.
    pub const fn sender(&self) -> Sender<'_, T, SIZE> {
        Sender { mailbox: self }
    }

    /// Get a consumer handle for this mailbox.
    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { mailbox: self }
    }

    /// Append a value, displacing the oldest pending one if full.
    pub fn send(&self, value: T) {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            if queue.is_full() {
                queue.pop_front();
            }
            let _ = queue.push_back(value);
        });
    }

    /// Take the oldest pending value, if any.
    pub fn recv(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }
}

impl<T, const SIZE: usize> Default for Mailbox<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle for a [`Mailbox`].
///
/// A lightweight reference that can be copied into interrupt context.
#[derive(Clone, Copy)]
pub struct Sender<'a, T, const SIZE: usize> {
    mailbox: &'a Mailbox<T, SIZE>,
}

impl<T, const SIZE: usize> Sender<'_, T, SIZE> {
    /// Append a value, displacing the oldest pending one if full.
    pub fn send(&self, value: T) {
        self.mailbox.send(value);
    }
}

/// Consumer handle for a [`Mailbox`].
///
/// A lightweight reference that can be copied into the control loop.
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const SIZE: usize> {
    mailbox: &'a Mailbox<T, SIZE>,
}

impl<T, const SIZE: usize> Receiver<'_, T, SIZE> {
    /// Take the oldest pending value, if any.
    pub fn recv(&self) -> Option<T> {
        self.mailbox.recv()
    }
}

//! Register capabilities shared by the drivers.
//!
//! Drivers never see raw register addresses: byte-wide ports are reached
//! through [`InputPort`] / [`OutputPort`] and single lines through the
//! `embedded-hal` pin traits. The AVR implementations live in `gpio`, the
//! host ones in `sim` (tests and the `sim` feature).

use core::convert::Infallible;

#[cfg(target_arch = "avr")]
pub mod gpio;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod timer;
pub mod uart;

pub use timer::Prescaler;

/// A named set of bits within an 8-bit port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bits(u8);

impl Bits {
    pub const NONE: Bits = Bits(0);

    /// A single bit, `0..=7`.
    pub const fn bit(n: u8) -> Self {
        Bits(1 << n)
    }

    pub const fn from_mask(mask: u8) -> Self {
        Bits(mask)
    }

    pub const fn mask(self) -> u8 {
        self.0
    }

    pub const fn union(self, other: Bits) -> Self {
        Bits(self.0 | other.0)
    }

    /// True when any of these bits is set in `value`.
    pub const fn any_in(self, value: u8) -> bool {
        value & self.0 != 0
    }
}

/// A byte-wide digital input register.
pub trait InputPort {
    fn read(&self) -> u8;

    fn read_bits(&self, bits: Bits) -> u8 {
        self.read() & bits.mask()
    }
}

/// A byte-wide digital output register.
///
/// `modify` is the only write path and must be indivisible with respect to
/// interrupt handlers that write the same register.
pub trait OutputPort {
    /// Currently driven levels.
    fn state(&self) -> u8;

    fn modify<F: FnOnce(u8) -> u8>(&mut self, f: F);

    fn set_bits(&mut self, bits: Bits) {
        self.modify(|value| value | bits.mask());
    }
}

/// Discharge the error of an operation that cannot fail.
#[inline]
pub fn unwrap_infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

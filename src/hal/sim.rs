//! Simulated register backend.
//!
//! Lets the drivers run on the host: ports are plain cells, the display
//! lines feed a model of the shift register on the shield which decodes what
//! would have been latched, and the serial sink records what it accepted.

use super::{InputPort, OutputPort};
use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use embedded_hal::digital::v2::{OutputPin, ToggleableOutputPin};
use embedded_hal::serial;
use heapless::Vec;

/// An 8-bit register. Drivers hold `&SimPort`, tests poke it through the
/// same reference.
#[derive(Debug, Default)]
pub struct SimPort {
    value: Cell<u8>,
    writes: Cell<u16>,
}

impl SimPort {
    pub const fn new(value: u8) -> Self {
        Self {
            value: Cell::new(value),
            writes: Cell::new(0),
        }
    }

    pub fn get(&self) -> u8 {
        self.value.get()
    }

    /// Drive the lines from outside, as the buttons would.
    pub fn set(&self, value: u8) {
        self.value.set(value);
    }

    /// Number of register writes made through [`OutputPort::modify`].
    pub fn writes(&self) -> u16 {
        self.writes.get()
    }

    /// One line of this port as an output pin.
    pub fn pin(&self, bit: u8) -> SimPortPin<'_> {
        SimPortPin { port: self, bit }
    }
}

impl InputPort for &SimPort {
    fn read(&self) -> u8 {
        self.value.get()
    }
}

impl OutputPort for &SimPort {
    fn state(&self) -> u8 {
        self.value.get()
    }

    fn modify<F: FnOnce(u8) -> u8>(&mut self, f: F) {
        self.value.set(f(self.value.get()));
        self.writes.set(self.writes.get().wrapping_add(1));
    }
}

pub struct SimPortPin<'a> {
    port: &'a SimPort,
    bit: u8,
}

impl OutputPin for SimPortPin<'_> {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.port.set(self.port.get() | (1 << self.bit));
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.port.set(self.port.get() & !(1 << self.bit));
        Ok(())
    }
}

impl ToggleableOutputPin for SimPortPin<'_> {
    type Error = Infallible;

    fn toggle(&mut self) -> Result<(), Infallible> {
        self.port.set(self.port.get() ^ (1 << self.bit));
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    Clock,
    Select,
    Data,
}

impl Line {
    const fn bit(self) -> u8 {
        match self {
            Line::Clock => 0b001,
            Line::Select => 0b010,
            Line::Data => 0b100,
        }
    }
}

/// Bytes latched between one chip-select assertion and its release.
pub type Frame = Vec<u8, 4>;

const MAX_FRAMES: usize = 64;

/// The three display lines and the device listening on them.
///
/// Bits are sampled on the rising clock edge while chip-select is low and
/// assembled MSB first. Anything outside that contract is counted as a
/// violation.
#[derive(Debug)]
pub struct SimWire {
    levels: Cell<u8>,
    shift: Cell<u8>,
    bit_count: Cell<u8>,
    current: RefCell<Option<Frame>>,
    frames: RefCell<Vec<Frame, MAX_FRAMES>>,
    violations: Cell<u16>,
}

impl SimWire {
    /// Idle bus: clock low, chip-select high.
    pub const fn new() -> Self {
        Self {
            levels: Cell::new(Line::Select.bit()),
            shift: Cell::new(0),
            bit_count: Cell::new(0),
            current: RefCell::new(None),
            frames: RefCell::new(Vec::new()),
            violations: Cell::new(0),
        }
    }

    pub fn line(&self, line: Line) -> SimLine<'_> {
        SimLine { wire: self, line }
    }

    pub fn level(&self, line: Line) -> bool {
        self.levels.get() & line.bit() != 0
    }

    /// Completed frames, oldest first.
    pub fn frames(&self) -> Vec<Frame, MAX_FRAMES> {
        self.frames.borrow().clone()
    }

    pub fn take_frames(&self) -> Vec<Frame, MAX_FRAMES> {
        core::mem::take(&mut *self.frames.borrow_mut())
    }

    /// Clock edges outside a frame, data changed while the clock was high,
    /// or a frame released with a partial byte.
    pub fn violations(&self) -> u16 {
        self.violations.get()
    }

    fn violation(&self) {
        self.violations.set(self.violations.get().saturating_add(1));
    }

    fn drive(&self, line: Line, high: bool) {
        let before = self.levels.get();
        let after = if high {
            before | line.bit()
        } else {
            before & !line.bit()
        };
        self.levels.set(after);
        if before == after {
            return;
        }

        match line {
            Line::Select if !high => {
                self.shift.set(0);
                self.bit_count.set(0);
                *self.current.borrow_mut() = Some(Frame::new());
            }
            Line::Select => {
                if self.bit_count.get() != 0 {
                    self.violation();
                }
                if let Some(frame) = self.current.borrow_mut().take() {
                    if self.frames.borrow_mut().push(frame).is_err() {
                        self.violation();
                    }
                }
            }
            Line::Clock if high => self.sample(),
            Line::Clock => {}
            Line::Data => {
                if self.level(Line::Clock) {
                    self.violation();
                }
            }
        }
    }

    fn sample(&self) {
        let mut current = self.current.borrow_mut();
        let Some(frame) = current.as_mut() else {
            self.violation();
            return;
        };

        let bit = u8::from(self.level(Line::Data));
        self.shift.set((self.shift.get() << 1) | bit);
        self.bit_count.set(self.bit_count.get() + 1);
        if self.bit_count.get() == 8 {
            if frame.push(self.shift.get()).is_err() {
                self.violation();
            }
            self.shift.set(0);
            self.bit_count.set(0);
        }
    }
}

impl Default for SimWire {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SimLine<'a> {
    wire: &'a SimWire,
    line: Line,
}

impl OutputPin for SimLine<'_> {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.wire.drive(self.line, true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.wire.drive(self.line, false);
        Ok(())
    }
}

/// Serial sink that accepts `ready` bytes and then reports `WouldBlock`.
#[derive(Debug, Default)]
pub struct SimSerial {
    sent: Vec<u8, 256>,
    ready: usize,
}

impl SimSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `bytes` more bytes to be accepted.
    pub fn make_ready(&mut self, bytes: usize) {
        self.ready += bytes;
    }

    pub fn sent(&self) -> &[u8] {
        &self.sent
    }
}

impl serial::Write<u8> for SimSerial {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        if self.ready == 0 || self.sent.push(word).is_err() {
            return Err(nb::Error::WouldBlock);
        }
        self.ready -= 1;
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        Ok(())
    }
}

//! Four-digit multiplexed seven-segment display behind two daisy-chained
//! shift registers.
//!
//! Each refresh lights one position: chip-select low, segment byte, position
//! byte, chip-select high. Bytes go out MSB first, data is set before the
//! clock rises, the clock idles low. Encodings are active low.

use crate::os::PulseCounter;
use embedded_hal::digital::v2::OutputPin;

pub const DIGITS: usize = 4;

/// All segments off
pub const BLANK: u8 = 0xFF;

/// Segment patterns for 0..=9
pub const NUMERALS: [u8; 10] = [0xC0, 0xF9, 0xA4, 0xB0, 0x99, 0x92, 0x82, 0xF8, 0x80, 0x90];

/// Position select patterns, leftmost first
pub const POSITIONS: [u8; DIGITS] = [0xF1, 0xF2, 0xF4, 0xF8];

/// Segment pattern for a numeral, blank for anything outside 0..=9.
pub fn encode(numeral: i16) -> u8 {
    usize::try_from(numeral)
        .ok()
        .and_then(|index| NUMERALS.get(index))
        .copied()
        .unwrap_or(BLANK)
}

pub struct SegmentDisplay<CLK, CS, DO> {
    clock: CLK,
    select: CS,
    data: DO,
    digits: [u8; DIGITS],
    position: usize,
    interval: u8,
}

impl<CLK, CS, DO, E> SegmentDisplay<CLK, CS, DO>
where
    CLK: OutputPin<Error = E>,
    CS: OutputPin<Error = E>,
    DO: OutputPin<Error = E>,
{
    /// Puts the lines in their idle levels and blanks every position.
    /// `interval` is the number of ticks between two refreshes.
    pub fn new(mut clock: CLK, mut select: CS, data: DO, interval: u8) -> Result<Self, E> {
        clock.set_low()?;
        select.set_high()?;
        Ok(Self {
            clock,
            select,
            data,
            digits: [BLANK; DIGITS],
            position: 0,
            interval,
        })
    }

    /// Show `numeral` at `position`; out of range numerals blank it.
    /// Positions past the last digit are ignored.
    pub fn set_numeral(&mut self, position: usize, numeral: i16) {
        self.set_segments(position, encode(numeral));
    }

    fn set_segments(&mut self, position: usize, pattern: u8) {
        if let Some(digit) = self.digits.get_mut(position) {
            *digit = pattern;
        }
    }

    pub fn digits(&self) -> &[u8; DIGITS] {
        &self.digits
    }

    /// Next position to be refreshed
    pub fn position(&self) -> usize {
        self.position
    }

    /// Refresh one position if the refresh interval has elapsed. Returns the
    /// position that was sent.
    pub fn poll(&mut self, counter: &PulseCounter) -> Result<Option<usize>, E> {
        if !counter.is_elapsed() {
            return Ok(None);
        }

        let position = self.position;
        self.transmit(self.digits[position], POSITIONS[position])?;
        self.position = (position + 1) % DIGITS;
        counter.reload(self.interval);
        Ok(Some(position))
    }

    fn transmit(&mut self, segments: u8, select: u8) -> Result<(), E> {
        self.select.set_low()?;
        let sent = self
            .shift_out(segments)
            .and_then(|_| self.shift_out(select));
        // Release the bus even when a line failed mid-frame.
        self.select.set_high()?;
        sent
    }

    fn shift_out(&mut self, byte: u8) -> Result<(), E> {
        for bit in (0..8).rev() {
            if byte & (1 << bit) != 0 {
                self.data.set_high()?;
            } else {
                self.data.set_low()?;
            }
            self.clock.set_high()?;
            self.clock.set_low()?;
        }
        Ok(())
    }

    pub fn release(self) -> (CLK, CS, DO) {
        (self.clock, self.select, self.data)
    }
}

//! Tick-driven countdowns shared between the tick interrupt and the main loop

use core::cell::Cell;
use critical_section::Mutex;

/// Milliseconds left before a consumer's next scheduled action.
///
/// The tick handler only decrements, the owning consumer only reloads.
/// Every access happens inside a critical section so the value can never be
/// observed half-written, whatever its width.
pub struct PulseCounter {
    remaining: Mutex<Cell<u8>>,
}

impl PulseCounter {
    /// Create an elapsed counter
    pub const fn new() -> Self {
        Self {
            remaining: Mutex::new(Cell::new(0)),
        }
    }

    /// Saturating decrement, called once per tick
    #[inline]
    pub fn tick(&self) {
        critical_section::with(|cs| {
            let remaining = self.remaining.borrow(cs);
            if remaining.get() > 0 {
                remaining.set(remaining.get() - 1);
            }
        });
    }

    #[inline]
    pub fn is_elapsed(&self) -> bool {
        self.remaining() == 0
    }

    #[inline]
    pub fn remaining(&self) -> u8 {
        critical_section::with(|cs| self.remaining.borrow(cs).get())
    }

    /// Start a new countdown of `ticks`
    #[inline]
    pub fn reload(&self, ticks: u8) {
        critical_section::with(|cs| self.remaining.borrow(cs).set(ticks));
    }
}

impl Default for PulseCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Countdowns owned by the Tick Source, one per polling task.
pub struct Ticks {
    pub debounce: PulseCounter,
    pub refresh: PulseCounter,
}

impl Ticks {
    pub const fn new() -> Self {
        Self {
            debounce: PulseCounter::new(),
            refresh: PulseCounter::new(),
        }
    }

    /// Tick Source handler body. Never blocks and never calls into the
    /// polling tasks.
    #[inline]
    pub fn on_tick(&self) {
        self.debounce.tick();
        self.refresh.tick();
    }
}

impl Default for Ticks {
    fn default() -> Self {
        Self::new()
    }
}

/// Countdowns serviced by the Timer0 overflow interrupt
pub static TICKS: Ticks = Ticks::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_decrements_by_one() {
        let counter = PulseCounter::new();
        counter.reload(3);
        counter.tick();
        assert_eq!(counter.remaining(), 2);
        assert!(!counter.is_elapsed());
        counter.tick();
        counter.tick();
        assert!(counter.is_elapsed());
    }

    #[test]
    fn tick_saturates_at_zero() {
        let counter = PulseCounter::new();
        for _ in 0..300 {
            counter.tick();
        }
        assert_eq!(counter.remaining(), 0);
    }

    #[test]
    fn counters_are_independent() {
        let ticks = Ticks::new();
        ticks.debounce.reload(50);
        ticks.refresh.reload(1);

        ticks.on_tick();
        assert_eq!(ticks.debounce.remaining(), 49);
        assert_eq!(ticks.refresh.remaining(), 0);

        ticks.on_tick();
        assert_eq!(ticks.debounce.remaining(), 48);
        assert_eq!(ticks.refresh.remaining(), 0);
    }
}

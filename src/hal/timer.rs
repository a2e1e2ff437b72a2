//! Overflow timers.
//!
//! Both timers run in normal mode and are preloaded on every overflow so the
//! next overflow fires a fixed number of prescaled counts later.

use crate::config::{CPU_FREQ_HZ, HEARTBEAT_HZ, TICK_HZ};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div64 = 3,
    Div256 = 4,
    Div1024 = 5,
}

impl Prescaler {
    /// Clock select bits for TCCRxB
    pub const fn bits(self) -> u8 {
        self as u8
    }

    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Stop => 0,
            Prescaler::Direct => 1,
            Prescaler::Div8 => 8,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }
}

/// Prescaled counts between two events at `event_hz`, rounded to nearest.
pub const fn counts_per_period(cpu_hz: u32, prescaler: Prescaler, event_hz: u32) -> u32 {
    let counter_hz = cpu_hz / prescaler.divisor();
    (counter_hz + event_hz / 2) / event_hz
}

/// TCNT0 preload giving an overflow every `counts` counts.
pub const fn preload8(counts: u32) -> u8 {
    assert!(counts > 0 && counts <= 256, "period does not fit an 8-bit timer");
    (256 - counts) as u8
}

/// TCNT1 preload giving an overflow every `counts` counts.
pub const fn preload16(counts: u32) -> u16 {
    assert!(counts > 0 && counts <= 65536, "period does not fit a 16-bit timer");
    (65536 - counts) as u16
}

pub const TICK_PRESCALER: Prescaler = Prescaler::Div1024;
pub const HEARTBEAT_PRESCALER: Prescaler = Prescaler::Div1024;

/// 16 MHz / 1024 / 1000 = 15.6 -> 16 counts, 256 - 16 = 240
pub const TICK_PRELOAD: u8 = preload8(counts_per_period(CPU_FREQ_HZ, TICK_PRESCALER, TICK_HZ));

/// 16 MHz / 1024 = 15625 counts, 65536 - 15625 = 49911
pub const HEARTBEAT_PRELOAD: u16 =
    preload16(counts_per_period(CPU_FREQ_HZ, HEARTBEAT_PRESCALER, HEARTBEAT_HZ));

#[cfg(target_arch = "avr")]
pub use self::avr::{HeartbeatTimer, TickTimer};

#[cfg(target_arch = "avr")]
mod avr {
    use super::*;
    use avr_device::atmega328p::{TC0, TC1};

    const TOIE: u8 = 0x01;

    /// Timer0, source of the 1 ms tick.
    pub struct TickTimer {
        _tc0: TC0,
    }

    impl TickTimer {
        pub fn start(tc0: TC0) -> Self {
            unsafe {
                tc0.tcnt0.write(|w| w.bits(TICK_PRELOAD));
                tc0.tccr0a.write(|w| w.bits(0));
                tc0.tccr0b.write(|w| w.bits(TICK_PRESCALER.bits()));
                tc0.timsk0.write(|w| w.bits(TOIE));
            }
            Self { _tc0: tc0 }
        }

        /// Called from the overflow interrupt only.
        #[inline]
        pub fn reload() {
            unsafe {
                (*TC0::ptr()).tcnt0.write(|w| w.bits(TICK_PRELOAD));
            }
        }
    }

    /// Timer1, source of the heartbeat period.
    pub struct HeartbeatTimer {
        _tc1: TC1,
    }

    impl HeartbeatTimer {
        pub fn start(tc1: TC1) -> Self {
            unsafe {
                tc1.tcnt1.write(|w| w.bits(HEARTBEAT_PRELOAD));
                tc1.tccr1a.write(|w| w.bits(0));
                tc1.tccr1b.write(|w| w.bits(HEARTBEAT_PRESCALER.bits()));
                tc1.timsk1.write(|w| w.bits(TOIE));
            }
            Self { _tc1: tc1 }
        }

        /// Called from the overflow interrupt only, where the 16-bit write
        /// cannot be split by another handler.
        #[inline]
        pub fn reload() {
            unsafe {
                (*TC1::ptr()).tcnt1.write(|w| w.bits(HEARTBEAT_PRELOAD));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_preload_matches_one_millisecond() {
        assert_eq!(counts_per_period(16_000_000, Prescaler::Div1024, 1_000), 16);
        assert_eq!(TICK_PRELOAD, 240);
    }

    #[test]
    fn heartbeat_preload_matches_one_second() {
        assert_eq!(counts_per_period(16_000_000, Prescaler::Div1024, 1), 15_625);
        assert_eq!(HEARTBEAT_PRELOAD, 49_911);
    }

    #[test]
    fn preloads_follow_clock_frequency() {
        let counts = counts_per_period(8_000_000, Prescaler::Div64, 1_000);
        assert_eq!(counts, 125);
        assert_eq!(preload8(counts), 131);
    }

    #[test]
    #[should_panic]
    fn period_too_long_for_timer0_is_rejected() {
        preload8(counts_per_period(16_000_000, Prescaler::Div8, 1_000));
    }
}

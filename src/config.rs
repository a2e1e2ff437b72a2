//! Configuration constants for the multi-function shield firmware

use crate::drivers::indicator_leds::Indicator;
use crate::hal::Bits;

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// Tick Source rate (Timer0), 1 ms
pub const TICK_HZ: u32 = 1_000;

/// Heartbeat toggle rate (Timer1), 1 s
pub const HEARTBEAT_HZ: u32 = 1;

/// Button blackout window after an accepted change, in ticks
pub const DEBOUNCE_TICKS: u8 = 50;

/// Interval between two digit refreshes, in ticks
pub const REFRESH_TICKS: u8 = 5;

/// Diagnostic log baud rate
pub const UART_BAUD: u32 = 9600;

/// Diagnostic log queue capacity in bytes
pub const LOG_QUEUE_LEN: usize = 64;

/// Longest single log record, prefix and line ending included
pub const LOG_RECORD_LEN: usize = 48;

/// Buttons 1..3 on PC1..PC3
pub const BUTTON1: Bits = Bits::bit(1);
pub const BUTTON2: Bits = Bits::bit(2);
pub const BUTTON3: Bits = Bits::bit(3);
pub const BUTTON_MASK: Bits = BUTTON1.union(BUTTON2).union(BUTTON3);

/// Indicator LEDs 1..3 on PB2..PB4
pub const LED1: Bits = Bits::bit(2);
pub const LED2: Bits = Bits::bit(3);
pub const LED3: Bits = Bits::bit(4);

/// Heartbeat LED on PB5
pub const HEARTBEAT_LED: Bits = Bits::bit(5);

/// Display shift interface: data out on PB0, clock on PD7, chip-select on PD4
pub const DISPLAY_DATA: Bits = Bits::bit(0);
pub const DISPLAY_CLOCK: Bits = Bits::bit(7);
pub const DISPLAY_SELECT: Bits = Bits::bit(4);

/// Which LED mirrors which button.
pub static INDICATORS: [Indicator; 3] = [
    Indicator { button: BUTTON1, led: LED1 },
    Indicator { button: BUTTON2, led: LED2 },
    Indicator { button: BUTTON3, led: LED3 },
];

/// Numerals shown after reset, left to right
pub const STARTUP_DIGITS: [i16; 4] = [0, 1, 2, 3];

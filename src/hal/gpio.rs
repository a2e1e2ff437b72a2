use super::{Bits, InputPort, OutputPort};
use avr_device::atmega328p::{PORTB, PORTC, PORTD};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::{OutputPin, ToggleableOutputPin};

/// A whole I/O port.
pub struct Port<PORT> {
    _port: PhantomData<PORT>,
}

/// One output line of a port.
pub struct Pin<PORT, const P: u8> {
    _port: PhantomData<PORT>,
}

macro_rules! impl_port {
    ($PORT:ident, $pin:ident, $ddr:ident, $port:ident) => {
        impl Port<$PORT> {
            fn take(_port: $PORT) -> Self {
                Port { _port: PhantomData }
            }

            pub fn into_outputs(&mut self, bits: Bits) {
                critical_section::with(|_| unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | bits.mask()));
                });
            }

            pub fn into_inputs(&mut self, bits: Bits) {
                critical_section::with(|_| unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !bits.mask()));
                });
            }

            fn pin<const P: u8>(&self) -> Pin<$PORT, P> {
                Pin { _port: PhantomData }
            }
        }

        impl InputPort for Port<$PORT> {
            #[inline]
            fn read(&self) -> u8 {
                unsafe { (*$PORT::ptr()).$pin.read().bits() }
            }
        }

        impl OutputPort for Port<$PORT> {
            #[inline]
            fn state(&self) -> u8 {
                unsafe { (*$PORT::ptr()).$port.read().bits() }
            }

            // Interrupt handlers toggle lines of the same register.
            #[inline]
            fn modify<F: FnOnce(u8) -> u8>(&mut self, f: F) {
                critical_section::with(|_| unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(f(r.bits())));
                });
            }
        }

        impl<const P: u8> OutputPin for Pin<$PORT, P> {
            type Error = Infallible;

            #[inline]
            fn set_high(&mut self) -> Result<(), Infallible> {
                critical_section::with(|_| unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                });
                Ok(())
            }

            #[inline]
            fn set_low(&mut self) -> Result<(), Infallible> {
                critical_section::with(|_| unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                });
                Ok(())
            }
        }

        impl<const P: u8> ToggleableOutputPin for Pin<$PORT, P> {
            type Error = Infallible;

            // Writing a one to PINx flips PORTx in hardware, no read involved.
            #[inline]
            fn toggle(&mut self) -> Result<(), Infallible> {
                unsafe {
                    (*$PORT::ptr()).$pin.write(|w| w.bits(1 << P));
                }
                Ok(())
            }
        }
    };
}

impl_port!(PORTB, pinb, ddrb, portb);
impl_port!(PORTC, pinc, ddrc, portc);
impl_port!(PORTD, pind, ddrd, portd);

/// Arduino Uno carrying the multi-function shield
pub mod board {
    use super::*;
    use crate::config::{
        BUTTON_MASK, DISPLAY_CLOCK, DISPLAY_DATA, DISPLAY_SELECT, HEARTBEAT_LED, LED1, LED2, LED3,
    };

    pub type HeartbeatLed = Pin<PORTB, 5>;
    pub type DisplayData = Pin<PORTB, 0>;
    pub type DisplayClock = Pin<PORTD, 7>;
    pub type DisplaySelect = Pin<PORTD, 4>;

    pub struct Board {
        pub buttons: Port<PORTC>,
        pub leds: Port<PORTB>,
        pub heartbeat: HeartbeatLed,
        pub display_clock: DisplayClock,
        pub display_select: DisplaySelect,
        pub display_data: DisplayData,
    }

    impl Board {
        /// Set pin directions and hand out the lines. Buttons have external
        /// pull-ups on the shield.
        pub fn new(portb: PORTB, portc: PORTC, portd: PORTD) -> Self {
            let mut leds = Port::take(portb);
            let mut buttons = Port::take(portc);
            let mut control = Port::take(portd);

            leds.into_outputs(
                LED1.union(LED2)
                    .union(LED3)
                    .union(HEARTBEAT_LED)
                    .union(DISPLAY_DATA),
            );
            control.into_outputs(DISPLAY_CLOCK.union(DISPLAY_SELECT));
            buttons.into_inputs(BUTTON_MASK);

            Self {
                heartbeat: leds.pin(),
                display_data: leds.pin(),
                display_clock: control.pin(),
                display_select: control.pin(),
                buttons,
                leds,
            }
        }
    }
}

//! Transmit-only USART0 used as the diagnostic log sink

/// UBRR value for asynchronous normal mode: cpu / (16 * baud) - 1
pub const fn ubrr_for(cpu_hz: u32, baud: u32) -> u16 {
    (cpu_hz / (16 * baud) - 1) as u16
}

#[cfg(target_arch = "avr")]
pub use self::avr::Usart0;

#[cfg(target_arch = "avr")]
mod avr {
    use super::ubrr_for;
    use crate::config::CPU_FREQ_HZ;
    use avr_device::atmega328p::USART0;
    use core::convert::Infallible;
    use embedded_hal::serial;

    const UDRE0: u8 = 1 << 5;
    const TXEN0: u8 = 1 << 3;
    // 8 data bits, no parity, 1 stop bit
    const UCSZ_8N1: u8 = 0b0000_0110;

    pub struct Usart0 {
        usart: USART0,
    }

    impl Usart0 {
        pub fn new(usart: USART0, baud: u32) -> Self {
            unsafe {
                usart.ubrr0.write(|w| w.bits(ubrr_for(CPU_FREQ_HZ, baud)));
                usart.ucsr0c.write(|w| w.bits(UCSZ_8N1));
                usart.ucsr0b.write(|w| w.bits(TXEN0));
            }
            Self { usart }
        }

        fn data_register_empty(&self) -> bool {
            self.usart.ucsr0a.read().bits() & UDRE0 != 0
        }
    }

    impl serial::Write<u8> for Usart0 {
        type Error = Infallible;

        fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
            if !self.data_register_empty() {
                return Err(nb::Error::WouldBlock);
            }
            unsafe {
                self.usart.udr0.write(|w| w.bits(word));
            }
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), Infallible> {
            if self.data_register_empty() {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }
}

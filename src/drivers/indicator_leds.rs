use crate::hal::{Bits, OutputPort};

/// One LED mirroring one button line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Indicator {
    pub button: Bits,
    pub led: Bits,
}

/// Status LEDs sharing an output port with unrelated lines.
pub struct IndicatorLeds<O> {
    port: O,
    map: &'static [Indicator],
}

impl<O: OutputPort> IndicatorLeds<O> {
    /// Drives every mapped LED high, which is off on the shield.
    pub fn new(mut port: O, map: &'static [Indicator]) -> Self {
        let all = map
            .iter()
            .fold(Bits::NONE, |bits, indicator| bits.union(indicator.led));
        port.set_bits(all);
        Self { port, map }
    }

    /// Mirror a committed button state onto the LEDs in a single
    /// read-modify-write.
    pub fn show(&mut self, state: u8) {
        let map = self.map;
        self.port.modify(|mut value| {
            for indicator in map {
                if indicator.button.any_in(state) {
                    value |= indicator.led.mask();
                } else {
                    value &= !indicator.led.mask();
                }
            }
            value
        });
    }

    pub fn state(&self) -> u8 {
        self.port.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::INDICATORS;
    use crate::hal::sim::SimPort;

    #[test]
    fn leds_start_off() {
        let port = SimPort::new(0b0000_0001);
        let _leds = IndicatorLeds::new(&port, &INDICATORS);
        assert_eq!(port.get(), 0b0001_1101);
    }

    #[test]
    fn button_bits_map_to_led_bits() {
        let port = SimPort::new(0);
        let mut leds = IndicatorLeds::new(&port, &INDICATORS);

        // Button 2 (PC2) pressed, pulled low
        leds.show(0b0000_1010);
        assert_eq!(port.get(), 0b0001_0100);

        leds.show(0b0000_0000);
        assert_eq!(port.get(), 0);
    }

    #[test]
    fn unrelated_bits_survive() {
        let port = SimPort::new(0b1110_0011);
        let mut leds = IndicatorLeds::new(&port, &INDICATORS);
        leds.show(0);
        assert_eq!(port.get(), 0b1110_0011);
        assert_eq!(port.writes(), 2);
    }
}

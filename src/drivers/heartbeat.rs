use embedded_hal::digital::v2::ToggleableOutputPin;

/// Slow blinking LED proving the firmware is alive.
///
/// Owned by the heartbeat timer interrupt; holds nothing but its pin so it
/// can never disturb the buttons or the display.
pub struct Heartbeat<P> {
    led: P,
}

impl<P: ToggleableOutputPin> Heartbeat<P> {
    pub fn new(led: P) -> Self {
        Self { led }
    }

    /// Heartbeat timer handler body
    #[inline]
    pub fn on_period(&mut self) -> Result<(), P::Error> {
        self.led.toggle()
    }
}

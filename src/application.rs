//! Application layer: the cooperative main loop and its two polling tasks

use crate::config::LOG_QUEUE_LEN;
use crate::drivers::{ButtonEvent, ButtonHandler, IndicatorLeds, SegmentDisplay};
use crate::hal::{InputPort, OutputPort};
use crate::{log_debug, log_info};
use crate::logger::Logger;
use crate::os::Ticks;
use embedded_hal::digital::v2::OutputPin;

/// Everything the main loop owns. Interrupt handlers only ever see the
/// [`Ticks`] passed to [`Application::poll`].
pub struct Application<I, O, CLK, CS, DO> {
    buttons: ButtonHandler<I>,
    indicators: IndicatorLeds<O>,
    display: SegmentDisplay<CLK, CS, DO>,
    logger: Logger<LOG_QUEUE_LEN>,
    display_fault: bool,
}

impl<I, O, CLK, CS, DO, E> Application<I, O, CLK, CS, DO>
where
    I: InputPort,
    O: OutputPort,
    CLK: OutputPin<Error = E>,
    CS: OutputPin<Error = E>,
    DO: OutputPin<Error = E>,
{
    pub fn new(
        buttons: ButtonHandler<I>,
        indicators: IndicatorLeds<O>,
        display: SegmentDisplay<CLK, CS, DO>,
    ) -> Self {
        Self {
            buttons,
            indicators,
            display,
            logger: Logger::new(),
            display_fault: false,
        }
    }

    /// One main-loop iteration: display refresh check, then debounce check.
    /// Both return at once when their countdown is still running. A display
    /// line error is returned only after the debounce check has run.
    pub fn poll(&mut self, ticks: &Ticks) -> Result<(), E> {
        let refreshed = self.display.poll(&ticks.refresh);
        match (&refreshed, self.display_fault) {
            (Err(_), false) => {
                self.display_fault = true;
                log_debug!(
                    self.logger,
                    "display refresh failed at {}",
                    self.display.position()
                );
            }
            (Ok(Some(_)), true) => {
                self.display_fault = false;
                log_debug!(self.logger, "display refresh recovered");
            }
            _ => {}
        }

        if let Some(transition) = self.buttons.poll(&ticks.debounce) {
            self.indicators.show(transition.current);
            for event in transition.events() {
                match event {
                    ButtonEvent::Pressed(button) => {
                        log_info!(self.logger, "button {} pressed", button.number())
                    }
                    ButtonEvent::Released(button) => {
                        log_info!(self.logger, "button {} released", button.number())
                    }
                }
            }
        }

        refreshed.map(|_| ())
    }

    pub fn display(&self) -> &SegmentDisplay<CLK, CS, DO> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut SegmentDisplay<CLK, CS, DO> {
        &mut self.display
    }

    pub fn buttons(&self) -> &ButtonHandler<I> {
        &self.buttons
    }

    pub fn indicators(&self) -> &IndicatorLeds<O> {
        &self.indicators
    }

    pub fn logger_mut(&mut self) -> &mut Logger<LOG_QUEUE_LEN> {
        &mut self.logger
    }
}

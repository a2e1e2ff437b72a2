#![allow(dead_code)]

use multishield_firmware::config::{BUTTON_MASK, INDICATORS};
use multishield_firmware::drivers::{ButtonHandler, IndicatorLeds, SegmentDisplay};
use multishield_firmware::hal::sim::{Line, SimLine, SimPort, SimWire};
use multishield_firmware::{Application, Ticks};

/// All buttons released, pull-ups holding PC1..PC3 high
pub const IDLE: u8 = 0b0000_1110;
pub const BUTTON1_DOWN: u8 = 0b0000_1100;

pub type SimApp<'a> = Application<&'a SimPort, &'a SimPort, SimLine<'a>, SimLine<'a>, SimLine<'a>>;

/// Simulated board: button port, LED port, display lines and the tick
/// countdowns.
pub struct Rig {
    pub inputs: SimPort,
    pub outputs: SimPort,
    pub wire: SimWire,
    pub ticks: Ticks,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            inputs: SimPort::new(IDLE),
            outputs: SimPort::new(0),
            wire: SimWire::new(),
            ticks: Ticks::new(),
        }
    }

    pub fn app(&self, debounce: u8, refresh: u8) -> SimApp<'_> {
        Application::new(
            ButtonHandler::new(&self.inputs, BUTTON_MASK, debounce),
            IndicatorLeds::new(&self.outputs, &INDICATORS),
            SegmentDisplay::new(
                self.wire.line(Line::Clock),
                self.wire.line(Line::Select),
                self.wire.line(Line::Data),
                refresh,
            )
            .unwrap(),
        )
    }

    /// One main-loop pass followed by one timer tick.
    pub fn step(&self, app: &mut SimApp<'_>) {
        app.poll(&self.ticks).unwrap();
        self.ticks.on_tick();
    }
}

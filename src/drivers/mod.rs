pub mod button_handler;
pub mod heartbeat;
pub mod indicator_leds;
pub mod segment_display;

pub use button_handler::{Button, ButtonEvent, ButtonHandler, Transition};
pub use heartbeat::Heartbeat;
pub use indicator_leds::{Indicator, IndicatorLeds};
pub use segment_display::SegmentDisplay;

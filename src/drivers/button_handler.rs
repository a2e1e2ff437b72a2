use crate::config::{BUTTON1, BUTTON2, BUTTON3};
use crate::hal::{Bits, InputPort};
use crate::os::PulseCounter;

/// Level debouncer over a whole input port.
///
/// A change is accepted as soon as it is seen with no blackout running, then
/// nothing is sampled until the window has elapsed. Bounces inside the window
/// are never observed; only the level read once it has elapsed matters.
pub struct ButtonHandler<I> {
    port: I,
    mask: Bits,
    window: u8,
    state: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Button1,
    Button2,
    Button3,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Button1, Button::Button2, Button::Button3];

    pub const fn bit(self) -> Bits {
        match self {
            Button::Button1 => BUTTON1,
            Button::Button2 => BUTTON2,
            Button::Button3 => BUTTON3,
        }
    }

    /// Label printed on the shield
    pub const fn number(self) -> u8 {
        match self {
            Button::Button1 => 1,
            Button::Button2 => 2,
            Button::Button3 => 3,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed(Button),
    Released(Button),
}

/// A committed change of the debounced state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub previous: u8,
    pub current: u8,
}

impl Transition {
    /// Per-button edges. Buttons pull their line low when pressed.
    pub fn events(self) -> impl Iterator<Item = ButtonEvent> {
        let changed = self.previous ^ self.current;
        let current = self.current;
        Button::ALL
            .into_iter()
            .filter(move |button| button.bit().any_in(changed))
            .map(move |button| {
                if button.bit().any_in(current) {
                    ButtonEvent::Released(button)
                } else {
                    ButtonEvent::Pressed(button)
                }
            })
    }
}

impl<I: InputPort> ButtonHandler<I> {
    /// Start from whatever the lines read right now.
    pub fn new(port: I, mask: Bits, window: u8) -> Self {
        let state = port.read_bits(mask);
        Self {
            port,
            mask,
            window,
            state,
        }
    }

    /// One debounce check. Returns the transition when a new state was
    /// committed; the blackout window is then restarted on `counter`.
    pub fn poll(&mut self, counter: &PulseCounter) -> Option<Transition> {
        if !counter.is_elapsed() {
            return None;
        }

        let sample = self.port.read_bits(self.mask);
        if sample == self.state {
            return None;
        }

        let previous = self.state;
        self.state = sample;
        counter.reload(self.window);
        Some(Transition {
            previous,
            current: sample,
        })
    }

    /// Last committed state, masked
    pub fn state(&self) -> u8 {
        self.state
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        !button.bit().any_in(self.state)
    }
}

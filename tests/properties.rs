mod common;

use common::Rig;
use multishield_firmware::config::{BUTTON_MASK, INDICATORS};
use multishield_firmware::drivers::segment_display::{encode, BLANK, NUMERALS};
use multishield_firmware::PulseCounter;
use proptest::prelude::*;

const LED_MASK: u8 = 0b0001_1100;

fn leds_for(state: u8) -> u8 {
    INDICATORS
        .iter()
        .filter(|indicator| indicator.button.any_in(state))
        .fold(0, |leds, indicator| leds | indicator.led.mask())
}

proptest! {
    #[test]
    fn commits_are_a_window_apart(
        samples in proptest::collection::vec(any::<u8>(), 1..400),
        window in 1u8..=60,
    ) {
        let rig = Rig::new();
        let mut app = rig.app(window, 5);
        let mut last_commit: Option<usize> = None;
        let mut state = app.buttons().state();

        for (tick, sample) in samples.iter().enumerate() {
            rig.inputs.set(*sample);
            rig.step(&mut app);

            if app.buttons().state() != state {
                state = app.buttons().state();
                prop_assert_eq!(state, sample & BUTTON_MASK.mask());
                if let Some(previous) = last_commit {
                    prop_assert!(tick - previous >= window as usize);
                }
                last_commit = Some(tick);
            }
        }
    }

    #[test]
    fn leds_follow_commits_and_nothing_else(
        initial in any::<u8>(),
        samples in proptest::collection::vec(any::<u8>(), 1..200),
    ) {
        let rig = Rig::new();
        rig.outputs.set(initial);
        let mut app = rig.app(10, 5);
        let untouched = initial & !LED_MASK;

        for sample in samples {
            rig.inputs.set(sample);
            rig.step(&mut app);

            let outputs = rig.outputs.get();
            prop_assert_eq!(outputs & !LED_MASK, untouched);
            prop_assert_eq!(outputs & LED_MASK, leds_for(app.buttons().state()));
        }
    }

    #[test]
    fn positions_cycle_in_order(refresh in 0u8..10, steps in 1usize..200) {
        let rig = Rig::new();
        let mut app = rig.app(50, refresh);
        let mut expected = 0;

        for _ in 0..steps {
            let before = app.display().position();
            rig.step(&mut app);
            let after = app.display().position();
            rig.wire.take_frames();
            if after != before {
                prop_assert_eq!(before, expected);
                prop_assert_eq!(after, (before + 1) % 4);
                expected = after;
            }
        }
        prop_assert_eq!(rig.wire.violations(), 0);
    }

    #[test]
    fn tick_saturates(reload in any::<u8>(), ticks in 0u16..600) {
        let counter = PulseCounter::new();
        counter.reload(reload);
        for _ in 0..ticks {
            counter.tick();
        }
        prop_assert_eq!(counter.remaining() as u16, (reload as u16).saturating_sub(ticks));
    }

    #[test]
    fn encoding_is_table_or_blank(numeral in any::<i16>()) {
        let expected = if (0..=9).contains(&numeral) {
            NUMERALS[numeral as usize]
        } else {
            BLANK
        };
        prop_assert_eq!(encode(numeral), expected);
    }
}

#![cfg_attr(target_arch = "avr", no_std, no_main, feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware {
    use panic_halt as _;

    use avr_device::atmega328p::Peripherals;
    use core::cell::RefCell;
    use critical_section::Mutex;

    use multishield_firmware::config::{
        BUTTON_MASK, DEBOUNCE_TICKS, INDICATORS, REFRESH_TICKS, STARTUP_DIGITS, UART_BAUD,
    };
    use multishield_firmware::drivers::{ButtonHandler, Heartbeat, IndicatorLeds, SegmentDisplay};
    use multishield_firmware::hal::gpio::board::{Board, HeartbeatLed};
    use multishield_firmware::hal::timer::{HeartbeatTimer, TickTimer};
    use multishield_firmware::hal::uart::Usart0;
    use multishield_firmware::hal::unwrap_infallible;
    use multishield_firmware::{log_info, Application, TICKS};

    // Written once before interrupts are enabled, then owned by TIMER1_OVF.
    static HEARTBEAT: Mutex<RefCell<Option<Heartbeat<HeartbeatLed>>>> =
        Mutex::new(RefCell::new(None));

    #[avr_device::entry]
    fn main() -> ! {
        let dp = Peripherals::take().unwrap();

        let board = Board::new(dp.PORTB, dp.PORTC, dp.PORTD);
        let mut serial = Usart0::new(dp.USART0, UART_BAUD);

        critical_section::with(|cs| {
            HEARTBEAT
                .borrow(cs)
                .replace(Some(Heartbeat::new(board.heartbeat)));
        });

        let mut display = unwrap_infallible(SegmentDisplay::new(
            board.display_clock,
            board.display_select,
            board.display_data,
            REFRESH_TICKS,
        ));
        for (position, numeral) in STARTUP_DIGITS.iter().enumerate() {
            display.set_numeral(position, *numeral);
        }

        let mut app = Application::new(
            ButtonHandler::new(board.buttons, BUTTON_MASK, DEBOUNCE_TICKS),
            IndicatorLeds::new(board.leds, &INDICATORS),
            display,
        );
        log_info!(app.logger_mut(), "multishield firmware v0.1.0");

        let _tick_timer = TickTimer::start(dp.TC0);
        let _heartbeat_timer = HeartbeatTimer::start(dp.TC1);

        // Enable interrupts globally
        unsafe { avr_device::interrupt::enable() };

        loop {
            unwrap_infallible(app.poll(&TICKS));
            unwrap_infallible(app.logger_mut().flush_one(&mut serial));
        }
    }

    #[avr_device::interrupt(atmega328p)]
    fn TIMER0_OVF() {
        TickTimer::reload();
        TICKS.on_tick();
    }

    #[avr_device::interrupt(atmega328p)]
    fn TIMER1_OVF() {
        HeartbeatTimer::reload();
        critical_section::with(|cs| {
            if let Some(heartbeat) = HEARTBEAT.borrow(cs).borrow_mut().as_mut() {
                unwrap_infallible(heartbeat.on_period());
            }
        });
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}

//! Fuzz target: `ControlLoop::iterate`
//!
//! Each 3-byte chunk is one iteration: potentiometer reading, sensor
//! reading, and a flags byte (bit 0 = button press, bit 1 = clamp policy
//! chosen at start). Asserts the decision and the digit writes always
//! match what the readings imply.
//!
//! cargo fuzz run fuzz_control_loop

#![no_main]

use embedded_hal::delay::DelayNs;
use libfuzzer_sys::fuzz_target;
use thermomotor::app::events::AppEvent;
use thermomotor::app::ports::{ConverterPort, EventSink, OutputPort, TimePort};
use thermomotor::app::service::ControlLoop;
use thermomotor::config::{ControllerConfig, OverflowPolicy};
use thermomotor::control::decision::MotorState;
use thermomotor::display::multiplexer::DigitPosition;
use thermomotor::drivers::button::SourceSelector;
use thermomotor::sensors::analog::AnalogChannel;

#[derive(Default)]
struct Board {
    raw: [u8; 2],
    selected: usize,
    motor: Option<MotorState>,
    digits: Vec<(DigitPosition, u8)>,
}

impl ConverterPort for Board {
    fn select_channel(&mut self, channel: AnalogChannel) {
        self.selected = channel.index() as usize;
    }
    fn start_conversion(&mut self) {}
    fn conversion_complete(&mut self) -> bool {
        true
    }
    fn clear_conversion_complete(&mut self) {}
    fn read_result(&mut self) -> u16 {
        u16::from(self.raw[self.selected]) << 8
    }
}

impl OutputPort for Board {
    fn write_actuator_state(&mut self, state: MotorState) {
        self.motor = Some(state);
    }
    fn write_digit_position(&mut self, position: DigitPosition, digit: u8) {
        self.digits.push((position, digit));
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

struct Frozen;

impl TimePort for Frozen {
    fn now_us(&self) -> u64 {
        0
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let clamp = data.get(2).is_some_and(|f| f & 0b10 != 0);
    let cfg = ControllerConfig {
        overflow_policy: if clamp { OverflowPolicy::Clamp } else { OverflowPolicy::Preserve },
        ..ControllerConfig::default()
    };
    let selector = SourceSelector::new();
    let Ok(mut control) = ControlLoop::new(cfg, &selector) else {
        return;
    };
    let mut board = Board::default();

    for chunk in data.chunks_exact(3) {
        let (pot, sensor, flags) = (chunk[0], chunk[1], chunk[2]);
        if flags & 1 != 0 {
            selector.toggle();
        }
        board.raw = [pot, sensor];
        board.digits.clear();

        let r = control.iterate(&mut board, &mut NoDelay, &Frozen, &mut Discard);

        assert_eq!((r.raw_reference, r.raw_sensor), (pot, sensor));
        assert_eq!(r.motor == MotorState::On, sensor < pot);
        assert_eq!(board.motor, Some(r.motor));
        assert_eq!(board.digits.len(), 3);
        assert_eq!(
            board.digits,
            [
                (DigitPosition::Tenths, r.digits.tenths),
                (DigitPosition::Units, r.digits.units),
                (DigitPosition::Tens, r.digits.tens),
            ]
        );
        if clamp {
            assert!(!r.digits.overflowed());
        }
    }
});

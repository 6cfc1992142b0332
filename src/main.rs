//! Thermomotor Firmware — Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  HardwareAdapter            LogEventSink   Esp32Time       │
//! │  (Board+Converter+Output)   (EventSink)    (TimePort)      │
//! │                                                            │
//! │  ───────────────── Port Trait Boundary ─────────────────   │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │            ControlLoop (pure logic)                  │  │
//! │  │  sample · decide · encode · multiplex                │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                                                            │
//! │  Button ISR ──▶ SOURCE_SELECTOR (one atomic bit)           │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use esp_idf_svc::hal::delay::Ets;
use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, OutputPin, PinDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use log::info;

use thermomotor::adapters::hardware::HardwareAdapter;
use thermomotor::adapters::log_sink::LogEventSink;
use thermomotor::adapters::time::Esp32TimeAdapter;
use thermomotor::app::service::ControlLoop;
use thermomotor::config::ControllerConfig;
use thermomotor::drivers::bcd_display::BcdDisplay;
use thermomotor::drivers::button::SOURCE_SELECTOR;
use thermomotor::drivers::hw_init;
use thermomotor::drivers::motor::MotorDriver;
use thermomotor::pins;

// The `io.gpioN` fields taken in `main` must match the pin map.
const _: () = {
    assert!(pins::MOTOR_A_GPIO == 4);
    assert!(pins::MOTOR_B_GPIO == 5);
    assert!(pins::BCD_BIT0_GPIO == 6);
    assert!(pins::BCD_BIT1_GPIO == 7);
    assert!(pins::BCD_BIT2_GPIO == 15);
    assert!(pins::BCD_BIT3_GPIO == 16);
    assert!(pins::DIGIT_TENTHS_GPIO == 10);
    assert!(pins::DIGIT_UNITS_GPIO == 11);
    assert!(pins::DIGIT_TENS_GPIO == 12);
};

type Line = PinDriver<'static, AnyOutputPin, Output>;

fn line(pin: impl OutputPin + 'static) -> Result<Line> {
    Ok(PinDriver::output(pin.downgrade_output())?)
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Thermomotor v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config ─────────────────────────────────────────────
    // ADC1 at 12 dB attenuation reads full scale well below the AVR's 5 V.
    let config = ControllerConfig {
        adc_reference_volts: hw_init::ADC_FULL_SCALE_VOLTS,
        ..ControllerConfig::default()
    };
    let json = serde_json::to_string(&config).map_err(|e| anyhow!("config encode: {}", e))?;
    info!("Config: {}", json);

    // ── 3. Output lines (see pins.rs for the map) ─────────────
    let p = Peripherals::take()?;
    let io = p.pins;

    let motor = MotorDriver::new(line(io.gpio4)?, line(io.gpio5)?);
    let display = BcdDisplay::new(
        [line(io.gpio6)?, line(io.gpio7)?, line(io.gpio15)?, line(io.gpio16)?],
        [line(io.gpio10)?, line(io.gpio11)?, line(io.gpio12)?],
    );
    let mut hw = HardwareAdapter::new(motor, display);

    // ── 4. Control loop ───────────────────────────────────────
    let mut sink = LogEventSink::new();
    let clock = Esp32TimeAdapter::new();
    let mut delay = Ets;

    let mut control = ControlLoop::new(config, &SOURCE_SELECTOR).map_err(|e| anyhow!("{}", e))?;
    control.start(&mut hw, &mut sink).map_err(|e| anyhow!("setup failed: {}", e))?;

    info!("Entering control loop");
    control.run(&mut hw, &mut delay, &clock, &mut sink)
}

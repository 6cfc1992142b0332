//! Fuzz target: `ControllerConfig` JSON parsing + validation
//!
//! Any config that parses and validates must build a control loop, and
//! its derived scale must be positive (possibly infinite, never NaN).
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermomotor::app::service::ControlLoop;
use thermomotor::config::ControllerConfig;
use thermomotor::drivers::button::SourceSelector;

fuzz_target!(|data: &[u8]| {
    let Ok(cfg) = serde_json::from_slice::<ControllerConfig>(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    let per_count = cfg.celsius_per_count();
    assert!(!per_count.is_nan());
    assert!(per_count > 0.0);

    let selector = SourceSelector::new();
    assert!(ControlLoop::new(cfg, &selector).is_ok());
});

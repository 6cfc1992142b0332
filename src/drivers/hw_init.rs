//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC channels, the button input and its interrupt using
//! raw ESP-IDF sys calls. Output lines (motor, BCD bus, digit selects) are
//! owned by `esp-idf-hal` pin drivers and configured when constructed.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real peripherals.
//! On host/test: ADC reads come from per-channel atomics set with
//! [`sim_set_adc`], and [`sim_fail_adc`] makes a channel's reads fail;
//! everything else is a logged no-op.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

impl HwInitError {
    /// Static description for [`crate::error::Error::Init`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdcInitFailed(_)    => "ADC1 init failed",
            Self::GpioConfigFailed(_) => "GPIO config failed",
            Self::IsrInstallFailed(_) => "GPIO ISR service install failed",
        }
    }
}

impl From<HwInitError> for crate::error::Error {
    fn from(e: HwInitError) -> Self {
        log::error!("hw_init: {}", e);
        Self::Init(e.as_str())
    }
}

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

/// ADC1 channel wired to the potentiometer.
pub const ADC1_CH_POT: u32 = pins::adc1_channel(pins::POT_ADC_GPIO);
/// ADC1 channel wired to the LM35.
pub const ADC1_CH_SENSOR: u32 = pins::adc1_channel(pins::SENSOR_ADC_GPIO);

/// Native converter width on the ESP32-S3.
pub const ADC_NATIVE_BITS: u32 = 12;

/// Input voltage at full-scale reading with `ADC_ATTEN_DB_12`. The
/// firmware passes this as `adc_reference_volts`; the 5.0 V default is
/// the AVR board's reference.
pub const ADC_FULL_SCALE_VOLTS: f32 = 3.1;

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  No concurrent access is possible because
/// `init_adc()` completes before the control loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

/// Reference and width for both analog channels.
#[cfg(target_os = "espidf")]
pub fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [ADC1_CH_POT, ADC1_CH_SENSOR] {
        // SAFETY: adc1_handle() contract — single-threaded init path.
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!("hw_init: ADC1 configured (CH0=pot, CH1=LM35, 12-bit)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_adc() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ADC init skipped");
    Ok(())
}

/// Blocking one-shot read, right-aligned native width. `Err` carries the
/// ESP-IDF return code.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, i32> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(ret);
    }
    Ok(raw.max(0) as u16)
}

#[cfg(not(target_os = "espidf"))]
static SIM_ADC: [core::sync::atomic::AtomicU16; 2] = [
    core::sync::atomic::AtomicU16::new(0),
    core::sync::atomic::AtomicU16::new(0),
];

/// Inject a right-aligned 12-bit reading for `channel` (simulation only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: u32, raw: u16) {
    if let Some(slot) = SIM_ADC.get(channel as usize) {
        slot.store(raw & 0x0FFF, core::sync::atomic::Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
static SIM_ADC_FAIL: [core::sync::atomic::AtomicBool; 2] = [
    core::sync::atomic::AtomicBool::new(false),
    core::sync::atomic::AtomicBool::new(false),
];

/// Make reads of `channel` fail (simulation only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_fail_adc(channel: u32, failing: bool) {
    if let Some(slot) = SIM_ADC_FAIL.get(channel as usize) {
        slot.store(failing, core::sync::atomic::Ordering::Relaxed);
    }
}

/// ESP_FAIL, as the driver would report it.
#[cfg(not(target_os = "espidf"))]
const SIM_READ_FAILED: i32 = -1;

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> Result<u16, i32> {
    use core::sync::atomic::Ordering::Relaxed;
    let idx = channel as usize;
    match (SIM_ADC.get(idx), SIM_ADC_FAIL.get(idx)) {
        (Some(value), Some(fail)) if !fail.load(Relaxed) => Ok(value.load(Relaxed)),
        _ => Err(SIM_READ_FAILED),
    }
}

// ── Button input ──────────────────────────────────────────────

/// Button as input with pull-up, interrupt on falling edge.
#[cfg(target_os = "espidf")]
pub fn init_button_input() -> Result<(), HwInitError> {
    let btn_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    // SAFETY: gpio_config only touches the button pin's IO-mux registers.
    let ret = unsafe { gpio_config(&btn_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    info!("hw_init: button input configured (pull-up, falling edge)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_button_input() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): button input skipped");
    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::drivers::button::button_isr_handler;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(_arg: *mut core::ffi::c_void) {
    button_isr_handler();
}

/// Install the per-pin GPIO ISR service and register the button handler.
/// Call after [`init_button_input`].
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The registered handler
    // only flips the lock-free source selector bit.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        gpio_set_intr_type(pins::BUTTON_GPIO, gpio_int_type_t_GPIO_INTR_NEGEDGE);
        let ret = gpio_isr_handler_add(pins::BUTTON_GPIO, Some(button_gpio_isr), core::ptr::null_mut());
        if ret != ESP_OK as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        gpio_intr_enable(pins::BUTTON_GPIO);
    }
    info!("hw_init: ISR service installed (button)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}

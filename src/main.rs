//! BrushGlow Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single polling loop — no interrupts,
//! no task scheduler.  Three periodic duties are multiplexed on one
//! execution context via explicit next-due-time gates.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  HardwareAdapter        LogEventSink       MonotonicClock  │
//! │  (Sensor+Actuator)      (EventSink)        (time queries)  │
//! │                                                            │
//! │  ────────────── Port Trait Boundary ───────────────        │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │          ExhibitService (pure logic)             │      │
//! │  │  Trigger · Gate · Heat                           │      │
//! │  └──────────────────────────────────────────────────┘      │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod pins;
mod scheduler;

mod adapters;
pub mod app;
mod control;
pub mod diagnostics;
mod drivers;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use adapters::time::MonotonicClock;
use app::service::ExhibitService;
use config::SystemConfig;
use drivers::heaters::HeaterBank;
use drivers::status_led::StatusLed;
use drivers::watchdog::Watchdog;
use sensors::probes::ProbeBus;
use sensors::vibration::VibrationSensor;
use sensors::SensorHub;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  BrushGlow v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    diagnostics::install_panic_handler();

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new();

    // ── 3. Configuration ──────────────────────────────────────
    let config = load_config();
    info!(
        "Config: standby {}C / heating {}C, hold {}s, trigger {}x in {}ms",
        config.standby_setpoint_c,
        config.heating_setpoint_c,
        config.heat_hold_secs,
        config.trigger_spike_count,
        config.trigger_timeframe_ms,
    );

    // ── 4. Probe bus enumeration ──────────────────────────────
    let mut probe_bus = ProbeBus::new(pins::ONEWIRE_GPIO);
    if let Err(e) = probe_bus.init() {
        // Not fatal: the gate holds every heater off until the bus
        // answers, so the exhibit is safe but inert until it does.
        warn!("Probe bus init failed ({}) — heaters stay off until probes appear", e);
    }

    // ── 5. Construct adapters ─────────────────────────────────
    let sensor_hub = SensorHub::new(VibrationSensor::new(pins::PIEZO_ADC_GPIO), probe_bus);
    let mut hw = HardwareAdapter::new(sensor_hub, HeaterBank::new(), StatusLed::new());
    let mut sink = LogEventSink::new();

    // ── 6. Construct app service ──────────────────────────────
    let mut service = ExhibitService::new(config);
    service.start(&mut sink);

    let clock = MonotonicClock::new();

    info!("System ready. Entering control loop.");

    // ── 7. Control loop ───────────────────────────────────────
    loop {
        let now_ms = clock.now_ms();
        service.tick(now_ms, &mut hw, &mut sink);

        // Feed watchdog on every iteration.
        watchdog.feed();

        // Pace the loop: ~1 kHz is ample for gesture polling and lets
        // the FreeRTOS idle task run.
        #[cfg(target_os = "espidf")]
        esp_idf_hal::delay::FreeRtos::delay_ms(1);
        #[cfg(not(target_os = "espidf"))]
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
}

// ── Config loading ────────────────────────────────────────────

/// No persistence on the exhibit hardware — compile-time defaults.
#[cfg(target_os = "espidf")]
fn load_config() -> SystemConfig {
    SystemConfig::default()
}

/// On the host simulation target, an optional `brushglow.json` beside
/// the binary overrides the defaults for bench experiments.
#[cfg(not(target_os = "espidf"))]
fn load_config() -> SystemConfig {
    match std::fs::read_to_string("brushglow.json") {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(cfg) => {
                info!("Config loaded from brushglow.json");
                cfg
            }
            Err(e) => {
                warn!("brushglow.json invalid ({}), using defaults", e);
                SystemConfig::default()
            }
        },
        Err(_) => SystemConfig::default(),
    }
}

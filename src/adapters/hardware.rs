//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and both actuator drivers, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  This is the only
//! module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::control::heat::ZoneCommand;
use crate::drivers::heaters::HeaterBank;
use crate::drivers::status_led::StatusLed;
use crate::sensors::probes::ProbePair;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    heaters: HeaterBank,
    led: StatusLed,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, heaters: HeaterBank, led: StatusLed) -> Self {
        Self {
            sensor_hub,
            heaters,
            led,
        }
    }

    /// Per-element drive state (diagnostics).
    pub fn element_states(&self) -> [bool; crate::drivers::heaters::ELEMENT_COUNT] {
        self.heaters.element_states()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_vibration(&mut self) -> u16 {
        self.sensor_hub.read_vibration()
    }

    fn read_probes(&mut self) -> Option<ProbePair> {
        self.sensor_hub.read_probes()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn apply_zones(&mut self, zones: ZoneCommand) {
        self.heaters.apply(zones);
    }

    fn all_heaters_off(&mut self) {
        self.heaters.all_off();
    }

    fn set_status_indicator(&mut self, on: bool) {
        self.led.set(on);
    }
}

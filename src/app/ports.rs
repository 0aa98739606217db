//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ExhibitService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, event sinks) implement these
//! traits.  The [`ExhibitService`](super::service::ExhibitService)
//! consumes them via generics, so the domain core never touches
//! hardware directly.

use crate::control::heat::ZoneCommand;
use crate::sensors::probes::ProbePair;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// One raw piezo sample.  Called every loop iteration; must be
    /// cheap and non-blocking.
    fn read_vibration(&mut self) -> u16;

    /// One probe pair from the last completed conversion, or `None`
    /// if nothing has converted yet.  Called once per probe-sampling
    /// interval.
    fn read_probes(&mut self) -> Option<ProbePair>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Apply a zone enable vector to the heater bank.
    fn apply_zones(&mut self, zones: ZoneCommand);

    /// De-energise every heater element immediately.
    fn all_heaters_off(&mut self);

    /// Drive the "any heater active" panel indicator.
    fn set_status_indicator(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log for
/// now; the trait is the observability hook for anything richer).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

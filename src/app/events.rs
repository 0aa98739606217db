//! Outbound application events.
//!
//! The [`ExhibitService`](super::service::ExhibitService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters
//! on the other side decide what to do with them — today that is the
//! serial log.

use crate::control::heat::ZoneCommand;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (all heaters off, standby target).
    Started,

    /// A qualifying brushing gesture completed.
    Triggered {
        /// Span of the spike window that fired, in milliseconds.
        window_span_ms: u32,
    },

    /// The target setpoint changed phase.
    HeatPhase {
        /// `true` = elevated (Heating), `false` = Standby.
        heating: bool,
    },

    /// One or more probe faults became active.
    FaultDetected(u8),

    /// All probe faults have cleared.
    FaultCleared,

    /// Periodic status snapshot.
    Status(StatusReport),
}

/// A point-in-time status snapshot suitable for logging.
#[derive(Debug, Clone, Copy)]
pub struct StatusReport {
    /// Active target temperature (Celsius).
    pub target_c: i16,
    /// Milliseconds left in the hold window (0 in standby).
    pub heating_remaining_ms: u32,
    /// Last accepted probe readings (Celsius).
    pub left_c: i16,
    pub right_c: i16,
    /// Zone enable vector as last applied.
    pub zones: ZoneCommand,
    /// Active probe-fault bitmask (0 = probes trusted).
    pub fault_flags: u8,
    /// Loop iterations since startup.
    pub tick_count: u64,
    /// Gestures accepted since startup.
    pub trigger_count: u32,
}

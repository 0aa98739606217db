#![allow(dead_code)] // Error types reserved for future SensorPort/ActuatorPort typed returns

//! Unified error types for the BrushGlow firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level control loop's error handling uniform.
//! All variants are `Copy` so they can be cheaply passed through the probe
//! supervisor and control loop without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned out-of-range data.
    Sensor(SensorError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// A temperature probe failed validation.
    Probe(ProbeFault),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Probe(e) => write!(f, "probe: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error or timed out.
    AdcReadFailed,
    /// One-wire bus reset saw no presence pulse.
    BusNoPresence,
    /// Scratchpad CRC check failed.
    CrcMismatch,
    /// No conversion has completed yet (first read after boot).
    NotReady,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::BusNoPresence => write!(f, "one-wire bus: no presence pulse"),
            Self::CrcMismatch => write!(f, "scratchpad CRC mismatch"),
            Self::NotReady => write!(f, "conversion not ready"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Probe faults
// ---------------------------------------------------------------------------

/// Probe faults are a special category: any active fault disables all
/// heater outputs for the cycle.  They are accumulated in a bitfield by
/// the probe supervisor so that multiple simultaneous faults can be
/// tracked and individually cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProbeFault {
    /// Left probe below the plausible-temperature floor (disconnected or shorted).
    LeftOutOfRange = 0b0000_0001,
    /// Right probe below the plausible-temperature floor.
    RightOutOfRange = 0b0000_0010,
    /// Probes disagree beyond tolerance (wiring fault or a dead heater
    /// zone producing an artificial gradient).
    Disagreement = 0b0000_0100,
}

impl ProbeFault {
    /// Return the bitmask for this fault.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ProbeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftOutOfRange => write!(f, "left probe out of range"),
            Self::RightOutOfRange => write!(f, "right probe out of range"),
            Self::Disagreement => write!(f, "probe disagreement"),
        }
    }
}

impl From<ProbeFault> for Error {
    fn from(e: ProbeFault) -> Self {
        Self::Probe(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

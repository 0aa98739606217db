//! System configuration parameters
//!
//! All tunable parameters for the BrushGlow exhibit controller.
//! Compile-time defaults; the host simulation target can override them
//! from a JSON file at startup.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Heat targets ---
    /// Surface target while idle (Celsius).  Kept below the thermochromic
    /// transition so the colour fades back between visitors.
    pub standby_setpoint_c: i16,
    /// Surface target after a brushing gesture (Celsius).  Above the
    /// pigment's colour-change threshold.
    pub heating_setpoint_c: i16,
    /// How long the elevated target is held after the last gesture (seconds)
    pub heat_hold_secs: u16,

    // --- Gesture trigger ---
    /// Piezo ADC level a sample must exceed to open a spike (raw counts)
    pub vibration_threshold: u16,
    /// Number of complete spikes that must land inside the timeframe
    pub trigger_spike_count: u8,
    /// Rolling time budget for the spike window (milliseconds)
    pub trigger_timeframe_ms: u32,

    // --- Temperature probes ---
    /// Probe sampling interval (milliseconds).  The one-wire bus is slow
    /// and picks up ground float when polled too often.
    pub probe_read_interval_ms: u32,
    /// Readings below this are treated as a disconnected/faulty probe (Celsius)
    pub probe_lower_bound_c: i16,
    /// Maximum tolerated disagreement between the two probes (Celsius)
    pub probe_deviation_bound_c: i16,

    // --- Diagnostics ---
    /// Status line interval (milliseconds)
    pub status_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Heat targets
            standby_setpoint_c: 28,
            heating_setpoint_c: 40,
            heat_hold_secs: 30,

            // Gesture trigger
            vibration_threshold: 300,
            trigger_spike_count: 3,
            trigger_timeframe_ms: 3000,

            // Temperature probes
            probe_read_interval_ms: 2000,
            probe_lower_bound_c: -20,
            probe_deviation_bound_c: 10,

            // Diagnostics
            status_interval_ms: 5000,
        }
    }
}

impl SystemConfig {
    /// Heat hold duration in milliseconds.
    pub fn heat_hold_ms(&self) -> u32 {
        u32::from(self.heat_hold_secs) * 1000
    }
}

//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! The status line is free-form human output for whoever is watching
//! the serial console — it is not a machine protocol.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(s) => {
                info!(
                    "STATUS | target={}\u{00b0}C hold_left={:.1}s | L={}\u{00b0}C R={}\u{00b0}C | \
                     zones L={} R={} C={} | faults=0b{:08b} | ticks={} triggers={}",
                    s.target_c,
                    f64::from(s.heating_remaining_ms) / 1000.0,
                    s.left_c,
                    s.right_c,
                    if s.zones.left { "ON" } else { "off" },
                    if s.zones.right { "ON" } else { "off" },
                    if s.zones.center { "ON" } else { "off" },
                    s.fault_flags,
                    s.tick_count,
                    s.trigger_count,
                );
            }
            AppEvent::Triggered { window_span_ms } => {
                info!("TRIGGER | gesture accepted (window span {}ms)", window_span_ms);
            }
            AppEvent::HeatPhase { heating } => {
                info!(
                    "PHASE | {}",
                    if *heating { "Standby -> Heating" } else { "Heating -> Standby" }
                );
            }
            AppEvent::FaultDetected(flags) => {
                warn!("FAULT | probes untrusted, flags=0b{:08b} — heaters held off", flags);
            }
            AppEvent::FaultCleared => {
                info!("FAULT | all cleared, actuation resumed");
            }
            AppEvent::Started => {
                info!("START | standby target, all heaters off");
            }
        }
    }
}

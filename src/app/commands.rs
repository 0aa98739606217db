//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (docent
//! console over serial, maintenance scripts) that the
//! [`ExhibitService`](super::service::ExhibitService) interprets.

use crate::config::SystemConfig;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Arm the hold window as if a gesture had been detected —
    /// maintenance hook for exercising the heaters without brushing.
    ForceTrigger,

    /// Hot-reload configuration.  Takes effect immediately; nothing is
    /// persisted across a power cycle.
    UpdateConfig(SystemConfig),
}

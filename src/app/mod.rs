//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the BrushGlow exhibit:
//! gesture triggering, probe validation, and heat-target control,
//! multiplexed over the loop cadences.  All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;

//! Control core — the three decision components of the exhibit.
//!
//! [`trigger`] turns raw piezo samples into brushing-gesture events,
//! [`gate`] decides whether the temperature probes can be trusted, and
//! [`heat`] converts gesture events and elapsed time into per-zone
//! heater decisions.  All three are pure logic with injected clocks —
//! no hardware access, fully testable on the host.

pub mod gate;
pub mod heat;
pub mod trigger;

//! Sensor subsystem — the piezo transducer and the probe bus, plus the
//! aggregating [`SensorHub`].
//!
//! The hub owns both drivers and exposes the two read paths the control
//! loop needs: a fast per-iteration vibration sample and a slow
//! per-interval probe pair.

pub mod probes;
pub mod vibration;

use probes::{ProbeBus, ProbePair};
use vibration::VibrationSensor;

/// Aggregates the sensor drivers behind the two cadences the loop runs.
pub struct SensorHub {
    pub vibration: VibrationSensor,
    pub probes: ProbeBus,
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(vibration: VibrationSensor, probes: ProbeBus) -> Self {
        Self { vibration, probes }
    }

    /// One raw piezo sample.  Called every loop iteration.
    pub fn read_vibration(&mut self) -> u16 {
        self.vibration.read()
    }

    /// One probe pair, if a conversion has completed.  Called once per
    /// probe-sampling interval — the bus is slow and picks up ground
    /// float when disturbed more often.
    pub fn read_probes(&mut self) -> Option<ProbePair> {
        self.probes.sample()
    }
}

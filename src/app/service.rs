//! Application service — the hexagonal core.
//!
//! [`ExhibitService`] owns the trigger detector, the probe supervisor,
//! and the heat controller, and multiplexes the three loop cadences:
//! trigger polling every iteration, probe sampling and the status line
//! each on their own [`Cadence`].  All I/O flows through port traits
//! injected at call sites, making the entire service testable with
//! mock adapters and a synthetic clock.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │        ExhibitService         │
//! ActuatorPort ◀──│  Trigger · Gate · Heat        │
//!                 └──────────────────────────────┘
//! ```
//!
//! Within one iteration the order is fixed: the trigger poll runs
//! before the target/zone recomputation, so a gesture completing this
//! tick raises this tick's target.
//!
//! ## Fail-safe policy
//!
//! While the probe gate is failing, every physical heater output and
//! the indicator are forced off each iteration.  The hold timestamp,
//! target setpoint, and the controller's stored zone vector are *not*
//! reset, so actuation resumes from the preserved state the moment the
//! probes validate again.

use log::info;

use crate::config::SystemConfig;
use crate::control::gate::ProbeSupervisor;
use crate::control::heat::HeatController;
use crate::control::trigger::TriggerDetector;
use crate::scheduler::Cadence;
use crate::sensors::probes::{ProbePair, DISCONNECTED_C};

use super::commands::AppCommand;
use super::events::{AppEvent, StatusReport};
use super::ports::{ActuatorPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// ExhibitService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct ExhibitService {
    trigger: TriggerDetector,
    supervisor: ProbeSupervisor,
    heat: HeatController,
    probe_cadence: Cadence,
    status_cadence: Cadence,
    /// Last pair that passed the gate.  `None` until the first
    /// accepted reading after boot.
    last_pair: Option<ProbePair>,
    /// Verdict of the most recent gate check.
    gate_ok: bool,
    was_heating: bool,
    had_faults: bool,
    tick_count: u64,
    trigger_count: u32,
    /// Iterations spent with outputs forced off by an active fault.
    fault_cycles: u32,
    config: SystemConfig,
}

impl ExhibitService {
    /// Construct the service from configuration.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            trigger: TriggerDetector::new(
                config.vibration_threshold,
                config.trigger_spike_count,
                config.trigger_timeframe_ms,
            ),
            supervisor: ProbeSupervisor::new(&config),
            heat: HeatController::new(&config),
            probe_cadence: Cadence::new(config.probe_read_interval_ms),
            status_cadence: Cadence::new(config.status_interval_ms),
            last_pair: None,
            gate_ok: false,
            was_heating: false,
            had_faults: false,
            tick_count: 0,
            trigger_count: 0,
            fault_cycles: 0,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce startup.  State is already the safe default: standby
    /// target, empty spike window, all heaters off.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!(
            "ExhibitService started (standby {}C, heating {}C, hold {}s)",
            self.config.standby_setpoint_c, self.config.heating_setpoint_c, self.config.heat_hold_secs
        );
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one loop iteration: trigger poll → probe cadence → output
    /// application → status cadence.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Trigger poll — every iteration, and always before the
        //    target recomputation below so this tick sees the gesture.
        let sample = hw.read_vibration();
        if self.trigger.poll(sample, now_ms) {
            self.heat.on_trigger(now_ms);
            self.trigger_count += 1;
            sink.emit(&AppEvent::Triggered {
                window_span_ms: self.trigger.window_span_ms().unwrap_or(0),
            });
        }
        self.heat.refresh(now_ms);

        // 2. Probe sampling — at most once per interval.
        if self.probe_cadence.due(now_ms) {
            match hw.read_probes() {
                Some(pair) => {
                    self.gate_ok = self.supervisor.evaluate(pair);
                    if self.gate_ok {
                        self.last_pair = Some(pair);
                    }
                    let has = self.supervisor.has_faults();
                    if has && !self.had_faults {
                        sink.emit(&AppEvent::FaultDetected(self.supervisor.faults()));
                    } else if !has && self.had_faults {
                        sink.emit(&AppEvent::FaultCleared);
                    }
                    self.had_faults = has;
                }
                None => {
                    // First conversion still in flight — nothing to
                    // validate yet; stay safe without raising a fault.
                    self.gate_ok = false;
                }
            }
        }

        // 3. Output application — every iteration.
        match (self.gate_ok, self.last_pair) {
            (true, Some(pair)) => {
                let zones = self.heat.update_zones(pair.left_c, pair.right_c, now_ms);
                hw.apply_zones(zones);
                hw.set_status_indicator(zones.any());
            }
            _ => {
                if self.supervisor.has_faults() {
                    self.fault_cycles = self.fault_cycles.saturating_add(1);
                }
                hw.all_heaters_off();
                hw.set_status_indicator(false);
            }
        }

        // 4. Phase edge + status line.
        let heating = self.heat.is_heating(now_ms);
        if heating != self.was_heating {
            sink.emit(&AppEvent::HeatPhase { heating });
            self.was_heating = heating;
        }

        if self.status_cadence.due(now_ms) {
            sink.emit(&AppEvent::Status(self.build_status(now_ms)));
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (docent console, maintenance script).
    pub fn handle_command(&mut self, cmd: AppCommand, now_ms: u32, sink: &mut impl EventSink) {
        match cmd {
            AppCommand::ForceTrigger => {
                info!("ForceTrigger: arming hold window");
                self.heat.on_trigger(now_ms);
                self.trigger_count += 1;
                sink.emit(&AppEvent::Triggered { window_span_ms: 0 });
            }
            AppCommand::UpdateConfig(new_config) => {
                self.apply_config(new_config);
                info!("Configuration updated at runtime");
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a status snapshot from the current state.
    pub fn build_status(&self, now_ms: u32) -> StatusReport {
        let (left_c, right_c) = match self.last_pair {
            Some(pair) => (pair.left_c, pair.right_c),
            None => (DISCONNECTED_C, DISCONNECTED_C),
        };
        StatusReport {
            target_c: self.heat.target_c(now_ms),
            heating_remaining_ms: self.heat.heating_remaining_ms(now_ms),
            left_c,
            right_c,
            zones: self.heat.zones(),
            fault_flags: self.supervisor.faults(),
            tick_count: self.tick_count,
            trigger_count: self.trigger_count,
        }
    }

    /// Active target temperature at `now_ms`.
    pub fn target_c(&self, now_ms: u32) -> i16 {
        self.heat.target_c(now_ms)
    }

    /// Whether the elevated setpoint is active at `now_ms`.
    pub fn is_heating(&self, now_ms: u32) -> bool {
        self.heat.is_heating(now_ms)
    }

    /// Total loop iterations executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Gestures accepted since startup.
    pub fn trigger_count(&self) -> u32 {
        self.trigger_count
    }

    /// Current active fault bitmask (0 = no faults).
    pub fn fault_flags(&self) -> u8 {
        self.supervisor.faults()
    }

    /// Iterations spent with outputs forced off by an active fault.
    pub fn fault_cycles(&self) -> u32 {
        self.fault_cycles
    }

    /// Clone of the live configuration.
    pub fn current_config(&self) -> SystemConfig {
        self.config.clone()
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_config(&mut self, config: SystemConfig) {
        self.trigger = TriggerDetector::new(
            config.vibration_threshold,
            config.trigger_spike_count,
            config.trigger_timeframe_ms,
        );
        // Fresh supervisor: latched faults re-evaluate against the new
        // bounds on the next probe read; outputs stay off until then.
        self.supervisor = ProbeSupervisor::new(&config);
        self.heat.reconfigure(&config);
        self.probe_cadence.set_interval(config.probe_read_interval_ms);
        self.status_cadence.set_interval(config.status_interval_ms);
        self.gate_ok = false;
        self.had_faults = false;
        self.config = config;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::heat::ZoneCommand;

    struct MockHw {
        sample: u16,
        pair: Option<ProbePair>,
        zones: Option<ZoneCommand>,
        forced_off: bool,
        indicator: bool,
    }

    impl MockHw {
        fn new() -> Self {
            Self {
                sample: 0,
                pair: Some(ProbePair {
                    left_c: 22,
                    right_c: 22,
                }),
                zones: None,
                forced_off: false,
                indicator: false,
            }
        }
    }

    impl SensorPort for MockHw {
        fn read_vibration(&mut self) -> u16 {
            self.sample
        }
        fn read_probes(&mut self) -> Option<ProbePair> {
            self.pair
        }
    }

    impl ActuatorPort for MockHw {
        fn apply_zones(&mut self, zones: ZoneCommand) {
            self.zones = Some(zones);
            self.forced_off = false;
        }
        fn all_heaters_off(&mut self) {
            self.zones = Some(ZoneCommand::all_off());
            self.forced_off = true;
        }
        fn set_status_indicator(&mut self, on: bool) {
            self.indicator = on;
        }
    }

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    fn service() -> ExhibitService {
        ExhibitService::new(SystemConfig {
            trigger_spike_count: 2,
            ..SystemConfig::default()
        })
    }

    #[test]
    fn trigger_raises_target_within_the_same_tick() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = NullSink;
        // Probes read cold relative to heating target but warm relative
        // to standby, so zone state flips exactly when the target does.
        hw.pair = Some(ProbePair {
            left_c: 30,
            right_c: 30,
        });

        // Prime: one spike, then idle below threshold.
        hw.sample = 500;
        svc.tick(0, &mut hw, &mut sink);
        hw.sample = 0;
        svc.tick(10, &mut hw, &mut sink);
        assert_eq!(hw.zones, Some(ZoneCommand::all_off())); // standby, 30 >= 28

        // Second spike completes on this tick — target must already be
        // elevated when this tick's zones are derived.
        hw.sample = 500;
        svc.tick(20, &mut hw, &mut sink);
        hw.sample = 0;
        svc.tick(30, &mut hw, &mut sink);
        assert_eq!(svc.trigger_count(), 1);
        assert!(svc.is_heating(30));
        let zones = hw.zones.expect("zones applied");
        assert!(zones.left && zones.right && zones.center);
        assert!(hw.indicator);
    }

    #[test]
    fn gate_failure_forces_outputs_off_but_keeps_hold_window() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = NullSink;
        hw.pair = Some(ProbePair {
            left_c: 30,
            right_c: 30,
        });

        svc.handle_command(AppCommand::ForceTrigger, 0, &mut sink);
        svc.tick(0, &mut hw, &mut sink);
        assert!(hw.zones.expect("applied").any());

        // Probe disagreement on the next sampling interval.
        hw.pair = Some(ProbePair {
            left_c: 30,
            right_c: 45,
        });
        svc.tick(2500, &mut hw, &mut sink);
        assert!(hw.forced_off);
        assert!(!hw.indicator);
        assert_ne!(svc.fault_flags(), 0);
        // Hold window untouched.
        assert!(svc.is_heating(2500));

        // Recovery: heaters resume without a new gesture.
        hw.pair = Some(ProbePair {
            left_c: 30,
            right_c: 31,
        });
        svc.tick(5000, &mut hw, &mut sink);
        assert!(!hw.forced_off);
        assert!(hw.zones.expect("applied").any());
        assert_eq!(svc.fault_flags(), 0);
    }

    #[test]
    fn unready_probes_keep_outputs_off_without_fault() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = NullSink;
        hw.pair = None; // first conversion still in flight

        svc.tick(0, &mut hw, &mut sink);
        assert!(hw.forced_off);
        assert_eq!(svc.fault_flags(), 0);
        assert_eq!(svc.fault_cycles(), 0);
    }

    #[test]
    fn update_config_applies_new_trigger_threshold() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = NullSink;

        let new_cfg = SystemConfig {
            vibration_threshold: 1000,
            trigger_spike_count: 1,
            ..SystemConfig::default()
        };
        svc.handle_command(AppCommand::UpdateConfig(new_cfg), 0, &mut sink);

        // 500 is under the new threshold — never opens a spike.
        hw.sample = 500;
        svc.tick(10, &mut hw, &mut sink);
        hw.sample = 0;
        svc.tick(20, &mut hw, &mut sink);
        assert_eq!(svc.trigger_count(), 0);

        hw.sample = 1500;
        svc.tick(30, &mut hw, &mut sink);
        hw.sample = 0;
        svc.tick(40, &mut hw, &mut sink);
        assert_eq!(svc.trigger_count(), 1);
    }
}

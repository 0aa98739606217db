//! Property tests for the control core.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32
//! targets.  On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use brushglow::config::SystemConfig;
use brushglow::control::gate::TemperatureGate;
use brushglow::control::heat::HeatController;
use brushglow::control::trigger::TriggerDetector;
use brushglow::scheduler::Cadence;
use proptest::prelude::*;

// ── Trigger: fires iff N spikes land inside the timeframe ─────

/// Independent reconstruction of spike completion times from a sample
/// stream: strictly-above opens, strictly-below closes.
fn reference_completions(threshold: u16, samples: &[(u32, u16)]) -> Vec<u32> {
    let mut up = false;
    let mut completions = Vec::new();
    for &(t, s) in samples {
        if !up && s > threshold {
            up = true;
        } else if up && s < threshold {
            up = false;
            completions.push(t);
        }
    }
    completions
}

fn arb_sample_stream() -> impl Strategy<Value = Vec<(u32, u16)>> {
    // Monotonic timestamps with 1–400ms gaps, levels straddling the
    // threshold (including exact equality, which must be inert).
    proptest::collection::vec((1u32..400, 0u16..=200), 1..120).prop_map(|steps| {
        let mut t = 0u32;
        steps
            .into_iter()
            .map(|(dt, level)| {
                t += dt;
                (t, level)
            })
            .collect()
    })
}

proptest! {
    /// For every sample stream, the detector fires exactly on the spike
    /// completions where the most recent `n` completions span less than
    /// the timeframe.
    #[test]
    fn trigger_fires_iff_recent_spikes_fit_the_window(
        samples in arb_sample_stream(),
        n in 1u8..=5,
        timeframe_ms in 100u32..5000,
    ) {
        const THRESHOLD: u16 = 100;
        let completions = reference_completions(THRESHOLD, &samples);
        let n_usize = usize::from(n);

        let mut expected = Vec::new();
        for (k, &t) in completions.iter().enumerate() {
            if k + 1 >= n_usize {
                let oldest = completions[k + 1 - n_usize];
                if t - oldest < timeframe_ms {
                    expected.push(t);
                }
            }
        }

        let mut det = TriggerDetector::new(THRESHOLD, n, timeframe_ms);
        let mut actual = Vec::new();
        for &(t, s) in &samples {
            if det.poll(s, t) {
                actual.push(t);
            }
        }

        prop_assert_eq!(actual, expected);
    }

    /// A sample equal to the threshold never opens or closes a spike.
    #[test]
    fn threshold_equality_is_inert(
        prefix in proptest::collection::vec((1u32..400, 0u16..=200), 0..40),
    ) {
        const THRESHOLD: u16 = 100;
        let mut t = 0u32;
        let mut samples: Vec<(u32, u16)> = prefix
            .into_iter()
            .map(|(dt, level)| {
                t += dt;
                (t, level)
            })
            .collect();
        // Splice threshold-exact samples between every original sample.
        let mut spliced = Vec::new();
        for &(ts, s) in &samples {
            spliced.push((ts, s));
            spliced.push((ts + 1, THRESHOLD));
        }
        samples = spliced;

        let plain: Vec<(u32, u16)> = samples
            .iter()
            .copied()
            .filter(|&(_, s)| s != THRESHOLD)
            .collect();

        prop_assert_eq!(
            reference_completions(THRESHOLD, &samples),
            reference_completions(THRESHOLD, &plain)
        );

        // The detector must agree: threshold-exact samples change nothing.
        let fires = |stream: &[(u32, u16)]| {
            let mut det = TriggerDetector::new(THRESHOLD, 2, 3000);
            stream
                .iter()
                .filter(|&&(t, s)| det.poll(s, t))
                .map(|&(t, _)| t)
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(fires(&samples), fires(&plain));
    }
}

// ── Gate: symmetry and lower-bound dominance ──────────────────

proptest! {
    #[test]
    fn gate_deviation_check_is_symmetric(
        a in -60i16..=130,
        b in -60i16..=130,
        lower in -40i16..=0,
        bound in 1i16..=30,
    ) {
        let gate = TemperatureGate::new(lower, bound);
        prop_assert_eq!(gate.validate(a, b), gate.validate(b, a));
    }

    #[test]
    fn gate_rejects_below_lower_bound_regardless_of_other(
        other in -200i16..=200,
        lower in -40i16..=0,
        bound in 1i16..=30,
    ) {
        let gate = TemperatureGate::new(lower, bound);
        let below = lower - 1;
        prop_assert!(!gate.validate(below, other));
        prop_assert!(!gate.validate(other, below));
    }

    #[test]
    fn gate_accepts_iff_in_range_and_within_bound(
        a in -60i16..=130,
        b in -60i16..=130,
        lower in -40i16..=0,
        bound in 1i16..=30,
    ) {
        let gate = TemperatureGate::new(lower, bound);
        let expected = a >= lower && b >= lower && (i32::from(a) - i32::from(b)).abs() <= i32::from(bound);
        prop_assert_eq!(gate.validate(a, b), expected);
    }
}

// ── Heat: centre voting and hold-window timing ────────────────

proptest! {
    /// The shared centre element is enabled iff both sides are.
    #[test]
    fn center_zone_never_energises_alone(
        left_c in -60i16..=130,
        right_c in -60i16..=130,
        triggered in proptest::bool::ANY,
        now_ms in 0u32..100_000,
    ) {
        let mut hc = HeatController::new(&SystemConfig::default());
        if triggered {
            hc.on_trigger(now_ms.saturating_sub(1000));
        }
        let z = hc.update_zones(left_c, right_c, now_ms);
        prop_assert_eq!(z.center, z.left && z.right);
    }

    /// The elevated target holds for exactly the hold duration.
    #[test]
    fn target_is_elevated_iff_inside_hold_window(
        trigger_ms in 0u32..1_000_000,
        dt_ms in 0u32..120_000,
    ) {
        let config = SystemConfig::default();
        let mut hc = HeatController::new(&config);
        hc.on_trigger(trigger_ms);

        let now = trigger_ms + dt_ms;
        let expected = if dt_ms < config.heat_hold_ms() {
            config.heating_setpoint_c
        } else {
            config.standby_setpoint_c
        };
        prop_assert_eq!(hc.target_c(now), expected);
    }
}

// ── Cadence: spacing invariant, including across the wrap ─────

proptest! {
    /// Consecutive fires are never closer than the interval, wherever
    /// the u32 clock starts (including just before the wrap).
    #[test]
    fn cadence_fires_are_spaced_at_least_one_interval(
        start in proptest::num::u32::ANY,
        interval_ms in 1u32..5_000,
        steps in proptest::collection::vec(1u32..500, 1..200),
    ) {
        let mut cadence = Cadence::new(interval_ms);
        let mut now = start;
        let mut last_fire: Option<u32> = None;

        for dt in steps {
            now = now.wrapping_add(dt);
            if cadence.due(now) {
                if let Some(prev) = last_fire {
                    prop_assert!(
                        now.wrapping_sub(prev) >= interval_ms,
                        "fired {}ms after previous fire",
                        now.wrapping_sub(prev)
                    );
                }
                last_fire = Some(now);
            }
        }
    }
}

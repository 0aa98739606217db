//! Periodic-cadence gates for the polling loop.
//!
//! The control loop multiplexes three periodic duties on a single
//! execution context: trigger polling runs every iteration, probe
//! sampling and the status line each run at their own longer interval.
//! Rather than threads or timers, each slower duty owns a [`Cadence`] —
//! explicit next-due-time state checked every iteration — which keeps
//! the loop's ordering guarantees deterministic and testable.
//!
//! All arithmetic is `u32` milliseconds with `wrapping_sub`, correct
//! across the 49.7-day counter wrap.

/// An "is it time yet?" gate for one periodic duty.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    interval_ms: u32,
    next_due_ms: u32,
    primed: bool,
}

impl Cadence {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            next_due_ms: 0,
            primed: false,
        }
    }

    /// Check the gate.  Returns `true` at most once per interval; the
    /// very first call fires immediately.  Late calls reschedule from
    /// `now` rather than accumulating a backlog.
    pub fn due(&mut self, now_ms: u32) -> bool {
        if !self.primed {
            self.primed = true;
            self.next_due_ms = now_ms.wrapping_add(self.interval_ms);
            return true;
        }
        // Wrap-safe "now >= next_due": the signed distance to the
        // deadline has gone non-negative.
        let overdue = now_ms.wrapping_sub(self.next_due_ms);
        if (overdue as i32) >= 0 {
            self.next_due_ms = now_ms.wrapping_add(self.interval_ms);
            return true;
        }
        false
    }

    /// Change the interval.  Takes effect from the next fire.
    pub fn set_interval(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms;
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_fires_immediately() {
        let mut c = Cadence::new(1000);
        assert!(c.due(5));
    }

    #[test]
    fn does_not_refire_within_interval() {
        let mut c = Cadence::new(1000);
        assert!(c.due(0));
        for t in (100..1000).step_by(100) {
            assert!(!c.due(t), "fired early at t={t}");
        }
        assert!(c.due(1000));
    }

    #[test]
    fn fires_once_per_interval_under_fast_polling() {
        let mut c = Cadence::new(250);
        let mut fires = 0;
        for t in 0..=2000 {
            if c.due(t) {
                fires += 1;
            }
        }
        assert_eq!(fires, 9); // t=0 plus every 250ms through 2000
    }

    #[test]
    fn late_check_reschedules_from_now() {
        let mut c = Cadence::new(1000);
        assert!(c.due(0));
        // Loop stalled; checked again far past the deadline.
        assert!(c.due(3500));
        assert!(!c.due(4000)); // next due at 4500, not 2000
        assert!(c.due(4500));
    }

    #[test]
    fn wrap_safe_across_u32_boundary() {
        let mut c = Cadence::new(1000);
        let t0 = u32::MAX - 400;
        assert!(c.due(t0));
        assert!(!c.due(t0.wrapping_add(500))); // 100 before the wrapped deadline
        assert!(c.due(t0.wrapping_add(1000))); // deadline, past the wrap
    }

    #[test]
    fn set_interval_applies_to_next_fire() {
        let mut c = Cadence::new(1000);
        assert!(c.due(0));
        c.set_interval(200);
        assert!(c.due(1000)); // old deadline still stands
        assert!(c.due(1200)); // new interval from here on
    }
}

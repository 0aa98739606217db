//! Brushing-gesture detector.
//!
//! A brushing stroke rings the piezo transducer: the sample rises above
//! the threshold and falls back below it — one complete *spike*.  A
//! single jolt (someone bumping the plinth) produces one spike; a real
//! multi-stroke gesture produces several in quick succession.  The
//! detector therefore fires only when the configured number of complete
//! spikes all land inside a rolling time budget.
//!
//! Completion timestamps live in a fixed-capacity ring buffer
//! ([`heapless::Deque`]); pushing a new spike evicts the oldest once the
//! window is full.  Timestamps are `u32` milliseconds compared with
//! `wrapping_sub`, so the detector stays correct across the 49.7-day
//! counter wrap.

use heapless::Deque;
use log::debug;

/// Type-carried capacity of the spike window.  The runtime spike count
/// is clamped to this.
pub const SPIKE_WINDOW_CAP: usize = 16;

/// Edge-debounced spike counter with a sliding time window.
pub struct TriggerDetector {
    threshold: u16,
    required_spikes: usize,
    timeframe_ms: u32,
    /// Signal is currently above threshold (rising edge seen, falling
    /// edge pending).
    spike_up: bool,
    /// Completion timestamps of the most recent spikes, oldest first.
    window: Deque<u32, SPIKE_WINDOW_CAP>,
}

impl TriggerDetector {
    /// `required_spikes` is clamped to `1..=SPIKE_WINDOW_CAP`.
    pub fn new(threshold: u16, required_spikes: u8, timeframe_ms: u32) -> Self {
        Self {
            threshold,
            required_spikes: usize::from(required_spikes).clamp(1, SPIKE_WINDOW_CAP),
            timeframe_ms,
            spike_up: false,
            window: Deque::new(),
        }
    }

    /// Feed one analog sample.  Returns `true` exactly on the call where
    /// a qualifying gesture completes.
    ///
    /// Comparisons are strict on both edges: a sample equal to the
    /// threshold neither opens nor closes a spike.
    pub fn poll(&mut self, sample: u16, now_ms: u32) -> bool {
        if !self.spike_up {
            if sample > self.threshold {
                self.spike_up = true;
            }
            return false;
        }

        if sample >= self.threshold {
            return false; // still ringing
        }

        // Falling edge — one complete spike.
        self.spike_up = false;
        if self.window.len() == self.required_spikes {
            self.window.pop_front();
        }
        // Cannot fail: the pop above guarantees a free slot.
        let _ = self.window.push_back(now_ms);
        debug!(
            "spike complete at {}ms ({}/{} in window)",
            now_ms,
            self.window.len(),
            self.required_spikes
        );

        // No trigger until the window holds the full count of real
        // spikes; a zero-primed window would fire spuriously right
        // after boot.
        if self.window.len() < self.required_spikes {
            return false;
        }
        match (self.window.front(), self.window.back()) {
            (Some(&oldest), Some(&newest)) => newest.wrapping_sub(oldest) < self.timeframe_ms,
            _ => false,
        }
    }

    /// Span of the current window in milliseconds, if full.
    pub fn window_span_ms(&self) -> Option<u32> {
        if self.window.len() < self.required_spikes {
            return None;
        }
        match (self.window.front(), self.window.back()) {
            (Some(&oldest), Some(&newest)) => Some(newest.wrapping_sub(oldest)),
            _ => None,
        }
    }

    /// Discard all accumulated spikes and the in-flight edge.
    pub fn reset(&mut self) {
        self.spike_up = false;
        self.window.clear();
    }
}

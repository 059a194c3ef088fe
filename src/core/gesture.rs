//! In-flight scroll gestures.
//!
//! Every wheel notch becomes a [`Gesture`]: a total displacement plus the
//! number of timer ticks it still has to play out.  Rapid input piles up
//! several concurrent gestures whose per-tick contributions simply sum, which
//! is what makes fast scrolling feel continuous instead of stuttery.

use std::collections::VecDeque;

use super::easing::EasingMode;

/// One queued wheel gesture.
///
/// `steps_total` is frozen at creation time from the configuration in effect
/// when the input arrived — reconfiguring tick rate or duration mid-flight
/// only affects gestures created afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Gesture {
    /// Total displacement this gesture contributes over its lifetime.
    pub delta: f64,
    /// Ticks remaining; the gesture is retired when this reaches zero.
    pub steps_left: u32,
    /// Tick count the gesture was created with.
    pub steps_total: u32,
}

/// FIFO of in-flight gestures, insertion order = arrival order.
///
/// All counters decrement in lockstep, so gestures always finish in arrival
/// order and retirement only ever happens at the front.
#[derive(Debug, Default)]
pub struct GestureQueue {
    gestures: VecDeque<Gesture>,
}

impl GestureQueue {
    pub fn push(&mut self, delta: f64, steps_total: u32) {
        // A gesture must survive at least one tick.
        let steps_total = steps_total.max(1);
        self.gestures.push_back(Gesture {
            delta,
            steps_left: steps_total,
            steps_total,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    /// Play one tick: sum every gesture's contribution under `mode`, consume
    /// one step from each, and retire the ones that finished.
    ///
    /// The pass mutates in place over a stable deque and pops exhausted
    /// gestures from the front afterwards, so no removal happens while
    /// iterating.
    pub fn advance(&mut self, mode: EasingMode) -> f64 {
        let mut total = 0.0;
        for g in &mut self.gestures {
            total += mode.sub_delta(g.delta, g.steps_left, g.steps_total);
            g.steps_left -= 1;
        }
        while self.gestures.front().is_some_and(|g| g.steps_left == 0) {
            self.gestures.pop_front();
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retires_after_exactly_steps_total_ticks() {
        let mut q = GestureQueue::default();
        q.push(10.0, 4);
        for tick in 0..4 {
            assert!(!q.is_empty(), "drained early at tick {tick}");
            q.advance(EasingMode::Constant);
        }
        assert!(q.is_empty());
    }

    #[test]
    fn overlapping_gestures_sum_their_contributions() {
        let mode = EasingMode::Cosine;

        // Reference: two standalone gestures, the second offset by two ticks.
        let mut a = GestureQueue::default();
        a.push(100.0, 8);
        let mut b = GestureQueue::default();
        let mut expected = Vec::new();
        for tick in 0..10 {
            if tick == 2 {
                b.push(-30.0, 8);
            }
            expected.push(a.advance(mode) + b.advance(mode));
        }

        // Combined queue must reproduce the per-tick sums exactly.
        let mut q = GestureQueue::default();
        q.push(100.0, 8);
        for (tick, want) in expected.iter().enumerate() {
            if tick == 2 {
                q.push(-30.0, 8);
            }
            let got = q.advance(mode);
            assert!((got - want).abs() < 1e-12, "tick {tick}: {got} != {want}");
        }
        assert!(q.is_empty());
    }

    #[test]
    fn zero_steps_is_clamped_to_one() {
        let mut q = GestureQueue::default();
        q.push(5.0, 0);
        let total = q.advance(EasingMode::Constant);
        assert!((total - 5.0).abs() < 1e-12);
        assert!(q.is_empty());
    }

    #[test]
    fn per_gesture_steps_total_is_independent() {
        let mut q = GestureQueue::default();
        q.push(10.0, 2);
        q.push(10.0, 6);
        q.advance(EasingMode::Constant);
        q.advance(EasingMode::Constant);
        // First gesture exhausted, second has four ticks left.
        assert_eq!(q.len(), 1);
        for _ in 0..4 {
            assert!(!q.is_empty());
            q.advance(EasingMode::Constant);
        }
        assert!(q.is_empty());
    }
}

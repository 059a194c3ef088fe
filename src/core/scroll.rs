//! The animated scroll controller.
//!
//! Wheel input does not move the view directly.  Each notch is turned into a
//! [`Gesture`](super::gesture::Gesture) and played back over a fixed number
//! of timer ticks; every tick the controller sums the per-gesture easing
//! contributions and hands the view one combined, integer scroll step.
//!
//! The controller is deliberately blind to the toolkit: input arrives as
//! [`WheelEvent`] values and output leaves through the [`ScrollSink`] trait,
//! so the whole engine is unit-testable without a terminal.

use std::str::FromStr;
use std::time::Duration;

use super::easing::EasingMode;
use super::gesture::GestureQueue;
use super::history::InputHistory;

// ───────────────────────────────────────── input model ───────

/// Scroll axis of an event or synthesized step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Modifier key that can be bound to a step ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelModifier {
    Shift,
    Alt,
    Control,
}

impl WheelModifier {
    pub const ALL: &[WheelModifier] = &[
        WheelModifier::Shift,
        WheelModifier::Alt,
        WheelModifier::Control,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WheelModifier::Shift => "Shift",
            WheelModifier::Alt => "Alt",
            WheelModifier::Control => "Ctrl",
        }
    }

    pub fn config_key(self) -> &'static str {
        match self {
            WheelModifier::Shift => "shift",
            WheelModifier::Alt => "alt",
            WheelModifier::Control => "ctrl",
        }
    }
}

/// An unknown modifier name in the config is a fatal configuration error.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown modifier `{0}` (expected shift, alt or ctrl)")]
pub struct ParseModifierError(String);

impl FromStr for WheelModifier {
    type Err = ParseModifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shift" => Ok(WheelModifier::Shift),
            "alt" => Ok(WheelModifier::Alt),
            "ctrl" | "control" => Ok(WheelModifier::Control),
            _ => Err(ParseModifierError(s.to_string())),
        }
    }
}

/// Which modifiers were held when an input event fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub shift: bool,
    pub alt: bool,
    pub control: bool,
}

impl ModifierState {
    pub fn contains(self, modifier: WheelModifier) -> bool {
        match modifier {
            WheelModifier::Shift => self.shift,
            WheelModifier::Alt => self.alt,
            WheelModifier::Control => self.control,
        }
    }
}

/// One wheel notch (or synthetic paging gesture) as seen by the controller.
///
/// `delta` is in content rows/columns; positive scrolls toward the start of
/// the document (wheel away from the user).  `column`/`row` carry the pointer
/// position through to the synthesized steps.
#[derive(Debug, Clone, Copy)]
pub struct WheelEvent {
    pub delta: f64,
    pub orientation: Orientation,
    pub modifiers: ModifierState,
    pub column: u16,
    pub row: u16,
}

// ───────────────────────────────────────── output seam ───────

/// One combined scroll step synthesized at a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollStep {
    /// Rounded displacement; positive scrolls toward the document start.
    pub delta: i32,
    pub orientation: Orientation,
    pub column: u16,
    pub row: u16,
}

/// Whatever receives synthesized scroll steps — in this app the viewer state,
/// which routes the step to its vertical or horizontal offset.
pub trait ScrollSink {
    fn apply(&mut self, step: ScrollStep);
}

// ───────────────────────────────────────── configuration ─────

/// Animation parameters.  Plain value fields; the settings menu and config
/// file read and write them directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollConfig {
    pub mode: EasingMode,
    /// Timer ticks per second while animating.
    pub fps: u16,
    /// How long a single gesture plays out, in milliseconds.
    pub duration_ms: u64,
    /// Extra displacement per gesture under rapid input; 0 disables.
    pub acceleration: f64,
    /// Multiplier while the small-step modifier is held.
    pub small_step_ratio: f64,
    pub small_step_modifier: WheelModifier,
    /// Multiplier while the big-step modifier is held.
    pub big_step_ratio: f64,
    pub big_step_modifier: WheelModifier,
    /// Treat every wheel gesture as vertical while a step modifier is bound
    /// to Alt.  Terminals tend to map Alt+wheel to horizontal scrolling,
    /// which is rarely what a reader wants mid-document.
    pub force_vertical_on_alt: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            mode: EasingMode::Cosine,
            fps: 60,
            duration_ms: 400,
            acceleration: 2.5,
            small_step_ratio: 1.0 / 5.0,
            small_step_modifier: WheelModifier::Shift,
            big_step_ratio: 5.0,
            big_step_modifier: WheelModifier::Alt,
            force_vertical_on_alt: true,
        }
    }
}

impl ScrollConfig {
    /// Ticks a gesture created right now will play over.  Degenerate
    /// configurations (zero fps or duration) clamp to a single tick instead
    /// of dividing by zero downstream.
    pub fn steps_total(&self) -> u32 {
        (u64::from(self.fps) * self.duration_ms / 1000).max(1) as u32
    }

    /// Interval between animation ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis((1000 / u64::from(self.fps.max(1))).max(1))
    }
}

// ───────────────────────────────────────── controller ────────

/// How the controller disposed of a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelOutcome {
    /// Easing is off — the caller applies the raw event itself.
    Passthrough,
    /// A gesture was enqueued; the tick source must be running.
    Animated,
}

/// The animated scroll controller.
///
/// Owns the gesture queue, the rolling input history and the configuration.
/// The tick source itself (a periodic timer) lives with the caller; the
/// controller only reports when it must run via [`Self::is_running`].
#[derive(Debug, Default)]
pub struct ScrollController {
    config: ScrollConfig,
    history: InputHistory,
    queue: GestureQueue,
    /// Orientation/position of the most recent input, used when synthesizing
    /// tick steps.
    last_event: Option<WheelEvent>,
    /// Tick-source state: ON while gestures are in flight.
    running: bool,
    /// Sub-row remainder per axis.  A terminal cell is a coarse unit; the
    /// fractional part of each synthesized step is carried into the next
    /// tick so slow gestures still add up to whole rows.
    carry_vertical: f64,
    carry_horizontal: f64,
}

impl ScrollController {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Reconfigure.  In-flight gestures keep the step count they were
    /// created with; only new gestures see the change.
    pub fn config_mut(&mut self) -> &mut ScrollConfig {
        &mut self.config
    }

    /// Whether the tick source must be running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of gestures currently in flight.
    pub fn in_flight(&self) -> usize {
        self.queue.len()
    }

    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }

    /// Feed one wheel event, timestamped in milliseconds from any monotonic
    /// origin.
    pub fn handle_wheel(&mut self, event: WheelEvent, now_ms: u64) -> WheelOutcome {
        if self.config.mode == EasingMode::None {
            return WheelOutcome::Passthrough;
        }

        self.history.record(now_ms);
        let accel_scale = self.history.scale();

        let mut multiplier = 1.0;
        if event.modifiers.contains(self.config.small_step_modifier) {
            multiplier *= self.config.small_step_ratio;
        }
        if event.modifiers.contains(self.config.big_step_modifier) {
            multiplier *= self.config.big_step_ratio;
        }

        let mut delta = event.delta * multiplier;
        if self.config.acceleration > 0.0 {
            delta += delta * self.config.acceleration * accel_scale;
        }

        let steps_total = self.config.steps_total();
        self.queue.push(delta, steps_total);
        self.last_event = Some(event);

        if !self.running {
            self.running = true;
            tracing::debug!(delta, steps_total, recent = self.history.len(), "tick source on");
        }
        WheelOutcome::Animated
    }

    /// Play one animation tick: synthesize a combined step and dispatch it
    /// to `sink`.  Returns `false` once the queue has drained and the tick
    /// source should stop.
    pub fn tick(&mut self, sink: &mut impl ScrollSink) -> bool {
        let total = self.queue.advance(self.config.mode);

        if let Some(last) = self.last_event {
            let orientation = self.resolve_orientation(last.orientation);
            let carry = match orientation {
                Orientation::Vertical => &mut self.carry_vertical,
                Orientation::Horizontal => &mut self.carry_horizontal,
            };
            let exact = total + *carry;
            let delta = exact.round() as i32;
            *carry = exact - f64::from(delta);

            sink.apply(ScrollStep {
                delta,
                orientation,
                column: last.column,
                row: last.row,
            });
        }

        if self.queue.is_empty() && self.running {
            self.running = false;
            self.carry_vertical = 0.0;
            self.carry_horizontal = 0.0;
            tracing::debug!("tick source off");
        }
        self.running
    }

    /// The axis a synthesized step goes to.  When a step modifier is bound
    /// to Alt and the policy flag is set, everything scrolls vertically —
    /// see [`ScrollConfig::force_vertical_on_alt`].
    fn resolve_orientation(&self, event_orientation: Orientation) -> Orientation {
        let alt_bound = self.config.small_step_modifier == WheelModifier::Alt
            || self.config.big_step_modifier == WheelModifier::Alt;
        if self.config.force_vertical_on_alt && alt_bound {
            Orientation::Vertical
        } else {
            event_orientation
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        steps: Vec<ScrollStep>,
    }

    impl ScrollSink for RecordingSink {
        fn apply(&mut self, step: ScrollStep) {
            self.steps.push(step);
        }
    }

    impl RecordingSink {
        fn total(&self, orientation: Orientation) -> i32 {
            self.steps
                .iter()
                .filter(|s| s.orientation == orientation)
                .map(|s| s.delta)
                .sum()
        }
    }

    fn wheel(delta: f64) -> WheelEvent {
        WheelEvent {
            delta,
            orientation: Orientation::Vertical,
            modifiers: ModifierState::default(),
            column: 4,
            row: 7,
        }
    }

    fn quiet_config() -> ScrollConfig {
        // Acceleration off so dispatched totals are easy to predict.
        ScrollConfig {
            acceleration: 0.0,
            ..ScrollConfig::default()
        }
    }

    /// Drive the controller until the tick source reports off; panics if it
    /// never stops (runaway animation).
    fn drain(controller: &mut ScrollController, sink: &mut RecordingSink) -> usize {
        let mut ticks = 0;
        while controller.is_running() {
            ticks += 1;
            assert!(ticks < 10_000, "tick source never stopped");
            if !controller.tick(sink) {
                break;
            }
        }
        ticks
    }

    #[test]
    fn passthrough_when_easing_is_off() {
        let mut c = ScrollController::new(ScrollConfig {
            mode: EasingMode::None,
            ..quiet_config()
        });
        assert_eq!(c.handle_wheel(wheel(3.0), 0), WheelOutcome::Passthrough);
        assert!(!c.is_running());
        assert_eq!(c.in_flight(), 0);
    }

    #[test]
    fn dispatched_steps_sum_to_the_gesture_total() {
        for mode in [
            EasingMode::Constant,
            EasingMode::Linear,
            EasingMode::Quadratic,
            EasingMode::Cosine,
        ] {
            let mut c = ScrollController::new(ScrollConfig {
                mode,
                ..quiet_config()
            });
            let mut sink = RecordingSink::default();
            c.handle_wheel(wheel(3.0), 0);
            drain(&mut c, &mut sink);
            // The sub-row carry keeps integer steps honest: 3 lines spread
            // over 24 ticks still arrive as 3 lines.
            assert_eq!(sink.total(Orientation::Vertical), 3, "{mode:?}");
        }
    }

    #[test]
    fn tick_source_stops_exactly_when_the_last_gesture_drains() {
        let mut c = ScrollController::new(quiet_config());
        let mut sink = RecordingSink::default();
        c.handle_wheel(wheel(10.0), 0);
        let steps_total = c.config().steps_total();

        let ticks = drain(&mut c, &mut sink) as u32;
        assert_eq!(ticks, steps_total);
        assert!(!c.is_running());

        // Stays off until the next event.
        assert!(!c.tick(&mut sink));
        assert!(!c.is_running());
        assert_eq!(
            c.handle_wheel(wheel(1.0), 1_000),
            WheelOutcome::Animated
        );
        assert!(c.is_running());
    }

    #[test]
    fn step_modifiers_combine_multiplicatively() {
        let mut c = ScrollController::new(ScrollConfig {
            mode: EasingMode::Constant,
            small_step_ratio: 0.5,
            big_step_ratio: 4.0,
            force_vertical_on_alt: false,
            ..quiet_config()
        });
        let mut sink = RecordingSink::default();
        let mut event = wheel(10.0);
        event.modifiers = ModifierState {
            shift: true,
            alt: true,
            control: false,
        };
        c.handle_wheel(event, 0);
        drain(&mut c, &mut sink);
        // 10 × 0.5 × 4.0 = 20
        assert_eq!(sink.total(Orientation::Vertical), 20);
    }

    #[test]
    fn acceleration_scales_with_input_frequency() {
        let config = ScrollConfig {
            mode: EasingMode::Constant,
            acceleration: 2.5,
            ..ScrollConfig::default()
        };

        // Single lonely event: history holds one stamp, scale = 1/15.
        let mut c = ScrollController::new(config);
        let mut sink = RecordingSink::default();
        c.handle_wheel(wheel(30.0), 0);
        drain(&mut c, &mut sink);
        let expected: f64 = 30.0 * (1.0 + 2.5 * (1.0 / 15.0));
        assert_eq!(sink.total(Orientation::Vertical), expected.round() as i32);

        // A 20-event burst saturates the scale at 1.0.
        let mut c = ScrollController::new(config);
        let mut sink = RecordingSink::default();
        for i in 0..19 {
            c.handle_wheel(wheel(0.0), i * 10);
        }
        c.handle_wheel(wheel(30.0), 190);
        drain(&mut c, &mut sink);
        let expected: f64 = 30.0 * (1.0 + 2.5);
        assert_eq!(sink.total(Orientation::Vertical), expected.round() as i32);
    }

    #[test]
    fn overlapping_gestures_combine_per_tick() {
        let config = ScrollConfig {
            mode: EasingMode::Cosine,
            ..quiet_config()
        };

        // Two gestures four ticks apart, recorded together.
        let mut c = ScrollController::new(config);
        let mut combined = RecordingSink::default();
        c.handle_wheel(wheel(12.0), 0);
        for _ in 0..4 {
            c.tick(&mut combined);
        }
        c.handle_wheel(wheel(12.0), 100);
        drain(&mut c, &mut combined);

        assert_eq!(combined.total(Orientation::Vertical), 24);
    }

    #[test]
    fn steps_total_is_captured_per_gesture() {
        let mut c = ScrollController::new(ScrollConfig {
            mode: EasingMode::Constant,
            fps: 10,
            duration_ms: 1000,
            ..quiet_config()
        });
        let mut sink = RecordingSink::default();
        c.handle_wheel(wheel(10.0), 0);
        // Shrink the animation drastically mid-flight.
        c.config_mut().fps = 1;
        c.config_mut().duration_ms = 1;
        c.handle_wheel(wheel(10.0), 50);

        // First gesture still plays its original 10 ticks; the second gets
        // the clamped single tick.
        let ticks = drain(&mut c, &mut sink);
        assert_eq!(ticks, 10);
        assert_eq!(sink.total(Orientation::Vertical), 20);
    }

    #[test]
    fn degenerate_config_still_animates_one_tick() {
        let mut c = ScrollController::new(ScrollConfig {
            mode: EasingMode::Constant,
            fps: 0,
            duration_ms: 0,
            ..quiet_config()
        });
        assert_eq!(c.config().steps_total(), 1);
        let mut sink = RecordingSink::default();
        c.handle_wheel(wheel(5.0), 0);
        assert_eq!(drain(&mut c, &mut sink), 1);
        assert_eq!(sink.total(Orientation::Vertical), 5);
    }

    #[test]
    fn alt_binding_forces_vertical_orientation() {
        let mut event = wheel(8.0);
        event.orientation = Orientation::Horizontal;

        let mut c = ScrollController::new(ScrollConfig {
            mode: EasingMode::Constant,
            ..quiet_config()
        });
        let mut sink = RecordingSink::default();
        c.handle_wheel(event, 0);
        drain(&mut c, &mut sink);
        // Default config binds big-step to Alt, so the policy kicks in.
        assert_eq!(sink.total(Orientation::Vertical), 8);
        assert_eq!(sink.total(Orientation::Horizontal), 0);

        // Policy off: the event's own orientation survives.
        let mut c = ScrollController::new(ScrollConfig {
            mode: EasingMode::Constant,
            force_vertical_on_alt: false,
            ..quiet_config()
        });
        let mut sink = RecordingSink::default();
        c.handle_wheel(event, 0);
        drain(&mut c, &mut sink);
        assert_eq!(sink.total(Orientation::Horizontal), 8);
    }

    #[test]
    fn carry_resets_between_animations() {
        let mut c = ScrollController::new(ScrollConfig {
            mode: EasingMode::Constant,
            fps: 4,
            duration_ms: 1000,
            ..quiet_config()
        });
        let mut sink = RecordingSink::default();
        // 1.5 lines over 4 ticks: rounds to 2 with the carry.
        c.handle_wheel(wheel(1.5), 0);
        drain(&mut c, &mut sink);
        assert_eq!(sink.total(Orientation::Vertical), 2);

        // Same gesture again: identical result, no leftover fraction.
        let mut sink = RecordingSink::default();
        c.handle_wheel(wheel(1.5), 2_000);
        drain(&mut c, &mut sink);
        assert_eq!(sink.total(Orientation::Vertical), 2);
    }
}

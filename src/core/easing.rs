//! Easing curves for animated scrolling.
//!
//! A wheel gesture is played back over a fixed number of timer ticks.  The
//! curve decides how much of the gesture's total displacement each tick
//! contributes: `sub_delta` returns one tick's share, and the shares summed
//! over the whole gesture add back up to the original delta.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// How a gesture's displacement is distributed across its ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EasingMode {
    /// No animation — wheel input is applied directly, never queued.
    None,
    /// Uniform velocity: every tick moves the same amount.
    Constant,
    /// Symmetric ramp up to the midpoint and back down.
    Linear,
    /// Parabolic arc — velocity concentrated around the midpoint.
    Quadratic,
    /// Half-cosine bell — the softest start and stop.
    #[default]
    Cosine,
}

impl EasingMode {
    /// Ordered list of all modes (used by the settings menu cycle).
    pub const ALL: &[EasingMode] = &[
        EasingMode::None,
        EasingMode::Constant,
        EasingMode::Linear,
        EasingMode::Quadratic,
        EasingMode::Cosine,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            EasingMode::None => "Off",
            EasingMode::Constant => "Constant",
            EasingMode::Linear => "Linear",
            EasingMode::Quadratic => "Quadratic",
            EasingMode::Cosine => "Cosine",
        }
    }

    /// Key used in the config file and on the command line.
    pub fn config_key(self) -> &'static str {
        match self {
            EasingMode::None => "none",
            EasingMode::Constant => "constant",
            EasingMode::Linear => "linear",
            EasingMode::Quadratic => "quadratic",
            EasingMode::Cosine => "cosine",
        }
    }

    /// The displacement contributed by one tick of a gesture.
    ///
    /// `steps_left` is the counter *before* this tick is consumed, so the
    /// first call of a gesture sees `steps_left == steps_total`.  Let
    /// `m = steps_total / 2`; then `x = |steps_total - steps_left - m|` is
    /// the tick's distance from the gesture's temporal midpoint, and each
    /// curve below integrates to ≈ `delta` over the full tick range.
    pub fn sub_delta(self, delta: f64, steps_left: u32, steps_total: u32) -> f64 {
        let total = f64::from(steps_total);
        let m = total / 2.0;
        let x = (total - f64::from(steps_left) - m).abs();

        match self {
            // Raw input bypasses the queue entirely; a gesture with this
            // mode can't exist, so contribute nothing.
            EasingMode::None => 0.0,
            EasingMode::Constant => delta / total,
            EasingMode::Linear => 2.0 * delta / total * (m - x) / m,
            EasingMode::Quadratic => 3.0 / 4.0 / m * (1.0 - x * x / m / m) * delta,
            EasingMode::Cosine => (f64::cos(x * PI / m) + 1.0) / (2.0 * m) * delta,
        }
    }
}

impl fmt::Display for EasingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// An easing mode name that matches nothing — this is a fatal configuration
/// error, not something to silently paper over.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown easing mode `{0}` (expected none, constant, linear, quadratic or cosine)")]
pub struct ParseEasingModeError(String);

impl FromStr for EasingMode {
    type Err = ParseEasingModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EasingMode::ALL
            .iter()
            .copied()
            .find(|m| m.config_key() == s.trim().to_lowercase())
            .ok_or_else(|| ParseEasingModeError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every per-tick contribution of a whole gesture, in playback order.
    fn contributions(mode: EasingMode, delta: f64, steps_total: u32) -> Vec<f64> {
        (0..steps_total)
            .map(|k| mode.sub_delta(delta, steps_total - k, steps_total))
            .collect()
    }

    #[test]
    fn contributions_sum_to_delta() {
        for mode in [
            EasingMode::Constant,
            EasingMode::Linear,
            EasingMode::Quadratic,
            EasingMode::Cosine,
        ] {
            for steps in [24, 25, 60] {
                for delta in [120.0, -42.5] {
                    let sum: f64 = contributions(mode, delta, steps).iter().sum();
                    assert!(
                        (sum - delta).abs() <= 0.02 * delta.abs(),
                        "{mode:?} steps={steps} delta={delta}: sum={sum}"
                    );
                }
            }
        }
    }

    #[test]
    fn constant_is_uniform() {
        let c = contributions(EasingMode::Constant, 90.0, 30);
        for v in &c {
            assert!((v - c[0]).abs() < 1e-12);
        }
    }

    #[test]
    fn bell_curves_peak_at_midpoint() {
        for mode in [EasingMode::Quadratic, EasingMode::Cosine] {
            let c = contributions(mode, 100.0, 24);
            let mid = 12;
            assert!(
                c.iter().all(|&v| v <= c[mid] + 1e-9),
                "{mode:?}: midpoint is not maximal"
            );
            for i in 0..mid {
                assert!(c[i] <= c[i + 1] + 1e-9, "{mode:?} not rising at {i}");
            }
            for i in mid..c.len() - 1 {
                assert!(c[i] + 1e-9 >= c[i + 1], "{mode:?} not falling at {i}");
            }
        }
    }

    #[test]
    fn linear_ramps_symmetrically() {
        let c = contributions(EasingMode::Linear, 100.0, 24);
        // First tick sits at the far edge of the ramp and contributes zero.
        assert!(c[0].abs() < 1e-12);
        for i in 0..c.len() {
            let mirror = c.len() - i;
            if mirror < c.len() {
                // c[k] pairs with c[N-k]: both sit at distance |k - m| from
                // the midpoint.
                assert!((c[i] - c[mirror]).abs() < 1e-9, "asymmetric at {i}");
            }
        }
    }

    #[test]
    fn parses_config_keys() {
        for mode in EasingMode::ALL {
            assert_eq!(mode.config_key().parse::<EasingMode>().unwrap(), *mode);
        }
        assert_eq!(" Cosine ".parse::<EasingMode>().unwrap(), EasingMode::Cosine);
        assert!("bounce".parse::<EasingMode>().is_err());
    }
}

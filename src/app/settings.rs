//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.
//! Every mutation copies the new values into the live controller and saves
//! the config file; gestures already in flight are unaffected.

use super::state::{ActiveView, AppState};
use crate::core::easing::EasingMode;
use crate::core::scroll::WheelModifier;

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Opens a submenu.
    Submenu {
        label: &'static str,
        view: ActiveView,
    },
    /// Boolean toggle — reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submenu { label, .. }
            | Self::Toggle { label, .. }
            | Self::Cycle { label, .. } => label,
        }
    }
}

/// Pick the entry after `current` in `values`, wrapping around.  Falls back
/// to `values[0]` when the current value was set to something off-list via
/// the config file.
fn next_in<T: PartialEq + Copy>(values: &[T], current: T) -> T {
    let idx = values.iter().position(|v| *v == current);
    match idx {
        Some(i) => values[(i + 1) % values.len()],
        None => values[0],
    }
}

fn next_modifier(current: WheelModifier) -> WheelModifier {
    next_in(WheelModifier::ALL, current)
}

/// Commit a scroll-settings change: sync the controller and persist.
fn commit(state: &mut AppState) {
    state.apply_scroll_config();
    let _ = state.config.save();
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Submenu {
        label: "Controls",
        view: ActiveView::ControlsSubmenu,
    },
    SettingsItem::Cycle {
        label: "Easing",
        value: |s| s.config.scroll.mode.label().to_string(),
        cycle: |s| {
            s.config.scroll.mode = next_in(EasingMode::ALL, s.config.scroll.mode);
            commit(s);
            s.status_message = Some(format!("Easing: {}", s.config.scroll.mode.label()));
        },
    },
    SettingsItem::Cycle {
        label: "Tick Rate",
        value: |s| format!("{} fps", s.config.scroll.fps),
        cycle: |s| {
            const RATES: &[u16] = &[30, 45, 60, 90, 120];
            s.config.scroll.fps = next_in(RATES, s.config.scroll.fps);
            commit(s);
            s.status_message = Some(format!("Tick rate: {} fps", s.config.scroll.fps));
        },
    },
    SettingsItem::Cycle {
        label: "Duration",
        value: |s| format!("{}ms", s.config.scroll.duration_ms),
        cycle: |s| {
            const DURATIONS: &[u64] = &[150, 250, 400, 600, 800];
            s.config.scroll.duration_ms = next_in(DURATIONS, s.config.scroll.duration_ms);
            commit(s);
            s.status_message = Some(format!("Duration: {}ms", s.config.scroll.duration_ms));
        },
    },
    SettingsItem::Cycle {
        label: "Acceleration",
        value: |s| format!("{:.1}", s.config.scroll.acceleration),
        cycle: |s| {
            const STRENGTHS: &[f64] = &[0.0, 1.0, 2.5, 4.0];
            s.config.scroll.acceleration = next_in(STRENGTHS, s.config.scroll.acceleration);
            commit(s);
            s.status_message = Some(format!(
                "Acceleration: {:.1}",
                s.config.scroll.acceleration
            ));
        },
    },
    SettingsItem::Cycle {
        label: "Wheel Step",
        value: |s| format!("{} lines", s.config.wheel_step),
        cycle: |s| {
            const STEPS: &[f64] = &[1.0, 2.0, 3.0, 5.0, 8.0];
            s.config.wheel_step = next_in(STEPS, s.config.wheel_step);
            let _ = s.config.save();
            s.status_message = Some(format!("Wheel step: {} lines", s.config.wheel_step));
        },
    },
    SettingsItem::Cycle {
        label: "Small Step Ratio",
        value: |s| format!("×{}", s.config.scroll.small_step_ratio),
        cycle: |s| {
            const RATIOS: &[f64] = &[0.1, 0.2, 0.333, 0.5];
            s.config.scroll.small_step_ratio = next_in(RATIOS, s.config.scroll.small_step_ratio);
            commit(s);
        },
    },
    SettingsItem::Cycle {
        label: "Small Step Key",
        value: |s| s.config.scroll.small_step_modifier.label().to_string(),
        cycle: |s| {
            s.config.scroll.small_step_modifier =
                next_modifier(s.config.scroll.small_step_modifier);
            commit(s);
        },
    },
    SettingsItem::Cycle {
        label: "Big Step Ratio",
        value: |s| format!("×{}", s.config.scroll.big_step_ratio),
        cycle: |s| {
            const RATIOS: &[f64] = &[2.0, 3.0, 5.0, 8.0];
            s.config.scroll.big_step_ratio = next_in(RATIOS, s.config.scroll.big_step_ratio);
            commit(s);
        },
    },
    SettingsItem::Cycle {
        label: "Big Step Key",
        value: |s| s.config.scroll.big_step_modifier.label().to_string(),
        cycle: |s| {
            s.config.scroll.big_step_modifier =
                next_modifier(s.config.scroll.big_step_modifier);
            commit(s);
        },
    },
    SettingsItem::Toggle {
        label: "Force Vertical on Alt",
        get: |s| s.config.scroll.force_vertical_on_alt,
        set: |s, v| {
            s.config.scroll.force_vertical_on_alt = v;
            commit(s);
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_wrap_and_recover_from_off_list_values() {
        assert_eq!(next_in(&[1, 2, 3], 2), 3);
        assert_eq!(next_in(&[1, 2, 3], 3), 1);
        // A config-file value outside the preset list snaps to the first.
        assert_eq!(next_in(&[1, 2, 3], 42), 1);
    }
}

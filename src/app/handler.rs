//! Input handling — maps key/mouse events to state mutations.
//!
//! Wheel input (and page-sized key motions) go through the animated scroll
//! controller; single-line key motions move the view directly.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::config::{Action, KeyBind};
use crate::core::scroll::{
    ModifierState, Orientation, ScrollSink, ScrollStep, WheelEvent, WheelOutcome,
};

use super::settings::{SettingsItem, SETTINGS_ITEMS};
use super::state::{ActiveView, AppState};

/// Columns a single left/right key press moves the view.
const COLUMN_STEP: i64 = 4;

/// Total selectable rows in the controls submenu (actions + "Reset").
pub fn controls_item_count() -> usize {
    Action::ALL.len() + 1
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Viewer => handle_viewer_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
        ActiveView::ControlsSubmenu => {
            if state.awaiting_rebind {
                handle_rebind_key(state, key);
            } else {
                handle_controls_key(state, key);
            }
        }
    }
}

// ── Viewer (configurable bindings) ──────────────────────────────

fn handle_viewer_key(state: &mut AppState, key: KeyEvent) {
    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        // Fine motions are applied directly — animating a single row adds
        // latency without adding any glide.
        Action::LineUp => state.view.scroll_rows(-1),
        Action::LineDown => state.view.scroll_rows(1),
        Action::ColumnLeft => state.view.scroll_columns(-COLUMN_STEP),
        Action::ColumnRight => state.view.scroll_columns(COLUMN_STEP),
        // Page-sized motions ride the same animation path as the wheel.
        Action::HalfPageUp => {
            let rows = state.view.page_rows() as f64 / 2.0;
            enqueue_key_gesture(state, rows);
        }
        Action::HalfPageDown => {
            let rows = state.view.page_rows() as f64 / 2.0;
            enqueue_key_gesture(state, -rows);
        }
        Action::PageUp => {
            let rows = state.view.page_rows() as f64;
            enqueue_key_gesture(state, rows);
        }
        Action::PageDown => {
            let rows = state.view.page_rows() as f64;
            enqueue_key_gesture(state, -rows);
        }
        Action::JumpTop => state.view.jump_top(),
        Action::JumpBottom => state.view.jump_bottom(),
    }
}

/// Route a key-driven motion through the controller as a synthetic vertical
/// gesture.  Positive rows scroll toward the document start.
fn enqueue_key_gesture(state: &mut AppState, rows: f64) {
    let event = WheelEvent {
        delta: rows,
        orientation: Orientation::Vertical,
        modifiers: ModifierState::default(),
        column: 0,
        row: 0,
    };
    dispatch_wheel(state, event);
}

// ── Settings menu (hardcoded keys) ──────────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Viewer;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected < SETTINGS_ITEMS.len() - 1 {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                match item {
                    SettingsItem::Submenu { view, .. } => {
                        state.active_view = *view;
                        state.controls_selected = 0;
                    }
                    SettingsItem::Toggle { get, set, .. } => {
                        let current = get(state);
                        set(state, !current);
                    }
                    SettingsItem::Cycle { cycle, .. } => {
                        cycle(state);
                    }
                }
            }
        }
        _ => {}
    }
}

// ── Controls submenu (hardcoded navigation, interactive rebinding) ──

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    let item_count = controls_item_count();

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.active_view = ActiveView::Viewer;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.active_view = ActiveView::SettingsMenu;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.controls_selected = state.controls_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.controls_selected < item_count - 1 {
                state.controls_selected += 1;
            }
        }
        KeyCode::Enter => {
            if state.controls_selected < Action::ALL.len() {
                // Start rebinding the selected action.
                state.awaiting_rebind = true;
            } else {
                // "Reset to defaults" item.
                state.config.reset_defaults();
                let _ = state.config.save();
            }
        }
        KeyCode::Delete | KeyCode::Backspace => {
            // Clear all bindings for the selected action.
            if state.controls_selected < Action::ALL.len() {
                let action = Action::ALL[state.controls_selected];
                state.config.bindings.insert(action, Vec::new());
                let _ = state.config.save();
            }
        }
        _ => {}
    }
}

/// Capture the next key press as a new binding.
fn handle_rebind_key(state: &mut AppState, key: KeyEvent) {
    // Only process Press events (ignore Release/Repeat on supported terminals).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Esc cancels rebinding.
    if key.code == KeyCode::Esc {
        state.awaiting_rebind = false;
        return;
    }

    // Don't allow rebinding Ctrl+C (reserved for emergency quit).
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return;
    }

    let action = Action::ALL[state.controls_selected];
    let bind = KeyBind::from_key_event(key);
    state.config.add_binding(action, bind);
    let _ = state.config.save();
    state.awaiting_rebind = false;
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.  Wheel input only scrolls the viewer; overlays
/// are keyboard-driven.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Viewer {
        return;
    }

    // Sign convention: positive deltas scroll toward the document start.
    let (sign, orientation) = match mouse.kind {
        MouseEventKind::ScrollUp => (1.0, Orientation::Vertical),
        MouseEventKind::ScrollDown => (-1.0, Orientation::Vertical),
        MouseEventKind::ScrollLeft => (1.0, Orientation::Horizontal),
        MouseEventKind::ScrollRight => (-1.0, Orientation::Horizontal),
        _ => return,
    };

    let event = WheelEvent {
        delta: sign * state.config.wheel_step,
        orientation,
        modifiers: modifier_state(mouse.modifiers),
        column: mouse.column,
        row: mouse.row,
    };
    dispatch_wheel(state, event);
}

/// Hand a wheel event to the controller; when easing is off, apply the raw
/// delta to the view unmodified.
fn dispatch_wheel(state: &mut AppState, event: WheelEvent) {
    let now_ms = state.now_ms();
    match state.controller.handle_wheel(event, now_ms) {
        WheelOutcome::Animated => {}
        WheelOutcome::Passthrough => {
            state.view.apply(ScrollStep {
                delta: event.delta.round() as i32,
                orientation: event.orientation,
                column: event.column,
                row: event.row,
            });
        }
    }
}

fn modifier_state(modifiers: KeyModifiers) -> ModifierState {
    ModifierState {
        shift: modifiers.contains(KeyModifiers::SHIFT),
        alt: modifiers.contains(KeyModifiers::ALT),
        control: modifiers.contains(KeyModifiers::CONTROL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::doc::Document;
    use crate::core::easing::EasingMode;

    fn test_state(mode: EasingMode) -> AppState {
        let mut config = AppConfig::default();
        config.scroll.mode = mode;
        let text = (0..200).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        AppState::new(Document::from_text("test", &text), config)
    }

    fn wheel_down(modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 10,
            row: 5,
            modifiers,
        }
    }

    #[test]
    fn wheel_input_starts_the_animation() {
        let mut state = test_state(EasingMode::Cosine);
        assert!(!state.controller.is_running());
        handle_mouse(&mut state, wheel_down(KeyModifiers::NONE));
        assert!(state.controller.is_running());
        assert_eq!(state.controller.in_flight(), 1);
        // Nothing moves until the first tick fires.
        assert_eq!(state.view.v_offset, 0);
    }

    #[test]
    fn wheel_passthrough_when_easing_off() {
        let mut state = test_state(EasingMode::None);
        handle_mouse(&mut state, wheel_down(KeyModifiers::NONE));
        // No gesture, no tick source — the raw delta went straight to the
        // view (where it clamps against the not-yet-rendered viewport).
        assert!(!state.controller.is_running());
        assert_eq!(state.controller.in_flight(), 0);
    }

    #[test]
    fn overlays_swallow_wheel_input() {
        let mut state = test_state(EasingMode::Cosine);
        state.active_view = ActiveView::SettingsMenu;
        handle_mouse(&mut state, wheel_down(KeyModifiers::NONE));
        assert!(!state.controller.is_running());
    }

    #[test]
    fn quit_binding_sets_the_flag() {
        let mut state = test_state(EasingMode::Cosine);
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        handle_key(&mut state, key);
        assert!(state.should_quit);
    }

    #[test]
    fn half_page_keys_ride_the_animation() {
        let mut state = test_state(EasingMode::Cosine);
        let key = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        handle_key(&mut state, key);
        assert!(state.controller.is_running());
        assert_eq!(state.controller.in_flight(), 1);
    }
}

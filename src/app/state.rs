//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::time::Instant;

use crate::config::AppConfig;
use crate::core::doc::Document;
use crate::core::scroll::ScrollController;
use crate::ui::viewer::ViewerState;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Viewer,
    SettingsMenu,
    ControlsSubmenu,
}

/// Top-level application state.
pub struct AppState {
    /// The document being paged through.
    pub doc: Document,
    /// Widget-level state (scroll offsets); also the controller's sink.
    pub view: ViewerState,
    /// The animated scroll controller.
    pub controller: ScrollController,
    /// User configuration — animation parameters and keybindings.
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
    /// Currently highlighted item in the controls submenu.
    pub controls_selected: usize,
    /// When `true`, the controls submenu is waiting for the user to press
    /// a key to rebind the action at `controls_selected`.
    pub awaiting_rebind: bool,
    /// Timestamp origin for the controller's input history.
    epoch: Instant,
}

impl AppState {
    pub fn new(doc: Document, config: AppConfig) -> Self {
        Self {
            doc,
            view: ViewerState::default(),
            controller: ScrollController::new(config.scroll),
            config,
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            settings_selected: 0,
            controls_selected: 0,
            awaiting_rebind: false,
            epoch: Instant::now(),
        }
    }

    /// Milliseconds since the app started — the controller's clock.
    pub fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Push the persisted scroll settings into the live controller.
    /// Gestures already in flight keep the step count they started with.
    pub fn apply_scroll_config(&mut self) {
        *self.controller.config_mut() = self.config.scroll;
    }
}

//! User configuration — scroll animation settings, keybindings, persistence.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/glide/config.toml` (default `~/.config/glide/config.toml`).
//! Scroll settings with out-of-range values are clamped; an unrecognized
//! easing mode or modifier name is a hard error — a typo there would
//! silently change how every gesture feels.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::scroll::ScrollConfig;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    LineUp,
    LineDown,
    ColumnLeft,
    ColumnRight,
    HalfPageUp,
    HalfPageDown,
    PageUp,
    PageDown,
    JumpTop,
    JumpBottom,
    OpenSettings,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the controls menu).
    pub const ALL: &[Action] = &[
        Action::LineUp,
        Action::LineDown,
        Action::ColumnLeft,
        Action::ColumnRight,
        Action::HalfPageUp,
        Action::HalfPageDown,
        Action::PageUp,
        Action::PageDown,
        Action::JumpTop,
        Action::JumpBottom,
        Action::OpenSettings,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::LineUp => "Line Up",
            Action::LineDown => "Line Down",
            Action::ColumnLeft => "Column Left",
            Action::ColumnRight => "Column Right",
            Action::HalfPageUp => "Half Page Up",
            Action::HalfPageDown => "Half Page Down",
            Action::PageUp => "Page Up",
            Action::PageDown => "Page Down",
            Action::JumpTop => "Jump to Top",
            Action::JumpBottom => "Jump to Bottom",
            Action::OpenSettings => "Open Settings",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::LineUp => "line_up",
            Action::LineDown => "line_down",
            Action::ColumnLeft => "column_left",
            Action::ColumnRight => "column_right",
            Action::HalfPageUp => "half_page_up",
            Action::HalfPageDown => "half_page_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::JumpTop => "jump_top",
            Action::JumpBottom => "jump_bottom",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Named keys: crossterm code ↔ config-file name ↔ display glyph.
/// One table drives parsing, serialisation and on-screen display.
const KEY_NAMES: &[(KeyCode, &str, &str)] = &[
    (KeyCode::Up, "Up", "↑"),
    (KeyCode::Down, "Down", "↓"),
    (KeyCode::Left, "Left", "←"),
    (KeyCode::Right, "Right", "→"),
    (KeyCode::Enter, "Enter", "Enter"),
    (KeyCode::Esc, "Esc", "Esc"),
    (KeyCode::Tab, "Tab", "Tab"),
    (KeyCode::Backspace, "Backspace", "Bksp"),
    (KeyCode::Delete, "Delete", "Del"),
    (KeyCode::Home, "Home", "Home"),
    (KeyCode::End, "End", "End"),
    (KeyCode::PageUp, "PageUp", "PgUp"),
    (KeyCode::PageDown, "PageDown", "PgDn"),
    (KeyCode::Char(' '), "Space", "Space"),
];

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT are
    /// compared; platform-specific modifiers like SUPER are ignored.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Create a binding from a raw key event (used during rebinding).
    pub fn from_key_event(event: KeyEvent) -> Self {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        Self {
            code: event.code,
            modifiers: event.modifiers & mask,
        }
    }

    fn format(&self, display: bool) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        let named = KEY_NAMES.iter().find(|(code, _, _)| *code == self.code);
        match (named, self.code) {
            (Some((_, name, glyph)), _) => s.push_str(if display { glyph } else { name }),
            (None, KeyCode::Char(c)) => s.push(c),
            (None, KeyCode::F(n)) => s.push_str(&format!("F{n}")),
            (None, other) => s.push_str(&format!("{other:?}")),
        }
        s
    }

    /// User-friendly display string (e.g. `"Alt+↑"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        self.format(true)
    }

    /// Serialise to config-file format (e.g. `"Alt+Up"`, `"Ctrl+c"`).
    fn to_config_string(&self) -> String {
        self.format(false)
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let lowered = key_part.to_lowercase();
        let named = KEY_NAMES
            .iter()
            .find(|(_, name, _)| name.to_lowercase() == lowered);
        let code = match named {
            Some((code, _, _)) => *code,
            None if lowered.starts_with('f') && lowered.len() > 1 => {
                KeyCode::F(lowered[1..].parse().ok()?)
            }
            None if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            None => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration — animation settings plus keybindings.
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Animation parameters handed to the scroll controller.
    pub scroll: ScrollConfig,
    /// Content lines one wheel notch scrolls (before easing and ratios).
    pub wheel_step: f64,
}

impl AppConfig {
    /// Hard-coded default bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(LineUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(LineDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(ColumnLeft, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(ColumnRight, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(HalfPageUp, vec![KeyBind::new(Char('u'), KeyModifiers::CONTROL)]);
        m.insert(HalfPageDown, vec![KeyBind::new(Char('d'), KeyModifiers::CONTROL)]);
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n), KeyBind::new(Char('b'), n)]);
        m.insert(Action::PageDown, vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char(' '), n)]);
        m.insert(JumpTop, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(JumpBottom, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), KeyModifiers::SHIFT)]);
        m.insert(OpenSettings, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Add a binding for `action`, removing the key from any other action
    /// first to prevent conflicts.
    pub fn add_binding(&mut self, action: Action, bind: KeyBind) {
        for binds in self.bindings.values_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(action).or_default().push(bind);
    }

    /// Restore all bindings to the built-in defaults.
    pub fn reset_defaults(&mut self) {
        self.bindings = Self::default_bindings();
    }

    /// Format the binding list for a given action (e.g. `"↑/k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}: half page | {}: settings | {}: quit",
            self.short_binding(Action::LineUp),
            self.short_binding(Action::LineDown),
            self.short_binding(Action::HalfPageDown),
            self.short_binding(Action::OpenSettings),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk.  A missing file yields the defaults; a file
    /// with an unknown easing mode or modifier is an error.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse_config(&contents)
            .with_context(|| format!("parsing {}", path.display()))
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> anyhow::Result<Self> {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // Scroll settings.  Numeric values are clamped to sane ranges;
            // enum-like values must parse.
            let scroll = &mut config.scroll;
            match key {
                "easing" => {
                    scroll.mode = value.parse()?;
                    continue;
                }
                "fps" => {
                    if let Ok(v) = value.parse::<u16>() {
                        scroll.fps = v.clamp(1, 240);
                    }
                    continue;
                }
                "duration_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        scroll.duration_ms = v.clamp(16, 5_000);
                    }
                    continue;
                }
                "acceleration" => {
                    if let Ok(v) = value.parse::<f64>() {
                        scroll.acceleration = v.clamp(0.0, 10.0);
                    }
                    continue;
                }
                "small_step_ratio" => {
                    if let Ok(v) = value.parse::<f64>() {
                        scroll.small_step_ratio = v.clamp(0.01, 100.0);
                    }
                    continue;
                }
                "big_step_ratio" => {
                    if let Ok(v) = value.parse::<f64>() {
                        scroll.big_step_ratio = v.clamp(0.01, 100.0);
                    }
                    continue;
                }
                "small_step_modifier" => {
                    scroll.small_step_modifier = value.parse()?;
                    continue;
                }
                "big_step_modifier" => {
                    scroll.big_step_modifier = value.parse()?;
                    continue;
                }
                "force_vertical_on_alt" => {
                    scroll.force_vertical_on_alt = value == "true";
                    continue;
                }
                "wheel_step" => {
                    if let Ok(v) = value.parse::<f64>() {
                        config.wheel_step = v.clamp(1.0, 20.0);
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                if let Some(bind) = KeyBind::parse(part) {
                    parsed.push(bind);
                }
            }
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        Ok(config)
    }

    fn serialise(&self) -> String {
        let scroll = &self.scroll;
        let mut lines = vec![
            "# glide configuration".to_string(),
            String::new(),
            "# Scroll animation".to_string(),
            "# easing: none, constant, linear, quadratic, cosine".to_string(),
            format!("easing = {}", scroll.mode),
            format!("fps = {}", scroll.fps),
            format!("duration_ms = {}", scroll.duration_ms),
            format!("acceleration = {}", scroll.acceleration),
            format!("small_step_ratio = {}", scroll.small_step_ratio),
            format!("small_step_modifier = {}", scroll.small_step_modifier.config_key()),
            format!("big_step_ratio = {}", scroll.big_step_ratio),
            format!("big_step_modifier = {}", scroll.big_step_modifier.config_key()),
            format!("force_vertical_on_alt = {}", scroll.force_vertical_on_alt),
            format!("wheel_step = {}", self.wheel_step),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            scroll: ScrollConfig::default(),
            wheel_step: 3.0,
        }
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/glide/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("glide").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::easing::EasingMode;
    use crate::core::scroll::WheelModifier;

    #[test]
    fn serialised_config_parses_back() {
        let mut config = AppConfig::default();
        config.scroll.mode = EasingMode::Quadratic;
        config.scroll.fps = 30;
        config.scroll.big_step_modifier = WheelModifier::Control;
        config.wheel_step = 5.0;
        config.add_binding(Action::Quit, KeyBind::new(KeyCode::Char('x'), KeyModifiers::CONTROL));

        let parsed = AppConfig::parse_config(&config.serialise()).unwrap();
        assert_eq!(parsed.scroll, config.scroll);
        assert_eq!(parsed.wheel_step, 5.0);
        assert_eq!(parsed.bindings[&Action::Quit], config.bindings[&Action::Quit]);
    }

    #[test]
    fn unknown_easing_mode_is_fatal() {
        assert!(AppConfig::parse_config("easing = bounce").is_err());
        assert!(AppConfig::parse_config("small_step_modifier = hyper").is_err());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let parsed = AppConfig::parse_config("fps = 10000\nduration_ms = 1").unwrap();
        assert_eq!(parsed.scroll.fps, 240);
        assert_eq!(parsed.scroll.duration_ms, 16);
    }

    #[test]
    fn rebinding_steals_the_key_from_other_actions() {
        let mut config = AppConfig::default();
        let bind = KeyBind::new(KeyCode::Char('q'), KeyModifiers::NONE);
        config.add_binding(Action::LineDown, bind.clone());
        assert!(config.bindings[&Action::Quit].iter().all(|b| *b != bind));
        assert!(config.bindings[&Action::LineDown].contains(&bind));
    }

    #[test]
    fn key_strings_round_trip() {
        for s in ["q", "Ctrl+c", "Alt+Up", "Shift+PageDown", "F5", "Space"] {
            let bind = KeyBind::parse(s).unwrap();
            assert_eq!(bind.to_config_string(), s, "round trip of {s}");
        }
    }
}

//! A smooth-scrolling terminal pager.
//!
//! Run `glide <FILE>` to page through a file.  Wheel input doesn't jump the
//! view; it feeds an animation engine that plays each gesture out over a
//! configurable easing curve.  `?` opens the settings overlay.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::time::{interval_at, Instant as TokioInstant, Interval, MissedTickBehavior};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::config::AppConfig;
use crate::core::doc::Document;
use crate::core::easing::EasingMode;
use crate::ui::{layout::AppLayout, popup, theme::Theme, viewer::ViewerWidget};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Smooth-scrolling terminal pager")]
struct Cli {
    /// File to view.
    path: PathBuf,

    /// Easing curve: none, constant, linear, quadratic, cosine.
    #[arg(long)]
    easing: Option<EasingMode>,

    /// Animation ticks per second.
    #[arg(long)]
    fps: Option<u16>,

    /// Gesture duration in milliseconds.
    #[arg(long)]
    duration: Option<u64>,
}

// ───────────────────────────────────────── timer ─────────────

/// Create the animation timer: first tick one interval from now, matching a
/// freshly started periodic timer.
fn start_timer(state: &AppState) -> Interval {
    let period = state.controller.tick_interval();
    let mut timer = interval_at(TokioInstant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

/// Wait for the next animation tick, or forever while the timer is stopped.
async fn next_tick(timer: &mut Option<Interval>) {
    match timer.as_mut() {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending().await,
    }
}

// ───────────────────────────────────────── main ──────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    // ── load document & config ────────────────────────────────
    let doc = Document::open(&cli.path)
        .with_context(|| format!("opening {}", cli.path.display()))?;
    let mut config = AppConfig::load()?;
    if let Some(mode) = cli.easing {
        config.scroll.mode = mode;
    }
    if let Some(fps) = cli.fps {
        config.scroll.fps = fps.clamp(1, 240);
    }
    if let Some(ms) = cli.duration {
        config.scroll.duration_ms = ms.clamp(16, 5_000);
    }

    let mut state = AppState::new(doc, config);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader();
    // The tick source.  `None` while no gestures are in flight; created on
    // the first enqueue, dropped when the queue drains.
    let mut anim: Option<Interval> = None;

    // ── event loop ────────────────────────────────────────────
    loop {
        // Draw first so the UI reflects the latest state before we block.
        terminal.draw(|frame| draw(frame, &mut state))?;

        // Reconcile the timer with the controller's state machine: start it
        // when a gesture appeared, keep it untouched while already running.
        if state.controller.is_running() {
            if anim.is_none() {
                anim = Some(start_timer(&state));
            }
        } else {
            anim = None;
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(_, _) => {}
                }
            }

            _ = next_tick(&mut anim), if anim.is_some() => {
                // When the queue drains on this tick the controller reports
                // off and the reconcile above drops the timer.
                state.controller.tick(&mut state.view);
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

// ───────────────────────────────────────── rendering ─────────

fn draw(frame: &mut Frame, state: &mut AppState) {
    let layout = AppLayout::from_area(frame.area());

    let viewer_block = Block::default()
        .title(format!(" {} ", state.doc.name))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());

    let viewer = ViewerWidget::new(&state.doc).block(viewer_block);
    frame.render_stateful_widget(viewer, layout.viewer_area, &mut state.view);

    let hint = state.config.status_bar_hint();
    let status_text = match state.active_view {
        ActiveView::Viewer => state.status_message.as_deref().unwrap_or(&hint),
        ActiveView::SettingsMenu | ActiveView::ControlsSubmenu => "",
    };
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);

    let position = format!(
        "{} · {}% ",
        state.controller.config().mode.label(),
        state.view.percent()
    );
    let position = Paragraph::new(position)
        .style(Theme::status_bar_style().patch(Theme::position_style()))
        .right_aligned();
    frame.render_widget(position, layout.status_area);

    match state.active_view {
        ActiveView::SettingsMenu => {
            frame.render_widget(
                popup::SettingsPopup {
                    state,
                    selected: state.settings_selected,
                },
                frame.area(),
            );
        }
        ActiveView::ControlsSubmenu => {
            frame.render_widget(
                popup::ControlsPopup {
                    config: &state.config,
                    selected: state.controls_selected,
                    awaiting_rebind: state.awaiting_rebind,
                },
                frame.area(),
            );
        }
        ActiveView::Viewer => {}
    }
}

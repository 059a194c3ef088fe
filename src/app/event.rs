//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel, keeping the main select loop non-blocking.
//! Animation ticks are NOT events — they come from a separate timer owned by
//! the main loop, so input latency never depends on the animation rate.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// How long the reader blocks waiting for terminal input before rechecking
/// whether the receiver is still alive.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Spawns a background task that polls the terminal for events and sends
/// them through the returned channel.
pub fn spawn_event_reader() -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            if !event::poll(POLL_TIMEOUT).unwrap_or(false) {
                if tx.is_closed() {
                    break;
                }
                continue;
            }
            let Ok(ev) = event::read() else { continue };
            let app_event = match ev {
                CtEvent::Key(k) => AppEvent::Key(k),
                CtEvent::Mouse(m) => AppEvent::Mouse(m),
                CtEvent::Resize(w, h) => AppEvent::Resize(w, h),
                _ => continue,
            };
            if tx.send(app_event).is_err() {
                break; // receiver dropped
            }
        }
    });

    rx
}

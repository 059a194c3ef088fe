//! Core engine – easing curves, gesture playback, and the scroll controller.
//!
//! Nothing in this module depends on any TUI or rendering crate.  The
//! controller talks to the outside world through the [`scroll::ScrollSink`]
//! trait and plain event values, so everything here stays unit-testable
//! without a terminal.

pub mod doc;
pub mod easing;
pub mod gesture;
pub mod history;
pub mod scroll;

//! Core feed logic – deal records, time windows, pagination, countdowns.
//!
//! Nothing in this module depends on any TUI or rendering crate, and nothing
//! here performs I/O: fetching is injected by the `app` layer.

pub mod countdown;
pub mod deal;
pub mod time_window;
pub mod track;

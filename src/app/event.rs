//! Terminal event abstraction.
//!
//! A background task polls crossterm and forwards events over a channel, so
//! the main loop can `select!` between input and feed updates.  When nothing
//! happens within the tick interval a `Tick` is sent instead; ticks drive the
//! countdowns and the time-window rollover.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

impl AppEvent {
    /// Map a raw crossterm event.  Key releases and repeats (reported on
    /// some platforms) are dropped so one press is one action.
    fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(k) if k.kind == KeyEventKind::Press => Some(AppEvent::Key(k)),
            CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
            CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Spawns the reader task and returns the receiving end.
pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    // crossterm's poll/read block the thread, so keep them off the runtime's
    // worker pool.
    tokio::task::spawn_blocking(move || loop {
        let event = match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(ev) => match AppEvent::from_crossterm(ev) {
                    Some(app_event) => app_event,
                    None => continue,
                },
                Err(err) => {
                    tracing::warn!(%err, "terminal read failed");
                    continue;
                }
            },
            Ok(false) => AppEvent::Tick,
            Err(err) => {
                tracing::warn!(%err, "terminal poll failed");
                AppEvent::Tick
            }
        };
        if tx.send(event).is_err() {
            break; // receiver dropped
        }
    });

    rx
}

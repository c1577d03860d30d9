//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs two background tasks
//! that forward them over one channel: a blocking terminal reader and a frame
//! ticker, so the main loop only ever awaits the receiver.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// The terminal lost focus; treated as the pointer leaving the host.
    FocusLost,
    /// Animation frame.
    Frame,
}

impl AppEvent {
    fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(k) => Some(AppEvent::Key(k)),
            CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
            CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            CtEvent::FocusLost => Some(AppEvent::FocusLost),
            _ => None,
        }
    }
}

/// Spawns the terminal reader and the frame ticker and returns the shared
/// receiving end.  Both tasks stop once the receiver is dropped.
pub fn spawn_event_reader(frame_interval: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    let input_tx = tx.clone();
    tokio::task::spawn_blocking(move || loop {
        // Poll with a short timeout so a dropped receiver is noticed even
        // when the user never touches the keyboard.
        match event::poll(Duration::from_millis(250)) {
            Ok(true) => {
                let Ok(ev) = event::read() else { continue };
                let Some(app_event) = AppEvent::from_crossterm(ev) else {
                    continue;
                };
                if input_tx.send(app_event).is_err() {
                    break; // receiver dropped
                }
            }
            Ok(false) => {
                if input_tx.is_closed() {
                    break;
                }
            }
            Err(err) => {
                tracing::error!(%err, "terminal event poll failed");
                break;
            }
        }
    });

    tokio::spawn(async move {
        let mut frames = tokio::time::interval(frame_interval);
        // A slow draw skips frames instead of bursting to catch up.
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            frames.tick().await;
            if tx.send(AppEvent::Frame).is_err() {
                break;
            }
        }
    });

    rx
}

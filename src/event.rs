use crate::remote::{NetworkFailure, PendingId, User, UserId};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for UI refresh and toast expiry
  Tick,
  /// A remote call finished
  Remote(RemoteEvent),
}

/// Outcome of one remote round trip, posted back by the task that ran it
#[derive(Debug)]
pub enum RemoteEvent {
  Listed(Result<Vec<User>, NetworkFailure>),
  Created {
    pending: PendingId,
    result: Result<User, NetworkFailure>,
  },
  Updated {
    id: UserId,
    result: Result<User, NetworkFailure>,
  },
  Deleted {
    id: UserId,
    result: Result<(), NetworkFailure>,
  },
}

/// Event handler that produces events from terminal input and a tick timer.
///
/// Remote tasks post into the same channel through `sender()`, so the app
/// handles everything on one loop, one event at a time.
pub struct EventHandler {
  tx: mpsc::UnboundedSender<Event>,
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    let input_tx = tx.clone();

    // crossterm polling blocks, keep it off the async workers
    tokio::task::spawn_blocking(move || loop {
      let event = match event::poll(tick_rate) {
        Ok(true) => match event::read() {
          Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
          Ok(_) => continue,
          Err(e) => {
            tracing::warn!("failed to read terminal event: {}", e);
            continue;
          }
        },
        _ => Event::Tick,
      };

      if input_tx.send(event).is_err() {
        break;
      }
    });

    Self { tx, rx }
  }

  /// Sender for tasks that report back to the loop
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}

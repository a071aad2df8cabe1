use ratatui::crossterm::event::{self, Event};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Events delivered to the main loop
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal input event
    Input(Event),
    /// Periodic tick, emitted while input is idle; drives debounced work
    Tick,
}

/// Event handler for handling terminal events
pub struct EventHandler {
    /// Event receiver channel
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        // Spawn a thread to poll for events
        thread::spawn(move || loop {
            let ready = event::poll(tick_rate).unwrap_or(false);
            if ready {
                if let Ok(event) = event::read() {
                    if tx.send(AppEvent::Input(event)).is_err() {
                        break;
                    }
                    continue;
                }
            }

            // No input within the tick interval
            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        });

        Self { rx }
    }

    /// Get the next event
    pub fn next(&self) -> Result<AppEvent, mpsc::RecvError> {
        self.rx.recv()
    }
}

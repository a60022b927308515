use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app loop
#[derive(Clone, Debug)]
pub enum GymEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<GymEvent, RecvTimeoutError>;
}

/// Production event source reading crossterm events on a helper thread
pub struct CrosstermEventSource {
    rx: Receiver<GymEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // Windows reports releases too; only presses type characters
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => GymEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => GymEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::error!(error = %e, "terminal event read failed");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GymEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed event source for tests and headless driving
pub struct ChannelEventSource {
    rx: Receiver<GymEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<GymEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GymEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: EventSource> {
    event_source: E,
    tick: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, tick: Duration) -> Self {
        Self { event_source, tick }
    }

    /// Blocks up to one tick and returns the next event, or Tick on timeout
    pub fn step(&self) -> GymEvent {
        match self.event_source.recv_timeout(self.tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => GymEvent::Tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(1));

        assert!(matches!(runner.step(), GymEvent::Tick));
    }

    #[test]
    fn step_returns_tick_when_disconnected() {
        let (tx, rx) = mpsc::channel::<GymEvent>();
        drop(tx);
        let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(1));

        assert!(matches!(runner.step(), GymEvent::Tick));
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(GymEvent::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)))
            .unwrap();
        let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(10));

        match runner.step() {
            GymEvent::Key(key) => assert_eq!(key.code, KeyCode::Char('a')),
            other => panic!("expected key event, got {other:?}"),
        }
    }
}

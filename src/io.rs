use std::time::Duration;

use crossterm::event::Event;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

use crate::event::AppEvent;

/// How often the UI loop re-reads the lifecycle state.
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One input to the UI loop.
#[derive(Debug)]
pub enum IoEvent {
    App(AppEvent),
    Terminal(Event),
    /// Time to poll the lifecycle state.
    Tick,
    /// The terminal event source has gone away.
    Closed,
}

/// Merges app events, terminal events and the status-poll timer.
pub struct Io {
    app_rx: mpsc::UnboundedReceiver<AppEvent>,
    term_rx: mpsc::UnboundedReceiver<Event>,
    tick: Interval,
}

impl Io {
    /// Must be called from within a tokio runtime.
    pub fn new(
        app_rx: mpsc::UnboundedReceiver<AppEvent>,
        term_rx: mpsc::UnboundedReceiver<Event>,
        poll_interval: Duration,
    ) -> Self {
        let mut tick = tokio::time::interval(poll_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            app_rx,
            term_rx,
            tick,
        }
    }

    /// Wait for the next input. App events win ties so conversation output is
    /// shown before a key press that arrived at the same moment.
    pub async fn next_event(&mut self) -> IoEvent {
        tokio::select! {
            biased;
            Some(event) = self.app_rx.recv() => IoEvent::App(event),
            event = self.term_rx.recv() => match event {
                Some(event) => IoEvent::Terminal(event),
                None => IoEvent::Closed,
            },
            _ = self.tick.tick() => IoEvent::Tick,
        }
    }

    /// Take every app event that is already queued.
    pub fn drain_app_events(&mut self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.app_rx.try_recv() {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::event::Notice;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[tokio::test]
    async fn app_events_win_ties() {
        let (app_tx, app_rx) = mpsc::unbounded_channel();
        let (term_tx, term_rx) = mpsc::unbounded_channel();
        let mut io = Io::new(app_rx, term_rx, Duration::from_secs(3600));
        // Consume the interval's immediate first tick.
        assert!(matches!(io.next_event().await, IoEvent::Tick));

        term_tx
            .send(Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
            .unwrap();
        app_tx.send(Notice::info("hello").into()).unwrap();

        assert!(matches!(io.next_event().await, IoEvent::App(_)));
        assert!(matches!(io.next_event().await, IoEvent::Terminal(_)));
    }

    #[tokio::test]
    async fn closed_terminal_ends_input() {
        let (_app_tx, app_rx) = mpsc::unbounded_channel();
        let (term_tx, term_rx) = mpsc::unbounded_channel::<Event>();
        let mut io = Io::new(app_rx, term_rx, Duration::from_secs(3600));
        io.next_event().await;
        drop(term_tx);
        assert!(matches!(io.next_event().await, IoEvent::Closed));
    }

    #[tokio::test]
    async fn drain_returns_queued_events() {
        let (app_tx, app_rx) = mpsc::unbounded_channel();
        let (_term_tx, term_rx) = mpsc::unbounded_channel();
        let mut io = Io::new(app_rx, term_rx, Duration::from_secs(3600));
        app_tx.send(Notice::info("one").into()).unwrap();
        app_tx.send(Notice::info("two").into()).unwrap();
        assert_eq!(io.drain_app_events().len(), 2);
        assert!(io.drain_app_events().is_empty());
    }
}

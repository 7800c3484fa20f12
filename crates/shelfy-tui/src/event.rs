//! Terminal input for the app loop.
//!
//! A background task merges crossterm's event stream with the tick and
//! render timers. Pasted text arrives as one [`Event::Paste`], flattened
//! to a single line since every form field is single-line.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Paste(String),
    /// Notification expiry.
    Tick,
    /// Redraw. Also sent right away when the terminal is resized.
    Render,
}

/// Keep key presses, pastes, and resizes; drop releases, repeats, mouse
/// and focus events.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Paste(text) => {
            let line: String = text
                .lines()
                .map(str::trim_end)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            (!line.is_empty()).then_some(Event::Paste(line))
        }
        CrosstermEvent::Resize(..) => Some(Event::Render),
        _ => None,
    }
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(tx, cancel.clone(), tick_rate, render_rate));
        Self { rx, cancel }
    }

    /// `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn pump(
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
    tick_rate: Duration,
    render_rate: Duration,
) {
    let mut stream = EventStream::new();
    let mut ticks = tokio::time::interval(tick_rate);
    let mut frames = tokio::time::interval(render_rate);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticks.tick() => Event::Tick,
            _ = frames.tick() => Event::Render,
            next = stream.next() => match next {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(err)) => {
                    warn!(error = %err, "terminal input error");
                    continue;
                }
                None => break,
            },
        };
        if tx.send(event).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(KeyCode::Char('n'), KeyModifiers::NONE, kind)
    }

    #[test]
    fn only_key_presses_pass() {
        let press = key(KeyEventKind::Press);
        assert_eq!(translate(CrosstermEvent::Key(press)), Some(Event::Key(press)));
        assert_eq!(translate(CrosstermEvent::Key(key(KeyEventKind::Release))), None);
        assert_eq!(translate(CrosstermEvent::FocusGained), None);
    }

    #[test]
    fn resize_requests_a_redraw() {
        assert_eq!(translate(CrosstermEvent::Resize(80, 24)), Some(Event::Render));
    }

    #[test]
    fn pasted_lines_are_joined() {
        let pasted = CrosstermEvent::Paste("A slow start,\r\n\nbut worth it.\n".into());
        assert_eq!(
            translate(pasted),
            Some(Event::Paste("A slow start, but worth it.".into()))
        );
        assert_eq!(translate(CrosstermEvent::Paste("\n \n".into())), None);
    }
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::domain::models::Event;

fn map_key(key: KeyEvent) -> Option<Event> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return Some(Event::KeyboardCTRLC()),
        KeyCode::Char('d') if ctrl => return Some(Event::UIPageDown()),
        KeyCode::Char('u') if ctrl => return Some(Event::UIPageUp()),
        KeyCode::Char(c) if !ctrl => return Some(Event::KeyboardChar(c)),
        KeyCode::Enter => return Some(Event::KeyboardEnter()),
        KeyCode::Esc => return Some(Event::KeyboardEsc()),
        KeyCode::Up => return Some(Event::UIUp()),
        KeyCode::Down => return Some(Event::UIDown()),
        KeyCode::Left => return Some(Event::UILeft()),
        KeyCode::Right => return Some(Event::UIRight()),
        KeyCode::PageUp => return Some(Event::UIPageUp()),
        KeyCode::PageDown => return Some(Event::UIPageDown()),
        _ => return None,
    }
}

pub fn map_crossterm(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) => return map_key(key),
        CrosstermEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => return Some(Event::UIUp()),
            MouseEventKind::ScrollDown => return Some(Event::UIDown()),
            _ => return None,
        },
        CrosstermEvent::Resize(_, _) => return Some(Event::UIResize()),
        _ => return None,
    }
}

/// Merges terminal input with results coming back from the worker.
pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => map_crossterm(input),
                    Some(Err(err)) => {
                        tracing::error!(error = ?err, "Terminal input failed");
                        None
                    },
                    None => None
                },
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}

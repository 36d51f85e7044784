use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind};

use crate::error::GameError;
use crate::game::{Direction, Event, EventSource, Input};

/// Maps a key to a session input: `w/a/s/d` steer, `q` quits. Arrows are
/// left to the menus.
pub fn session_input(code: KeyCode) -> Option<Input> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some(Input::Turn(Direction::Up)),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Input::Turn(Direction::Left)),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Input::Turn(Direction::Down)),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Input::Turn(Direction::Right)),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Input::Quit),
        _ => None,
    }
}

fn as_press(ev: TermEvent) -> Option<KeyEvent> {
    match ev {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(key),
        _ => None,
    }
}

/// Blocks until the next key press.
pub fn read_key() -> Result<KeyEvent, GameError> {
    loop {
        if let Some(key) = as_press(event::read()?) {
            return Ok(key);
        }
    }
}

/// Discards every terminal event already queued, so keys pressed during play
/// do not leak into the next screen.
pub fn drain_pending() -> Result<usize, GameError> {
    drain_with(|| event::poll(Duration::ZERO), event::read)
}

fn drain_with<P, R>(mut ready: P, mut read: R) -> Result<usize, GameError>
where
    P: FnMut() -> io::Result<bool>,
    R: FnMut() -> io::Result<TermEvent>,
{
    let mut dropped = 0;
    while ready()? {
        read()?;
        dropped += 1;
    }
    Ok(dropped)
}

/// Multiplexes a periodic timer with terminal key presses.
pub struct TerminalEvents {
    last_tick: Instant,
}

impl TerminalEvents {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }
}

impl EventSource for TerminalEvents {
    fn next_event(&mut self, interval: Duration) -> Result<Event, GameError> {
        loop {
            let elapsed = self.last_tick.elapsed();
            if elapsed >= interval {
                self.last_tick = Instant::now();
                return Ok(Event::Tick);
            }
            if event::poll(interval - elapsed)? {
                if let Some(input) = as_press(event::read()?).and_then(|key| session_input(key.code)) {
                    return Ok(Event::Key(input));
                }
            }
        }
    }
}

use std::time::Duration;

use crate::error::GameError;
use crate::log;

use super::board::Painter;
use super::food::RandomSource;
use super::state::{GameEngine, Input, Outcome, SessionStatus};

/// One wake-up of the session loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Tick,
    Key(Input),
}

/// The single blocking wait of a session: returns whichever of the periodic
/// timer or a key press is ready first. `interval` is re-read on every call so
/// speed changes take effect on the following tick.
pub trait EventSource {
    fn next_event(&mut self, interval: Duration) -> Result<Event, GameError>;
}

/// A painter that can also flush what it has painted.
pub trait Surface: Painter {
    fn present(&mut self, status: &SessionStatus) -> Result<(), GameError>;
}

impl GameEngine {
    pub fn handle_event<P: Painter, R: RandomSource>(
        &mut self,
        event: Event,
        painter: &mut P,
        random: &mut R,
    ) -> Result<(), GameError> {
        match event {
            Event::Tick => self.tick(painter, random),
            Event::Key(input) => {
                self.handle_input(input);
                Ok(())
            }
        }
    }
}

/// Drives `engine` until it reaches a terminal state.
pub fn run_session<E, S, R>(
    engine: &mut GameEngine,
    events: &mut E,
    surface: &mut S,
    random: &mut R,
) -> Result<Outcome, GameError>
where
    E: EventSource,
    S: Surface,
    R: RandomSource,
{
    log!(
        "session start: {}x{} board, {} cells, interval {:?}",
        engine.board().cols(),
        engine.board().rows(),
        engine.board().total_cells(),
        engine.interval()
    );
    engine.paint_all(surface);
    surface.present(&engine.status())?;
    loop {
        if let Some(outcome) = engine.outcome() {
            log!("session end: {:?}, score {}", outcome.state, outcome.score);
            return Ok(outcome);
        }
        let event = events.next_event(engine.interval())?;
        engine.handle_event(event, surface, random)?;
        surface.present(&engine.status())?;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::config::Palette;
    use crate::game::board::{Board, Cell, Color};
    use crate::game::food::tests::SequenceRandom;
    use crate::game::snake::Direction;
    use crate::game::state::SessionState;
    use crate::game::state::tests::RecordingPainter;

    struct ScriptedEvents {
        events: VecDeque<Event>,
        intervals: Vec<Duration>,
    }

    impl ScriptedEvents {
        fn new(events: &[Event]) -> Self {
            Self {
                events: events.iter().copied().collect(),
                intervals: Vec::new(),
            }
        }
    }

    impl EventSource for ScriptedEvents {
        fn next_event(&mut self, interval: Duration) -> Result<Event, GameError> {
            self.intervals.push(interval);
            self.events
                .pop_front()
                .ok_or(GameError::MissingCapability("script exhausted"))
        }
    }

    #[derive(Default)]
    struct TestSurface {
        painter: RecordingPainter,
        frames: usize,
    }

    impl Painter for TestSurface {
        fn paint_cell(&mut self, cell: Cell, color: Color) {
            self.painter.paint_cell(cell, color);
        }
    }

    impl Surface for TestSurface {
        fn present(&mut self, _status: &SessionStatus) -> Result<(), GameError> {
            self.frames += 1;
            Ok(())
        }
    }

    fn engine(random: &mut SequenceRandom) -> GameEngine {
        let board = Board::new(500, 500, 50, &Palette::default()).unwrap();
        GameEngine::new(board, Cell::new(100, 100), Duration::from_millis(100), 0.5, random)
            .unwrap()
    }

    #[test]
    fn test_runs_until_wall() {
        // Food at (0,0); heading right from (100,100) hits x = 500 after 8 ticks.
        let mut random = SequenceRandom::new(&[0]);
        let mut engine = engine(&mut random);
        let mut events = ScriptedEvents::new(&[Event::Tick; 8]);
        let mut surface = TestSurface::default();
        let outcome = run_session(&mut engine, &mut events, &mut surface, &mut random).unwrap();
        assert_eq!(
            outcome,
            Outcome {
                state: SessionState::Died,
                score: 1
            }
        );
        assert_eq!(surface.frames, 9);
    }

    #[test]
    fn test_quit_key_ends_session() {
        let mut random = SequenceRandom::new(&[0]);
        let mut engine = engine(&mut random);
        let mut events = ScriptedEvents::new(&[
            Event::Tick,
            Event::Key(Input::Turn(Direction::Down)),
            Event::Tick,
            Event::Key(Input::Quit),
        ]);
        let mut surface = TestSurface::default();
        let outcome = run_session(&mut engine, &mut events, &mut surface, &mut random).unwrap();
        assert_eq!(outcome.state, SessionState::Quit);
        assert_eq!(engine.snake().head(), Cell::new(150, 150));
    }

    #[test]
    fn test_interval_shrinks_after_food() {
        // First food lands right of the head, so the first tick eats it.
        let mut random = SequenceRandom::new(&[22, 0]);
        let mut engine = engine(&mut random);
        let mut events = ScriptedEvents::new(&[Event::Tick, Event::Tick, Event::Key(Input::Quit)]);
        let mut surface = TestSurface::default();
        run_session(&mut engine, &mut events, &mut surface, &mut random).unwrap();
        assert_eq!(
            events.intervals,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(50),
                Duration::from_millis(50),
            ]
        );
    }

    #[test]
    fn test_event_source_failure_propagates() {
        let mut random = SequenceRandom::new(&[0]);
        let mut engine = engine(&mut random);
        let mut events = ScriptedEvents::new(&[]);
        let mut surface = TestSurface::default();
        let result = run_session(&mut engine, &mut events, &mut surface, &mut random);
        assert!(matches!(result, Err(GameError::MissingCapability(_))));
    }
}

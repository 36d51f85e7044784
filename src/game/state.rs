use std::time::Duration;

use crate::error::GameError;
use crate::log;

use super::board::{Board, Cell, Painter};
use super::food::{Food, FoodPlacer, RandomSource};
use super::snake::{Direction, SnakeBody};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Playing,
    Died,
    Won,
    Quit,
}

/// What a key press means to a running session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Turn(Direction),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub state: SessionState,
    pub score: usize,
}

/// Snapshot handed to the renderer after each event.
#[derive(Clone, Copy, Debug)]
pub struct SessionStatus {
    pub state: SessionState,
    pub length: usize,
    pub interval: Duration,
    pub foods_eaten: usize,
}

pub struct GameEngine {
    board: Board,
    snake: SnakeBody,
    food: Option<Food>,
    direction: Direction,
    previous_direction: Direction,
    interval: Duration,
    speedup: f64,
    state: SessionState,
    foods_eaten: usize,
}

impl GameEngine {
    /// Starts a session with a one-cell snake at `start` heading right.
    pub fn new<R: RandomSource>(
        board: Board,
        start: Cell,
        interval: Duration,
        speedup: f64,
        random: &mut R,
    ) -> Result<Self, GameError> {
        Self::from_parts(
            board,
            SnakeBody::new(start),
            Direction::Right,
            interval,
            speedup,
            random,
        )
    }

    pub fn from_parts<R: RandomSource>(
        board: Board,
        snake: SnakeBody,
        direction: Direction,
        interval: Duration,
        speedup: f64,
        random: &mut R,
    ) -> Result<Self, GameError> {
        if !snake.iter().all(|cell| board.contains(cell)) {
            return Err(GameError::InvalidBoard(
                "snake starts outside the board".to_string(),
            ));
        }
        let mut engine = Self {
            board,
            snake,
            food: None,
            direction,
            previous_direction: direction,
            interval,
            speedup,
            state: SessionState::Playing,
            foods_eaten: 0,
        };
        match FoodPlacer::place(&engine.board, &engine.snake, random)? {
            Some(cell) => engine.food = Some(Food { cell, alive: true }),
            None => engine.state = SessionState::Won,
        }
        Ok(engine)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn score(&self) -> usize {
        self.snake.len()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            SessionState::Playing => None,
            state => Some(Outcome {
                state,
                score: self.score(),
            }),
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.state,
            length: self.snake.len(),
            interval: self.interval,
            foods_eaten: self.foods_eaten,
        }
    }

    /// Paints the full board, the snake and the live food.
    pub fn paint_all<P: Painter>(&self, painter: &mut P) {
        self.board.paint_background(painter);
        for cell in self.snake.iter() {
            painter.paint_cell(cell, self.board.snake);
        }
        if let Some(food) = self.food.filter(|f| f.alive) {
            painter.paint_cell(food.cell, self.board.food);
        }
    }

    pub fn handle_input(&mut self, input: Input) {
        if self.state != SessionState::Playing {
            return;
        }
        match input {
            Input::Turn(requested) => {
                if self.snake.len() > 1 && requested.is_reverse_of(self.previous_direction) {
                    return;
                }
                self.direction = requested;
            }
            Input::Quit => {
                log!("session quit at length {}", self.snake.len());
                self.state = SessionState::Quit;
            }
        }
    }

    /// One movement step.
    pub fn tick<P: Painter, R: RandomSource>(
        &mut self,
        painter: &mut P,
        random: &mut R,
    ) -> Result<(), GameError> {
        if self.state != SessionState::Playing {
            return Ok(());
        }
        let candidate = self.direction.step(self.snake.head(), self.board.cell_size);
        if !self.board.contains(candidate) {
            log!(
                "hit the wall at ({}, {}), length {}",
                candidate.x,
                candidate.y,
                self.snake.len()
            );
            self.state = SessionState::Died;
            return Ok(());
        }

        let ate = matches!(self.food, Some(food) if food.alive && food.cell == candidate);
        if ate {
            if let Some(food) = self.food.as_mut() {
                food.alive = false;
            }
            self.snake.advance(candidate, true);
            painter.paint_cell(candidate, self.board.snake);
            self.foods_eaten += 1;
            match FoodPlacer::place(&self.board, &self.snake, random)? {
                Some(cell) => {
                    self.food = Some(Food { cell, alive: true });
                    painter.paint_cell(cell, self.board.food);
                    self.interval = self.interval.mul_f64(self.speedup);
                    log!(
                        "ate food, length {}, next food at ({}, {}), interval {:?}",
                        self.snake.len(),
                        cell.x,
                        cell.y,
                        self.interval
                    );
                }
                None => {
                    log!("board full at length {}", self.snake.len());
                    self.state = SessionState::Won;
                }
            }
        } else {
            let tail = self.snake.tail();
            painter.paint_cell(tail, self.board.color_at(tail));
            self.snake.advance(candidate, false);
            painter.paint_cell(candidate, self.board.snake);
        }

        if self.state == SessionState::Playing && self.snake.head_collides() {
            log!("ran into itself at length {}", self.snake.len());
            self.state = SessionState::Died;
        }
        self.previous_direction = self.direction;
        Ok(())
    }
}

#[cfg(test)]
impl GameEngine {
    pub fn snake(&self) -> &SnakeBody {
        &self.snake
    }

    pub fn food(&self) -> Option<Food> {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::Palette;
    use crate::game::board::Color;
    use crate::game::food::tests::SequenceRandom;

    /// Remembers the last colour painted into every cell.
    #[derive(Default)]
    pub(crate) struct RecordingPainter {
        pub(crate) cells: HashMap<Cell, Color>,
        pub(crate) calls: usize,
    }

    impl Painter for RecordingPainter {
        fn paint_cell(&mut self, cell: Cell, color: Color) {
            self.cells.insert(cell, color);
            self.calls += 1;
        }
    }

    const TICK: Duration = Duration::from_millis(250);

    fn board(w: i32, h: i32) -> Board {
        Board::new(w, h, 50, &Palette::default()).unwrap()
    }

    fn cells(coords: &[(i32, i32)]) -> Vec<Cell> {
        coords.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    fn engine_with(
        snake: &[(i32, i32)],
        direction: Direction,
        random: &mut SequenceRandom,
    ) -> GameEngine {
        let body = SnakeBody::from_cells(cells(snake)).unwrap();
        GameEngine::from_parts(board(500, 500), body, direction, TICK, 0.97, random).unwrap()
    }

    #[test]
    fn test_new_session_defaults() {
        let mut random = SequenceRandom::new(&[0]);
        let engine =
            GameEngine::new(board(500, 500), Cell::new(100, 100), TICK, 0.97, &mut random).unwrap();
        assert_eq!(engine.state(), SessionState::Playing);
        assert_eq!(engine.snake().len(), 1);
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(
            engine.food(),
            Some(Food {
                cell: Cell::new(0, 0),
                alive: true
            })
        );
        assert_eq!(engine.outcome(), None);
    }

    #[test]
    fn test_first_food_random_failure_is_fatal() {
        let mut random = SequenceRandom::new(&[]);
        let result = GameEngine::new(board(500, 500), Cell::new(100, 100), TICK, 0.97, &mut random);
        assert!(matches!(result, Err(GameError::RandomSource(_))));
    }

    #[test]
    fn test_snake_outside_board_rejected() {
        let mut random = SequenceRandom::new(&[0]);
        let result = GameEngine::new(board(100, 100), Cell::new(100, 0), TICK, 0.97, &mut random);
        assert!(matches!(result, Err(GameError::InvalidBoard(_))));
    }

    #[test]
    fn test_single_cell_board_is_won_immediately() {
        let mut random = SequenceRandom::new(&[]);
        let engine =
            GameEngine::new(board(50, 50), Cell::new(0, 0), TICK, 0.97, &mut random).unwrap();
        assert_eq!(
            engine.outcome(),
            Some(Outcome {
                state: SessionState::Won,
                score: 1
            })
        );
    }

    #[test]
    fn test_eating_food_grows_and_speeds_up() {
        // 10x10 board; (150,100) is free cell #22 once (100,100) is taken.
        let mut random = SequenceRandom::new(&[22, 0]);
        let mut engine = engine_with(&[(100, 100)], Direction::Right, &mut random);
        assert_eq!(engine.food().map(|f| f.cell), Some(Cell::new(150, 100)));

        let mut painter = RecordingPainter::default();
        engine.tick(&mut painter, &mut random).unwrap();

        assert_eq!(engine.state(), SessionState::Playing);
        assert_eq!(engine.snake().iter().collect::<Vec<_>>(), cells(&[(150, 100), (100, 100)]));
        assert_eq!(engine.interval(), TICK.mul_f64(0.97));
        let food = engine.food().unwrap();
        assert!(food.alive);
        assert_eq!(food.cell, Cell::new(0, 0));
        assert_eq!(painter.cells.get(&Cell::new(150, 100)), Some(&engine.board().snake));
        assert_eq!(painter.cells.get(&Cell::new(0, 0)), Some(&engine.board().food));
    }

    #[test]
    fn test_plain_move_repaints_vacated_tail() {
        let mut random = SequenceRandom::new(&[0]);
        let mut engine = engine_with(&[(150, 100), (100, 100)], Direction::Right, &mut random);
        let mut painter = RecordingPainter::default();
        engine.tick(&mut painter, &mut random).unwrap();

        assert_eq!(engine.snake().iter().collect::<Vec<_>>(), cells(&[(200, 100), (150, 100)]));
        let board = engine.board();
        assert_eq!(
            painter.cells.get(&Cell::new(100, 100)),
            Some(&board.color_at(Cell::new(100, 100)))
        );
        assert_eq!(painter.cells.get(&Cell::new(200, 100)), Some(&board.snake));
        assert_eq!(engine.interval(), TICK);
    }

    #[test]
    fn test_reverse_into_neck_rejected() {
        let mut random = SequenceRandom::new(&[0]);
        let mut engine = engine_with(&[(150, 100), (100, 100)], Direction::Right, &mut random);
        engine.handle_input(Input::Turn(Direction::Left));
        assert_eq!(engine.direction(), Direction::Right);
        engine.handle_input(Input::Turn(Direction::Up));
        assert_eq!(engine.direction(), Direction::Up);
    }

    #[test]
    fn test_reverse_checked_against_applied_direction() {
        // Up then Left before a tick: Left is the reverse of the last applied
        // direction (Right), not of the pending Up, so it is rejected.
        let mut random = SequenceRandom::new(&[0]);
        let mut engine = engine_with(&[(150, 100), (100, 100)], Direction::Right, &mut random);
        engine.handle_input(Input::Turn(Direction::Up));
        engine.handle_input(Input::Turn(Direction::Left));
        assert_eq!(engine.direction(), Direction::Up);
    }

    #[test]
    fn test_single_segment_may_reverse() {
        let mut random = SequenceRandom::new(&[0]);
        let mut engine = engine_with(&[(100, 100)], Direction::Right, &mut random);
        engine.handle_input(Input::Turn(Direction::Left));
        assert_eq!(engine.direction(), Direction::Left);
    }

    #[test]
    fn test_wall_hit_dies_with_length_score() {
        let mut random = SequenceRandom::new(&[0]);
        let mut engine = engine_with(&[(0, 100), (50, 100)], Direction::Left, &mut random);
        let mut painter = RecordingPainter::default();
        engine.tick(&mut painter, &mut random).unwrap();
        assert_eq!(
            engine.outcome(),
            Some(Outcome {
                state: SessionState::Died,
                score: 2
            })
        );
        assert_eq!(painter.calls, 0);
    }

    #[test]
    fn test_self_collision_dies() {
        // Head turns down into its own body.
        let snake = [(100, 100), (150, 100), (150, 150), (100, 150), (50, 150)];
        let mut random = SequenceRandom::new(&[0]);
        let mut engine = engine_with(&snake, Direction::Left, &mut random);
        engine.handle_input(Input::Turn(Direction::Down));
        let mut painter = RecordingPainter::default();
        engine.tick(&mut painter, &mut random).unwrap();
        assert_eq!(engine.state(), SessionState::Died);
        assert_eq!(engine.score(), 5);
    }

    #[test]
    fn test_chasing_own_tail_is_safe() {
        // A 2x2 loop: the head moves into the cell the tail vacates.
        let snake = [(0, 0), (50, 0), (50, 50), (0, 50)];
        let mut random = SequenceRandom::new(&[0]);
        let mut engine = engine_with(&snake, Direction::Down, &mut random);
        let mut painter = RecordingPainter::default();
        engine.tick(&mut painter, &mut random).unwrap();
        assert_eq!(engine.state(), SessionState::Playing);
        assert_eq!(engine.snake().head(), Cell::new(0, 50));
    }

    #[test]
    fn test_filling_board_wins() {
        // 2x1 board: snake at (0,0), the only free cell holds the food.
        let mut random = SequenceRandom::new(&[0]);
        let body = SnakeBody::new(Cell::new(0, 0));
        let mut engine =
            GameEngine::from_parts(board(100, 50), body, Direction::Right, TICK, 0.97, &mut random)
                .unwrap();
        let mut painter = RecordingPainter::default();
        engine.tick(&mut painter, &mut random).unwrap();
        assert_eq!(
            engine.outcome(),
            Some(Outcome {
                state: SessionState::Won,
                score: 2
            })
        );
        assert_eq!(engine.interval(), TICK);
    }

    #[test]
    fn test_quit_reports_current_length() {
        let mut random = SequenceRandom::new(&[0]);
        let mut engine = engine_with(&[(150, 100), (100, 100)], Direction::Right, &mut random);
        engine.handle_input(Input::Quit);
        assert_eq!(
            engine.outcome(),
            Some(Outcome {
                state: SessionState::Quit,
                score: 2
            })
        );
        engine.handle_input(Input::Turn(Direction::Up));
        assert_eq!(engine.direction(), Direction::Right);
    }

    #[test]
    fn test_food_never_on_snake_during_play() {
        use crate::game::food::RngSource;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut random = RngSource::new(StdRng::seed_from_u64(11));
        let mut engine =
            GameEngine::new(board(300, 300), Cell::new(0, 0), TICK, 0.97, &mut random).unwrap();
        let mut painter = RecordingPainter::default();
        // Sweep the board row by row in a boustrophedon so the snake survives.
        let mut heading = Direction::Right;
        for _ in 0..200 {
            if engine.state() != SessionState::Playing {
                break;
            }
            let head = engine.snake().head();
            let next = heading.step(head, 50);
            if !engine.board().contains(next) {
                engine.handle_input(Input::Turn(Direction::Down));
                engine.tick(&mut painter, &mut random).unwrap();
                heading = if heading == Direction::Right {
                    Direction::Left
                } else {
                    Direction::Right
                };
                engine.handle_input(Input::Turn(heading));
                continue;
            }
            engine.tick(&mut painter, &mut random).unwrap();
            if let Some(food) = engine.food().filter(|f| f.alive) {
                assert!(!engine.snake().occupies(food.cell));
            }
            let head = engine.snake().head();
            assert_eq!(engine.snake().iter().filter(|&c| c == head).count(), 1);
        }
    }

    #[test]
    fn test_paint_all_covers_board_snake_food() {
        let mut random = SequenceRandom::new(&[0]);
        let engine = engine_with(&[(100, 100)], Direction::Right, &mut random);
        let mut painter = RecordingPainter::default();
        engine.paint_all(&mut painter);
        assert_eq!(painter.cells.len(), 100);
        assert_eq!(painter.cells.get(&Cell::new(100, 100)), Some(&engine.board().snake));
        assert_eq!(painter.cells.get(&Cell::new(0, 0)), Some(&engine.board().food));
    }
}

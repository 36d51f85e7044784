use rand::RngCore;

use super::board::{Board, Cell};
use super::snake::SnakeBody;
use crate::error::GameError;

/// Random collaborator: one uniformly distributed `u32` per call.
pub trait RandomSource {
    fn next_u32(&mut self) -> Result<u32, GameError>;
}

/// Adapts any `rand` generator, surfacing its fallible fill as a `GameError`.
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_u32(&mut self) -> Result<u32, GameError> {
        let mut buf = [0u8; 4];
        self.rng
            .try_fill_bytes(&mut buf)
            .map_err(|e| GameError::RandomSource(e.to_string()))?;
        Ok(u32::from_le_bytes(buf))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Food {
    pub cell: Cell,
    pub alive: bool,
}

pub struct FoodPlacer;

impl FoodPlacer {
    /// Picks a free cell uniformly at random, or `None` when the snake fills
    /// the board. Draws exactly one value and never retries.
    pub fn place<R: RandomSource>(
        board: &Board,
        snake: &SnakeBody,
        random: &mut R,
    ) -> Result<Option<Cell>, GameError> {
        let free = board.total_cells().saturating_sub(snake.len());
        if free == 0 {
            return Ok(None);
        }
        let mut index = random.next_u32()? as usize % free;
        for cell in board.cells() {
            if snake.occupies(cell) {
                continue;
            }
            if index == 0 {
                return Ok(Some(cell));
            }
            index -= 1;
        }
        // Only reachable when the snake holds duplicate cells, leaving fewer
        // free cells than the count above.
        Ok(None)
    }
}

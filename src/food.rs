use rand::Rng;
use thiserror::Error;

use crate::config::GridSize;
use crate::snake::{Position, Snake};

/// Random draws attempted per grid cell before enumerating free cells.
const SAMPLING_ATTEMPTS_PER_CELL: usize = 4;

/// Food could not be placed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum FoodError {
    #[error("no free cell left on the {}x{} board", .0.width, .0.height)]
    BoardFull(GridSize),
}

/// Picks a uniformly random cell not occupied by the snake.
///
/// Rejection sampling handles the common sparse board. Once the attempt
/// budget runs out the free cells are enumerated, so a nearly full board
/// still terminates and a full one reports [`FoodError::BoardFull`].
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Result<Position, FoodError> {
    let total = bounds.total_cells();
    if total == 0 {
        return Err(FoodError::BoardFull(bounds));
    }

    for _ in 0..total * SAMPLING_ATTEMPTS_PER_CELL {
        let candidate = Position {
            x: rng.gen_range(0..i32::from(bounds.width)),
            y: rng.gen_range(0..i32::from(bounds.height)),
        };
        if !snake.occupies(candidate) {
            return Ok(candidate);
        }
    }

    let free: Vec<Position> = (0..i32::from(bounds.height))
        .flat_map(|y| (0..i32::from(bounds.width)).map(move |x| Position { x, y }))
        .filter(|position| !snake.occupies(*position))
        .collect();

    if free.is_empty() {
        return Err(FoodError::BoardFull(bounds));
    }

    Ok(free[rng.gen_range(0..free.len())])
}

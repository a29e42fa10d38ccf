use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::BoardSize;
use crate::snake::{Position, Snake};

/// Lists every board cell the snake does not occupy, in row-major order.
#[must_use]
pub fn free_cells(board: BoardSize, snake: &Snake) -> Vec<Position> {
    board
        .cells()
        .filter(|position| !snake.occupies(*position))
        .collect()
}

/// Picks a free cell uniformly at random.
///
/// Returns `None` when the snake covers the whole board.
#[must_use]
pub fn generate_food_position<R: Rng + ?Sized>(
    rng: &mut R,
    board: BoardSize,
    snake: &Snake,
) -> Option<Position> {
    free_cells(board, snake).choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::BoardSize;
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    use super::{free_cells, generate_food_position};

    fn row_snake() -> Snake {
        Snake::from_segments(
            vec![
                Position { x: 2, y: 0 },
                Position { x: 1, y: 0 },
                Position { x: 0, y: 0 },
            ],
            Direction::Right,
        )
    }

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = BoardSize::new(6).expect("valid size");
        let snake = row_snake();

        for _ in 0..100 {
            let food = generate_food_position(&mut rng, board, &snake).expect("free cell exists");
            assert!(!snake.occupies(food));
            assert!(board.contains(food));
        }
    }

    #[test]
    fn spawn_reaches_every_free_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let board = BoardSize::new(3).expect("valid size");
        let snake = row_snake();

        let seen: HashSet<_> = (0..500)
            .filter_map(|_| generate_food_position(&mut rng, board, &snake))
            .collect();

        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn full_board_has_no_food_position() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = BoardSize::new(3).expect("valid size");
        let segments = board.cells().collect();
        let snake = Snake::from_segments(segments, Direction::Right);

        assert!(free_cells(board, &snake).is_empty());
        assert_eq!(generate_food_position(&mut rng, board, &snake), None);
    }

    #[test]
    fn same_seed_gives_same_position() {
        let board = BoardSize::default();
        let snake = row_snake();

        let first = generate_food_position(&mut StdRng::seed_from_u64(99), board, &snake);
        let second = generate_food_position(&mut StdRng::seed_from_u64(99), board, &snake);

        assert_eq!(first, second);
    }
}

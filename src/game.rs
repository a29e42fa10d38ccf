use std::collections::HashSet;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::config::BoardSize;
use crate::food::generate_food_position;
use crate::input::Direction;
use crate::score::{HighScoreStore, HighScoreTracker};
use crate::snake::{Position, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
    /// The snake covers every cell, so no food can be placed.
    Victory,
}

/// What ended the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// Result of one `advance` call.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// The game had already ended; nothing changed.
    Idle,
    Moved,
    Ate,
    Died(DeathReason),
    Won,
}

/// Reasons an explicit starting layout is rejected.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum LayoutError {
    #[error("snake has no segments")]
    EmptySnake,
    #[error("segment ({}, {}) lies outside the board", .0.x, .0.y)]
    SegmentOutOfBounds(Position),
    #[error("segment ({}, {}) appears more than once", .0.x, .0.y)]
    OverlappingSegments(Position),
    #[error("food ({}, {}) lies outside the board", .0.x, .0.y)]
    FoodOutOfBounds(Position),
    #[error("food ({}, {}) lies on the snake", .0.x, .0.y)]
    FoodOnSnake(Position),
    #[error("heading {0:?} points the head into its own neck")]
    FacingNeck(Direction),
}

/// Explicit starting arrangement for a game, e.g. a saved or scripted position.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Layout {
    /// Head first.
    pub segments: Vec<Position>,
    pub direction: Direction,
    pub food: Position,
    pub score: u32,
}

impl Layout {
    fn validate(&self, board: BoardSize) -> Result<(), LayoutError> {
        let Some(&head) = self.segments.first() else {
            return Err(LayoutError::EmptySnake);
        };

        let mut seen = HashSet::with_capacity(self.segments.len());
        for &segment in &self.segments {
            if !board.contains(segment) {
                return Err(LayoutError::SegmentOutOfBounds(segment));
            }
            if !seen.insert(segment) {
                return Err(LayoutError::OverlappingSegments(segment));
            }
        }

        if !board.contains(self.food) {
            return Err(LayoutError::FoodOutOfBounds(self.food));
        }
        if seen.contains(&self.food) {
            return Err(LayoutError::FoodOnSnake(self.food));
        }

        if self.segments.get(1) == Some(&head.stepped(self.direction)) {
            return Err(LayoutError::FacingNeck(self.direction));
        }

        Ok(())
    }
}

/// Read-only view of the game handed to the renderer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    pub board: BoardSize,
    /// Head first.
    pub segments: Vec<Position>,
    pub direction: Direction,
    /// Absent only after a victory.
    pub food: Option<Position>,
    pub score: u32,
    pub high_score: u32,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
    /// The finished game beat the previous high score.
    pub new_high_score: bool,
    pub tick_count: u64,
}

/// Complete game state for one session.
#[derive(Debug)]
pub struct Game<S> {
    board: BoardSize,
    snake: Snake,
    food: Option<Position>,
    score: u32,
    status: GameStatus,
    death_reason: Option<DeathReason>,
    new_high_score: bool,
    tick_count: u64,
    high_score: HighScoreTracker<S>,
    rng: StdRng,
}

impl<S: HighScoreStore> Game<S> {
    /// Starts a game with an entropy-seeded random source.
    pub fn new(board: BoardSize, store: S) -> Self {
        Self::from_rng(board, store, StdRng::from_entropy())
    }

    /// Creates a deterministic game for tests and reproducible simulations.
    pub fn new_with_seed(board: BoardSize, store: S, seed: u64) -> Self {
        Self::from_rng(board, store, StdRng::seed_from_u64(seed))
    }

    /// Starts from an explicit layout after checking every board invariant.
    pub fn with_layout(
        board: BoardSize,
        store: S,
        layout: Layout,
        seed: u64,
    ) -> Result<Self, LayoutError> {
        layout.validate(board)?;

        Ok(Self {
            board,
            snake: Snake::from_segments(layout.segments, layout.direction),
            food: Some(layout.food),
            score: layout.score,
            status: GameStatus::Playing,
            death_reason: None,
            new_high_score: false,
            tick_count: 0,
            high_score: HighScoreTracker::load(store),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn from_rng(board: BoardSize, store: S, mut rng: StdRng) -> Self {
        let snake = Snake::new(board.center(), Direction::Right);
        let food = generate_food_position(&mut rng, board, &snake);
        let high_score = HighScoreTracker::load(store);
        debug!(
            "new {0}x{0} game, high score {1}",
            board.side(),
            high_score.best()
        );

        Self {
            board,
            snake,
            food,
            score: 0,
            status: GameStatus::Playing,
            death_reason: None,
            new_high_score: false,
            tick_count: 0,
            high_score,
            rng,
        }
    }

    /// Replaces the finished (or running) game with a fresh one.
    ///
    /// The high score and its store carry over; the random source continues.
    pub fn restart(&mut self) {
        self.snake = Snake::new(self.board.center(), Direction::Right);
        self.food = generate_food_position(&mut self.rng, self.board, &self.snake);
        self.score = 0;
        self.status = GameStatus::Playing;
        self.death_reason = None;
        self.new_high_score = false;
        self.tick_count = 0;
        debug!("game restarted, high score {}", self.high_score.best());
    }

    /// Queues a turn for the next tick. Reversals and post-game requests are
    /// ignored.
    pub fn request_direction(&mut self, direction: Direction) {
        if self.status != GameStatus::Playing {
            return;
        }
        self.snake.buffer_direction(direction);
    }

    /// Advances simulation by one gameplay tick.
    pub fn advance(&mut self) -> TickOutcome {
        if self.status != GameStatus::Playing {
            return TickOutcome::Idle;
        }

        self.tick_count += 1;
        self.snake.commit_direction();
        let candidate = self.snake.next_head_position();

        if !candidate.is_within_bounds(self.board) {
            return self.end_with(DeathReason::WallCollision);
        }

        let eats = self.food == Some(candidate);
        if self.snake.would_collide(candidate, eats) {
            return self.end_with(DeathReason::SelfCollision);
        }

        self.snake.advance_to(candidate, eats);
        if !eats {
            return TickOutcome::Moved;
        }

        self.score += 1;
        self.food = generate_food_position(&mut self.rng, self.board, &self.snake);
        if self.food.is_none() {
            self.status = GameStatus::Victory;
            info!("board filled, victory with score {}", self.score);
            self.new_high_score = self.high_score.record(self.score);
            return TickOutcome::Won;
        }

        debug!("food eaten, score {}", self.score);
        TickOutcome::Ate
    }

    fn end_with(&mut self, reason: DeathReason) -> TickOutcome {
        self.status = GameStatus::GameOver;
        self.death_reason = Some(reason);
        info!(
            "game over ({reason:?}) after {} ticks, score {}",
            self.tick_count, self.score
        );
        self.new_high_score = self.high_score.record(self.score);
        TickOutcome::Died(reason)
    }

    /// Returns an owned copy of everything the renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            segments: self.snake.segments().copied().collect(),
            direction: self.snake.direction(),
            food: self.food,
            score: self.score,
            high_score: self.high_score.best(),
            status: self.status,
            death_reason: self.death_reason,
            new_high_score: self.new_high_score,
            tick_count: self.tick_count,
        }
    }

    #[must_use]
    pub fn board(&self) -> BoardSize {
        self.board
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Option<Position> {
        self.food
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    /// False once the store failed and the high score lives in memory only.
    #[must_use]
    pub fn high_score_is_persistent(&self) -> bool {
        self.high_score.is_persistent()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        self.high_score.store()
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// True after a collision or a victory.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status != GameStatus::Playing
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        self.death_reason
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

#[cfg(test)]
mod tests {
    use crate::config::BoardSize;
    use crate::input::Direction;
    use crate::score::MemoryScoreStore;
    use crate::snake::Position;

    use super::{DeathReason, Game, GameStatus, Layout, LayoutError, TickOutcome};

    fn board(side: u16) -> BoardSize {
        BoardSize::new(side).expect("valid board size")
    }

    fn layout(segments: &[(i32, i32)], direction: Direction, food: (i32, i32)) -> Layout {
        Layout {
            segments: segments.iter().map(|&(x, y)| Position { x, y }).collect(),
            direction,
            food: Position {
                x: food.0,
                y: food.1,
            },
            score: 0,
        }
    }

    fn game_from(side: u16, layout: Layout, store: MemoryScoreStore) -> Game<MemoryScoreStore> {
        Game::with_layout(board(side), store, layout, 1).expect("layout should be valid")
    }

    #[test]
    fn new_game_starts_centered_heading_right() {
        let game = Game::new_with_seed(board(20), MemoryScoreStore::with_score(8), 5);
        let snapshot = game.snapshot();

        assert_eq!(snapshot.segments, vec![Position { x: 10, y: 10 }]);
        assert_eq!(snapshot.direction, Direction::Right);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.high_score, 8);
        assert_eq!(snapshot.status, GameStatus::Playing);

        let food = snapshot.food.expect("food is placed");
        assert_ne!(food, Position { x: 10, y: 10 });
    }

    #[test]
    fn eating_grows_without_popping_the_tail() {
        let mut game = game_from(
            20,
            layout(&[(10, 10)], Direction::Right, (11, 10)),
            MemoryScoreStore::new(),
        );

        assert_eq!(game.advance(), TickOutcome::Ate);

        let snapshot = game.snapshot();
        assert_eq!(
            snapshot.segments,
            vec![Position { x: 11, y: 10 }, Position { x: 10, y: 10 }]
        );
        assert_eq!(snapshot.score, 1);
        let food = snapshot.food.expect("new food is placed");
        assert!(!snapshot.segments.contains(&food));
    }

    #[test]
    fn normal_move_prepends_head_and_drops_tail() {
        let mut game = game_from(
            20,
            layout(&[(4, 5), (5, 5)], Direction::Left, (0, 0)),
            MemoryScoreStore::new(),
        );

        assert_eq!(game.advance(), TickOutcome::Moved);

        assert_eq!(
            game.snapshot().segments,
            vec![Position { x: 3, y: 5 }, Position { x: 4, y: 5 }]
        );
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn wall_collision_freezes_state_and_records_high_score() {
        let mut start = layout(&[(19, 4), (18, 4)], Direction::Right, (0, 0));
        start.score = 7;
        let mut game = game_from(20, start, MemoryScoreStore::with_score(3));
        let before = game.snapshot();

        assert_eq!(
            game.advance(),
            TickOutcome::Died(DeathReason::WallCollision)
        );

        let after = game.snapshot();
        assert_eq!(after.status, GameStatus::GameOver);
        assert_eq!(after.segments, before.segments);
        assert_eq!(after.food, before.food);
        assert_eq!(after.score, 7);
        assert_eq!(after.high_score, 7);
        assert!(after.new_high_score);
        assert_eq!(game.store().stored(), Some(7));
    }

    #[test]
    fn lower_score_leaves_high_score_untouched() {
        let mut start = layout(&[(0, 2)], Direction::Left, (3, 3));
        start.score = 2;
        let mut game = game_from(5, start, MemoryScoreStore::with_score(9));

        game.advance();

        assert!(game.is_over());
        assert_eq!(game.high_score(), 9);
        assert!(!game.snapshot().new_high_score);
        assert_eq!(game.store().saves(), 0);
    }

    #[test]
    fn snake_collision_with_self_sets_game_over() {
        let mut game = game_from(
            6,
            layout(
                &[(2, 2), (3, 2), (3, 3), (2, 3), (1, 3)],
                Direction::Down,
                (5, 5),
            ),
            MemoryScoreStore::new(),
        );

        assert_eq!(
            game.advance(),
            TickOutcome::Died(DeathReason::SelfCollision)
        );
        assert_eq!(game.death_reason(), Some(DeathReason::SelfCollision));
    }

    #[test]
    fn chasing_the_vacating_tail_is_allowed() {
        let mut game = game_from(
            6,
            layout(&[(2, 2), (3, 2), (3, 3), (2, 3)], Direction::Down, (5, 5)),
            MemoryScoreStore::new(),
        );

        assert_eq!(game.advance(), TickOutcome::Moved);
        assert_eq!(
            game.snapshot().segments,
            vec![
                Position { x: 2, y: 3 },
                Position { x: 2, y: 2 },
                Position { x: 3, y: 2 },
                Position { x: 3, y: 3 },
            ]
        );
    }

    #[test]
    fn advance_after_game_over_changes_nothing() {
        let mut game = game_from(
            5,
            layout(&[(4, 0)], Direction::Up, (2, 2)),
            MemoryScoreStore::new(),
        );
        game.advance();
        let frozen = game.snapshot();

        game.request_direction(Direction::Left);
        for _ in 0..5 {
            assert_eq!(game.advance(), TickOutcome::Idle);
        }

        assert_eq!(game.snapshot(), frozen);
    }

    #[test]
    fn reversal_request_keeps_current_heading() {
        let mut game = game_from(
            20,
            layout(&[(10, 10), (9, 10)], Direction::Right, (0, 0)),
            MemoryScoreStore::new(),
        );

        game.request_direction(Direction::Left);
        game.advance();

        assert_eq!(game.snake().head(), Position { x: 11, y: 10 });
        assert_eq!(game.snake().direction(), Direction::Right);
        assert!(!game.is_over());
    }

    #[test]
    fn latest_of_two_requests_is_committed() {
        let mut game = game_from(
            20,
            layout(&[(10, 10), (10, 9)], Direction::Down, (0, 0)),
            MemoryScoreStore::new(),
        );

        game.request_direction(Direction::Right);
        game.request_direction(Direction::Left);
        game.advance();

        assert_eq!(game.snake().head(), Position { x: 9, y: 10 });
        assert_eq!(game.snake().direction(), Direction::Left);
    }

    #[test]
    fn filling_the_board_is_a_victory() {
        // Every cell but (0,0) is covered; the head at (1,0) turns onto it.
        let mut game = game_from(
            3,
            layout(
                &[
                    (1, 0),
                    (2, 0),
                    (2, 1),
                    (1, 1),
                    (0, 1),
                    (0, 2),
                    (1, 2),
                    (2, 2),
                ],
                Direction::Left,
                (0, 0),
            ),
            MemoryScoreStore::new(),
        );

        assert_eq!(game.advance(), TickOutcome::Won);

        assert_eq!(game.status(), GameStatus::Victory);
        assert_eq!(game.food(), None);
        assert_eq!(game.snake().len(), 9);
        assert_eq!(game.high_score(), 1);
        assert_eq!(game.advance(), TickOutcome::Idle);
    }

    #[test]
    fn restart_resets_score_and_keeps_high_score() {
        let mut start = layout(&[(0, 0)], Direction::Up, (2, 2));
        start.score = 4;
        let mut game = game_from(5, start, MemoryScoreStore::new());
        game.advance();
        assert!(game.is_over());

        game.restart();

        let snapshot = game.snapshot();
        assert_eq!(snapshot.status, GameStatus::Playing);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.high_score, 4);
        assert_eq!(snapshot.segments, vec![Position { x: 2, y: 2 }]);
        assert_eq!(snapshot.death_reason, None);
    }

    #[test]
    fn unreadable_store_degrades_to_memory() {
        let mut start = layout(&[(0, 0)], Direction::Left, (2, 2));
        start.score = 3;
        let mut game = game_from(5, start, MemoryScoreStore::failing());

        assert_eq!(game.high_score(), 0);
        assert!(!game.high_score_is_persistent());

        game.advance();
        assert_eq!(game.high_score(), 3);
    }

    #[test]
    fn unwritable_store_keeps_the_record_for_the_session() {
        let mut start = layout(&[(0, 1)], Direction::Left, (3, 3));
        start.score = 5;
        let mut game = game_from(5, start, MemoryScoreStore::failing_writes(2));
        assert_eq!(game.high_score(), 2);
        assert!(game.high_score_is_persistent());

        assert_eq!(game.advance(), TickOutcome::Died(DeathReason::WallCollision));
        assert_eq!(game.high_score(), 5);
        assert!(game.snapshot().new_high_score);
        assert!(!game.high_score_is_persistent());
        assert_eq!(game.store().save_attempts(), 1);
        assert_eq!(game.store().stored(), Some(2));

        game.restart();
        assert_eq!(game.high_score(), 5);
    }

    #[test]
    fn invalid_layouts_are_rejected() {
        let check =
            |layout: Layout| Game::with_layout(board(5), MemoryScoreStore::new(), layout, 0);

        assert_eq!(
            check(layout(&[], Direction::Up, (1, 1))).err(),
            Some(LayoutError::EmptySnake)
        );
        assert_eq!(
            check(layout(&[(5, 1)], Direction::Up, (1, 1))).err(),
            Some(LayoutError::SegmentOutOfBounds(Position { x: 5, y: 1 }))
        );
        assert_eq!(
            check(layout(&[(1, 1), (1, 2), (1, 1)], Direction::Up, (3, 3))).err(),
            Some(LayoutError::OverlappingSegments(Position { x: 1, y: 1 }))
        );
        assert_eq!(
            check(layout(&[(1, 1)], Direction::Up, (1, 1))).err(),
            Some(LayoutError::FoodOnSnake(Position { x: 1, y: 1 }))
        );
        assert_eq!(
            check(layout(&[(1, 1)], Direction::Up, (-1, 0))).err(),
            Some(LayoutError::FoodOutOfBounds(Position { x: -1, y: 0 }))
        );
        assert_eq!(
            check(layout(&[(2, 2), (1, 2)], Direction::Left, (4, 4))).err(),
            Some(LayoutError::FacingNeck(Direction::Left))
        );
    }
}

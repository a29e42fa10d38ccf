use std::collections::VecDeque;

use crate::config::BoardSize;
use crate::input::{Direction, direction_change_is_valid};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns the neighbouring position one cell towards `direction`.
    ///
    /// The result may lie outside the board; callers check bounds.
    #[must_use]
    pub fn stepped(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns true when the position lies inside the board.
    #[must_use]
    pub fn is_within_bounds(self, board: BoardSize) -> bool {
        board.contains(self)
    }
}

/// Snake body plus its committed heading and one pending turn.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Option<Direction>,
}

impl Snake {
    /// Creates a one-cell snake at `start` with the provided direction.
    #[must_use]
    pub fn new(start: Position, direction: Direction) -> Self {
        Self::from_segments(vec![start], direction)
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// Segments are taken as given; `Game::with_layout` validates them.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        Self {
            body: VecDeque::from(segments),
            direction,
            pending_direction: None,
        }
    }

    /// Stores `direction` as the turn for the next tick.
    ///
    /// A reversal of the committed heading is dropped. Otherwise the request
    /// replaces any earlier pending one.
    pub fn buffer_direction(&mut self, direction: Direction) {
        if !direction_change_is_valid(self.direction, direction) {
            return;
        }
        self.pending_direction = Some(direction);
    }

    /// Promotes the pending turn to the committed heading.
    pub fn commit_direction(&mut self) {
        if let Some(next) = self.pending_direction.take() {
            if direction_change_is_valid(self.direction, next) {
                self.direction = next;
            }
        }
    }

    /// Returns the head position one step along the committed heading.
    #[must_use]
    pub fn next_head_position(&self) -> Position {
        self.head().stepped(self.direction)
    }

    /// Returns true if moving the head onto `candidate` hits the body.
    ///
    /// Without growth the tail leaves its cell during the same tick, so the
    /// tail is not counted as an obstacle.
    #[must_use]
    pub fn would_collide(&self, candidate: Position, grows: bool) -> bool {
        let obstacles = if grows {
            self.body.len()
        } else {
            self.body.len().saturating_sub(1)
        };
        self.body
            .iter()
            .take(obstacles)
            .any(|segment| *segment == candidate)
    }

    /// Moves the head onto `head`, keeping the tail when growing.
    pub fn advance_to(&mut self, head: Position, grow: bool) {
        self.body.push_front(head);
        if !grow {
            let _ = self.body.pop_back();
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns the last segment.
    #[must_use]
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the committed movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the turn waiting for the next tick, if any.
    #[must_use]
    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}

use std::time::Duration;

use ratatui::style::Color;
use thiserror::Error;

use crate::snake::Position;

/// Default board side length in cells.
pub const DEFAULT_BOARD_SIZE: u16 = 20;

/// Smallest board with an interior start cell that is not edge-adjacent.
pub const MIN_BOARD_SIZE: u16 = 3;

/// Largest board the shell can sensibly draw.
pub const MAX_BOARD_SIZE: u16 = 64;

/// Tick interval at score zero, in milliseconds.
pub const BASE_TICK_INTERVAL_MS: u64 = 200;

/// Tick interval reduction per point scored, in milliseconds.
pub const TICK_DECAY_PER_POINT_MS: u64 = 5;

/// Lower clamp for the tick interval, in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// How long the shell waits for input before redrawing.
pub const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Invalid configuration values.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("board size {0} is too small (minimum is {min})", min = MIN_BOARD_SIZE)]
    BoardTooSmall(u16),
    #[error("board size {0} is too large (maximum is {max})", max = MAX_BOARD_SIZE)]
    BoardTooLarge(u16),
}

/// Side length of the square play field.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BoardSize {
    side: u16,
}

impl BoardSize {
    /// Validates a side length.
    pub fn new(side: u16) -> Result<Self, ConfigError> {
        if side < MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall(side));
        }
        if side > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardTooLarge(side));
        }
        Ok(Self { side })
    }

    #[must_use]
    pub fn side(self) -> u16 {
        self.side
    }

    /// Returns the total number of cells on the board.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.side) * usize::from(self.side)
    }

    /// Returns true when `position` lies inside `[0, side)` on both axes.
    #[must_use]
    pub fn contains(self, position: Position) -> bool {
        let side = i32::from(self.side);
        (0..side).contains(&position.x) && (0..side).contains(&position.y)
    }

    /// Center cell, used as the snake's starting point.
    #[must_use]
    pub fn center(self) -> Position {
        let middle = i32::from(self.side / 2);
        Position { x: middle, y: middle }
    }

    /// Iterates every cell in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Position> {
        let side = i32::from(self.side);
        (0..side).flat_map(move |y| (0..side).map(move |x| Position { x, y }))
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self {
            side: DEFAULT_BOARD_SIZE,
        }
    }
}

/// Colors for every drawn element.
#[derive(Debug)]
pub struct Palette {
    pub snake_head: Color,
    pub snake_body: Color,
    pub snake_tail: Color,
    pub food: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_label: Color,
    pub hud_value: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

pub const PALETTE: Palette = Palette {
    snake_head: Color::LightGreen,
    snake_body: Color::Green,
    snake_tail: Color::DarkGray,
    food: Color::Red,
    play_bg: Color::Black,
    border_fg: Color::White,
    hud_label: Color::DarkGray,
    hud_value: Color::White,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

/// Glyph drawn for each occupied cell. Two columns wide so cells look square.
pub const GLYPH_CELL: &str = "██";

/// Glyph drawn for food.
pub const GLYPH_FOOD: &str = "◆ ";

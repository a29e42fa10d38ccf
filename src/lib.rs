//! Classic Snake: a tick-driven game engine plus a thin ratatui shell.
//!
//! The engine (`game`, `snake`, `food`, `score`, `tick`) knows nothing about
//! terminals or wall-clock time. The shell (`input`, `renderer`, `ui`,
//! `terminal_runtime`) drives it.

pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod tick;
pub mod ui;

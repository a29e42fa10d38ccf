use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use unicode_width::UnicodeWidthStr;

use crate::config::{BoardSize, GLYPH_CELL, GLYPH_FOOD, PALETTE};
use crate::game::{GameStatus, Snapshot};
use crate::snake::Position;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{render_pause_menu, render_result_menu, render_start_menu};

/// Shell-side mode layered on top of the engine status.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Screen {
    Start,
    Running,
    Paused,
}

/// Terminal columns used by one board cell.
#[must_use]
pub fn cell_width() -> u16 {
    u16::try_from(GLYPH_CELL.width()).unwrap_or(1).max(1)
}

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, screen: Screen, interval: Duration) {
    let area = frame.area();
    let [hud_area, field_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let play_area = centered_field(field_area, snapshot.board);
    render_hud(
        frame,
        hud_area,
        &HudInfo {
            score: snapshot.score,
            high_score: snapshot.high_score,
            length: snapshot.segments.len(),
            interval,
        },
    );

    let block = Block::bordered()
        .border_style(Style::new().fg(PALETTE.border_fg))
        .style(Style::new().bg(PALETTE.play_bg));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_food(frame, inner, snapshot);
    render_snake(frame, inner, snapshot);

    // Popups use the whole field area so they stay readable on small boards.
    match (screen, snapshot.status) {
        (Screen::Start, _) => render_start_menu(frame, field_area, snapshot.high_score),
        (_, GameStatus::GameOver | GameStatus::Victory) => {
            render_result_menu(frame, field_area, snapshot);
        }
        (Screen::Paused, GameStatus::Playing) => render_pause_menu(frame, field_area, snapshot),
        (Screen::Running, GameStatus::Playing) => {}
    }
}

/// Bordered field rectangle for `board`, centered and clipped to `area`.
#[must_use]
pub fn centered_field(area: Rect, board: BoardSize) -> Rect {
    let width = board
        .side()
        .saturating_mul(cell_width())
        .saturating_add(2)
        .min(area.width);
    let height = board.side().saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let Some(food) = snapshot.food else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, snapshot.board, food) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_FOOD, Style::new().fg(PALETTE.food));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let last = snapshot.segments.len().saturating_sub(1);
    let buffer = frame.buffer_mut();

    for (index, segment) in snapshot.segments.iter().enumerate() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.board, *segment) else {
            continue;
        };

        let style = if index == 0 {
            Style::new()
                .fg(PALETTE.snake_head)
                .add_modifier(Modifier::BOLD)
        } else if index == last {
            Style::new().fg(PALETTE.snake_tail)
        } else {
            Style::new().fg(PALETTE.snake_body)
        };

        buffer.set_string(x, y, GLYPH_CELL, style);
    }
}

/// Maps a board cell to the terminal column/row of its left edge.
///
/// Returns `None` for cells outside the board or clipped by a small terminal.
#[must_use]
pub fn logical_to_terminal(
    inner: Rect,
    board: BoardSize,
    position: Position,
) -> Option<(u16, u16)> {
    if !position.is_within_bounds(board) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(cell_width())?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(cell_width()) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

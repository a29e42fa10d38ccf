use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::PALETTE;
use crate::game::{DeathReason, GameStatus, Snapshot};

const PLAY_AGAIN: &str = "[Enter]/[Space] Play again";
const QUIT: &str = "[Q]/[Esc] Quit";

/// Draws the start screen.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, high_score: u32) {
    let lines = vec![
        title("SNAKE"),
        Line::from(""),
        Line::from(format!("High score {high_score}")),
        Line::from(""),
        Line::from("[Enter]/[Space] Start"),
        Line::from(QUIT),
        Line::from(""),
        Line::from("Arrows/WASD/hjkl move, [P] pause")
            .style(Style::default().fg(PALETTE.menu_footer)),
    ];
    render_popup(frame, area, " start ", lines);
}

/// Draws the pause screen.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) {
    let lines = vec![
        title("PAUSED"),
        Line::from(""),
        Line::from(format!("Score {}", snapshot.score)),
        Line::from(""),
        Line::from("[P] Resume"),
        Line::from(QUIT),
    ];
    render_popup(frame, area, " pause ", lines);
}

/// Draws the end-of-game summary for a finished snapshot: game over or a
/// cleared board. Draws nothing while the game is still being played.
pub fn render_result_menu(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) {
    let (heading, block_title) = match snapshot.status {
        GameStatus::GameOver => ("GAME OVER", " game over "),
        GameStatus::Victory => ("BOARD CLEARED", " victory "),
        GameStatus::Playing => return,
    };

    let mut lines = vec![title(heading), Line::from("")];
    lines.extend(summary_lines(snapshot));
    lines.push(Line::from(""));
    lines.push(Line::from(PLAY_AGAIN));
    lines.push(Line::from(QUIT));

    render_popup(frame, area, block_title, lines);
}

/// Result lines for a finished game, most important first.
#[must_use]
pub fn summary_lines(snapshot: &Snapshot) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(5);

    if let Some(reason) = snapshot.death_reason {
        lines.push(Line::from(match reason {
            DeathReason::WallCollision => "Ran into the wall",
            DeathReason::SelfCollision => "Bit its own tail",
        }));
    }

    lines.push(Line::from(format!("Score {}", snapshot.score)));
    if snapshot.new_high_score {
        lines.push(
            Line::from(format!("New high score {}!", snapshot.high_score)).style(
                Style::default()
                    .fg(PALETTE.menu_title)
                    .add_modifier(Modifier::BOLD),
            ),
        );
    } else {
        lines.push(Line::from(format!("High score {}", snapshot.high_score)));
    }
    lines.push(Line::from(format!(
        "Length {} after {} ticks",
        snapshot.segments.len(),
        snapshot.tick_count
    )));

    lines
}

fn title(text: &'static str) -> Line<'static> {
    Line::from(text).style(
        Style::default()
            .fg(PALETTE.menu_title)
            .add_modifier(Modifier::BOLD),
    )
}

fn render_popup(frame: &mut Frame<'_>, area: Rect, block_title: &str, lines: Vec<Line<'_>>) {
    let popup = popup_rect(area, &lines);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(block_title)),
        popup,
    );
}

/// Smallest bordered rectangle holding `lines` with one column of padding,
/// centered in `area` and clipped to it.
fn popup_rect(area: Rect, lines: &[Line<'_>]) -> Rect {
    let widest = lines.iter().map(Line::width).max().unwrap_or(0);

    let width = u16::try_from(widest)
        .unwrap_or(u16::MAX)
        .saturating_add(4)
        .min(area.width);
    let height = u16::try_from(lines.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

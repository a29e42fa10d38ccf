use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::PALETTE;

const SEPARATOR: &str = " │ ";

/// Values displayed by the HUD row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct HudInfo {
    pub score: u32,
    pub high_score: u32,
    pub length: usize,
    pub interval: Duration,
}

/// Renders the one-line HUD into `area`.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, info: &HudInfo) {
    frame.render_widget(
        Paragraph::new(info_line(info, usize::from(area.width)))
            .alignment(Alignment::Center)
            .style(Style::default().fg(PALETTE.hud_label)),
        area,
    );
}

/// Builds the HUD line, switching to one-letter labels and then dropping
/// trailing fields until it fits `available_width`.
#[must_use]
pub fn info_line(info: &HudInfo, available_width: usize) -> Line<'static> {
    let mut shown = fields(info, false);
    if line_width(&shown) > available_width {
        shown = fields(info, true);
    }
    while shown.len() > 1 && line_width(&shown) > available_width {
        shown.pop();
    }

    let value_style = Style::default().fg(PALETTE.hud_value);
    let mut spans = Vec::with_capacity(shown.len() * 3);
    for (index, (label, value)) in shown.into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(SEPARATOR));
        }
        spans.push(Span::raw(format!("{label}: ")));
        spans.push(Span::styled(value, value_style));
    }

    Line::from(spans)
}

fn fields(info: &HudInfo, compact: bool) -> Vec<(&'static str, String)> {
    let labels: [&'static str; 4] = if compact {
        ["S", "H", "L", "T"]
    } else {
        ["Score", "Hi", "Length", "Tick"]
    };

    vec![
        (labels[0], info.score.to_string()),
        (labels[1], info.high_score.to_string()),
        (labels[2], info.length.to_string()),
        (labels[3], format!("{}ms", info.interval.as_millis())),
    ]
}

fn line_width(fields: &[(&str, String)]) -> usize {
    let separators = fields.len().saturating_sub(1) * SEPARATOR.width();
    separators
        + fields
            .iter()
            .map(|(label, value)| label.width() + ": ".width() + value.width())
            .sum::<usize>()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{HudInfo, info_line};

    fn info() -> HudInfo {
        HudInfo {
            score: 12,
            high_score: 40,
            length: 13,
            interval: Duration::from_millis(140),
        }
    }

    fn text(width: usize) -> String {
        info_line(&info(), width)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn wide_terminal_shows_full_labels() {
        assert_eq!(
            text(80),
            "Score: 12 │ Hi: 40 │ Length: 13 │ Tick: 140ms"
        );
    }

    #[test]
    fn narrow_terminal_uses_compact_labels() {
        assert_eq!(text(40), "S: 12 │ H: 40 │ L: 13 │ T: 140ms");
    }

    #[test]
    fn very_narrow_terminal_drops_trailing_fields() {
        assert_eq!(text(14), "S: 12 │ H: 40");
        assert_eq!(text(1), "S: 12");
    }
}

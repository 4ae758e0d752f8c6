use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::{HUD_ROWS, Theme};
use crate::game::Snapshot;

const SEPARATOR: &str = " │ ";

/// Renders the HUD row and returns the area left for the board above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot, theme: &Theme) -> Rect {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(HUD_ROWS)]).areas(area);

    frame.render_widget(
        Paragraph::new(info_line(snapshot, theme)).alignment(Alignment::Center),
        hud_area,
    );

    play_area
}

fn info_line(snapshot: &Snapshot, theme: &Theme) -> Line<'static> {
    let label = Style::default().fg(theme.hud_label);
    let value = Style::default().fg(theme.hud_value);

    Line::from(vec![
        Span::styled("Score: ", label),
        Span::styled(snapshot.score.to_string(), value),
        Span::styled(SEPARATOR, label),
        Span::styled("Speed: ", label),
        Span::styled(format!("{}ms", snapshot.tick_interval.as_millis()), value),
        Span::styled(SEPARATOR, label),
        Span::styled(
            format!("{}x{}", snapshot.grid.width, snapshot.grid.height),
            value,
        ),
    ])
}

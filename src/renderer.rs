use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::config::{BORDER_SOLID, GLYPH_TILE, GridSize, TILE_COLUMNS, Theme};
use crate::game::{GameStatus, Snapshot};
use crate::snake::Position;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_start_hint};

/// Renders the full game frame from an immutable snapshot.
///
/// Every frame repaints the whole board; there is no incremental path.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, theme: &Theme) {
    let area = frame.area();
    let field_area = render_hud(frame, area, snapshot, theme);
    let play_area = board_rect(field_area, snapshot.grid);

    let block = Block::bordered()
        .border_set(BORDER_SOLID)
        .border_style(Style::new().fg(theme.border_fg).bg(theme.play_bg))
        .style(Style::new().bg(theme.play_bg));

    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    paint_tile(frame, inner, snapshot.grid, snapshot.food, theme.food, theme);
    for (index, segment) in snapshot.snake.iter().enumerate().rev() {
        let color = if index == 0 {
            theme.snake_head
        } else {
            theme.snake_body
        };
        paint_tile(frame, inner, snapshot.grid, *segment, color, theme);
    }

    match snapshot.status {
        GameStatus::GameOver => render_game_over_menu(
            frame,
            play_area,
            snapshot.score,
            snapshot.death_reason,
            theme,
        ),
        GameStatus::Running if snapshot.heading.is_none() => {
            render_start_hint(frame, play_area, theme);
        }
        GameStatus::Running => {}
    }
}

/// Bordered board rectangle for `grid`, centered and clipped to `area`.
fn board_rect(area: Rect, grid: GridSize) -> Rect {
    let width = grid
        .width
        .saturating_mul(TILE_COLUMNS)
        .saturating_add(2)
        .min(area.width);
    let height = grid.height.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn paint_tile(
    frame: &mut Frame<'_>,
    inner: Rect,
    grid: GridSize,
    position: Position,
    color: ratatui::style::Color,
    theme: &Theme,
) {
    let Some((x, y)) = logical_to_terminal(inner, grid, position) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_TILE, Style::new().fg(color).bg(theme.play_bg));
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(TILE_COLUMNS)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(TILE_COLUMNS) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

//! Main render entry point composing the widgets.
use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tile_core::GameState;

use crate::presentation::{terminal::Tui, widgets};

/// Everything one frame needs.
pub struct RenderContext<'a> {
    pub game: &'a GameState,
    /// Summary of the latest engine events.
    pub status: Option<&'a str>,
    pub last_delta: u64,
    pub queued_moves: usize,
}

/// Draws the HUD, the board, and the footer; the game-over banner is
/// overlaid on the board when no moves remain.
pub fn render(terminal: &mut Tui, ctx: &RenderContext) -> Result<()> {
    terminal.draw(|frame| {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(widgets::board::min_height(ctx.game.board.size())),
                Constraint::Length(3),
            ])
            .split(frame.area());

        widgets::hud::render(frame, layout[0], ctx);

        let board_area = centered(
            layout[1],
            widgets::board::min_width(ctx.game.board.size()),
            widgets::board::min_height(ctx.game.board.size()),
        );
        widgets::board::render(frame, board_area, &ctx.game.board);

        if ctx.game.is_game_over() {
            widgets::game_over::render(frame, board_area, ctx.game);
        }

        widgets::footer::render(frame, layout[2], ctx);
    })?;

    Ok(())
}

/// Centers a `width` x `height` rectangle inside `area`, clamped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

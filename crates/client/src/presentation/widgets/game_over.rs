//! Game-over banner drawn over the board.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};
use tile_core::GameState;

use crate::format::format_score;
use crate::presentation::theme;

pub fn render(frame: &mut Frame, board_area: Rect, game: &GameState) {
    let width = board_area.width.min(28);
    let height = board_area.height.min(5);
    let area = Rect {
        x: board_area.x + (board_area.width - width) / 2,
        y: board_area.y + (board_area.height - height) / 2,
        width,
        height,
    };

    let text = vec![
        Line::styled("Game over", theme::alert()),
        Line::raw(format!("Final score {}", format_score(game.score))),
        Line::styled("[r] Play again", theme::label()),
    ];
    let banner = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(Clear, area);
    frame.render_widget(banner, area);
}

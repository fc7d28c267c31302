//! Board grid widget.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use tile_core::{Board, Position};

use crate::presentation::theme;

const CELL_WIDTH: u16 = 8;
const CELL_HEIGHT: u16 = 3;

pub fn min_width(size: usize) -> u16 {
    CELL_WIDTH * size as u16 + 2
}

pub fn min_height(size: usize) -> u16 {
    CELL_HEIGHT * size as u16 + 2
}

/// Render the board with one coloured cell per position.
pub fn render(frame: &mut Frame, area: Rect, board: &Board) {
    let block = Block::default().borders(Borders::ALL).title(" 1024 ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let size = board.size();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CELL_HEIGHT); size])
        .split(inner);

    for (row, row_area) in rows.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Length(CELL_WIDTH); size])
            .split(*row_area);

        for (col, cell_area) in cells.iter().enumerate() {
            let tile = board.get(Position::new(row, col));
            let value = tile.map_or(0, |tile| tile.value);
            let label = match tile {
                Some(tile) if tile.is_new => format!("{value}*"),
                Some(_) => value.to_string(),
                None => "·".to_string(),
            };

            // Vertically center the label in the cell.
            let mut lines = vec![Line::raw(""); usize::from(CELL_HEIGHT / 2)];
            lines.push(Line::raw(label));

            let cell = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(theme::tile_style(value));
            frame.render_widget(cell, *cell_area);
        }
    }
}

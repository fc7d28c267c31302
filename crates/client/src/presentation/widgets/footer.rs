//! Footer with the latest event summary and key bindings.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::presentation::{theme, ui::RenderContext};

pub fn render(frame: &mut Frame, area: Rect, ctx: &RenderContext) {
    let mut spans = Vec::new();
    if let Some(status) = ctx.status {
        spans.push(Span::styled(status.to_string(), theme::emphasis()));
        spans.push(Span::raw(" | "));
    }
    if ctx.queued_moves > 0 {
        spans.push(Span::raw(format!("{} queued | ", ctx.queued_moves)));
    }
    spans.push(Span::raw("[hjkl/WASD/Arrows] Move | [r] Restart | [q] Quit"));

    let paragraph = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

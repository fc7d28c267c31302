//! Score header.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::format::format_score;
use crate::presentation::{theme, ui::RenderContext};

/// Score, best score, move count, and the last move's score delta.
pub fn render(frame: &mut Frame, area: Rect, ctx: &RenderContext) {
    let game = ctx.game;
    let mut spans = vec![
        Span::styled("Score ", theme::label()),
        Span::styled(format_score(game.score), theme::emphasis()),
        Span::styled("  Best ", theme::label()),
        Span::raw(format_score(game.best_score)),
        Span::styled("  Moves ", theme::label()),
        Span::raw(game.move_count.to_string()),
    ];
    if ctx.last_delta > 0 {
        spans.push(Span::styled(
            format!("  +{}", format_score(ctx.last_delta)),
            theme::emphasis(),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" tile1024 "));
    frame.render_widget(paragraph, area);
}

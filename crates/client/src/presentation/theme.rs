//! Tile colours and shared text styles.

use ratatui::style::{Color, Modifier, Style};

/// Background/foreground pair for a tile value; empty cells use value 0.
pub fn tile_style(value: u32) -> Style {
    let (bg, fg) = match value {
        0 => (Color::Rgb(60, 58, 50), Color::Rgb(120, 115, 100)),
        2 => (Color::Rgb(238, 228, 218), Color::Rgb(119, 110, 101)),
        4 => (Color::Rgb(237, 224, 200), Color::Rgb(119, 110, 101)),
        8 => (Color::Rgb(242, 177, 121), Color::White),
        16 => (Color::Rgb(245, 149, 99), Color::White),
        32 => (Color::Rgb(246, 124, 95), Color::White),
        64 => (Color::Rgb(246, 94, 59), Color::White),
        128 => (Color::Rgb(237, 207, 114), Color::White),
        256 => (Color::Rgb(237, 204, 97), Color::White),
        512 => (Color::Rgb(237, 200, 80), Color::White),
        1024 => (Color::Rgb(237, 197, 63), Color::White),
        _ => (Color::Rgb(60, 58, 50), Color::Rgb(249, 246, 242)),
    };

    let style = Style::default().bg(bg).fg(fg);
    if value >= 128 {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

pub fn label() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn emphasis() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn alert() -> Style {
    Style::default()
        .fg(Color::LightRed)
        .add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_tiles_are_bold() {
        assert!(tile_style(256).add_modifier.contains(Modifier::BOLD));
        assert!(!tile_style(8).add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn values_beyond_the_palette_share_one_style() {
        assert_eq!(tile_style(2048), tile_style(65_536));
    }
}

//! Single-line input holding the raw option text.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

const PLACEHOLDER: &str = "Type the booleans you have, separated by commas";

#[derive(Debug, Default)]
pub struct OptionsInput;

impl OptionsInput {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, text: &str) {
        let block = Block::default()
            .title("Options")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if text.is_empty() {
            let placeholder = Paragraph::new(PLACEHOLDER).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
            frame.render_widget(placeholder, inner);
            frame.set_cursor(inner.x, inner.y);
            return;
        }

        // Keep the cursor visible by scrolling long input horizontally.
        let width = text.chars().count() as u16;
        let offset = width.saturating_sub(inner.width.saturating_sub(1));
        let paragraph = Paragraph::new(text).scroll((0, offset));
        frame.render_widget(paragraph, inner);

        frame.set_cursor(inner.x + width - offset, inner.y);
    }
}

//! Scrollable view of the rendered truth table.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

#[derive(Debug, Default)]
pub struct TableView;

impl TableView {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, rendered: &str, scroll: u16) {
        let block = Block::default()
            .title("Result")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(rendered)
            .block(block)
            .style(Style::default().fg(Color::White))
            .scroll((scroll, 0));
        frame.render_widget(paragraph, area);
    }
}

/// Largest useful scroll offset for `rendered` in a pane `height` rows tall (borders included).
pub fn max_scroll(rendered: &str, height: u16) -> u16 {
    let lines = u16::try_from(rendered.lines().count()).unwrap_or(u16::MAX);
    lines.saturating_sub(height.saturating_sub(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_stops_at_last_page() {
        let rendered = "1\n2\n3\n4\n5\n6";
        assert_eq!(max_scroll(rendered, 4), 4);
        assert_eq!(max_scroll(rendered, 20), 0);
    }
}

//! Sidebar with the combination count, parsed options, and shareable link.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use crate::app::export::combination_summary;
use crate::app::state::Derived;

/// Values shown in the summary panel.
#[derive(Debug, Clone, Default)]
pub struct SummaryData {
    pub url: String,
    pub history_position: usize,
    pub history_len: usize,
    pub option_limit: usize,
}

#[derive(Debug, Default)]
pub struct Summary;

impl Summary {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, derived: &Derived, data: &SummaryData) {
        let block = Block::default().title("Summary").borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(1)])
            .split(inner);

        let header = Paragraph::new(header_lines(derived, data)).wrap(Wrap { trim: false });
        frame.render_widget(header, layout[0]);

        if derived.options.is_empty() {
            let empty = Paragraph::new("No options yet")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true });
            frame.render_widget(empty, layout[1]);
        } else {
            let items: Vec<ListItem<'_>> = derived
                .options
                .iter()
                .enumerate()
                .map(|(idx, name)| ListItem::new(format!("{:>2}. {name}", idx + 1)))
                .collect();
            frame.render_widget(List::new(items), layout[1]);
        }
    }
}

fn header_lines(derived: &Derived, data: &SummaryData) -> Vec<Line<'static>> {
    let count = derived.options.len();
    let headline = match combination_summary(derived.combinations()) {
        Some(text) if count > data.option_limit => Line::styled(
            format!("{text} (over {} options)", data.option_limit),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Some(text) => Line::styled(text, Style::default().add_modifier(Modifier::BOLD)),
        None => Line::styled("No combinations", Style::default().fg(Color::DarkGray)),
    };

    vec![
        headline,
        Line::from(vec![
            Span::styled("history ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!(
                "{}/{}",
                data.history_position + 1,
                data.history_len.max(1)
            )),
        ]),
        Line::styled("link", Style::default().fg(Color::DarkGray)),
        Line::styled(data.url.clone(), Style::default().fg(Color::Cyan)),
    ]
}

pub mod prescriptions;
pub mod team;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::styles;

/// Height of the statistic card row, borders included
pub const STAT_CARD_HEIGHT: u16 = 4;

/// A row of equal-width cards, each a label over a count
pub fn render_stat_cards(frame: &mut Frame, area: Rect, cards: &[(&str, usize)]) {
    let constraints: Vec<Constraint> = cards
        .iter()
        .map(|_| Constraint::Ratio(1, cards.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for ((label, value), chunk) in cards.iter().zip(chunks.iter()) {
        let lines = vec![
            Line::from(Span::styled(value.to_string(), styles::stat_value_style())),
            Line::from(Span::styled(*label, styles::muted_style())),
        ];
        let card = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(styles::border_style(false)),
            );
        frame.render_widget(card, *chunk);
    }
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use caredesk_core::models::PrincipalKind;

use crate::app::{App, AppState, Screen, Tab};

use super::forms;
use super::styles;
use super::tabs::{prescriptions, team};

const PRODUCT_NAME: &str = "  CareDesk";

pub fn render(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::Auth => forms::render(frame, app, frame.area()),
        Screen::Dashboard => render_dashboard(frame, app),
    }

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_confirm_overlay(
            frame,
            "Are you sure you want to quit?",
            " to quit, ",
        ),
        AppState::ConfirmingLogout => render_confirm_overlay(
            frame,
            "Sign out of this device?",
            " to sign out, ",
        ),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_dashboard(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Length(2), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut right = vec![];
    if let Some(ref signed_in) = app.signed_in {
        right.push(Span::styled(
            signed_in.display_name().to_string(),
            styles::list_item_style(),
        ));
        if signed_in.kind == PrincipalKind::Admin {
            right.push(Span::styled(" [Admin]", styles::highlight_style()));
        }
        right.push(Span::styled("  |  ", styles::muted_style()));
    }
    right.push(Span::styled("[?] Help ", styles::muted_style()));

    let right_len: usize = right.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize)
        .saturating_sub(PRODUCT_NAME.len() + right_len);

    let mut spans = vec![
        Span::styled(PRODUCT_NAME, styles::title_style()),
        Span::raw(" ".repeat(padding)),
    ];
    spans.extend(right);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in [Tab::Prescriptions, Tab::Team].iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if app.current_tab == *tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Prescriptions => prescriptions::render(frame, app, area),
        Tab::Team => team::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[1-2] tabs | [L]ogout | [q]uit";

    let left_text = match (&app.status_message, &app.signed_in) {
        (Some(msg), _) => format!(" {} ", msg),
        (None, Some(signed_in)) => format!(" Signed in as {} ", signed_in.kind.label()),
        (None, None) => String::new(),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 19, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(PRODUCT_NAME, styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-2", "Switch tabs"),
        help_line("←/→ Tab", "Previous/next tab"),
        help_line("↑/↓ j/k", "Move selection"),
        help_line("PgUp/PgDn", "Scroll a page"),
        help_line("Home/End", "First/last row"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("L", "Sign out"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

fn render_confirm_overlay(frame: &mut Frame, question: &str, confirm_hint: &str) {
    let area = centered_rect_fixed(46, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("   {}", question),
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(confirm_hint.to_string(), styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use caredesk_core::models::TeamMember;
use caredesk_core::utils::{format_date, format_phone, truncate_string};

use super::{render_stat_cards, STAT_CARD_HEIGHT};
use crate::app::App;
use crate::ui::{is_wide, styles};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(STAT_CARD_HEIGHT), Constraint::Min(5)])
        .split(area);

    let stats = &app.team_stats;
    render_stat_cards(
        frame,
        chunks[0],
        &[
            ("Members", stats.total),
            ("Active", stats.active),
            ("On leave", stats.on_leave),
            ("Departments", stats.departments),
        ],
    );

    render_table(frame, app, chunks[1]);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let wide = is_wide(area.width);

    let header_cells: Vec<Cell> = if wide {
        vec!["", "Name", "Role", "Department", "Email", "Phone", "Joined", "Status"]
    } else {
        vec!["", "Name", "Role", "Status"]
    }
    .into_iter()
    .map(Cell::from)
    .collect();

    let header = Row::new(header_cells)
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = app
        .team
        .iter()
        .map(|member| if wide { wide_row(member) } else { narrow_row(member) })
        .collect();

    let widths: Vec<Constraint> = if wide {
        vec![
            Constraint::Length(4),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(3),
            Constraint::Length(15),
            Constraint::Length(13),
            Constraint::Length(9),
        ]
    } else {
        vec![
            Constraint::Length(4),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(9),
        ]
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Team ({}) ", app.team.len()))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.team_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn avatar_cell(member: &TeamMember) -> Cell<'static> {
    Cell::from(Span::styled(member.initials(), styles::highlight_style()))
}

fn status_cell(member: &TeamMember) -> Cell<'static> {
    Cell::from(Span::styled(
        member.status.to_string(),
        styles::badge_style(member.status.badge()),
    ))
}

fn wide_row(member: &TeamMember) -> Row<'static> {
    let phone = member
        .phone
        .as_deref()
        .map(format_phone)
        .unwrap_or_else(|| "-".to_string());

    Row::new(vec![
        avatar_cell(member),
        Cell::from(member.name.clone()),
        Cell::from(member.role.clone()),
        Cell::from(member.department.clone()),
        Cell::from(Span::styled(member.email.clone(), styles::muted_style())),
        Cell::from(phone),
        Cell::from(format_date(member.joined_on)),
        status_cell(member),
    ])
    .style(styles::list_item_style())
}

fn narrow_row(member: &TeamMember) -> Row<'static> {
    Row::new(vec![
        avatar_cell(member),
        Cell::from(truncate_string(&member.name, 24)),
        Cell::from(truncate_string(&member.role, 22)),
        status_cell(member),
    ])
    .style(styles::list_item_style())
}

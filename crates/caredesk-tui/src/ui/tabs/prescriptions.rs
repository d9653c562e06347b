use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use caredesk_core::models::Prescription;
use caredesk_core::utils::{format_date, truncate_string};

use super::{render_stat_cards, STAT_CARD_HEIGHT};
use crate::app::App;
use crate::ui::{is_wide, styles};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(STAT_CARD_HEIGHT), Constraint::Min(5)])
        .split(area);

    let stats = &app.prescription_stats;
    render_stat_cards(
        frame,
        chunks[0],
        &[
            ("Total", stats.total),
            ("Active", stats.active),
            ("Pending", stats.pending),
            ("Completed", stats.completed),
        ],
    );

    render_table(frame, app, chunks[1]);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let wide = is_wide(area.width);

    let header_cells: Vec<Cell> = if wide {
        vec!["ID", "Patient", "Medication", "Dosage", "Prescriber", "Issued", "Refills", "Status"]
    } else {
        vec!["Patient", "Medication", "Status"]
    }
    .into_iter()
    .map(Cell::from)
    .collect();

    let header = Row::new(header_cells)
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = app
        .prescriptions
        .iter()
        .map(|rx| if wide { wide_row(rx) } else { narrow_row(rx) })
        .collect();

    let widths: Vec<Constraint> = if wide {
        vec![
            Constraint::Length(9),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(2),
            Constraint::Length(13),
            Constraint::Length(7),
            Constraint::Length(10),
        ]
    } else {
        vec![Constraint::Fill(2), Constraint::Fill(2), Constraint::Length(10)]
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Prescriptions ({}) ", app.prescriptions.len()))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.prescription_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn status_cell(rx: &Prescription) -> Cell<'static> {
    Cell::from(Span::styled(
        rx.status.to_string(),
        styles::badge_style(rx.status.badge()),
    ))
}

fn wide_row(rx: &Prescription) -> Row<'static> {
    Row::new(vec![
        Cell::from(Span::styled(rx.id.clone(), styles::muted_style())),
        Cell::from(rx.patient_name.clone()),
        Cell::from(rx.medication.clone()),
        Cell::from(rx.dosage.clone()),
        Cell::from(rx.prescriber.clone()),
        Cell::from(format_date(rx.issued_on)),
        Cell::from(format!("{:>5}", rx.refills)),
        status_cell(rx),
    ])
    .style(styles::list_item_style())
}

fn narrow_row(rx: &Prescription) -> Row<'static> {
    Row::new(vec![
        Cell::from(truncate_string(&rx.patient_name, 24)),
        Cell::from(truncate_string(&rx.medication, 24)),
        status_cell(rx),
    ])
    .style(styles::list_item_style())
}

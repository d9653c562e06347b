//! Sign-in and sign-up views.
//!
//! Wide terminals get a brand panel beside the form with labels inline;
//! narrow ones get the form alone with labels stacked above each field. Both
//! draw the same `AuthForm` and share the submit, alert and footer lines.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use caredesk_core::auth::AuthPhase;
use caredesk_core::models::PrincipalKind;

use super::render::centered_rect_fixed;
use super::{is_wide, styles};
use crate::app::App;
use crate::form::{AuthForm, FormField, FormMode};

/// Title of the inline error alert
pub const ALERT_TITLE: &str = "Authentication failed";

/// Interior width of the input boxes
const FIELD_WIDTH: usize = 32;

/// Form panel width, borders included
const FORM_WIDTH: u16 = 56;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if is_wide(area.width) {
        render_wide(frame, app, area);
    } else {
        render_narrow(frame, app, area);
    }
}

fn render_wide(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_brand_panel(frame, chunks[0]);

    let mut lines = heading_lines(&app.form);
    for field in app.form.fields().iter().filter(|f| f.is_text()) {
        lines.push(inline_field_line(&app.form, *field));
    }
    lines.push(Line::from(""));
    finish_form(frame, app, lines, chunks[1]);
}

fn render_narrow(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = heading_lines(&app.form);
    for field in app.form.fields().iter().filter(|f| f.is_text()) {
        lines.extend(stacked_field_lines(&app.form, *field));
    }
    finish_form(frame, app, lines, area);
}

/// Shared tail of both layouts: kind toggle, submit, link, messages
fn finish_form(frame: &mut Frame, app: &App, mut lines: Vec<Line<'static>>, area: Rect) {
    let form = &app.form;

    lines.push(kind_toggle_line(form));
    lines.push(Line::from(""));
    lines.push(submit_line(form, app.is_busy()));
    lines.push(switch_mode_line(form));

    if let Some(ref message) = form.validation_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", message),
            styles::error_style(),
        )));
    }

    let status = &app.auth_status;
    if let (AuthPhase::Failed, Some(message)) = (status.phase(), status.error()) {
        lines.extend(alert_lines(message));
    }

    if let Some(ref message) = app.status_message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", message),
            styles::muted_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(footer_line());

    // Wrapped alert text can take a couple of extra rows
    let height = lines.len() as u16 + 4;
    let panel = centered_rect_fixed(FORM_WIDTH, height, area);

    let title = match form.mode {
        FormMode::Login => " Sign in ",
        FormMode::Signup => " Create account ",
    };
    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, panel);
}

fn render_brand_panel(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  CareDesk", styles::title_style())),
        Line::from(Span::styled(
            "  Operations console for clinics",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  • ", styles::highlight_style()),
            Span::styled("Track prescriptions by status", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  • ", styles::highlight_style()),
            Span::styled("See who is on the care team", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  • ", styles::highlight_style()),
            Span::styled("Staff and administrator access", styles::help_desc_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn heading_lines(form: &AuthForm) -> Vec<Line<'static>> {
    let subtitle = match form.mode {
        FormMode::Login => "Welcome back. Sign in to continue.",
        FormMode::Signup => "Set up your account to get started.",
    };
    vec![
        Line::from(Span::styled(format!(" {}", subtitle), styles::muted_style())),
        Line::from(""),
    ]
}

fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::FullName => "Full name",
        FormField::Email => "Email",
        FormField::Password => "Password",
        FormField::Phone => "Phone (optional)",
        FormField::Kind => "Account type",
        FormField::Submit | FormField::SwitchMode => "",
    }
}

/// What the input box shows: masked for passwords, tail-truncated to fit
fn field_display(form: &AuthForm, field: FormField) -> String {
    let value = match field {
        FormField::FullName => form.full_name.clone(),
        FormField::Email => form.email.clone(),
        FormField::Password => "•".repeat(form.password.chars().count()),
        FormField::Phone => form.phone.clone(),
        _ => String::new(),
    };
    let cursor = if form.focus == field { "▌" } else { "" };
    let room = FIELD_WIDTH.saturating_sub(cursor.chars().count());

    let count = value.chars().count();
    let visible: String = if count > room {
        value.chars().skip(count - room).collect()
    } else {
        value
    };
    format!("{:<width$}", format!("{}{}", visible, cursor), width = FIELD_WIDTH)
}

fn inline_field_line(form: &AuthForm, field: FormField) -> Line<'static> {
    let focused = form.focus == field;
    Line::from(vec![
        Span::styled(format!(" {:<10}[", short_label(field)), styles::muted_style()),
        Span::styled(field_display(form, field), styles::field_style(focused)),
        Span::styled("]", styles::muted_style()),
    ])
}

fn stacked_field_lines(form: &AuthForm, field: FormField) -> Vec<Line<'static>> {
    let focused = form.focus == field;
    vec![
        Line::from(Span::styled(format!(" {}", field_label(field)), styles::muted_style())),
        Line::from(vec![
            Span::styled(" [", styles::muted_style()),
            Span::styled(field_display(form, field), styles::field_style(focused)),
            Span::styled("]", styles::muted_style()),
        ]),
    ]
}

/// Inline labels have to fit a fixed column
fn short_label(field: FormField) -> &'static str {
    match field {
        FormField::FullName => "Name",
        FormField::Phone => "Phone",
        other => field_label(other),
    }
}

fn kind_toggle_line(form: &AuthForm) -> Line<'static> {
    let focused = form.focus == FormField::Kind;
    let option = |kind: PrincipalKind| {
        let marker = if form.kind == kind { "(•)" } else { "( )" };
        format!("{} {}", marker, kind.label())
    };
    Line::from(vec![
        Span::styled(format!(" {}: ", field_label(FormField::Kind)), styles::muted_style()),
        Span::styled(
            format!(
                "{}  {}",
                option(PrincipalKind::User),
                option(PrincipalKind::Admin)
            ),
            styles::field_style(focused),
        ),
    ])
}

/// Button caption for the current mode
pub fn submit_label(mode: FormMode, busy: bool) -> &'static str {
    match (mode, busy) {
        (FormMode::Login, false) => "Sign in",
        (FormMode::Login, true) => "Signing in…",
        (FormMode::Signup, false) => "Create account",
        (FormMode::Signup, true) => "Creating account…",
    }
}

fn submit_line(form: &AuthForm, busy: bool) -> Line<'static> {
    let focused = form.focus == FormField::Submit;
    let label = submit_label(form.mode, busy);
    let caption = if focused && !busy {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    let style = if busy {
        styles::muted_style()
    } else {
        styles::field_style(focused)
    };
    Line::from(vec![
        Span::raw("            ["),
        Span::styled(caption, style),
        Span::raw("]"),
    ])
}

fn switch_mode_line(form: &AuthForm) -> Line<'static> {
    let focused = form.focus == FormField::SwitchMode;
    let (prompt, link) = match form.mode {
        FormMode::Login => ("No account yet? ", "Create one"),
        FormMode::Signup => ("Already registered? ", "Sign in"),
    };
    let link_style = if focused {
        styles::selected_style()
    } else {
        styles::highlight_style()
    };
    Line::from(vec![
        Span::styled(format!(" {}", prompt), styles::muted_style()),
        Span::styled(link, link_style),
    ])
}

fn alert_lines(message: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(format!(" ! {}", ALERT_TITLE), styles::alert_title_style())),
        Line::from(Span::styled(format!("   {}", message), styles::error_style())),
    ]
}

fn footer_line() -> Line<'static> {
    Line::from(vec![
        Span::styled(" Tab/↑↓", styles::help_key_style()),
        Span::styled(" move  ", styles::muted_style()),
        Span::styled("Enter", styles::help_key_style()),
        Span::styled(" select  ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" quit", styles::muted_style()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_labels() {
        assert_eq!(submit_label(FormMode::Login, false), "Sign in");
        assert_eq!(submit_label(FormMode::Login, true), "Signing in…");
        assert_eq!(submit_label(FormMode::Signup, true), "Creating account…");
    }

    #[test]
    fn test_password_is_masked() {
        let mut form = AuthForm::new(
            "a@b.com".to_string(),
            "hunter2".to_string(),
            PrincipalKind::User,
        );
        form.focus = FormField::Email;
        let shown = field_display(&form, FormField::Password);
        assert!(!shown.contains("hunter2"));
        assert!(shown.starts_with("•••••••"));
    }

    #[test]
    fn test_long_values_show_their_tail() {
        let email = format!("{}@clinic.test", "x".repeat(60));
        let form = AuthForm::new(email, String::new(), PrincipalKind::User);
        let shown = field_display(&form, FormField::Email);
        assert_eq!(shown.chars().count(), FIELD_WIDTH);
        assert!(shown.trim_end().ends_with("@clinic.test"));
    }
}

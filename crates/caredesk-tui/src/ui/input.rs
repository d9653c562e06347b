//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Screen, Tab, PAGE_SCROLL_SIZE};
use crate::form::FormField;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    // Handle logout confirmation
    if matches!(app.state, AppState::ConfirmingLogout) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Normal;
                app.request_logout();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    match app.screen {
        Screen::Auth => handle_auth_input(app, key),
        Screen::Dashboard => handle_dashboard_input(app, key),
    }
}

fn handle_auth_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            // Quit if on sign-in screen
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Down | KeyCode::Tab => app.form.focus_next(),
        KeyCode::Up | KeyCode::BackTab => app.form.focus_prev(),
        KeyCode::Left | KeyCode::Right if app.form.focus == FormField::Kind => {
            app.form.toggle_kind()
        }
        KeyCode::Enter => activate(app),
        KeyCode::Char(' ') if !app.form.focus.is_text() => activate(app),
        KeyCode::Backspace => app.form.pop_char(),
        KeyCode::Char(c) => {
            app.form.push_char(c);
        }
        _ => {}
    }
    false
}

/// Enter on the focused control
fn activate(app: &mut App) {
    match app.form.focus {
        FormField::Kind => app.form.toggle_kind(),
        FormField::Submit => app.submit_form(),
        FormField::SwitchMode => app.form.switch_mode(),
        // Move to the next field
        _ => app.form.focus_next(),
    }
}

fn handle_dashboard_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('L') => {
            if !app.is_signing_out() {
                app.state = AppState::ConfirmingLogout;
            }
        }
        KeyCode::Char('1') => app.current_tab = Tab::Prescriptions,
        KeyCode::Char('2') => app.current_tab = Tab::Team,
        KeyCode::Right | KeyCode::Tab => app.current_tab = app.current_tab.next(),
        KeyCode::Left | KeyCode::BackTab => app.current_tab = app.current_tab.prev(),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        _ => {}
    }
    false
}

//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_field_char, can_add_password_char, can_add_username_char, App, AppState, LoginFocus,
    Tab, PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle login overlay
    if matches!(app.state, AppState::LoggingIn) {
        return handle_login_input(app, key).await;
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle delete confirmation
    if matches!(app.state, AppState::ConfirmingDelete) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.confirm_delete();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.cancel_delete();
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle entity form
    if matches!(app.state, AppState::EditingForm) {
        handle_form_input(app, key);
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('1') => {
            app.current_tab = Tab::Dashboard;
        }
        KeyCode::Char('2') => {
            app.current_tab = Tab::Sales;
        }
        KeyCode::Char('3') => {
            app.current_tab = Tab::Inventory;
        }
        KeyCode::Char('4') => {
            app.current_tab = Tab::Customers;
        }
        KeyCode::Char('5') => {
            app.current_tab = Tab::Analytics;
        }
        KeyCode::Char('6') => {
            app.current_tab = Tab::Expenses;
        }
        KeyCode::Left => {
            app.current_tab = app.current_tab.prev();
        }
        KeyCode::Right | KeyCode::Tab => {
            app.current_tab = app.current_tab.next();
        }
        KeyCode::Up => {
            app.move_selection(-1);
        }
        KeyCode::Down => {
            app.move_selection(1);
        }
        KeyCode::PageUp => {
            app.move_selection(-(PAGE_SCROLL_SIZE as isize));
        }
        KeyCode::PageDown => {
            app.move_selection(PAGE_SCROLL_SIZE as isize);
        }
        KeyCode::Home => {
            app.move_selection(isize::MIN / 2);
        }
        KeyCode::End => {
            app.move_selection(isize::MAX / 2);
        }
        KeyCode::Char('u') => {
            app.refresh_all_background();
        }
        KeyCode::Char('l') => {
            app.logout();
        }
        KeyCode::Char('a') => {
            app.open_add_form();
        }
        KeyCode::Char('e') => {
            app.open_edit_form();
        }
        KeyCode::Char('d') => {
            app.request_delete();
        }
        _ => {}
    }

    Ok(false)
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => {
                app.login_focus = LoginFocus::Password;
            }
            LoginFocus::Password | LoginFocus::Button => {
                // On success the state moves to Normal and a refresh is
                // already underway; on failure login_error is set.
                app.attempt_login().await;
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.len(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.cancel_form();
        }
        KeyCode::Enter => {
            app.submit_form();
        }
        KeyCode::Down | KeyCode::Tab => {
            if let Some(ref mut form) = app.form {
                form.focus_next();
            }
        }
        KeyCode::Up | KeyCode::BackTab => {
            if let Some(ref mut form) = app.form {
                form.focus_prev();
            }
        }
        KeyCode::Backspace => {
            if let Some(ref mut form) = app.form {
                let focus = form.focus;
                if let Some(field) = form.fields.get_mut(focus) {
                    field.value.pop();
                }
            }
        }
        KeyCode::Char(c) => {
            if let Some(ref mut form) = app.form {
                let focus = form.focus;
                if let Some(field) = form.fields.get_mut(focus) {
                    if can_add_field_char(field.value.len(), c) {
                        field.value.push(c);
                    }
                }
            }
        }
        _ => {}
    }
}

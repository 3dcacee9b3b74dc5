//! Keyboard event handling.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppState, FieldKind, Tab};

/// Handle a key event. Returns true when the application should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::LoggingIn => handle_login_input(app, key).await,
        AppState::Registering => handle_register_input(app, key).await,
        AppState::AddingProject => handle_project_form_input(app, key).await,
        AppState::AddingMilestone => handle_milestone_form_input(app, key).await,
        AppState::AddingDocument => handle_document_form_input(app, key).await,
        AppState::ConfirmingDelete => handle_delete_confirm_input(app, key).await,
        AppState::Normal => handle_normal_input(app, key),
        AppState::Quitting => Ok(true),
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.start_register();
        return Ok(false);
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab => {
            app.login_form.focus = (app.login_form.focus + 1) % 2;
        }
        KeyCode::Enter => {
            app.attempt_login().await;
        }
        KeyCode::Esc => {
            // Only an already-authenticated user has a view to go back to.
            if app.is_authenticated() {
                app.state = AppState::Normal;
            }
        }
        KeyCode::Backspace => {
            match app.login_form.focus {
                0 => app.login_form.username.pop(),
                _ => app.login_form.password.pop(),
            };
        }
        KeyCode::Char(c) => match app.login_form.focus {
            0 => App::push_field_char(&mut app.login_form.username, c, FieldKind::Username),
            _ => App::push_field_char(&mut app.login_form.password, c, FieldKind::Password),
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_register_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            app.register_form.focus = (app.register_form.focus + 1) % 4;
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.register_form.focus = (app.register_form.focus + 3) % 4;
        }
        KeyCode::Enter => {
            app.attempt_register().await;
        }
        KeyCode::Esc => {
            app.start_login();
        }
        KeyCode::Left if app.register_form.focus == 3 => {
            app.register_form.role_index = (app.register_form.role_index + 3) % 4;
        }
        KeyCode::Right if app.register_form.focus == 3 => {
            app.register_form.role_index = (app.register_form.role_index + 1) % 4;
        }
        KeyCode::Backspace => {
            match app.register_form.focus {
                0 => app.register_form.full_name.pop(),
                1 => app.register_form.username.pop(),
                2 => app.register_form.password.pop(),
                _ => None,
            };
        }
        KeyCode::Char(c) => match app.register_form.focus {
            0 => App::push_field_char(&mut app.register_form.full_name, c, FieldKind::Text),
            1 => App::push_field_char(&mut app.register_form.username, c, FieldKind::Username),
            2 => App::push_field_char(&mut app.register_form.password, c, FieldKind::Password),
            _ => {}
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_project_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            app.project_form.focus = (app.project_form.focus + 1) % 4;
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.project_form.focus = (app.project_form.focus + 3) % 4;
        }
        KeyCode::Enter => {
            app.submit_project_form().await;
        }
        KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            project_form_field(app).pop();
        }
        KeyCode::Char(c) => {
            App::push_field_char(project_form_field(app), c, FieldKind::Text);
        }
        _ => {}
    }
    Ok(false)
}

fn project_form_field(app: &mut App) -> &mut String {
    match app.project_form.focus {
        0 => &mut app.project_form.title,
        1 => &mut app.project_form.summary,
        2 => &mut app.project_form.start_date,
        _ => &mut app.project_form.end_date,
    }
}

async fn handle_milestone_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::BackTab | KeyCode::Up => {
            app.milestone_form.focus = (app.milestone_form.focus + 1) % 2;
        }
        KeyCode::Enter => {
            app.submit_milestone_form().await;
        }
        KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            milestone_form_field(app).pop();
        }
        KeyCode::Char(c) => {
            App::push_field_char(milestone_form_field(app), c, FieldKind::Text);
        }
        _ => {}
    }
    Ok(false)
}

fn milestone_form_field(app: &mut App) -> &mut String {
    match app.milestone_form.focus {
        0 => &mut app.milestone_form.title,
        _ => &mut app.milestone_form.due_date,
    }
}

async fn handle_document_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::BackTab | KeyCode::Up => {
            app.document_form.focus = (app.document_form.focus + 1) % 2;
        }
        KeyCode::Enter => {
            app.submit_document_form().await;
        }
        KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            document_form_field(app).pop();
        }
        KeyCode::Char(c) => {
            App::push_field_char(document_form_field(app), c, FieldKind::Text);
        }
        _ => {}
    }
    Ok(false)
}

fn document_form_field(app: &mut App) -> &mut String {
    match app.document_form.focus {
        0 => &mut app.document_form.title,
        _ => &mut app.document_form.path,
    }
}

async fn handle_delete_confirm_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.confirm_delete().await;
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.cancel_delete();
        }
        _ => {}
    }
    Ok(false)
}

fn handle_normal_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if !app.is_authenticated() {
        app.start_login();
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => app.state = AppState::Quitting,
        KeyCode::Tab | KeyCode::Right => app.next_tab(),
        KeyCode::BackTab | KeyCode::Left => app.prev_tab(),
        KeyCode::Char(c @ '1'..='5') => {
            let visible: Vec<Tab> = Tab::ALL
                .into_iter()
                .filter(|t| app.tab_visible(*t))
                .collect();
            let index = (c as usize) - ('1' as usize);
            if let Some(tab) = visible.get(index) {
                app.select_tab(*tab);
            }
        }
        KeyCode::Up => move_selection(app, -1),
        KeyCode::Down => move_selection(app, 1),
        KeyCode::Enter if app.current_tab == Tab::Projects => {
            // Drill into the selected project's milestones, like the View
            // link on the web projects table.
            if !app.projects.is_empty() {
                app.active_project = app.project_selection;
                app.milestones.clear();
                app.documents.clear();
                app.active_project_detail = None;
                app.select_tab(Tab::Milestones);
                app.refresh_active_project();
            }
        }
        KeyCode::Char('n') => match app.current_tab {
            Tab::Projects => app.state = AppState::AddingProject,
            Tab::Milestones if !app.projects.is_empty() => {
                app.state = AppState::AddingMilestone;
            }
            Tab::Documents if !app.projects.is_empty() => {
                app.state = AppState::AddingDocument;
            }
            _ => {}
        },
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('r') => app.refresh_all(),
        KeyCode::Char('[') => {
            if matches!(app.current_tab, Tab::Milestones | Tab::Documents) {
                app.cycle_active_project(false);
            }
        }
        KeyCode::Char(']') => {
            if matches!(app.current_tab, Tab::Milestones | Tab::Documents) {
                app.cycle_active_project(true);
            }
        }
        KeyCode::Char('l') => app.logout(),
        _ => {}
    }
    Ok(false)
}

fn move_selection(app: &mut App, delta: isize) {
    let (selection, len) = match app.current_tab {
        Tab::Projects => (&mut app.project_selection, app.projects.len()),
        Tab::Milestones => (&mut app.milestone_selection, app.milestones.len()),
        Tab::Documents => (&mut app.document_selection, app.documents.len()),
        _ => return,
    };
    if len == 0 {
        return;
    }
    let current = *selection as isize;
    *selection = (current + delta).clamp(0, len as isize - 1) as usize;
}

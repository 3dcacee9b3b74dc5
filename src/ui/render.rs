//! Main frame rendering and layout.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, AppState, Tab};
use crate::ui::{styles, tabs};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_tab_bar(frame, app, chunks[0]);

    match app.state {
        AppState::LoggingIn => render_login(frame, app, chunks[1]),
        AppState::Registering => render_register(frame, app, chunks[1]),
        _ => {
            match app.current_tab {
                Tab::Projects => tabs::projects::render(frame, app, chunks[1]),
                Tab::Milestones => tabs::milestones::render(frame, app, chunks[1]),
                Tab::Documents => tabs::documents::render(frame, app, chunks[1]),
                Tab::Account => tabs::account::render(frame, app, chunks[1]),
                Tab::Admin => tabs::admin::render(frame, app, chunks[1]),
            }

            match app.state {
                AppState::AddingProject => render_project_form(frame, app),
                AppState::AddingMilestone => render_milestone_form(frame, app),
                AppState::AddingDocument => render_document_form(frame, app),
                AppState::ConfirmingDelete => render_delete_confirm(frame, app),
                _ => {}
            }
        }
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Research Tracker ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    if !app.is_authenticated() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Login | Register",
            styles::muted_style(),
        )))
        .block(block)
        .alignment(Alignment::Right);
        frame.render_widget(hint, area);
        return;
    }

    // The Admin tab only appears for ADMIN users, like the web navbar.
    let visible: Vec<Tab> = Tab::ALL
        .into_iter()
        .filter(|t| app.tab_visible(*t))
        .collect();
    let selected = visible
        .iter()
        .position(|t| *t == app.current_tab)
        .unwrap_or(0);

    let titles: Vec<Line> = visible
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Line::from(Span::styled(
                format!("{} {}", i + 1, t.title()),
                styles::tab_style(*t == app.current_tab),
            ))
        })
        .collect();

    let user_info = app
        .session
        .identity()
        .map(|c| format!(" {} ({}) ", c.sub, c.role))
        .unwrap_or_default();

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(block.title_bottom(Line::from(user_info).right_aligned()));
    frame.render_widget(tabs, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let text = match app.status_message {
        Some(ref msg) => Line::from(Span::raw(msg.clone())),
        None => match app.state {
            AppState::LoggingIn => Line::from(vec![
                Span::styled("Enter", styles::help_key_style()),
                Span::raw(" login  "),
                Span::styled("Ctrl+R", styles::help_key_style()),
                Span::raw(" register  "),
                Span::styled("Ctrl+C", styles::help_key_style()),
                Span::raw(" quit"),
            ]),
            AppState::Registering => Line::from(vec![
                Span::styled("Tab", styles::help_key_style()),
                Span::raw(" next field  "),
                Span::styled("Enter", styles::help_key_style()),
                Span::raw(" submit  "),
                Span::styled("Esc", styles::help_key_style()),
                Span::raw(" back to login"),
            ]),
            _ => Line::from(vec![
                Span::styled("Tab", styles::help_key_style()),
                Span::raw(" switch  "),
                Span::styled("n", styles::help_key_style()),
                Span::raw(" new  "),
                Span::styled("d", styles::help_key_style()),
                Span::raw(" delete  "),
                Span::styled("r", styles::help_key_style()),
                Span::raw(" refresh  "),
                Span::styled("l", styles::help_key_style()),
                Span::raw(" logout  "),
                Span::styled("q", styles::help_key_style()),
                Span::raw(" quit"),
            ]),
        },
    };

    frame.render_widget(
        Paragraph::new(text).style(styles::status_bar_style()),
        area,
    );
}

// ============================================================================
// Login / registration
// ============================================================================

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let panel = centered_rect(50, 12, area);
    let block = Block::default()
        .title(" Login ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let form = &app.login_form;
    let mut lines = vec![
        Line::from(""),
        field_line("Username", &form.username, form.focus == 0, false),
        Line::from(""),
        field_line("Password", &form.password, form.focus == 1, true),
        Line::from(""),
    ];
    if let Some(ref error) = form.error {
        lines.push(Line::from(Span::styled(error.clone(), styles::error_style())));
    }

    frame.render_widget(Clear, panel);
    frame.render_widget(Paragraph::new(lines).block(block), panel);
}

fn render_register(frame: &mut Frame, app: &App, area: Rect) {
    let panel = centered_rect(54, 16, area);
    let block = Block::default()
        .title(" Register ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let form = &app.register_form;
    let role_value = format!("< {} >", form.role());
    let mut lines = vec![
        Line::from(""),
        field_line("Full Name", &form.full_name, form.focus == 0, false),
        Line::from(""),
        field_line("Username", &form.username, form.focus == 1, false),
        Line::from(""),
        field_line("Password", &form.password, form.focus == 2, true),
        Line::from(""),
        field_line("Role", &role_value, form.focus == 3, false),
        Line::from(""),
    ];
    if let Some(ref error) = form.error {
        lines.push(Line::from(Span::styled(error.clone(), styles::error_style())));
    }

    frame.render_widget(Clear, panel);
    frame.render_widget(Paragraph::new(lines).block(block), panel);
}

// ============================================================================
// Form overlays
// ============================================================================

fn render_project_form(frame: &mut Frame, app: &App) {
    let panel = centered_rect(56, 14, frame.area());
    let block = form_block(" New Project ");

    let form = &app.project_form;
    let lines = vec![
        Line::from(""),
        field_line("Title", &form.title, form.focus == 0, false),
        Line::from(""),
        field_line("Summary", &form.summary, form.focus == 1, false),
        Line::from(""),
        field_line("Start Date", &form.start_date, form.focus == 2, false),
        Line::from(""),
        field_line("End Date", &form.end_date, form.focus == 3, false),
        Line::from(""),
        date_hint(),
    ];

    frame.render_widget(Clear, panel);
    frame.render_widget(Paragraph::new(lines).block(block), panel);
}

fn render_milestone_form(frame: &mut Frame, app: &App) {
    let panel = centered_rect(56, 10, frame.area());
    let block = form_block(" New Milestone ");

    let form = &app.milestone_form;
    let lines = vec![
        Line::from(""),
        field_line("Title", &form.title, form.focus == 0, false),
        Line::from(""),
        field_line("Due Date", &form.due_date, form.focus == 1, false),
        Line::from(""),
        date_hint(),
    ];

    frame.render_widget(Clear, panel);
    frame.render_widget(Paragraph::new(lines).block(block), panel);
}

fn render_document_form(frame: &mut Frame, app: &App) {
    let panel = centered_rect(60, 10, frame.area());
    let block = form_block(" Upload Document ");

    let form = &app.document_form;
    let lines = vec![
        Line::from(""),
        field_line("Title", &form.title, form.focus == 0, false),
        Line::from(""),
        field_line("File Path", &form.path, form.focus == 1, false),
        Line::from(""),
        Line::from(Span::styled(
            "Path to a local file to upload",
            styles::muted_style(),
        )),
    ];

    frame.render_widget(Clear, panel);
    frame.render_widget(Paragraph::new(lines).block(block), panel);
}

fn render_delete_confirm(frame: &mut Frame, app: &App) {
    let Some(ref pending) = app.pending_delete else {
        return;
    };

    let panel = centered_rect(50, 7, frame.area());
    let block = Block::default()
        .title(" Confirm Delete ")
        .title_style(styles::error_style())
        .borders(Borders::ALL)
        .border_style(styles::error_style());

    let lines = vec![
        Line::from(""),
        Line::from(format!("Delete {}?", pending.describe())),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", styles::help_key_style()),
            Span::raw(" delete  "),
            Span::styled("n", styles::help_key_style()),
            Span::raw(" cancel"),
        ]),
    ];

    frame.render_widget(Clear, panel);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center),
        panel,
    );
}

// ============================================================================
// Helpers
// ============================================================================

fn form_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
}

fn field_line<'a>(label: &'a str, value: &str, focused: bool, masked: bool) -> Line<'a> {
    let shown = if masked {
        "\u{2022}".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(
            format!("  {:<11}", label),
            if focused {
                styles::highlight_style()
            } else {
                styles::muted_style()
            },
        ),
        Span::raw(format!("{}{}", shown, cursor)),
    ])
}

fn date_hint() -> Line<'static> {
    Line::from(Span::styled("Dates as YYYY-MM-DD", styles::muted_style()))
}

/// Center a fixed-size panel within `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_date, format_optional, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    render_project_selector(frame, app, chunks[0]);
    render_document_table(frame, app, chunks[1]);
}

fn render_project_selector(frame: &mut Frame, app: &App, area: Rect) {
    let name = app
        .projects
        .get(app.active_project)
        .map(|p| p.display_title().to_string())
        .unwrap_or_else(|| "no projects".to_string());

    let line = Line::from(vec![
        Span::styled("Project: ", styles::highlight_style()),
        Span::raw(name),
        Span::styled("  ([ / ] to switch)", styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_document_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["Title", "Location", "Uploaded By", "Uploaded"])
        .style(styles::header_style())
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .documents
        .iter()
        .map(|d| {
            let uploaded = d
                .uploaded_at
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                Cell::from(truncate_string(&d.title, 32)),
                Cell::from(truncate_string(&format_optional(&d.url_or_path, "-"), 40)),
                Cell::from(format_optional(&d.uploaded_by_name, "-")),
                Cell::from(uploaded),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" Documents ({}) ", app.documents.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(20),
            Constraint::Percentage(15),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !app.documents.is_empty() {
        state.select(Some(app.document_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

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
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    render_project_header(frame, app, chunks[0]);
    render_milestone_table(frame, app, chunks[1]);
}

fn render_project_header(frame: &mut Frame, app: &App, area: Rect) {
    let name = app
        .projects
        .get(app.active_project)
        .map(|p| p.display_title().to_string())
        .unwrap_or_else(|| "no projects".to_string());

    let mut lines = vec![Line::from(vec![
        Span::styled("Project: ", styles::highlight_style()),
        Span::raw(name),
        Span::styled("  ([ / ] to switch)", styles::muted_style()),
    ])];

    if let Some(ref detail) = app.active_project_detail {
        let summary = format_optional(&detail.summary, "no summary");
        let range = format!(
            "{} to {}",
            format_optional(&detail.start_date, "?"),
            format_optional(&detail.end_date, "?")
        );
        lines.push(Line::from(Span::styled(
            format!("{} ({})", truncate_string(&summary, 60), range),
            styles::muted_style(),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_milestone_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["Title", "Due Date", "Done", "Created By"])
        .style(styles::header_style())
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .milestones
        .iter()
        .map(|m| {
            Row::new(vec![
                Cell::from(truncate_string(&m.title, 40)),
                Cell::from(format_date(&m.due_date)),
                Cell::from(if m.is_completed { "yes" } else { "no" }),
                Cell::from(format_optional(&m.created_by_name, "-")),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" Milestones ({}) ", app.milestones.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(45),
            Constraint::Percentage(20),
            Constraint::Percentage(10),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !app.milestones.is_empty() {
        state.select(Some(app.milestone_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

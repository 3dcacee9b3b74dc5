use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_optional, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["Title", "Summary", "Start Date", "End Date"])
        .style(styles::header_style())
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .projects
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(truncate_string(p.display_title(), 32)),
                Cell::from(truncate_string(&format_optional(&p.summary, "-"), 40)),
                Cell::from(format_optional(&p.start_date, "-")),
                Cell::from(format_optional(&p.end_date, "-")),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" Projects ({}) ", app.projects.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !app.projects.is_empty() {
        state.select(Some(app.project_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

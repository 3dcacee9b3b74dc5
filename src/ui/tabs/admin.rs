use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Administrative diagnostics. Only reachable with the ADMIN role; the tab
/// selection runs through the role guard.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Admin ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let lines = vec![
        Line::from(vec![
            Span::styled("API base URL: ", styles::highlight_style()),
            Span::raw(app.config.api_base_url()),
        ]),
        Line::from(vec![
            Span::styled("Session storage: ", styles::highlight_style()),
            Span::raw(app.session.storage_dir().display().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Projects loaded: ", styles::highlight_style()),
            Span::raw(app.projects.len().to_string()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Server-side administration (user management, role changes)",
            styles::muted_style(),
        )),
        Line::from(Span::styled(
            "is handled in the backend's own console.",
            styles::muted_style(),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Account ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let mut lines = Vec::new();

    match app.session.identity() {
        Some(identity) => {
            lines.push(Line::from(vec![
                Span::styled("User: ", styles::highlight_style()),
                Span::raw(identity.sub.clone()),
            ]));
            if let Some(ref full_name) = identity.full_name {
                lines.push(Line::from(vec![
                    Span::styled("Name: ", styles::highlight_style()),
                    Span::raw(full_name.clone()),
                ]));
            }
            lines.push(Line::from(vec![
                Span::styled("Role: ", styles::highlight_style()),
                Span::raw(identity.role.to_string()),
            ]));
            if let Some(expires) = identity.expires_at() {
                let label = expires.format("%b %d, %Y %H:%M UTC").to_string();
                if identity.is_expired() {
                    lines.push(Line::from(vec![
                        Span::styled("Session: ", styles::highlight_style()),
                        Span::styled(
                            format!("expired {} (backend will reject requests)", label),
                            styles::error_style(),
                        ),
                    ]));
                } else {
                    lines.push(Line::from(vec![
                        Span::styled("Session: ", styles::highlight_style()),
                        Span::styled(format!("valid until {}", label), styles::success_style()),
                    ]));
                }
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "The role above is decoded from the token for display only;",
                styles::muted_style(),
            )));
            lines.push(Line::from(Span::styled(
                "the server makes the actual authorization decisions.",
                styles::muted_style(),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("l", styles::help_key_style()),
                Span::raw(" log out"),
            ]));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Not logged in",
                styles::muted_style(),
            )));
        }
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

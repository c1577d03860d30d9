//! Popup overlay widget for the key help.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::app::handler::KEY_HELP;
use crate::config::LeaveMode;

use super::layout::centered_fixed;

/// Key help popup overlay.
pub struct HelpPopup {
    pub leave_mode: LeaveMode,
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (KEY_HELP.len() as u16) + 6;
        let popup = centered_fixed(52, height, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Keys ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let key_width = KEY_HELP.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);

        let mut lines = Vec::new();
        lines.push(Line::raw(""));
        for (keys, what) in KEY_HELP {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {keys:<key_width$}  "),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(*what, Style::default().fg(Color::White)),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("  tilt card leave mode: {}", self.leave_mode.label()),
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

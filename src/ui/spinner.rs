//! Activity indicator — a small spinner + label rendered in the top-right
//! corner of a given area while any time-driven animation is still running.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Braille-dot spinner frames.  Cycles through these on each tick.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A small "animating" indicator with a spinning icon.
///
/// Render this on top of a pane's border.  It picks its own position
/// (top-right of `area`) and is invisible when `visible` is false.
pub struct ActivityIndicator {
    pub visible: bool,
    /// Monotonically increasing frame counter (drives the spinner frame).
    pub tick: u64,
}

impl ActivityIndicator {
    fn label(&self) -> String {
        let frame = SPINNER_FRAMES[(self.tick as usize) % SPINNER_FRAMES.len()];
        format!(" {frame} animating ")
    }
}

impl Widget for ActivityIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.width < 16 || area.height == 0 {
            return;
        }

        let label = self.label();
        let label_width = label.chars().count() as u16;
        // Top-right, inside the border (leave 1 col for the border char).
        let x = area.x + area.width.saturating_sub(label_width + 2);
        let y = area.y;

        let line = Line::from(Span::styled(
            label,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

        buf.set_line(x, y, &line, label_width);
    }
}

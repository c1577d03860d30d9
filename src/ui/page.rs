//! The scrolling demo page: an intro screen, a timeline with a scroll-linked
//! beam, and a container panel that tilts flat as it scrolls into view.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};

use crate::core::mapper::OutputValues;

use super::layout::PageGeometry;
use super::theme::Theme;

const INTRO: &[&str] = &[
    "",
    "Signal-driven animation",
    "",
    "Every pane on this screen is a surface bound to the engine.",
    "Scroll signals drive the beam and the container below,",
    "elapsed time drives the counter, the pointer tilts the card,",
    "and + / - push a value straight into the meter.",
    "",
    "Scroll down with j, the wheel, or PgDn.",
];

/// Rows between timeline milestones.
const MILESTONE_EVERY: u16 = 6;

/// Renders the visible slice of the page.
pub struct PageWidget<'a> {
    pub page: PageGeometry,
    /// Rendered scroll offset in rows.
    pub scroll_y: u16,
    pub beam: Option<OutputValues>,
    pub container: Option<OutputValues>,
    pub block: Option<Block<'a>>,
}

impl<'a> PageWidget<'a> {
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

/// Rows of the timeline lit by a beam at `percent`.
pub fn beam_rows(percent: f64, height: u16) -> u16 {
    let fraction = (percent / 100.0).clamp(0.0, 1.0);
    (fraction * f64::from(height)).round() as u16
}

/// Width of the container panel at `rotation` degrees.  The tilt is
/// exaggerated so 20° reads as half width on a character grid.
pub fn panel_width(rotation: f64, full: u16) -> u16 {
    let scale = (1.0 - rotation.abs() / 40.0).clamp(0.1, 1.0);
    ((f64::from(full) * scale).round() as u16).max(2)
}

impl Widget for PageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.width < 4 || inner.height == 0 {
            return;
        }

        let page = self.page;
        let beam_value = self.beam.and_then(|o| o.value).unwrap_or(0.0);
        let beam_color = self
            .beam
            .and_then(|o| o.color)
            .map(Theme::rgb)
            .unwrap_or(Color::Magenta);
        let lit = beam_rows(beam_value, page.timeline_height);
        let rotation = self.container.and_then(|o| o.value).unwrap_or(20.0);

        let container_end = page.container_top + page.container_height;
        let panel_w = panel_width(rotation, inner.width.saturating_sub(4));
        let panel_x = inner.x + (inner.width.saturating_sub(panel_w)) / 2;

        for screen_row in 0..inner.height {
            let y = inner.y + screen_row;
            let doc_row = self.scroll_y.saturating_add(screen_row);

            if doc_row < page.timeline_top {
                if let Some(text) = INTRO.get(doc_row as usize) {
                    let style = if doc_row == 1 {
                        Theme::heading_style()
                    } else {
                        Theme::body_style()
                    };
                    buf.set_stringn(inner.x + 2, y, text, inner.width as usize - 2, style);
                }
            } else if doc_row < page.timeline_top + page.timeline_height {
                let offset = doc_row - page.timeline_top;
                let x = inner.x + 2;
                if offset < lit {
                    buf.set_string(x, y, "┃", Style::default().fg(beam_color));
                } else {
                    buf.set_string(x, y, "│", Theme::track_style());
                }
                if offset % MILESTONE_EVERY == 0 {
                    let label = format!("● milestone {}", offset / MILESTONE_EVERY + 1);
                    let style = if offset < lit {
                        Theme::value_style()
                    } else {
                        Theme::dim_style()
                    };
                    buf.set_stringn(x + 2, y, label, inner.width as usize - 4, style);
                }
                if offset == 0 {
                    let pct = format!("{beam_value:>3.0}%");
                    let px = inner.x + inner.width.saturating_sub(pct.len() as u16 + 1);
                    buf.set_string(px, y, pct, Theme::value_style());
                }
            } else if doc_row >= page.container_top && doc_row < container_end {
                let offset = doc_row - page.container_top;
                draw_panel_row(
                    buf,
                    panel_x,
                    y,
                    panel_w,
                    offset,
                    page.container_height,
                    rotation,
                );
            } else if doc_row == page.doc_height.saturating_sub(2) {
                buf.set_stringn(inner.x + 2, y, "· end of page ·", inner.width as usize - 2, Theme::dim_style());
            }
        }
    }
}

fn draw_panel_row(buf: &mut Buffer, x: u16, y: u16, width: u16, offset: u16, height: u16, rotation: f64) {
    let style = Theme::border_style();
    let last = height.saturating_sub(1);
    let fill = width.saturating_sub(2) as usize;
    let row = if offset == 0 {
        format!("╭{}╮", "─".repeat(fill))
    } else if offset == last {
        format!("╰{}╯", "─".repeat(fill))
    } else {
        format!("│{}│", " ".repeat(fill))
    };
    buf.set_string(x, y, row, style);

    if offset == height / 2 {
        let label = format!("rotateX {rotation:.1}°");
        if label.chars().count() + 2 <= fill {
            let lx = x + (width.saturating_sub(label.chars().count() as u16)) / 2;
            buf.set_string(lx, y, label, Theme::value_style());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beam_rows_scale_and_clamp() {
        assert_eq!(beam_rows(0.0, 40), 0);
        assert_eq!(beam_rows(50.0, 40), 20);
        assert_eq!(beam_rows(100.0, 40), 40);
        assert_eq!(beam_rows(140.0, 40), 40);
    }

    #[test]
    fn panel_is_full_width_when_flat() {
        assert_eq!(panel_width(0.0, 50), 50);
        assert_eq!(panel_width(20.0, 50), 25);
        assert!(panel_width(10.0, 50) > panel_width(20.0, 50));
    }

    #[test]
    fn intro_is_visible_at_the_top() {
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        PageWidget {
            page: PageGeometry::for_viewport(12),
            scroll_y: 0,
            beam: None,
            container: None,
            block: None,
        }
        .render(area, &mut buf);
        let row: String = (0..area.width).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("Signal-driven animation"), "{row:?}");
    }
}

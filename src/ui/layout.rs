//! Layout helpers — split the terminal area into regions and place the
//! scrolling page's sections in document rows.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: scrolling page on the left, fixed effect panes on
/// the right, status bar at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub page_area: Rect,
    pub ticker_area: Rect,
    pub card_area: Rect,
    pub meter_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // panes
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // ticker
                Constraint::Min(6),    // tilt card
                Constraint::Length(3), // meter
            ])
            .split(cols[1]);

        Self {
            page_area: cols[0],
            ticker_area: side[0],
            card_area: side[1],
            meter_area: side[2],
            status_area: rows[1],
        }
    }
}

/// Inner rectangle of a bordered block.
pub fn inner(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

/// Vertical placement of the page's sections, in document rows.
///
/// The page opens with one screen of intro so the timeline starts below
/// the fold, and ends with one screen of padding so the container can
/// scroll fully into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub viewport: u16,
    pub timeline_top: u16,
    pub timeline_height: u16,
    pub container_top: u16,
    pub container_height: u16,
    pub doc_height: u16,
}

impl PageGeometry {
    pub fn for_viewport(viewport: u16) -> Self {
        let viewport = viewport.max(1);
        let timeline_top = viewport;
        let timeline_height = viewport.saturating_mul(2);
        let container_top = timeline_top.saturating_add(timeline_height).saturating_add(2);
        let container_height = ((u32::from(viewport) * 3 / 5) as u16).max(4);
        let doc_height = container_top
            .saturating_add(container_height)
            .saturating_add(viewport);
        Self {
            viewport,
            timeline_top,
            timeline_height,
            container_top,
            container_height,
            doc_height,
        }
    }

    /// Largest useful scroll offset.
    pub fn max_scroll(&self) -> u16 {
        self.doc_height.saturating_sub(self.viewport)
    }
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panes_tile_the_terminal() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.status_area, Rect::new(0, 39, 100, 1));
        assert_eq!(layout.page_area.height, 39);
        assert_eq!(layout.page_area.width + layout.card_area.width, 100);
        assert_eq!(layout.ticker_area.height, 5);
        assert_eq!(layout.meter_area.height, 3);
    }

    #[test]
    fn page_sections_are_ordered_and_scrollable() {
        let page = PageGeometry::for_viewport(20);
        assert_eq!(page.timeline_top, 20);
        assert_eq!(page.timeline_height, 40);
        assert_eq!(page.container_top, 62);
        assert_eq!(page.container_height, 12);
        assert_eq!(page.doc_height, 94);
        assert_eq!(page.max_scroll(), 74);
    }

    #[test]
    fn centered_fixed_clamps() {
        let r = centered_fixed(50, 10, Rect::new(0, 0, 30, 8));
        assert_eq!(r, Rect::new(0, 0, 30, 8));
        let r = centered_fixed(10, 4, Rect::new(0, 0, 30, 8));
        assert_eq!(r, Rect::new(10, 2, 10, 4));
    }
}

//! Fixed side panes: number ticker, tilt card, and progress meter.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Gauge, Paragraph, Widget},
};

use crate::core::mapper::{OutputValues, Tilt};
use crate::core::scheduler::Phase;

use super::theme::Theme;

// ───────────────────────────────────────── ticker ────────────

/// Large count-up number with the task phase underneath.
pub struct TickerWidget<'a> {
    pub output: Option<OutputValues>,
    pub phase: Option<Phase>,
    pub block: Block<'a>,
}

/// `1234567` → `"1,234,567"`.  Magnitudes past `u64` fall back to
/// scientific notation.
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    if rounded.is_nan() || rounded.abs() >= u64::MAX as f64 {
        return format!("{rounded:.3e}");
    }
    let digits = format!("{}", rounded.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl Widget for TickerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let number = self
            .output
            .and_then(|o| o.value)
            .map(group_thousands)
            .unwrap_or_else(|| "0".into());
        let phase = match self.phase {
            Some(Phase::Idle) => "idle",
            Some(Phase::Running) => "counting…",
            Some(Phase::Completed) => "done · r to replay",
            Some(Phase::Cancelled) => "cancelled",
            None => "unbound",
        };
        Paragraph::new(vec![
            Line::from(Span::styled(number, Theme::value_style())),
            Line::from(Span::styled(phase, Theme::dim_style())),
        ])
        .alignment(Alignment::Center)
        .block(self.block)
        .render(area, buf);
    }
}

// ───────────────────────────────────────── tilt card ─────────

/// A card drawn with a fake perspective: the horizontal rotation skews the
/// card's rows, the translation moves it, and the rotation values are printed
/// inside.
pub struct TiltCardWidget<'a> {
    pub tilt: Option<Tilt>,
    pub block: Block<'a>,
}

/// Horizontal shift of `row` out of `rows` for a card rotated by
/// `rotate_y` degrees: the top and bottom edges lean in opposite directions.
pub fn row_skew(rotate_y: f64, row: u16, rows: u16) -> i16 {
    if rows < 2 {
        return 0;
    }
    let t = f64::from(row) / f64::from(rows - 1) - 0.5;
    (-rotate_y / 5.0 * t * 2.0).round() as i16
}

impl Widget for TiltCardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.block.inner(area);
        self.block.render(area, buf);
        if inner.width < 12 || inner.height < 5 {
            return;
        }

        let tilt = self.tilt.unwrap_or(Tilt::IDENTITY);
        let card_w = inner.width.saturating_sub(8);
        let card_h = inner.height.saturating_sub(2);
        let base_x = i32::from(inner.x) + i32::from((inner.width - card_w) / 2) + tilt.translate_x.round() as i32;
        let base_y = i32::from(inner.y) + 1 + tilt.translate_y.round() as i32;

        let border = if tilt.is_identity() {
            Theme::border_style()
        } else {
            Theme::border_style().add_modifier(Modifier::BOLD)
        };
        let fill = card_w.saturating_sub(2) as usize;

        for row in 0..card_h {
            let y = base_y + i32::from(row);
            let x = base_x + i32::from(row_skew(tilt.rotate_y, row, card_h));
            let text = if row == 0 {
                format!("╭{}╮", "─".repeat(fill))
            } else if row == card_h - 1 {
                format!("╰{}╯", "─".repeat(fill))
            } else {
                let body = match row {
                    r if r == card_h / 2 - 1 => format!("rotateX {:+.1}°", tilt.rotate_x),
                    r if r == card_h / 2 => format!("rotateY {:+.1}°", tilt.rotate_y),
                    _ => String::new(),
                };
                format!("│{body:^fill$}│")
            };
            put_clipped(buf, inner, x, y, &text, border);
        }
    }
}

/// Write `text` at a possibly off-area position, clipping to `clip`.
fn put_clipped(buf: &mut Buffer, clip: Rect, x: i32, y: i32, text: &str, style: Style) {
    if y < i32::from(clip.y) || y >= i32::from(clip.bottom()) {
        return;
    }
    let skip = (i32::from(clip.x) - x).max(0) as usize;
    let start = x.max(i32::from(clip.x)) as u16;
    if start >= clip.right() {
        return;
    }
    let visible: String = text.chars().skip(skip).collect();
    let max = (clip.right() - start) as usize;
    buf.set_stringn(start, y as u16, visible, max, style);
}

// ───────────────────────────────────────── meter ─────────────

/// Gauge coloured by the mapped gradient.
pub struct MeterWidget<'a> {
    pub output: Option<OutputValues>,
    pub block: Block<'a>,
}

impl Widget for MeterWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let percent = self.output.and_then(|o| o.value).unwrap_or(0.0);
        let mut style = Theme::track_style();
        if let Some(c) = self.output.and_then(|o| o.color) {
            style = Style::default().fg(Theme::rgb(c));
        }
        Gauge::default()
            .block(self.block)
            .gauge_style(style)
            .ratio((percent / 100.0).clamp(0.0, 1.0))
            .label(format!("{percent:.0}%"))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapper::Rgb;

    fn row_text(buf: &Buffer, y: u16) -> String {
        let area = buf.area;
        (area.x..area.right()).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.4), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(1234567.0), "1,234,567");
        assert_eq!(group_thousands(-4200.0), "-4,200");
    }

    #[test]
    fn huge_values_are_not_saturated() {
        assert_eq!(group_thousands(1e18), "1,000,000,000,000,000,000");
        assert_eq!(group_thousands(1e300), "1.000e300");
        assert_eq!(group_thousands(-2.5e19), "-2.500e19");
        assert_eq!(group_thousands(f64::INFINITY), "inf");
    }

    #[test]
    fn skew_is_symmetric_and_zero_when_flat() {
        assert_eq!(row_skew(0.0, 0, 8), 0);
        assert_eq!(row_skew(15.0, 0, 7), -row_skew(15.0, 6, 7));
        assert_eq!(row_skew(15.0, 3, 7), 0);
    }

    #[test]
    fn ticker_shows_the_grouped_value() {
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        TickerWidget {
            output: Some(OutputValues {
                value: Some(1500.0),
                ..OutputValues::default()
            }),
            phase: Some(Phase::Running),
            block: Block::default(),
        }
        .render(area, &mut buf);
        assert!(row_text(&buf, 0).contains("1,500"));
    }

    #[test]
    fn translated_card_is_clipped_not_panicking() {
        let area = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(area);
        TiltCardWidget {
            tilt: Some(Tilt {
                rotate_x: 15.0,
                rotate_y: -15.0,
                translate_x: -40.0,
                translate_y: 20.0,
            }),
            block: Block::bordered(),
        }
        .render(area, &mut buf);

        let mut buf = Buffer::empty(area);
        TiltCardWidget {
            tilt: None,
            block: Block::bordered(),
        }
        .render(area, &mut buf);
        assert!(row_text(&buf, 2).contains('╭'));
    }

    #[test]
    fn meter_label_follows_the_value() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        MeterWidget {
            output: Some(OutputValues {
                value: Some(40.0),
                color: Some(Rgb(10, 200, 10)),
                tilt: None,
            }),
            block: Block::default(),
        }
        .render(area, &mut buf);
        assert!(row_text(&buf, 0).contains("40%"));
    }
}

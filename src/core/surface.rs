//! Host surface abstraction: the geometry and events an animation is driven by.
//!
//! The engine never talks to a terminal or a DOM directly.  Whatever renders
//! the effects implements [`Host`] and forwards its input as [`HostEvent`]s.

use std::fmt;
use std::time::Duration;

/// Identity of a bound surface (one mounted visual element).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Axis-aligned rectangle in viewport (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.bottom()
    }
}

/// Geometry queries the engine makes while sampling.
///
/// `bounds` returns `None` when the surface is not (or no longer) part of the
/// host's tree; sources then fall back to a constant zero sample.
pub trait Host {
    /// Current vertical scroll offset of the document.
    fn scroll_y(&self) -> f64;
    /// Height of the visible viewport.
    fn viewport_height(&self) -> f64;
    /// Bounds of a surface in viewport coordinates.
    fn bounds(&self, surface: SurfaceId) -> Option<Bounds>;
}

/// An external change that may produce new samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The document scrolled; read the new offset from [`Host::scroll_y`].
    Scroll,
    /// Pointer moved to `(x, y)` in viewport coordinates.
    PointerMove { x: f64, y: f64 },
    /// Pointer left the host entirely.
    PointerLeave,
    /// An animation frame at `at`, measured on the engine's monotonic clock.
    Frame { at: Duration },
    /// Caller changed the driving value of one surface.
    Prop { surface: SurfaceId, value: f64 },
}

impl HostEvent {
    /// Timestamp carried by the event, if any.
    pub fn time(&self) -> Option<Duration> {
        match self {
            HostEvent::Frame { at } => Some(*at),
            _ => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let b = Bounds::new(10.0, 5.0, 20.0, 10.0);
        assert!(b.contains(10.0, 5.0));
        assert!(b.contains(29.9, 14.9));
        assert!(!b.contains(30.0, 10.0));
        assert!(!b.contains(15.0, 15.0));
        assert!(!b.contains(9.9, 6.0));
    }

    #[test]
    fn only_frames_carry_time() {
        assert_eq!(
            HostEvent::Frame { at: Duration::from_millis(16) }.time(),
            Some(Duration::from_millis(16))
        );
        assert_eq!(HostEvent::Scroll.time(), None);
    }
}

//! Smooth scrolling for the demo page with exponential ease-out.
//!
//! Key and wheel input move a logical scroll target in whole rows.  The
//! rendered offset chases that target, closing a fixed fraction of the gap
//! each tick, so the page decelerates into place and the engine sees a
//! continuous stream of scroll positions rather than jumps.

/// Row-offset smooth scroll animator.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    /// Where input says the page should be.
    target: f64,
    /// Where the page is drawn right now.
    position: f64,
    /// Damping: `gap *= (1 - speed)` each tick.
    /// Higher speed = faster settle.  Good range: 0.25–0.45 at 30 fps.
    speed: f64,
    /// Largest allowed offset (document height minus viewport).
    max: f64,
}

impl SmoothScroll {
    pub fn new(speed: f64) -> Self {
        Self {
            target: 0.0,
            position: 0.0,
            speed: speed.clamp(0.05, 0.95),
            max: 0.0,
        }
    }

    /// Update the scrollable extent; target and position are re-clamped.
    pub fn set_max(&mut self, max: f64) {
        self.max = max.max(0.0);
        self.target = self.target.clamp(0.0, self.max);
        self.position = self.position.clamp(0.0, self.max);
    }

    /// Move the target by `rows` (negative scrolls up).
    pub fn scroll_by(&mut self, rows: f64) {
        self.target = (self.target + rows).clamp(0.0, self.max);
    }

    /// Advance one frame.  Returns `true` if the position changed.
    pub fn tick(&mut self) -> bool {
        if self.position == self.target {
            return false;
        }
        let gap = self.target - self.position;
        if gap.abs() < 0.4 {
            self.position = self.target;
        } else {
            self.position += gap * self.speed;
        }
        true
    }

    /// Current rendered offset in rows.
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// True when the animation has fully settled (no visible motion).
    pub fn is_animating(&self) -> bool {
        self.position != self.target
    }
}

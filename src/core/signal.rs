//! Signal sources: where the driving value of an animation comes from.
//!
//! Each bound surface owns exactly one [`SignalSource`].  A source turns host
//! events into raw [`Sample`]s; it never calls back into the caller itself, the
//! engine pulls samples out of it during dispatch.

use std::time::Duration;

use super::cancel::CancelToken;
use super::surface::{Bounds, Host, HostEvent, SurfaceId};

// ───────────────────────────────────────── kinds ─────────────

/// Scroll range over which a scroll-offset signal goes from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollSpan {
    /// Absolute document offsets.
    Fixed { start_y: f64, end_y: f64 },
    /// Derived from the surface's own bounds: progress starts when the
    /// element's top reaches `start_offset × viewport` and ends when its
    /// bottom reaches `end_offset × viewport`.
    Element { start_offset: f64, end_offset: f64 },
}

/// What a pointer signal does when the pointer leaves the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LeavePolicy {
    /// Keep the last sample; emit nothing.
    Freeze,
    /// Emit a sample at the centre of the bounds.
    #[default]
    ResetToCenter,
    /// Emit a sample at a fixed point relative to the bounds.
    Reset { x: f64, y: f64 },
}

/// The four supported signal kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalKind {
    ScrollOffset(ScrollSpan),
    PointerPosition { on_leave: LeavePolicy },
    ElapsedTime { duration: Duration },
    ExternalProp { initial: f64 },
}

impl SignalKind {
    pub fn label(&self) -> &'static str {
        match self {
            SignalKind::ScrollOffset(_) => "scroll-offset",
            SignalKind::PointerPosition { .. } => "pointer-position",
            SignalKind::ElapsedTime { .. } => "elapsed-time",
            SignalKind::ExternalProp { .. } => "external-prop",
        }
    }
}

// ───────────────────────────────────────── samples ───────────

/// Pointer position relative to the top-left of a surface, together with the
/// surface size so the mapper can find the centre.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PointerSample {
    /// Sample at the exact centre of a `width × height` surface.
    pub fn center(width: f64, height: f64) -> Self {
        Self {
            x: width / 2.0,
            y: height / 2.0,
            width,
            height,
        }
    }
}

/// One raw reading of a signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Scalar(f64),
    Pointer(PointerSample),
}

// ───────────────────────────────────────── subscription ──────

/// Handle returned by [`SignalSource::start`].  Unsubscribing is idempotent.
#[derive(Debug, Clone)]
pub struct Subscription {
    token: CancelToken,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        self.token.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }
}

// ───────────────────────────────────────── source ────────────

/// Produces samples for one surface from host events.
#[derive(Debug)]
pub struct SignalSource {
    kind: SignalKind,
    /// Owner's lifetime; every subscription is a child of it.
    lifetime: CancelToken,
    subscription: CancelToken,
    started_at: Duration,
    /// Scroll and prop sources deliver one sample on the first dispatch after
    /// `start`, never inside it.
    eager_pending: bool,
    /// Pointer is currently over the surface.
    inside: bool,
    /// Elapsed-time source has delivered its terminal sample.
    finished: bool,
    /// Set the first time geometry was missing; cleared when reported.
    unavailable: UnavailableState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnavailableState {
    Never,
    Pending,
    Reported,
}

impl SignalSource {
    pub fn new(kind: SignalKind) -> Self {
        Self::with_lifetime(kind, CancelToken::new())
    }

    /// Source that stops sampling as soon as `lifetime` is cancelled.
    pub fn with_lifetime(kind: SignalKind, lifetime: CancelToken) -> Self {
        let subscription = lifetime.child();
        subscription.cancel();
        Self {
            kind,
            lifetime,
            subscription,
            started_at: Duration::ZERO,
            eager_pending: false,
            inside: false,
            finished: false,
            unavailable: UnavailableState::Never,
        }
    }

    pub fn kind(&self) -> &SignalKind {
        &self.kind
    }

    /// Begin sampling.  Any previous subscription becomes inert.
    pub fn start(&mut self, now: Duration) -> Subscription {
        self.subscription.cancel();
        self.subscription = self.lifetime.child();
        self.started_at = now;
        self.inside = false;
        self.finished = false;
        self.eager_pending = matches!(
            self.kind,
            SignalKind::ScrollOffset(_) | SignalKind::ExternalProp { .. }
        );
        Subscription {
            token: self.subscription.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.subscription.is_cancelled()
    }

    /// `true` once an elapsed-time source has emitted exactly `1.0`.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns `true` exactly once after geometry was first found missing.
    pub fn take_unavailable(&mut self) -> bool {
        if self.unavailable == UnavailableState::Pending {
            self.unavailable = UnavailableState::Reported;
            true
        } else {
            false
        }
    }

    /// The queued start-up sample, if this kind has one and it is still owed.
    pub fn take_eager(&mut self, host: &dyn Host, surface: SurfaceId) -> Option<Sample> {
        if !self.eager_pending || !self.is_active() {
            return None;
        }
        self.eager_pending = false;
        match self.kind {
            SignalKind::ScrollOffset(span) => Some(Sample::Scalar(self.scroll_progress(span, host, surface))),
            SignalKind::ExternalProp { initial } => Some(Sample::Scalar(initial)),
            _ => None,
        }
    }

    /// Turn a host event into a sample, or `None` if this source ignores it.
    pub fn sample(&mut self, event: &HostEvent, host: &dyn Host, surface: SurfaceId) -> Option<Sample> {
        if !self.is_active() || self.finished {
            return None;
        }
        match (self.kind, *event) {
            (SignalKind::ScrollOffset(span), HostEvent::Scroll) => {
                // A scroll before the first dispatch supersedes the eager sample.
                self.eager_pending = false;
                Some(Sample::Scalar(self.scroll_progress(span, host, surface)))
            }
            (SignalKind::PointerPosition { on_leave }, HostEvent::PointerMove { x, y }) => {
                let Some(bounds) = self.geometry(host, surface) else {
                    return Some(Sample::Pointer(PointerSample::default()));
                };
                if bounds.contains(x, y) {
                    self.inside = true;
                    Some(Sample::Pointer(PointerSample {
                        x: x - bounds.left,
                        y: y - bounds.top,
                        width: bounds.width,
                        height: bounds.height,
                    }))
                } else if self.inside {
                    self.inside = false;
                    leave_sample(on_leave, bounds)
                } else {
                    None
                }
            }
            (SignalKind::PointerPosition { on_leave }, HostEvent::PointerLeave) => {
                if !self.inside {
                    return None;
                }
                self.inside = false;
                match self.geometry(host, surface) {
                    Some(bounds) => leave_sample(on_leave, bounds),
                    None => Some(Sample::Pointer(PointerSample::default())),
                }
            }
            (SignalKind::ElapsedTime { duration }, HostEvent::Frame { at }) => {
                let elapsed = at.saturating_sub(self.started_at);
                if duration.is_zero() || elapsed >= duration {
                    self.finished = true;
                    Some(Sample::Scalar(1.0))
                } else {
                    Some(Sample::Scalar(elapsed.as_secs_f64() / duration.as_secs_f64()))
                }
            }
            (SignalKind::ExternalProp { .. }, HostEvent::Prop { surface: target, value })
                if target == surface =>
            {
                self.eager_pending = false;
                Some(Sample::Scalar(value))
            }
            _ => None,
        }
    }

    fn geometry(&mut self, host: &dyn Host, surface: SurfaceId) -> Option<Bounds> {
        let bounds = host.bounds(surface);
        if bounds.is_none() && self.unavailable == UnavailableState::Never {
            self.unavailable = UnavailableState::Pending;
        }
        bounds
    }

    fn scroll_progress(&mut self, span: ScrollSpan, host: &dyn Host, surface: SurfaceId) -> f64 {
        let scroll_y = host.scroll_y();
        let (start_y, end_y) = match span {
            ScrollSpan::Fixed { start_y, end_y } => (start_y, end_y),
            ScrollSpan::Element {
                start_offset,
                end_offset,
            } => {
                let Some(bounds) = self.geometry(host, surface) else {
                    return 0.0;
                };
                let viewport = host.viewport_height();
                let doc_top = bounds.top + scroll_y;
                let doc_bottom = bounds.bottom() + scroll_y;
                (
                    doc_top - start_offset * viewport,
                    doc_bottom - end_offset * viewport,
                )
            }
        };
        scroll_fraction(scroll_y, start_y, end_y)
    }
}

/// `(scroll_y - start) / (end - start)` clamped to `[0, 1]`.
pub fn scroll_fraction(scroll_y: f64, start_y: f64, end_y: f64) -> f64 {
    let span = end_y - start_y;
    if !span.is_finite() || !scroll_y.is_finite() {
        return 0.0;
    }
    if span.abs() < f64::EPSILON {
        return if scroll_y >= start_y { 1.0 } else { 0.0 };
    }
    ((scroll_y - start_y) / span).clamp(0.0, 1.0)
}

fn leave_sample(policy: LeavePolicy, bounds: Bounds) -> Option<Sample> {
    match policy {
        LeavePolicy::Freeze => None,
        LeavePolicy::ResetToCenter => Some(Sample::Pointer(PointerSample::center(
            bounds.width,
            bounds.height,
        ))),
        LeavePolicy::Reset { x, y } => Some(Sample::Pointer(PointerSample {
            x,
            y,
            width: bounds.width,
            height: bounds.height,
        })),
    }
}

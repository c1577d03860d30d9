//! Central demo state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&DemoState` (rendering) or `&mut DemoState` (event handling).
//! The state owns the engine, the terminal-backed [`Host`] it samples, and one
//! [`OutputSlot`] per effect that the renderer reads each frame.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::config::Settings;
use crate::core::engine::{DisposeHandle, Engine};
use crate::core::mapper::OutputValues;
use crate::core::registry::{Effect, EffectRegistry};
use crate::core::scheduler::Phase;
use crate::core::sink::OutputSlot;
use crate::core::surface::{Bounds, Host, HostEvent, SurfaceId};
use crate::ui::layout::{inner, AppLayout, PageGeometry};
use crate::ui::smooth_scroll::SmoothScroll;

pub const TIMELINE: SurfaceId = SurfaceId(1);
pub const TICKER: SurfaceId = SurfaceId(2);
pub const CARD: SurfaceId = SurfaceId(3);
pub const CONTAINER: SurfaceId = SurfaceId(4);
pub const METER: SurfaceId = SurfaceId(5);

/// Surface each effect is mounted on in the demo.
pub fn surface_for(effect: Effect) -> SurfaceId {
    match effect {
        Effect::TimelineBeam => TIMELINE,
        Effect::NumberTicker => TICKER,
        Effect::TiltCard => CARD,
        Effect::ContainerScroll => CONTAINER,
        Effect::ProgressMeter => METER,
    }
}

// ───────────────────────────────────────── host ──────────────

/// Terminal geometry as the engine sees it.  The viewport is the whole
/// terminal; bounds are in terminal cells.
#[derive(Debug, Default, Clone)]
pub struct TerminalHost {
    scroll_y: f64,
    viewport_height: f64,
    bounds: HashMap<SurfaceId, Bounds>,
}

impl TerminalHost {
    fn place(&mut self, surface: SurfaceId, area: Rect) {
        self.bounds.insert(
            surface,
            Bounds::new(
                f64::from(area.x),
                f64::from(area.y),
                f64::from(area.width),
                f64::from(area.height),
            ),
        );
    }
}

impl Host for TerminalHost {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn bounds(&self, surface: SurfaceId) -> Option<Bounds> {
        self.bounds.get(&surface).copied()
    }
}

// ───────────────────────────────────────── state ─────────────

/// Top-level demo state.
pub struct DemoState {
    pub engine: Engine,
    pub host: TerminalHost,
    pub settings: Settings,
    pub scroll: SmoothScroll,
    pub page: PageGeometry,
    /// Renderer-side ends of the effect sinks.
    slots: HashMap<Effect, OutputSlot>,
    handles: HashMap<Effect, DisposeHandle>,
    /// Caller-driven value of the progress meter, `0..=1`.
    pub progress: f64,
    pub terminal_area: Rect,
    pub should_quit: bool,
    pub show_help: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    pub frame_count: u64,
    /// Most recent engine diagnostic, for the status bar.
    pub last_diagnostic: Rc<RefCell<Option<String>>>,
    started: Instant,
}

impl DemoState {
    pub fn new(settings: Settings, terminal_area: Rect) -> Self {
        let last_diagnostic = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&last_diagnostic);
        let engine = Engine::new().with_diagnostics(move |diag| {
            tracing::warn!("{diag}");
            *sink.borrow_mut() = Some(diag.to_string());
        });

        let mut state = Self {
            engine,
            host: TerminalHost::default(),
            scroll: SmoothScroll::new(settings.scroll_speed),
            page: PageGeometry::for_viewport(terminal_area.height),
            settings,
            slots: HashMap::new(),
            handles: HashMap::new(),
            progress: 0.0,
            terminal_area,
            should_quit: false,
            show_help: false,
            status_message: None,
            frame_count: 0,
            last_diagnostic,
            started: Instant::now(),
        };
        state.sync_geometry();
        state.bind_all(Duration::ZERO);
        state
    }

    /// Time since the demo started, on the engine's clock.
    pub fn now(&self) -> Duration {
        self.started.elapsed()
    }

    /// Mount every registered effect and deliver the start-up samples.
    fn bind_all(&mut self, now: Duration) {
        for effect in EffectRegistry::builtin().iter() {
            self.bind(effect, now);
        }
        self.engine.flush(&self.host);
    }

    fn bind(&mut self, effect: Effect, now: Duration) {
        let mut params = self.settings.effect_params();
        params.progress_initial = self.progress;
        let slot = self.slots.entry(effect).or_default().clone();
        let handle = self
            .engine
            .bind(surface_for(effect), effect.animation(&params), slot, now);
        // The replaced handle belongs to the binding `bind` just cancelled.
        self.handles.insert(effect, handle);
    }

    /// Latest output of an effect, if it has produced one.
    pub fn output(&self, effect: Effect) -> Option<OutputValues> {
        self.slots.get(&effect).and_then(OutputSlot::get)
    }

    pub fn phase(&self, effect: Effect) -> Option<Phase> {
        self.engine.phase(surface_for(effect))
    }

    /// Recompute page geometry and surface bounds from the terminal size and
    /// the current scroll position.
    pub fn sync_geometry(&mut self) {
        let layout = AppLayout::from_area(self.terminal_area);
        let page_inner = inner(layout.page_area);

        self.page = PageGeometry::for_viewport(page_inner.height);
        self.scroll.set_max(f64::from(self.page.max_scroll()));

        let scroll_y = self.scroll.position();
        let top = f64::from(page_inner.y) - scroll_y;
        let left = f64::from(page_inner.x);
        let width = f64::from(page_inner.width);

        self.host.scroll_y = scroll_y;
        self.host.viewport_height = f64::from(self.terminal_area.height);
        self.host.bounds.insert(
            TIMELINE,
            Bounds::new(
                left,
                top + f64::from(self.page.timeline_top),
                width,
                f64::from(self.page.timeline_height),
            ),
        );
        self.host.bounds.insert(
            CONTAINER,
            Bounds::new(
                left,
                top + f64::from(self.page.container_top),
                width,
                f64::from(self.page.container_height),
            ),
        );
        self.host.place(TICKER, inner(layout.ticker_area));
        self.host.place(CARD, inner(layout.card_area));
        self.host.place(METER, inner(layout.meter_area));
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_area = Rect::new(0, 0, width, height);
        self.sync_geometry();
        self.engine.dispatch(&self.host, &HostEvent::Scroll);
    }

    // ── per-frame ──────────────────────────────────────────────

    pub fn on_frame(&mut self) {
        let now = self.now();
        self.on_frame_at(now);
    }

    /// Advance the smooth scroll and feed one frame to the engine.
    pub fn on_frame_at(&mut self, now: Duration) {
        self.frame_count = self.frame_count.wrapping_add(1);
        if self.scroll.tick() {
            self.sync_geometry();
            self.engine.dispatch(&self.host, &HostEvent::Scroll);
        }
        self.engine.dispatch(&self.host, &HostEvent::Frame { at: now });
    }

    // ── input-driven changes ───────────────────────────────────

    pub fn scroll_by(&mut self, rows: f64) {
        self.scroll.scroll_by(rows);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll.scroll_by(-self.scroll.target());
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll.scroll_by(f64::from(self.page.max_scroll()));
    }

    /// Replay the number ticker from zero.
    pub fn restart_ticker(&mut self) {
        let now = self.now().max(self.engine.clock());
        if self.engine.restart(TICKER, now) {
            self.status_message = Some("ticker restarted".into());
        }
    }

    /// Nudge the progress meter and push the new value to its binding.
    pub fn set_progress(&mut self, value: f64) {
        self.progress = value.clamp(0.0, 1.0);
        self.engine.dispatch(
            &self.host,
            &HostEvent::Prop {
                surface: METER,
                value: self.progress,
            },
        );
    }

    pub fn pointer(&mut self, column: u16, row: u16) {
        self.engine.dispatch(
            &self.host,
            &HostEvent::PointerMove {
                x: f64::from(column),
                y: f64::from(row),
            },
        );
    }

    pub fn pointer_leave(&mut self) {
        self.engine.dispatch(&self.host, &HostEvent::PointerLeave);
    }

    /// Unmount every effect.  Called once the event loop exits.
    pub fn shutdown(&mut self) {
        for effect in EffectRegistry::builtin().iter() {
            self.engine.unmount(surface_for(effect));
        }
        self.handles.clear();
        tracing::debug!(bindings = self.engine.binding_count(), "demo shut down");
    }

    /// Switch the tilt card's leave behaviour.  The card is rebound so the
    /// new policy takes effect; the old binding is cancelled by the rebind.
    pub fn cycle_leave_mode(&mut self) {
        self.settings.pointer_leave = self.settings.pointer_leave.cycle();
        let now = self.now().max(self.engine.clock());
        self.bind(Effect::TiltCard, now);
        self.status_message = Some(format!(
            "pointer leave: {}",
            self.settings.pointer_leave.label()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeaveMode;
    use crate::core::mapper::Tilt;

    fn demo() -> DemoState {
        let settings = Settings {
            ticker_target: 1000.0,
            ticker_duration_ms: 2000,
            ..Settings::default()
        };
        DemoState::new(settings, Rect::new(0, 0, 100, 40))
    }

    fn settle(state: &mut DemoState, mut now: Duration) -> Duration {
        while state.scroll.is_animating() {
            now += Duration::from_millis(33);
            state.on_frame_at(now);
        }
        now
    }

    #[test]
    fn start_up_samples_are_delivered_on_mount() {
        let state = demo();
        assert_eq!(state.output(Effect::TimelineBeam).and_then(|o| o.value), Some(0.0));
        assert_eq!(state.output(Effect::ContainerScroll).and_then(|o| o.value), Some(20.0));
        assert_eq!(state.output(Effect::ProgressMeter).and_then(|o| o.value), Some(0.0));
        // Time and pointer signals wait for their first event.
        assert_eq!(state.output(Effect::NumberTicker), None);
        assert_eq!(state.output(Effect::TiltCard), None);
    }

    #[test]
    fn ticker_counts_up_and_completes() {
        let mut state = demo();
        state.on_frame_at(Duration::from_millis(1000));
        let mid = state.output(Effect::NumberTicker).and_then(|o| o.value);
        assert_eq!(mid, Some(750.0));
        state.on_frame_at(Duration::from_millis(2100));
        assert_eq!(state.output(Effect::NumberTicker).and_then(|o| o.value), Some(1000.0));
        assert_eq!(state.phase(Effect::NumberTicker), Some(Phase::Completed));

        state.restart_ticker();
        assert_eq!(state.phase(Effect::NumberTicker), Some(Phase::Running));
    }

    #[test]
    fn scrolling_to_the_bottom_fills_the_beam_and_flattens_the_container() {
        let mut state = demo();
        state.scroll_to_bottom();
        settle(&mut state, Duration::ZERO);
        assert_eq!(state.host.scroll_y(), f64::from(state.page.max_scroll()));
        assert_eq!(state.output(Effect::TimelineBeam).and_then(|o| o.value), Some(100.0));
        assert_eq!(state.output(Effect::ContainerScroll).and_then(|o| o.value), Some(0.0));

        state.scroll_to_top();
        settle(&mut state, Duration::from_secs(5));
        assert_eq!(state.output(Effect::TimelineBeam).and_then(|o| o.value), Some(0.0));
    }

    #[test]
    fn progress_is_clamped_and_forwarded() {
        let mut state = demo();
        state.set_progress(0.42);
        assert_eq!(state.output(Effect::ProgressMeter).and_then(|o| o.value), Some(42.0));
        state.set_progress(3.0);
        assert_eq!(state.progress, 1.0);
        assert_eq!(state.output(Effect::ProgressMeter).and_then(|o| o.value), Some(100.0));
    }

    #[test]
    fn card_tilts_and_recentres_on_leave() {
        let mut state = demo();
        let card = state.host.bounds(CARD).expect("card is placed");
        state.pointer(card.left as u16, card.top as u16);
        let tilted = state.output(Effect::TiltCard).and_then(|o| o.tilt).expect("tilt");
        assert!(!tilted.is_identity());

        state.pointer_leave();
        assert_eq!(state.output(Effect::TiltCard).and_then(|o| o.tilt), Some(Tilt::IDENTITY));
    }

    #[test]
    fn cycling_leave_mode_rebinds_only_the_card() {
        let mut state = demo();
        assert_eq!(state.settings.pointer_leave, LeaveMode::Center);
        let before = state.engine.binding_count();
        state.cycle_leave_mode();
        assert_eq!(state.settings.pointer_leave, LeaveMode::Freeze);
        assert_eq!(state.engine.binding_count(), before);

        let card = state.host.bounds(CARD).expect("card is placed");
        state.pointer(card.left as u16, card.top as u16);
        let tilted = state.output(Effect::TiltCard);
        state.pointer_leave();
        // Frozen: leaving produces no new output.
        assert_eq!(state.output(Effect::TiltCard), tilted);
    }

    #[test]
    fn shutdown_releases_every_binding() {
        let mut state = demo();
        assert_eq!(state.engine.binding_count(), EffectRegistry::builtin().iter().count());
        state.shutdown();
        assert_eq!(state.engine.binding_count(), 0);
        assert_eq!(state.engine.listener_count(), 0);
        assert!(!state.engine.wants_frames());

        // Outputs stop moving once unmounted.
        let before = state.output(Effect::TimelineBeam);
        state.scroll_to_bottom();
        settle(&mut state, Duration::ZERO);
        assert_eq!(state.output(Effect::TimelineBeam), before);
    }

    #[test]
    fn rest_mode_settles_the_card_at_the_rest_point() {
        let mut state = demo();
        state.cycle_leave_mode();
        state.cycle_leave_mode();
        assert_eq!(state.settings.pointer_leave, LeaveMode::Rest);

        // The default rest point is the card's top-left corner.
        let card = state.host.bounds(CARD).expect("card is placed");
        state.pointer(card.left as u16, card.top as u16);
        let corner = state.output(Effect::TiltCard).and_then(|o| o.tilt);

        state.pointer((card.left + card.width / 2.0) as u16, (card.top + 2.0) as u16);
        assert_ne!(state.output(Effect::TiltCard).and_then(|o| o.tilt), corner);
        state.pointer_leave();
        assert_eq!(state.output(Effect::TiltCard).and_then(|o| o.tilt), corner);
    }
}

//! Binding glue — wires a signal source, scheduler, mapper and sink to one
//! surface and tears them down together.
//!
//! The engine is single-threaded and cooperative: the host calls
//! [`Engine::dispatch`] for every scroll, pointer, prop and frame event, and
//! the engine pushes mapped values into sinks before returning.  Nothing in
//! here returns an error to the caller; problems are reported through the
//! diagnostics callback and degrade to neutral output.

use std::time::Duration;

use thiserror::Error;

use super::cancel::CancelToken;
use super::mapper::{ConfigError, MapError, Mapper, MapperConfig};
use super::scheduler::{Cadence, Phase, SampleTime, Scheduler};
use super::signal::{Sample, SignalKind, SignalSource, Subscription};
use super::sink::OutputSink;
use super::surface::{Host, HostEvent, SurfaceId};

/// Everything needed to drive one effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrivenAnimation {
    pub signal: SignalKind,
    pub mapper: MapperConfig,
    /// `None` uses the signal kind's natural cadence.
    pub cadence: Option<Cadence>,
}

impl DrivenAnimation {
    pub fn new(signal: SignalKind, mapper: MapperConfig) -> Self {
        Self {
            signal,
            mapper,
            cadence: None,
        }
    }

    pub fn cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = Some(cadence);
        self
    }

    fn effective_cadence(&self) -> Cadence {
        self.cadence
            .unwrap_or_else(|| Cadence::for_signal(&self.signal))
    }
}

/// Non-fatal problems reported through [`Engine::with_diagnostics`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error("{surface}: invalid mapper config, emitting constant output: {source}")]
    Configuration {
        surface: SurfaceId,
        source: ConfigError,
    },
    #[error("{surface}: surface geometry unavailable, sampling constant 0")]
    SignalUnavailable { surface: SurfaceId },
    #[error("{surface}: dropped frame: {source}")]
    DroppedFrame { surface: SurfaceId, source: MapError },
}

type DiagnosticFn = Box<dyn FnMut(&Diagnostic)>;

// ───────────────────────────────────────── dispose handle ────

/// Ends a binding.  Disposing is synchronous and idempotent: once
/// [`dispose`](Self::dispose) returns, the sink is never called again.
///
/// Dropping the handle disposes too, unless it was [`detach`](Self::detach)ed,
/// in which case only [`Engine::unmount`] ends the binding.
#[must_use = "dropping a DisposeHandle immediately ends the animation"]
#[derive(Debug)]
pub struct DisposeHandle {
    surface: SurfaceId,
    lifetime: CancelToken,
    armed: bool,
}

impl DisposeHandle {
    pub fn dispose(&self) {
        if !self.lifetime.is_cancelled() {
            tracing::debug!(surface = %self.surface, "binding disposed");
        }
        self.lifetime.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Hand the binding's lifetime over to the surface's own teardown.
    pub fn detach(mut self) {
        self.armed = false;
    }
}

impl Drop for DisposeHandle {
    fn drop(&mut self) {
        if self.armed {
            self.dispose();
        }
    }
}

// ───────────────────────────────────────── binding ───────────

struct Binding {
    surface: SurfaceId,
    lifetime: CancelToken,
    source: SignalSource,
    subscription: Subscription,
    scheduler: Scheduler,
    mapper: Mapper,
    cadence: Cadence,
    sink: Box<dyn OutputSink>,
}

impl Binding {
    /// Admit, map, re-check cancellation, apply.
    fn deliver(&mut self, sample: Sample, time: SampleTime, report: &mut DiagnosticFn) {
        if !self.scheduler.admit(time) {
            return;
        }
        match self.mapper.map(sample) {
            Ok(output) => {
                // The sink for an earlier surface may have disposed this one.
                if !self.lifetime.is_cancelled() && self.scheduler.is_live() {
                    self.sink.apply(self.surface, &output);
                }
            }
            Err(err) => {
                tracing::warn!(surface = %self.surface, error = %err, "dropping frame");
                report(&Diagnostic::DroppedFrame {
                    surface: self.surface,
                    source: err,
                });
            }
        }
        if time.terminal {
            self.scheduler.complete();
            self.subscription.unsubscribe();
        }
    }

    fn teardown(&mut self) {
        self.lifetime.cancel();
        self.scheduler.cancel();
        self.subscription.unsubscribe();
    }
}

// ───────────────────────────────────────── engine ────────────

/// Owns every live binding, one per surface.
pub struct Engine {
    /// In bind order.
    bindings: Vec<Binding>,
    diagnostics: DiagnosticFn,
    /// Latest frame time seen; stamps discrete events.
    clock: Duration,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            diagnostics: Box::new(|diag: &Diagnostic| tracing::warn!("{diag}")),
            clock: Duration::ZERO,
        }
    }

    /// Replace the default (log-only) diagnostics callback.
    pub fn with_diagnostics(mut self, report: impl FnMut(&Diagnostic) + 'static) -> Self {
        self.diagnostics = Box::new(report);
        self
    }

    /// Latest frame time the engine has seen.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Bind an effect to `surface`.  A binding already on that surface is
    /// cancelled first.  No output is produced until the next dispatch.
    pub fn bind(
        &mut self,
        surface: SurfaceId,
        animation: DrivenAnimation,
        sink: impl OutputSink + 'static,
        now: Duration,
    ) -> DisposeHandle {
        if let Some(pos) = self.position(surface) {
            tracing::debug!(%surface, "rebinding surface, cancelling previous binding");
            let mut old = self.bindings.remove(pos);
            old.teardown();
        }

        let (mapper, config_err) = Mapper::new(animation.mapper);
        if let Some(source) = config_err {
            (self.diagnostics)(&Diagnostic::Configuration { surface, source });
        }

        let lifetime = CancelToken::new();
        let mut source = SignalSource::with_lifetime(animation.signal, lifetime.clone());
        let subscription = source.start(now);
        let cadence = animation.effective_cadence();
        let mut scheduler = Scheduler::with_lifetime(lifetime.clone());
        scheduler.start(cadence, now);
        self.clock = self.clock.max(now);

        tracing::debug!(%surface, signal = animation.signal.label(), ?cadence, "surface bound");
        self.bindings.push(Binding {
            surface,
            lifetime: lifetime.clone(),
            source,
            subscription,
            scheduler,
            mapper,
            cadence,
            sink: Box::new(sink),
        });

        DisposeHandle {
            surface,
            lifetime,
            armed: true,
        }
    }

    /// Start a fresh task on an existing binding (e.g. replay a counter).
    /// The previous task is cancelled first.  Returns `false` if `surface`
    /// has no live binding.
    pub fn restart(&mut self, surface: SurfaceId, now: Duration) -> bool {
        self.reap();
        let Some(pos) = self.position(surface) else {
            return false;
        };
        let binding = &mut self.bindings[pos];
        binding.subscription = binding.source.start(now);
        binding.scheduler.start(binding.cadence, now);
        self.clock = self.clock.max(now);
        true
    }

    /// Surface teardown hook: cancel and forget the binding.
    pub fn unmount(&mut self, surface: SurfaceId) {
        if let Some(pos) = self.position(surface) {
            let mut binding = self.bindings.remove(pos);
            binding.teardown();
            tracing::debug!(%surface, "surface unmounted");
        }
    }

    /// Deliver queued start-up samples without any new event.
    pub fn flush(&mut self, host: &dyn Host) {
        self.run(host, None);
    }

    /// Feed one host event to every binding.
    pub fn dispatch(&mut self, host: &dyn Host, event: &HostEvent) {
        if let Some(at) = event.time() {
            self.clock = self.clock.max(at);
        }
        self.run(host, Some(event));
    }

    fn run(&mut self, host: &dyn Host, event: Option<&HostEvent>) {
        self.reap();
        let clock = self.clock;
        let report = &mut self.diagnostics;

        for binding in &mut self.bindings {
            let surface = binding.surface;

            // A scroll or prop event supersedes the owed start-up sample, so
            // the event goes first and the eager sample only if still owed.
            if let Some(event) = event {
                if let Some(sample) = binding.source.sample(event, host, surface) {
                    let time = SampleTime {
                        at: event.time().unwrap_or(clock),
                        from_frame: event.time().is_some(),
                        terminal: binding.source.is_finished(),
                    };
                    binding.deliver(sample, time, report);
                }
            }

            if let Some(sample) = binding.source.take_eager(host, surface) {
                let time = SampleTime {
                    at: clock,
                    from_frame: false,
                    terminal: false,
                };
                binding.deliver(sample, time, report);
            }

            if binding.source.take_unavailable() {
                tracing::debug!(%surface, "signal geometry unavailable");
                report(&Diagnostic::SignalUnavailable { surface });
            }
        }
        self.reap();
    }

    /// Drop bindings whose handle was disposed.
    fn reap(&mut self) {
        self.bindings.retain_mut(|binding| {
            if binding.lifetime.is_cancelled() {
                binding.teardown();
                tracing::debug!(surface = %binding.surface, "reaped disposed binding");
                false
            } else {
                true
            }
        });
    }

    fn position(&self, surface: SurfaceId) -> Option<usize> {
        self.bindings.iter().position(|b| b.surface == surface)
    }

    /// Phase of the surface's current task; `None` if nothing is bound.
    pub fn phase(&self, surface: SurfaceId) -> Option<Phase> {
        self.bindings
            .iter()
            .find(|b| b.surface == surface)
            .map(|b| b.scheduler.phase())
    }

    /// Number of bindings still registered (including completed ones).
    pub fn binding_count(&self) -> usize {
        self.bindings
            .iter()
            .filter(|b| !b.lifetime.is_cancelled())
            .count()
    }

    /// Number of bindings still subscribed to their signal.
    pub fn listener_count(&self) -> usize {
        self.bindings
            .iter()
            .filter(|b| b.subscription.is_active() && b.scheduler.is_live())
            .count()
    }

    /// `true` while any time-driven task still needs frames.
    pub fn wants_frames(&self) -> bool {
        self.bindings.iter().any(|b| {
            matches!(b.source.kind(), SignalKind::ElapsedTime { .. }) && b.scheduler.is_live()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::mapper::{OutputValues, Tilt, TiltConfig};
    use crate::core::signal::{LeavePolicy, ScrollSpan};
    use crate::core::sink::testing::Recorder;
    use crate::core::surface::testing::FakeHost;
    use crate::core::surface::Bounds;

    const A: SurfaceId = SurfaceId(1);
    const B: SurfaceId = SurfaceId(2);

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn frame(at: u64) -> HostEvent {
        HostEvent::Frame { at: ms(at) }
    }

    fn ticker(duration_ms: u64) -> DrivenAnimation {
        DrivenAnimation::new(
            SignalKind::ElapsedTime { duration: ms(duration_ms) },
            MapperConfig::default().range(0.0, 100.0).precision(0),
        )
    }

    #[test]
    fn end_to_end_count_up() {
        let host = FakeHost::new(100.0);
        let mut engine = Engine::new();
        let rec = Recorder::default();
        let _handle = engine.bind(A, ticker(2000), rec.clone(), ms(0));
        assert_eq!(rec.len(), 0, "bind must not emit synchronously");

        engine.dispatch(&host, &frame(0));
        assert_eq!(rec.last().unwrap().value, Some(0.0));

        let mut t = 0;
        while t < 1000 {
            t += 16;
            engine.dispatch(&host, &frame(t));
        }
        let mid = rec.last().unwrap().value.unwrap();
        assert!((49.0..=51.0).contains(&mid), "mid-point was {mid}");

        engine.dispatch(&host, &frame(2000));
        assert_eq!(rec.last().unwrap().value, Some(100.0));
        assert_eq!(engine.phase(A), Some(Phase::Completed));
        assert_eq!(engine.listener_count(), 0);
        assert!(!engine.wants_frames());

        let count = rec.len();
        engine.dispatch(&host, &frame(2016));
        engine.dispatch(&host, &frame(5000));
        assert_eq!(rec.len(), count);
    }

    #[test]
    fn terminal_sample_survives_skipped_frames_and_throttling() {
        let host = FakeHost::new(100.0);
        let mut engine = Engine::new();
        let rec = Recorder::default();
        let anim = DrivenAnimation::new(
            SignalKind::ElapsedTime { duration: ms(1000) },
            MapperConfig::default(),
        )
        .cadence(Cadence::FixedInterval(ms(400)));
        let _h = engine.bind(A, anim, rec.clone(), ms(0));

        engine.dispatch(&host, &frame(0));
        engine.dispatch(&host, &frame(100));
        engine.dispatch(&host, &frame(450));
        // Throttled window, but elapsed ≥ duration: must still arrive as exactly 1.
        engine.dispatch(&host, &frame(1300));
        assert_eq!(rec.values(), vec![0.0, 0.45, 1.0]);
        assert_eq!(engine.phase(A), Some(Phase::Completed));
    }

    #[test]
    fn dispose_is_idempotent_and_final() {
        let mut host = FakeHost::new(100.0);
        let mut engine = Engine::new();
        let rec = Recorder::default();
        let span = ScrollSpan::Fixed { start_y: 0.0, end_y: 200.0 };
        let anim = DrivenAnimation::new(SignalKind::ScrollOffset(span), MapperConfig::default());
        let handle = engine.bind(A, anim, rec.clone(), ms(0));

        host.scroll_y = 50.0;
        engine.dispatch(&host, &HostEvent::Scroll);
        assert_eq!(rec.values(), vec![0.25]);

        handle.dispose();
        handle.dispose();
        assert!(handle.is_disposed());

        host.scroll_y = 150.0;
        engine.dispatch(&host, &HostEvent::Scroll);
        assert_eq!(rec.len(), 1);
        assert_eq!(engine.binding_count(), 0);
        assert_eq!(engine.listener_count(), 0);
        assert_eq!(engine.phase(A), None);
    }

    #[test]
    fn dropping_the_handle_disposes_but_detach_does_not() {
        let host = FakeHost::new(100.0);
        let mut engine = Engine::new();
        let dropped = Recorder::default();
        let kept = Recorder::default();

        drop(engine.bind(A, ticker(100), dropped.clone(), ms(0)));
        engine.bind(B, ticker(100), kept.clone(), ms(0)).detach();

        engine.dispatch(&host, &frame(10));
        assert_eq!(dropped.len(), 0);
        assert_eq!(kept.len(), 1);

        engine.unmount(B);
        engine.dispatch(&host, &frame(20));
        assert_eq!(kept.len(), 1);
        assert_eq!(engine.binding_count(), 0);
    }

    #[test]
    fn rebinding_a_surface_leaves_one_task() {
        let host = FakeHost::new(100.0);
        let mut engine = Engine::new();
        let first = Recorder::default();
        let second = Recorder::default();

        let old = engine.bind(A, ticker(1000), first.clone(), ms(0));
        let _new = engine.bind(A, ticker(1000), second.clone(), ms(0));
        assert!(old.is_disposed());
        assert_eq!(engine.binding_count(), 1);

        for t in [0, 16, 32] {
            engine.dispatch(&host, &frame(t));
        }
        assert_eq!(first.len(), 0);
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn restart_cancels_the_running_task_and_counts_from_zero() {
        let host = FakeHost::new(100.0);
        let mut engine = Engine::new();
        let rec = Recorder::default();
        let _h = engine.bind(A, ticker(1000), rec.clone(), ms(0));

        engine.dispatch(&host, &frame(500));
        assert!(engine.restart(A, ms(500)));
        assert_eq!(engine.listener_count(), 1);
        engine.dispatch(&host, &frame(516));
        engine.dispatch(&host, &frame(1000));

        // One output per tick: the old task never fires again.
        assert_eq!(rec.values(), vec![50.0, 2.0, 50.0]);
        assert!(!engine.restart(B, ms(0)));
    }

    #[test]
    fn restart_after_completion_runs_again() {
        let host = FakeHost::new(100.0);
        let mut engine = Engine::new();
        let rec = Recorder::default();
        let _h = engine.bind(A, ticker(100), rec.clone(), ms(0));
        engine.dispatch(&host, &frame(200));
        assert_eq!(engine.phase(A), Some(Phase::Completed));

        assert!(engine.restart(A, ms(200)));
        engine.dispatch(&host, &frame(250));
        assert_eq!(rec.values(), vec![100.0, 50.0]);
        assert_eq!(engine.phase(A), Some(Phase::Running));
    }

    #[test]
    fn a_sink_may_dispose_its_own_binding() {
        let host = FakeHost::new(100.0);
        let mut engine = Engine::new();
        let slot: Rc<RefCell<Option<DisposeHandle>>> = Rc::default();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let sink = {
            let slot = Rc::clone(&slot);
            let calls = Rc::clone(&calls);
            move |_: SurfaceId, out: &OutputValues| {
                calls.borrow_mut().push(out.value);
                if let Some(handle) = slot.borrow().as_ref() {
                    handle.dispose();
                }
            }
        };
        let anim = DrivenAnimation::new(
            SignalKind::ExternalProp { initial: 0.2 },
            MapperConfig::default(),
        );
        *slot.borrow_mut() = Some(engine.bind(A, anim, sink, ms(0)));

        engine.dispatch(&host, &HostEvent::Prop { surface: A, value: 0.9 });
        engine.dispatch(&host, &HostEvent::Prop { surface: A, value: 0.4 });
        assert_eq!(*calls.borrow(), vec![Some(0.9)]);
        assert_eq!(engine.binding_count(), 0);
    }

    #[test]
    fn an_event_supersedes_the_owed_start_up_sample() {
        let mut host = FakeHost::new(100.0);
        let mut engine = Engine::new();
        let rec = Recorder::default();
        let span = ScrollSpan::Fixed { start_y: 0.0, end_y: 100.0 };
        let anim = DrivenAnimation::new(SignalKind::ScrollOffset(span), MapperConfig::default());
        let _h = engine.bind(A, anim, rec.clone(), ms(0));

        // A frame doesn't concern a scroll source; the eager sample goes out.
        engine.dispatch(&host, &frame(16));
        assert_eq!(rec.values(), vec![0.0]);

        let _h2 = engine.bind(B, anim, rec.clone(), ms(16));
        host.scroll_y = 30.0;
        engine.dispatch(&host, &HostEvent::Scroll);
        // A gets the scroll; B's eager sample is replaced by the scroll sample.
        assert_eq!(rec.values(), vec![0.0, 0.3, 0.3]);
    }

    #[test]
    fn one_surface_disposing_another_mid_dispatch() {
        let host = FakeHost::new(100.0);
        let mut engine = Engine::new();
        let victim_rec = Recorder::default();
        let victim: Rc<RefCell<Option<DisposeHandle>>> = Rc::default();

        let killer = {
            let victim = Rc::clone(&victim);
            move |_: SurfaceId, _: &OutputValues| {
                if let Some(h) = victim.borrow().as_ref() {
                    h.dispose();
                }
            }
        };
        let _k = engine.bind(A, ticker(1000), killer, ms(0));
        *victim.borrow_mut() = Some(engine.bind(B, ticker(1000), victim_rec.clone(), ms(0)));

        engine.dispatch(&host, &frame(10));
        assert_eq!(victim_rec.len(), 0);
        assert_eq!(engine.binding_count(), 1);
    }

    #[test]
    fn invalid_config_is_reported_once_and_outputs_out_min() {
        let host = FakeHost::new(100.0);
        let diags = Rc::new(RefCell::new(Vec::new()));
        let mut engine = Engine::new().with_diagnostics({
            let diags = Rc::clone(&diags);
            move |d: &Diagnostic| diags.borrow_mut().push(d.clone())
        });
        let rec = Recorder::default();
        let anim = DrivenAnimation::new(
            SignalKind::ElapsedTime { duration: ms(100) },
            MapperConfig::default().domain(1.0, 1.0).range(7.0, 9.0),
        );
        let _h = engine.bind(A, anim, rec.clone(), ms(0));
        engine.dispatch(&host, &frame(10));
        engine.dispatch(&host, &frame(50));

        assert_eq!(rec.values(), vec![7.0, 7.0]);
        assert_eq!(
            *diags.borrow(),
            vec![Diagnostic::Configuration {
                surface: A,
                source: ConfigError::EmptyDomain(1.0, 1.0),
            }]
        );
    }

    #[test]
    fn bad_sample_drops_one_frame_and_keeps_running() {
        let host = FakeHost::new(100.0);
        let diags = Rc::new(RefCell::new(0));
        let mut engine = Engine::new().with_diagnostics({
            let diags = Rc::clone(&diags);
            move |_: &Diagnostic| *diags.borrow_mut() += 1
        });
        let rec = Recorder::default();
        let anim = DrivenAnimation::new(
            SignalKind::ExternalProp { initial: 0.5 },
            MapperConfig::default().range(0.0, 10.0),
        );
        let _h = engine.bind(A, anim, rec.clone(), ms(0));

        engine.flush(&host);
        engine.dispatch(&host, &HostEvent::Prop { surface: A, value: f64::NAN });
        engine.dispatch(&host, &HostEvent::Prop { surface: A, value: 0.1 });
        assert_eq!(rec.values(), vec![5.0, 1.0]);
        assert_eq!(*diags.borrow(), 1);
        assert_eq!(engine.phase(A), Some(Phase::Running));
    }

    #[test]
    fn missing_scroll_target_fails_soft_with_zero() {
        let mut host = FakeHost::new(100.0);
        let diags = Rc::new(RefCell::new(Vec::new()));
        let mut engine = Engine::new().with_diagnostics({
            let diags = Rc::clone(&diags);
            move |d: &Diagnostic| diags.borrow_mut().push(d.clone())
        });
        let rec = Recorder::default();
        let span = ScrollSpan::Element { start_offset: 0.9, end_offset: 0.5 };
        let anim = DrivenAnimation::new(
            SignalKind::ScrollOffset(span),
            MapperConfig::default().range(0.0, 100.0),
        );
        let _h = engine.bind(A, anim, rec.clone(), ms(0));

        engine.flush(&host);
        host.scroll_y = 400.0;
        engine.dispatch(&host, &HostEvent::Scroll);
        assert_eq!(rec.values(), vec![0.0, 0.0]);
        assert_eq!(*diags.borrow(), vec![Diagnostic::SignalUnavailable { surface: A }]);
    }

    #[test]
    fn pointer_tilt_returns_to_identity_on_leave() {
        let host = FakeHost::new(100.0).with_bounds(A, Bounds::new(0.0, 0.0, 40.0, 20.0));
        let mut engine = Engine::new();
        let rec = Recorder::default();
        let mut mapper = MapperConfig::default();
        mapper.tilt = TiltConfig { max_rotation: 10.0, max_translate: 2.0 };
        let anim = DrivenAnimation::new(
            SignalKind::PointerPosition { on_leave: LeavePolicy::ResetToCenter },
            mapper,
        );
        let _h = engine.bind(A, anim, rec.clone(), ms(0));

        engine.dispatch(&host, &HostEvent::PointerMove { x: 20.0, y: 10.0 });
        assert_eq!(rec.last().unwrap().tilt, Some(Tilt::IDENTITY));

        engine.dispatch(&host, &HostEvent::PointerMove { x: 30.0, y: 10.0 });
        let tilted = rec.last().unwrap().tilt.unwrap();
        assert_eq!(tilted.rotate_y, 5.0);
        assert_eq!(tilted.translate_x, 1.0);

        engine.dispatch(&host, &HostEvent::PointerLeave);
        assert_eq!(rec.last().unwrap().tilt, Some(Tilt::IDENTITY));
        assert_eq!(rec.len(), 3);
    }

    #[test]
    fn surfaces_are_served_in_bind_order() {
        let host = FakeHost::new(100.0);
        let mut engine = Engine::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let sink = |order: &Rc<RefCell<Vec<SurfaceId>>>| {
            let order = Rc::clone(order);
            move |s: SurfaceId, _: &OutputValues| order.borrow_mut().push(s)
        };
        let _b = engine.bind(B, ticker(100), sink(&order), ms(0));
        let _a = engine.bind(A, ticker(100), sink(&order), ms(0));
        engine.dispatch(&host, &frame(10));
        assert_eq!(*order.borrow(), vec![B, A]);
    }
}

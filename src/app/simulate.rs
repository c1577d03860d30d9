//! Headless effect runner.
//!
//! Drives one effect against a scripted host on a simulated clock and prints
//! every value its sink receives.  Scroll effects sweep the page from the top
//! to `scroll_to`, the tilt card sweeps the pointer across the card and then
//! leaves, and the meter ramps its prop from 0 to 1.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use crate::core::engine::Engine;
use crate::core::mapper::{Easing, OutputValues};
use crate::core::registry::{Effect, EffectParams};
use crate::core::scheduler::Phase;
use crate::core::surface::{Bounds, Host, HostEvent, SurfaceId};

const SURFACE: SurfaceId = SurfaceId(1);

/// Scripted geometry: a 100-row viewport over a surface placed one screen
/// down the document.
#[derive(Debug, Clone)]
struct ScriptedHost {
    scroll_y: f64,
    viewport_height: f64,
    doc_bounds: Bounds,
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            viewport_height: 100.0,
            doc_bounds: Bounds::new(10.0, 100.0, 40.0, 60.0),
        }
    }
}

impl Host for ScriptedHost {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn bounds(&self, surface: SurfaceId) -> Option<Bounds> {
        (surface == SURFACE).then(|| Bounds {
            top: self.doc_bounds.top - self.scroll_y,
            ..self.doc_bounds
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimOptions {
    pub effect: Effect,
    pub frame_interval: Duration,
    pub frames: u32,
    /// Final scroll offset for scroll-driven effects.
    pub scroll_to: f64,
    /// Replaces the preset's easing curve.
    pub easing: Option<Easing>,
}

impl SimOptions {
    pub fn new(effect: Effect) -> Self {
        Self {
            effect,
            frame_interval: Duration::from_millis(16),
            frames: 60,
            scroll_to: 200.0,
            easing: None,
        }
    }
}

/// What happened during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimReport {
    pub outputs: Vec<(Duration, OutputValues)>,
    pub final_phase: Option<Phase>,
}

impl SimReport {
    pub fn last_value(&self) -> Option<f64> {
        self.outputs.last().and_then(|(_, out)| out.value)
    }
}

/// Run the simulation, writing one line per output to `out`.
pub fn run(opts: &SimOptions, params: &EffectParams, out: &mut impl Write) -> anyhow::Result<SimReport> {
    let recorded: Rc<RefCell<Vec<OutputValues>>> = Rc::default();
    let sink_buf = Rc::clone(&recorded);

    let mut animation = opts.effect.animation(params);
    if let Some(easing) = opts.easing {
        animation.mapper = animation.mapper.easing(easing);
    }
    let easing = animation.mapper.easing;

    let mut engine = Engine::new();
    let mut host = ScriptedHost::default();
    let _handle = engine.bind(
        SURFACE,
        animation,
        move |_: SurfaceId, values: &OutputValues| sink_buf.borrow_mut().push(*values),
        Duration::ZERO,
    );

    writeln!(
        out,
        "# {}: {} frames every {}ms, easing {:?}",
        opts.effect,
        opts.frames,
        opts.frame_interval.as_millis(),
        easing
    )?;

    let mut outputs = Vec::new();
    engine.flush(&host);
    drain(&recorded, Duration::ZERO, &mut outputs, out)?;

    let frames = opts.frames.max(1);
    for i in 1..=frames {
        let at = opts.frame_interval * i;
        let progress = f64::from(i) / f64::from(frames);

        match opts.effect {
            Effect::TimelineBeam | Effect::ContainerScroll => {
                host.scroll_y = opts.scroll_to * progress;
                engine.dispatch(&host, &HostEvent::Scroll);
            }
            Effect::TiltCard => {
                let b = host.bounds(SURFACE).unwrap_or_default();
                if i == frames {
                    engine.dispatch(&host, &HostEvent::PointerLeave);
                } else {
                    let event = HostEvent::PointerMove {
                        x: b.left + b.width * progress,
                        y: b.top + b.height * progress,
                    };
                    engine.dispatch(&host, &event);
                }
            }
            Effect::ProgressMeter => engine.dispatch(
                &host,
                &HostEvent::Prop {
                    surface: SURFACE,
                    value: progress,
                },
            ),
            Effect::NumberTicker => {}
        }
        engine.dispatch(&host, &HostEvent::Frame { at });
        drain(&recorded, at, &mut outputs, out)?;
    }

    let final_phase = engine.phase(SURFACE);
    writeln!(out, "# {} outputs, final phase {:?}", outputs.len(), final_phase)?;

    Ok(SimReport {
        outputs,
        final_phase,
    })
}

fn drain(
    recorded: &RefCell<Vec<OutputValues>>,
    at: Duration,
    outputs: &mut Vec<(Duration, OutputValues)>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    for values in recorded.borrow_mut().drain(..) {
        writeln!(out, "{}", format_output(at, &values))?;
        outputs.push((at, values));
    }
    Ok(())
}

/// One human-readable line per output.
pub fn format_output(at: Duration, values: &OutputValues) -> String {
    let mut line = format!("t={:>6}ms", at.as_millis());
    if let Some(v) = values.value {
        line.push_str(&format!("  value={v}"));
    }
    if let Some(c) = values.color {
        line.push_str(&format!("  color=#{:02x}{:02x}{:02x}", c.0, c.1, c.2));
    }
    if let Some(t) = values.tilt {
        line.push_str(&format!(
            "  rotate=({:.2}°, {:.2}°) translate=({:.2}, {:.2})",
            t.rotate_x, t.rotate_y, t.translate_x, t.translate_y
        ));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapper::{Rgb, Tilt};
    use pretty_assertions::assert_eq;

    fn run_quiet(opts: SimOptions) -> SimReport {
        let mut sink = Vec::new();
        run(&opts, &EffectParams::default(), &mut sink).expect("writing to a Vec never fails")
    }

    #[test]
    fn ticker_reaches_its_target_and_completes() {
        let report = run_quiet(SimOptions {
            frame_interval: Duration::from_millis(100),
            frames: 25,
            ..SimOptions::new(Effect::NumberTicker)
        });
        assert_eq!(report.last_value(), Some(100.0));
        assert_eq!(report.final_phase, Some(Phase::Completed));
        // 20 frames to reach 2000ms; nothing after completion.
        assert_eq!(report.outputs.len(), 20);
    }

    #[test]
    fn spring_eased_ticker_still_lands_on_target() {
        let plain = run_quiet(SimOptions {
            frame_interval: Duration::from_millis(100),
            frames: 25,
            ..SimOptions::new(Effect::NumberTicker)
        });
        let sprung = run_quiet(SimOptions {
            frame_interval: Duration::from_millis(100),
            frames: 25,
            easing: Some(Easing::Spring { damping_ratio: 0.5, frequency: 12.0 }),
            ..SimOptions::new(Effect::NumberTicker)
        });
        assert_eq!(sprung.last_value(), Some(100.0));
        assert_eq!(sprung.final_phase, Some(Phase::Completed));
        assert_ne!(sprung.outputs[5], plain.outputs[5]);
        for (_, out) in &sprung.outputs {
            let v = out.value.expect("ticker emits a value");
            assert!((0.0..=100.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn beam_fills_as_the_page_scrolls_past() {
        let report = run_quiet(SimOptions {
            frames: 10,
            scroll_to: 300.0,
            ..SimOptions::new(Effect::TimelineBeam)
        });
        assert_eq!(report.outputs.first().and_then(|(_, o)| o.value), Some(0.0));
        assert_eq!(report.last_value(), Some(100.0));
        let values: Vec<f64> = report.outputs.iter().filter_map(|(_, o)| o.value).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]), "{values:?}");
    }

    #[test]
    fn card_returns_to_identity_after_leaving() {
        let report = run_quiet(SimOptions {
            frames: 5,
            ..SimOptions::new(Effect::TiltCard)
        });
        let last = report.outputs.last().and_then(|(_, o)| o.tilt);
        assert_eq!(last, Some(Tilt::IDENTITY));
    }

    #[test]
    fn meter_follows_the_prop() {
        let report = run_quiet(SimOptions {
            frames: 4,
            ..SimOptions::new(Effect::ProgressMeter)
        });
        let values: Vec<f64> = report.outputs.iter().filter_map(|(_, o)| o.value).collect();
        assert_eq!(values, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn output_lines_are_readable() {
        let values = OutputValues {
            value: Some(42.0),
            color: Some(Rgb(255, 0, 16)),
            tilt: None,
        };
        assert_eq!(
            format_output(Duration::from_millis(33), &values),
            "t=    33ms  value=42  color=#ff0010"
        );
    }
}

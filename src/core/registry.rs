//! Named effect presets.
//!
//! Effects are looked up by explicit name (or alias) and resolve to a tagged
//! [`Effect`] variant.  There is no "first match wins" fallback: an unknown
//! name is an error listing what is registered.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use super::engine::DrivenAnimation;
use super::mapper::{Easing, MapperConfig, Rgb};
use super::scheduler::Cadence;
use super::signal::{LeavePolicy, ScrollSpan, SignalKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown effect `{name}` (known: {known})")]
    UnknownEffect { name: String, known: String },
}

/// Every effect the engine ships presets for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Vertical beam that fills as a timeline scrolls past.
    TimelineBeam,
    /// Count-up number driven by elapsed time.
    NumberTicker,
    /// Card tilting toward the pointer.
    TiltCard,
    /// Panel that rotates flat as it scrolls into view.
    ContainerScroll,
    /// Meter following a caller-supplied value.
    ProgressMeter,
}

impl Effect {
    pub const ALL: &[Effect] = &[
        Effect::TimelineBeam,
        Effect::NumberTicker,
        Effect::TiltCard,
        Effect::ContainerScroll,
        Effect::ProgressMeter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Effect::TimelineBeam => "timeline-beam",
            Effect::NumberTicker => "number-ticker",
            Effect::TiltCard => "tilt-card",
            Effect::ContainerScroll => "container-scroll",
            Effect::ProgressMeter => "progress-meter",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Effect::TimelineBeam => &["beam", "timeline"],
            Effect::NumberTicker => &["ticker", "counter"],
            Effect::TiltCard => &["tilt", "card"],
            Effect::ContainerScroll => &["container"],
            Effect::ProgressMeter => &["progress", "meter"],
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Effect::TimelineBeam => "scroll-linked beam height (0-100%) with a colour gradient",
            Effect::NumberTicker => "count-up from 0 to a target over a fixed duration",
            Effect::TiltCard => "pointer-tracking 3D rotation, identity at the centre",
            Effect::ContainerScroll => "scroll-linked rotation from 20° down to flat",
            Effect::ProgressMeter => "percentage meter set directly by the caller",
        }
    }

    /// Build the animation for this effect.
    pub fn animation(self, params: &EffectParams) -> DrivenAnimation {
        match self {
            Effect::TimelineBeam => DrivenAnimation::new(
                SignalKind::ScrollOffset(ScrollSpan::Element {
                    start_offset: 0.9,
                    end_offset: 0.5,
                }),
                MapperConfig::default()
                    .range(0.0, 100.0)
                    .gradient(Rgb(168, 85, 247), Rgb(59, 130, 246)),
            ),
            Effect::NumberTicker => {
                let anim = DrivenAnimation::new(
                    SignalKind::ElapsedTime {
                        duration: params.ticker_duration,
                    },
                    MapperConfig::default()
                        .range(0.0, params.ticker_target)
                        .easing(Easing::EaseOutQuad)
                        .precision(0),
                );
                match params.ticker_interval {
                    Some(every) => anim.cadence(Cadence::FixedInterval(every)),
                    None => anim,
                }
            }
            Effect::TiltCard => DrivenAnimation::new(
                SignalKind::PointerPosition {
                    on_leave: params.pointer_leave,
                },
                MapperConfig::default().tilt(params.max_rotation, params.max_translate),
            ),
            Effect::ContainerScroll => DrivenAnimation::new(
                SignalKind::ScrollOffset(ScrollSpan::Element {
                    start_offset: 1.0,
                    end_offset: 1.0,
                }),
                MapperConfig::default()
                    .range(20.0, 0.0)
                    .easing(Easing::Smoothstep)
                    .precision(1),
            ),
            Effect::ProgressMeter => DrivenAnimation::new(
                SignalKind::ExternalProp {
                    initial: params.progress_initial,
                },
                MapperConfig::default()
                    .range(0.0, 100.0)
                    .precision(0)
                    .gradient(Rgb(239, 68, 68), Rgb(34, 197, 94)),
            ),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Effect {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectRegistry::builtin().lookup(s)
    }
}

/// Tunables shared by the presets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    pub ticker_target: f64,
    pub ticker_duration: Duration,
    /// `None` samples every frame.
    pub ticker_interval: Option<Duration>,
    pub max_rotation: f64,
    pub max_translate: f64,
    pub pointer_leave: LeavePolicy,
    pub progress_initial: f64,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            ticker_target: 100.0,
            ticker_duration: Duration::from_millis(2000),
            ticker_interval: None,
            max_rotation: 15.0,
            max_translate: 2.0,
            pointer_leave: LeavePolicy::ResetToCenter,
            progress_initial: 0.0,
        }
    }
}

/// Name → effect table.
#[derive(Debug, Clone)]
pub struct EffectRegistry {
    effects: Vec<Effect>,
}

impl EffectRegistry {
    pub fn builtin() -> Self {
        Self {
            effects: Effect::ALL.to_vec(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Effect> + '_ {
        self.effects.iter().copied()
    }

    /// Resolve a canonical name or alias, case-insensitively.
    pub fn lookup(&self, name: &str) -> Result<Effect, RegistryError> {
        let wanted = name.trim().to_ascii_lowercase();
        self.effects
            .iter()
            .copied()
            .find(|e| e.name() == wanted || e.aliases().iter().any(|a| *a == wanted))
            .ok_or_else(|| RegistryError::UnknownEffect {
                name: name.to_string(),
                known: self
                    .effects
                    .iter()
                    .map(|e| e.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

//! Mapper / interpolator — pure functions from raw samples to output values.
//!
//! Nothing here keeps state between calls: the same sample and the same
//! [`MapperConfig`] always give the same [`OutputValues`].

use thiserror::Error;

use super::signal::{PointerSample, Sample};

// ───────────────────────────────────────── errors ────────────

/// Invalid mapper configuration, detected once at bind time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("domain [{0}, {1}] is empty; cannot normalise samples")]
    EmptyDomain(f64, f64),
    #[error("range [{0}, {1}] is empty")]
    EmptyRange(f64, f64),
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("spring easing needs positive damping and frequency (got ζ={damping_ratio}, ω={frequency})")]
    BadSpring { damping_ratio: f64, frequency: f64 },
}

/// A single sample that could not be mapped.  The frame is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MapError {
    #[error("sample is not a finite number: {0:?}")]
    NonFiniteSample(Sample),
    #[error("mapping produced a non-finite value from {0:?}")]
    NonFiniteOutput(Sample),
}

// ───────────────────────────────────────── easing ────────────

/// Response curve applied to the normalised sample before scaling.
///
/// Every curve maps `0 → 0` and `1 → 1` exactly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    #[default]
    Identity,
    /// `t²`, slow start.
    Quadratic,
    /// `1 - (1 - t)²`, slow finish; used by count-up tickers.
    EaseOutQuad,
    /// `t²(3 - 2t)`.
    Smoothstep,
    /// Step response of a damped harmonic oscillator.  `frequency` is the
    /// natural angular frequency per unit of `t`; a damping ratio below 1
    /// overshoots (only visible with `clamp = false`).
    Spring { damping_ratio: f64, frequency: f64 },
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        if t <= 0.0 {
            return if t == 0.0 { 0.0 } else { t };
        }
        if t >= 1.0 {
            return if t == 1.0 { 1.0 } else { t };
        }
        match self {
            Easing::Identity => t,
            Easing::Quadratic => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
            Easing::Spring {
                damping_ratio,
                frequency,
            } => spring_position(t, frequency, damping_ratio),
        }
    }
}

/// Position of a unit step response at time `t` (starts at 0, settles at 1).
fn spring_position(t: f64, omega_0: f64, zeta: f64) -> f64 {
    if (zeta - 1.0).abs() < 1e-3 {
        // critically damped
        let decay = (-zeta * omega_0 * t).exp();
        1.0 - decay * (1.0 + omega_0 * t)
    } else if zeta < 1.0 {
        let decay = (-zeta * omega_0 * t).exp();
        let root = (1.0 - zeta * zeta).sqrt();
        let omega_d = omega_0 * root;
        1.0 - decay * ((omega_d * t).cos() + (zeta / root) * (omega_d * t).sin())
    } else {
        // Overdamped, with cosh/sinh folded into the decay so stiff
        // springs stay finite.
        let root = (zeta * zeta - 1.0).sqrt();
        let gamma = omega_0 * root;
        let slow = 0.5 * ((gamma - zeta * omega_0) * t).exp() * (1.0 + zeta / root);
        let fast = 0.5 * (-(gamma + zeta * omega_0) * t).exp() * (1.0 - zeta / root);
        1.0 - (slow + fast)
    }
}

// ───────────────────────────────────────── config ────────────

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Channel-wise interpolation, `t` in `[0, 1]`.
    pub fn lerp(self, to: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (f64::from(a) * (1.0 - t) + f64::from(b) * t).round() as u8;
        Rgb(ch(self.0, to.0), ch(self.1, to.1), ch(self.2, to.2))
    }
}

/// Two-stop colour gradient driven by the same eased progress as the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub from: Rgb,
    pub to: Rgb,
}

/// Limits for pointer-driven 3D tilt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltConfig {
    /// Largest rotation magnitude on either axis, in degrees.
    pub max_rotation: f64,
    /// Largest translation magnitude on either axis.
    pub max_translate: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_rotation: 15.0,
            max_translate: 0.0,
        }
    }
}

/// Every recognised mapping option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapperConfig {
    /// Input range assumed for scalar samples.
    pub domain: (f64, f64),
    /// Output range for scalar values.  May be descending.
    pub range: (f64, f64),
    pub clamp: bool,
    pub easing: Easing,
    /// Decimal places kept on scalar values.
    pub precision: Option<u32>,
    pub gradient: Option<Gradient>,
    pub tilt: TiltConfig,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
            clamp: true,
            easing: Easing::Identity,
            precision: None,
            gradient: None,
            tilt: TiltConfig::default(),
        }
    }
}

impl MapperConfig {
    pub fn range(mut self, out_min: f64, out_max: f64) -> Self {
        self.range = (out_min, out_max);
        self
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn precision(mut self, decimals: u32) -> Self {
        self.precision = Some(decimals);
        self
    }

    pub fn unclamped(mut self) -> Self {
        self.clamp = false;
        self
    }

    pub fn gradient(mut self, from: Rgb, to: Rgb) -> Self {
        self.gradient = Some(Gradient { from, to });
        self
    }

    pub fn tilt(mut self, max_rotation: f64, max_translate: f64) -> Self {
        self.tilt = TiltConfig {
            max_rotation,
            max_translate,
        };
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("domain.min", self.domain.0),
            ("domain.max", self.domain.1),
            ("range.min", self.range.0),
            ("range.max", self.range.1),
            ("tilt.max_rotation", self.tilt.max_rotation),
            ("tilt.max_translate", self.tilt.max_translate),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if self.domain.0 == self.domain.1 {
            return Err(ConfigError::EmptyDomain(self.domain.0, self.domain.1));
        }
        if self.range.0 == self.range.1 {
            return Err(ConfigError::EmptyRange(self.range.0, self.range.1));
        }
        if let Easing::Spring {
            damping_ratio,
            frequency,
        } = self.easing
        {
            let ok = damping_ratio.is_finite()
                && frequency.is_finite()
                && damping_ratio > 0.0
                && frequency > 0.0;
            if !ok {
                return Err(ConfigError::BadSpring {
                    damping_ratio,
                    frequency,
                });
            }
        }
        Ok(())
    }
}

// ───────────────────────────────────────── outputs ───────────

/// 3D tilt transform for pointer-driven surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Tilt {
    pub const IDENTITY: Tilt = Tilt {
        rotate_x: 0.0,
        rotate_y: 0.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Everything one sample maps to.  Fields that don't apply are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutputValues {
    pub value: Option<f64>,
    pub color: Option<Rgb>,
    pub tilt: Option<Tilt>,
}

// ───────────────────────────────────────── mapper ────────────

/// A validated config, or the constant fallback an invalid config degrades to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mapper {
    config: MapperConfig,
    fallback: bool,
}

impl Mapper {
    /// Build a mapper.  An invalid config still yields a usable mapper that
    /// emits a constant `out_min`; the error is returned for reporting.
    pub fn new(config: MapperConfig) -> (Self, Option<ConfigError>) {
        match config.validate() {
            Ok(()) => (
                Self {
                    config,
                    fallback: false,
                },
                None,
            ),
            Err(err) => (
                Self {
                    config,
                    fallback: true,
                },
                Some(err),
            ),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn map(&self, sample: Sample) -> Result<OutputValues, MapError> {
        if self.fallback {
            let out_min = if self.config.range.0.is_finite() {
                self.config.range.0
            } else {
                0.0
            };
            return Ok(match sample {
                Sample::Scalar(_) => OutputValues {
                    value: Some(out_min),
                    ..OutputValues::default()
                },
                Sample::Pointer(_) => OutputValues {
                    tilt: Some(Tilt::IDENTITY),
                    ..OutputValues::default()
                },
            });
        }
        map(sample, &self.config)
    }
}

/// Map one sample through `config`.  Assumes `config` is valid; use
/// [`Mapper`] when it may not be.
pub fn map(sample: Sample, config: &MapperConfig) -> Result<OutputValues, MapError> {
    match sample {
        Sample::Scalar(raw) => {
            if !raw.is_finite() {
                return Err(MapError::NonFiniteSample(sample));
            }
            let (value, eased) = map_scalar(raw, config);
            if !value.is_finite() {
                return Err(MapError::NonFiniteOutput(sample));
            }
            Ok(OutputValues {
                value: Some(value),
                color: config.gradient.map(|g| g.from.lerp(g.to, eased)),
                tilt: None,
            })
        }
        Sample::Pointer(p) => {
            let finite = [p.x, p.y, p.width, p.height].iter().all(|v| v.is_finite());
            if !finite {
                return Err(MapError::NonFiniteSample(sample));
            }
            Ok(OutputValues {
                tilt: Some(map_tilt(p, &config.tilt)),
                ..OutputValues::default()
            })
        }
    }
}

/// Returns `(value, eased_progress)`.
fn map_scalar(raw: f64, config: &MapperConfig) -> (f64, f64) {
    let (d0, d1) = config.domain;
    let (out_min, out_max) = config.range;

    let mut t = (raw - d0) / (d1 - d0);
    if config.clamp {
        t = t.clamp(0.0, 1.0);
    }
    let eased = config.easing.apply(t);

    // Written as a weighted sum so both ends are exact.
    let mut value = out_min * (1.0 - eased) + out_max * eased;
    if config.clamp {
        value = value.clamp(out_min.min(out_max), out_min.max(out_max));
    }
    if let Some(decimals) = config.precision {
        value = round_to(value, decimals);
    }
    (value, eased)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(15) as i32);
    let scaled = value * factor;
    // Past 2^53 every f64 is already an integer at this scale.
    if !scaled.is_finite() || scaled.abs() >= 9_007_199_254_740_992.0 {
        return value;
    }
    let rounded = scaled.round() / factor;
    // Avoid displaying "-0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Pointer → tilt.  The centre maps to the identity for any limits.
fn map_tilt(p: PointerSample, cfg: &TiltConfig) -> Tilt {
    if p.width <= 0.0 || p.height <= 0.0 {
        return Tilt::IDENTITY;
    }
    let half_w = p.width / 2.0;
    let half_h = p.height / 2.0;
    let nx = ((p.x - half_w) / half_w).clamp(-1.0, 1.0);
    let ny = ((p.y - half_h) / half_h).clamp(-1.0, 1.0);

    let max_rot = cfg.max_rotation.abs();
    let max_tr = cfg.max_translate.abs();
    // Pointer right of centre turns the card around its vertical axis;
    // pointer below centre tips the top edge away.
    Tilt {
        rotate_x: positive_zero((-ny * max_rot).clamp(-max_rot, max_rot)),
        rotate_y: positive_zero((nx * max_rot).clamp(-max_rot, max_rot)),
        translate_x: positive_zero((nx * max_tr).clamp(-max_tr, max_tr)),
        translate_y: positive_zero((ny * max_tr).clamp(-max_tr, max_tr)),
    }
}

fn positive_zero(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

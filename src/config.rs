//! User configuration — animation tunables and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/signal-anim/config.toml` (default `~/.config/signal-anim/config.toml`).
//! Unknown keys and unparsable values are ignored; numbers are clamped to
//! ranges that keep the demo usable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::registry::EffectParams;
use crate::core::signal::LeavePolicy;

// ───────────────────────────────────────── leave mode ────────

/// What the tilt card does when the pointer leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaveMode {
    Freeze,
    #[default]
    Center,
    /// Settle at the configured rest point.
    Rest,
}

impl LeaveMode {
    pub const ALL: &[LeaveMode] = &[LeaveMode::Center, LeaveMode::Freeze, LeaveMode::Rest];

    pub fn label(self) -> &'static str {
        match self {
            LeaveMode::Freeze => "freeze",
            LeaveMode::Center => "center",
            LeaveMode::Rest => "rest",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "freeze" => Some(LeaveMode::Freeze),
            "center" | "centre" => Some(LeaveMode::Center),
            "rest" | "reset" => Some(LeaveMode::Rest),
            _ => None,
        }
    }

    /// Next mode in [`LeaveMode::ALL`], wrapping around.
    pub fn cycle(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

// ───────────────────────────────────────── settings ──────────

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Frame tick interval of the event loop.
    pub frame_ms: u64,
    /// Value the number ticker counts up to.
    pub ticker_target: f64,
    pub ticker_duration_ms: u64,
    /// Timer-style ticker updates; `0` updates every frame.
    pub ticker_interval_ms: u64,
    /// Tilt card rotation limit, degrees.
    pub max_rotation: f64,
    /// Tilt card translation limit, cells.
    pub max_translate: f64,
    /// Smooth-scroll damping factor.
    pub scroll_speed: f64,
    pub pointer_leave: LeaveMode,
    /// Where the pointer settles in [`LeaveMode::Rest`], in cells from the
    /// card's top-left corner.
    pub rest_x: f64,
    pub rest_y: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_ms: 33,
            ticker_target: 1000.0,
            ticker_duration_ms: 2000,
            ticker_interval_ms: 0,
            max_rotation: 15.0,
            max_translate: 2.0,
            scroll_speed: 0.35,
            pointer_leave: LeaveMode::Center,
            rest_x: 0.0,
            rest_y: 0.0,
        }
    }
}

impl Settings {
    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "no config file, using defaults");
                Self::default()
            }
        }
    }

    /// Persist current settings to disk.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    /// Preset tunables derived from these settings.
    pub fn effect_params(&self) -> EffectParams {
        EffectParams {
            ticker_target: self.ticker_target,
            ticker_duration: Duration::from_millis(self.ticker_duration_ms),
            ticker_interval: (self.ticker_interval_ms > 0)
                .then(|| Duration::from_millis(self.ticker_interval_ms)),
            max_rotation: self.max_rotation,
            max_translate: self.max_translate,
            pointer_leave: self.leave_policy(),
            ..EffectParams::default()
        }
    }

    pub fn leave_policy(&self) -> LeavePolicy {
        match self.pointer_leave {
            LeaveMode::Freeze => LeavePolicy::Freeze,
            LeaveMode::Center => LeavePolicy::ResetToCenter,
            LeaveMode::Rest => LeavePolicy::Reset {
                x: self.rest_x,
                y: self.rest_y,
            },
        }
    }

    fn parse(s: &str) -> Self {
        let mut cfg = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "frame_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        cfg.frame_ms = v.clamp(8, 250);
                    }
                }
                "ticker_target" => {
                    if let Some(v) = parse_finite(value) {
                        cfg.ticker_target = v;
                    }
                }
                "ticker_duration_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        cfg.ticker_duration_ms = v.min(600_000);
                    }
                }
                "ticker_interval_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        cfg.ticker_interval_ms = v.min(10_000);
                    }
                }
                "max_rotation" => {
                    if let Some(v) = parse_finite(value) {
                        cfg.max_rotation = v.abs().min(90.0);
                    }
                }
                "max_translate" => {
                    if let Some(v) = parse_finite(value) {
                        cfg.max_translate = v.abs().min(20.0);
                    }
                }
                "scroll_speed" => {
                    if let Some(v) = parse_finite(value) {
                        cfg.scroll_speed = v.clamp(0.05, 0.95);
                    }
                }
                "pointer_leave" => {
                    if let Some(mode) = LeaveMode::parse(value) {
                        cfg.pointer_leave = mode;
                    }
                }
                "pointer_rest_x" => {
                    if let Some(v) = parse_finite(value) {
                        cfg.rest_x = v.clamp(-500.0, 500.0);
                    }
                }
                "pointer_rest_y" => {
                    if let Some(v) = parse_finite(value) {
                        cfg.rest_y = v.clamp(-500.0, 500.0);
                    }
                }
                other => tracing::debug!(key = other, "ignoring unknown config key"),
            }
        }

        cfg
    }

    fn serialise(&self) -> String {
        [
            "# signal-anim configuration".to_string(),
            String::new(),
            "# Event loop".to_string(),
            format!("frame_ms = {}", self.frame_ms),
            format!("scroll_speed = {}", self.scroll_speed),
            String::new(),
            "# Number ticker (interval 0 = every frame)".to_string(),
            format!("ticker_target = {}", self.ticker_target),
            format!("ticker_duration_ms = {}", self.ticker_duration_ms),
            format!("ticker_interval_ms = {}", self.ticker_interval_ms),
            String::new(),
            "# Tilt card (pointer_leave: freeze | center | rest)".to_string(),
            format!("max_rotation = {}", self.max_rotation),
            format!("max_translate = {}", self.max_translate),
            format!("pointer_leave = {}", self.pointer_leave.label()),
            format!("pointer_rest_x = {}", self.rest_x),
            format!("pointer_rest_y = {}", self.rest_y),
            String::new(),
        ]
        .join("\n")
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Return the config file path (`$XDG_CONFIG_HOME/signal-anim/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("signal-anim").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::parse(""), Settings::default());
        assert_eq!(Settings::parse("# only comments\n[section]\n"), Settings::default());
    }

    #[test]
    fn values_are_parsed_and_clamped() {
        let cfg = Settings::parse(
            "frame_ms = 1\n\
             ticker_target = 250\n\
             ticker_interval_ms = 40\n\
             max_rotation = -120\n\
             scroll_speed = 3\n\
             pointer_leave = \"freeze\"\n",
        );
        assert_eq!(cfg.frame_ms, 8);
        assert_eq!(cfg.ticker_target, 250.0);
        assert_eq!(cfg.ticker_interval_ms, 40);
        assert_eq!(cfg.max_rotation, 90.0);
        assert_eq!(cfg.scroll_speed, 0.95);
        assert_eq!(cfg.pointer_leave, LeaveMode::Freeze);
    }

    #[test]
    fn garbage_values_and_unknown_keys_are_ignored() {
        let cfg = Settings::parse("frame_ms = fast\nticker_target = NaN\nwat = 3\nno equals sign\n");
        assert_eq!(cfg, Settings::default());
    }

    #[test]
    fn serialised_form_parses_back() {
        let cfg = Settings {
            frame_ms: 16,
            ticker_target: 42.5,
            ticker_interval_ms: 100,
            pointer_leave: LeaveMode::Rest,
            rest_x: 4.5,
            rest_y: -2.0,
            ..Settings::default()
        };
        assert_eq!(Settings::parse(&cfg.serialise()), cfg);
    }

    #[test]
    fn effect_params_follow_settings() {
        let cfg = Settings {
            ticker_interval_ms: 0,
            pointer_leave: LeaveMode::Freeze,
            ..Settings::default()
        };
        let params = cfg.effect_params();
        assert_eq!(params.ticker_interval, None);
        assert_eq!(params.pointer_leave, LeavePolicy::Freeze);
        assert_eq!(params.ticker_duration, Duration::from_millis(2000));
    }

    #[test]
    fn rest_mode_resets_to_the_configured_point() {
        let cfg = Settings::parse("pointer_leave = rest
pointer_rest_x = 3
pointer_rest_y = 1.5
");
        assert_eq!(cfg.pointer_leave, LeaveMode::Rest);
        assert_eq!(cfg.effect_params().pointer_leave, LeavePolicy::Reset { x: 3.0, y: 1.5 });

        let legacy = Settings::parse("pointer_leave = reset
");
        assert_eq!(legacy.leave_policy(), LeavePolicy::Reset { x: 0.0, y: 0.0 });
    }

    #[test]
    fn leave_mode_cycles() {
        assert_eq!(LeaveMode::Center.cycle(), LeaveMode::Freeze);
        assert_eq!(LeaveMode::Freeze.cycle(), LeaveMode::Rest);
        assert_eq!(LeaveMode::Rest.cycle(), LeaveMode::Center);
    }
}

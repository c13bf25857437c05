use crate::consts::SAMPLE_SIZE;
use crate::visual::{Color, HighlightMode};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const APP_VERSION: &str = "v0.1.0";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("amn_visual must be at least 1")]
    NoVisualElements,

    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    #[error("keep_percentage must be in (0, 1], got {0}")]
    KeepPercentage(f32),

    #[error("smooth_speed must be greater than 0, got {0}")]
    SmoothSpeed(f32),

    #[error("max_visual_scale must not be negative, got {0}")]
    MaxVisualScale(f32),

    #[error("circle_radius must be greater than 0, got {0}")]
    CircleRadius(f32),

    #[error("highlight times must not be negative (start={start}, end={end})")]
    NegativeHighlightTime { start: f32, end: f32 },

    #[error(
        "{amn_visual} visual elements over {keep_percentage} of the spectrum leave less than one bin per element"
    )]
    EmptyBins {
        amn_visual: usize,
        keep_percentage: f32,
    },
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Arrange the elements on a circle (true) or along a line (false).
    /// The bass kick plane only exists in circle mode.
    pub is_circle: bool,

    /// Radius of the circle arrangement in world units.
    pub circle_radius: f32,

    /// Enable the timed highlight particle effect.
    pub turn_on_highlight_particle: bool,

    /// Elapsed seconds after which the highlight becomes visible.
    pub high_start_time: f32,

    /// Elapsed seconds after which the highlight is hidden again.
    pub high_end_time: f32,

    /// How the highlight remembers that it was already activated.
    pub highlight_mode: HighlightMode,

    /// How far the bass plane travels per decibel above the threshold.
    /// Higher = deeper kicks
    pub circle_bass_percentage: f32,

    /// Constant offset added to the bass plane target position.
    pub circle_bass_control: f32,

    /// Decibel level above which the bass plane kicks.
    /// Lower = kicks on quieter passages
    pub bass_min: f32,

    /// Upper decibel bound for the bass kick. Currently not read by the pipeline.
    pub bass_max: f32,

    /// Background color while the signal is loud (intensity 1).
    pub min_color: Color,

    /// Background color while the signal is quiet (intensity 0).
    pub max_color: Color,

    /// Upper bound for an element's extra height.
    pub max_visual_scale: f32,

    /// Multiplier from averaged spectrum magnitude to element height.
    /// Higher = taller elements for the same signal
    pub visual_modifier: f32,

    /// Decay rate per second for element heights and the background intensity.
    /// Higher = snappier falloff, Lower = longer trails
    pub smooth_speed: f32,

    /// Fraction of the spectrum (from 0 Hz upwards) spread over the elements.
    /// The remaining high frequencies are ignored.
    pub keep_percentage: f32,

    /// Number of visual elements spawned at startup.
    pub amn_visual: usize,

    /// Log the loudness and effect state every tick.
    pub debug_logging: bool,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            is_circle: true,
            circle_radius: 10.0,
            turn_on_highlight_particle: false,
            high_start_time: 0.0,
            high_end_time: 0.0,
            highlight_mode: HighlightMode::default(),
            circle_bass_percentage: 0.1,
            circle_bass_control: 0.2,
            bass_min: 10.0,
            bass_max: 18.0,
            min_color: Color::rgb(0.55, 0.1, 0.45),
            max_color: Color::rgb(0.02, 0.02, 0.06),
            max_visual_scale: 25.0,
            visual_modifier: 50.0,
            smooth_speed: 10.0,
            keep_percentage: 0.1,
            amn_visual: 100,
            debug_logging: false,
        }
    }
}

impl VisualizerConfig {
    /// Reads a TOML file. Missing keys keep their default value.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Width, in spectrum bins, of the block averaged into each element.
    pub fn average_size(&self) -> usize {
        if self.amn_visual == 0 {
            return 0;
        }
        // Saturating cast: NaN and negative products become 0.
        ((SAMPLE_SIZE as f32 * self.keep_percentage) / self.amn_visual as f32) as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.amn_visual == 0 {
            return Err(ConfigError::NoVisualElements);
        }

        let numeric = [
            ("circle_radius", self.circle_radius),
            ("high_start_time", self.high_start_time),
            ("high_end_time", self.high_end_time),
            ("circle_bass_percentage", self.circle_bass_percentage),
            ("circle_bass_control", self.circle_bass_control),
            ("bass_min", self.bass_min),
            ("bass_max", self.bass_max),
            ("max_visual_scale", self.max_visual_scale),
            ("visual_modifier", self.visual_modifier),
            ("smooth_speed", self.smooth_speed),
            ("keep_percentage", self.keep_percentage),
        ];
        if let Some((name, _)) = numeric.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NotFinite(name));
        }
        if !self.min_color.is_finite() {
            return Err(ConfigError::NotFinite("min_color"));
        }
        if !self.max_color.is_finite() {
            return Err(ConfigError::NotFinite("max_color"));
        }

        if self.keep_percentage <= 0.0 || self.keep_percentage > 1.0 {
            return Err(ConfigError::KeepPercentage(self.keep_percentage));
        }
        if self.smooth_speed <= 0.0 {
            return Err(ConfigError::SmoothSpeed(self.smooth_speed));
        }
        if self.max_visual_scale < 0.0 {
            return Err(ConfigError::MaxVisualScale(self.max_visual_scale));
        }
        if self.circle_radius <= 0.0 {
            return Err(ConfigError::CircleRadius(self.circle_radius));
        }
        if self.high_start_time < 0.0 || self.high_end_time < 0.0 {
            return Err(ConfigError::NegativeHighlightTime {
                start: self.high_start_time,
                end: self.high_end_time,
            });
        }
        if self.average_size() == 0 {
            return Err(ConfigError::EmptyBins {
                amn_visual: self.amn_visual,
                keep_percentage: self.keep_percentage,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = VisualizerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        // 1024 * 0.1 / 100 = 1.024
        assert_eq!(config.average_size(), 1);
    }

    #[test]
    fn test_rejects_zero_elements() {
        let config = VisualizerConfig {
            amn_visual: 0,
            ..Default::default()
        };
        assert_eq!(config.average_size(), 0);
        assert_eq!(config.validate(), Err(ConfigError::NoVisualElements));
    }

    #[test]
    fn test_rejects_non_positive_smooth_speed() {
        for speed in [0.0, -3.0] {
            let config = VisualizerConfig {
                smooth_speed: speed,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::SmoothSpeed(speed)));
        }
    }

    #[test]
    fn test_rejects_too_many_elements_for_kept_spectrum() {
        // 1024 * 0.1 = 102.4 bins cannot feed 200 elements
        let config = VisualizerConfig {
            amn_visual: 200,
            ..Default::default()
        };
        assert_eq!(config.average_size(), 0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyBins { amn_visual: 200, .. })
        ));
    }

    #[test]
    fn test_rejects_keep_percentage_out_of_range() {
        for keep in [0.0, 1.5, -0.1] {
            let config = VisualizerConfig {
                keep_percentage: keep,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::KeepPercentage(keep)));
        }
    }

    #[test]
    fn test_rejects_non_finite_fields() {
        let config = VisualizerConfig {
            visual_modifier: f32::INFINITY,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotFinite("visual_modifier"))
        );

        let config = VisualizerConfig {
            min_color: Color::rgb(f32::NAN, 0.0, 0.0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NotFinite("min_color")));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: VisualizerConfig = toml::from_str(
            r#"
            amn_visual = 64
            is_circle = false
            highlight_mode = "latched"
            min_color = { r = 1.0, g = 0.5, b = 0.0 }
            "#,
        )
        .unwrap();

        assert_eq!(config.amn_visual, 64);
        assert!(!config.is_circle);
        assert_eq!(config.highlight_mode, HighlightMode::Latched);
        assert_eq!(config.min_color, Color::rgb(1.0, 0.5, 0.0));
        assert_eq!(config.smooth_speed, 10.0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_parse_rejects_negative_element_count() {
        let parsed: Result<VisualizerConfig, _> = toml::from_str("amn_visual = -5");
        assert!(parsed.is_err());
    }
}

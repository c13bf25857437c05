use glam::Vec3;
use serde::Deserialize;

use crate::config::VisualizerConfig;
use crate::consts::{BACKGROUND_DB_DIVISOR, BASS_RELAX_FACTOR, BASS_REST_Z, BASS_TRAVEL_MIN_Z};
use crate::visual::Color;

/// `from.lerp(to, t)` with `t` saturated to `0.0..=1.0`.
fn saturating_lerp(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    if t >= 1.0 {
        to
    } else if t > 0.0 {
        from.lerp(to, t)
    } else {
        from
    }
}

/// Background intensity that decays over time but never below the current loudness.
pub struct BackgroundFade {
    intensity: f32,
    smooth_speed: f32,
    min_color: Color,
    max_color: Color,
}

impl BackgroundFade {
    pub fn new(config: &VisualizerConfig) -> Self {
        Self {
            intensity: 0.0,
            smooth_speed: config.smooth_speed,
            min_color: config.min_color,
            max_color: config.max_color,
        }
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn update(&mut self, db: f32, dt: f32) -> Color {
        self.intensity -= dt * self.smooth_speed;

        let floor = db / BACKGROUND_DB_DIVISOR;
        if self.intensity < floor {
            self.intensity = floor;
        }

        self.max_color.lerp(self.min_color, self.intensity)
    }
}

/// Moves the bass plane towards the viewer on loud passages.
pub struct BassKick {
    position: Vec3,
    percentage: f32,
    control: f32,
    bass_min: f32,
    correction_factor: f32,
}

impl BassKick {
    pub fn new(config: &VisualizerConfig) -> Self {
        Self {
            position: Self::rest_position(),
            percentage: config.circle_bass_percentage,
            control: config.circle_bass_control,
            bass_min: config.bass_min,
            correction_factor: config.smooth_speed,
        }
    }

    pub fn rest_position() -> Vec3 {
        Vec3::new(0.0, 0.0, BASS_REST_Z)
    }

    pub fn update(&mut self, db: f32) -> Vec3 {
        let rest = Self::rest_position();
        let previous = self.position;

        let mut next = previous;
        if db > self.bass_min {
            let target = Vec3::new(0.0, 0.0, db * -self.percentage + self.control);
            next = saturating_lerp(rest, target, 1.0);
        } else if db < self.bass_min {
            next = saturating_lerp(previous, rest, BASS_RELAX_FACTOR);
        }

        if !(BASS_TRAVEL_MIN_Z..=BASS_REST_Z).contains(&next.z) {
            next = saturating_lerp(previous, rest, self.correction_factor);
            next.z = next.z.clamp(BASS_TRAVEL_MIN_Z, BASS_REST_Z);
        }

        self.position = next;
        next
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightMode {
    /// Re-evaluated every tick: shown after the start time, hidden after the end time.
    #[default]
    Window,
    /// Shown at most once per run. A later pass over the start time does nothing
    /// until `reset`.
    Latched,
}

pub struct HighlightWindow {
    start: f32,
    end: f32,
    mode: HighlightMode,
    visible: bool,
    activated: bool,
}

impl HighlightWindow {
    pub fn new(config: &VisualizerConfig) -> Self {
        Self {
            start: config.high_start_time,
            end: config.high_end_time,
            mode: config.highlight_mode,
            visible: false,
            activated: false,
        }
    }

    pub fn update(&mut self, elapsed: f32) -> bool {
        if self.start < elapsed {
            match self.mode {
                HighlightMode::Window => self.visible = true,
                HighlightMode::Latched if !self.activated => {
                    self.visible = true;
                    self.activated = true;
                }
                HighlightMode::Latched => {}
            }
        }
        if self.end < elapsed {
            self.visible = false;
        }

        self.visible
    }

    pub fn reset(&mut self) {
        self.visible = false;
        self.activated = false;
    }
}

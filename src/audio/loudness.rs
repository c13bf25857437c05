use crate::audio::AudioFrame;
use crate::consts::{DB_FLOOR, DB_REFERENCE};
use log::warn;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoudnessState {
    /// Root mean square of the frame samples, always >= 0.
    pub rms: f32,
    /// `20 * log10(rms / DB_REFERENCE)`, never below `DB_FLOOR`.
    pub db: f32,
}

impl Default for LoudnessState {
    fn default() -> Self {
        Self {
            rms: 0.0,
            db: DB_FLOOR,
        }
    }
}

/// Turns the time-domain half of an `AudioFrame` into loudness scalars.
pub struct SignalAnalyzer;

impl Default for SignalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, frame: &AudioFrame) -> LoudnessState {
        let mut rms = calculate_rms(frame.samples());
        if !rms.is_finite() {
            warn!("Non-finite samples in audio frame, treating tick as silence");
            rms = 0.0;
        }

        LoudnessState {
            rms,
            db: to_decibels(rms),
        }
    }
}

pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|&x| x * x).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Decibels relative to `DB_REFERENCE`. Silence and anything quieter than the floor
/// report `DB_FLOOR`.
pub fn to_decibels(rms: f32) -> f32 {
    if rms.is_nan() || rms <= 0.0 {
        return DB_FLOOR;
    }
    (20.0 * (rms / DB_REFERENCE).log10()).max(DB_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_hits_db_floor() {
        let loudness = SignalAnalyzer::new().analyze(&AudioFrame::silent());
        assert_eq!(loudness.rms, 0.0);
        assert_eq!(loudness.db, DB_FLOOR);
        assert!(loudness.db.is_finite());
    }

    #[test]
    fn test_constant_amplitude_rms() {
        for amplitude in [0.25f32, -0.5, 1.0] {
            let mut frame = AudioFrame::silent();
            frame.samples_mut().fill(amplitude);
            let loudness = SignalAnalyzer::new().analyze(&frame);
            assert!((loudness.rms - amplitude.abs()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_reference_level_is_zero_db() {
        assert!(to_decibels(DB_REFERENCE).abs() < 1e-5);
        // 10x the reference is +20 dB
        assert!((to_decibels(1.0) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_tiny_rms_is_floored() {
        assert_eq!(to_decibels(1e-12), DB_FLOOR);
        assert_eq!(to_decibels(-1.0), DB_FLOOR);
        assert_eq!(to_decibels(f32::NAN), DB_FLOOR);
    }

    #[test]
    fn test_default_analyzer_matches_new() {
        let mut frame = AudioFrame::silent();
        frame.samples_mut().fill(0.3);
        assert_eq!(
            SignalAnalyzer::default().analyze(&frame),
            SignalAnalyzer::new().analyze(&frame)
        );
    }

    #[test]
    fn test_nan_samples_degrade_to_silence() {
        let mut frame = AudioFrame::silent();
        frame.samples_mut()[3] = f32::NAN;
        let loudness = SignalAnalyzer::new().analyze(&frame);
        assert_eq!(loudness, LoudnessState::default());
    }
}

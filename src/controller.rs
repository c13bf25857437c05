use crate::audio::{AudioFrame, LoudnessState, SignalAnalyzer};
use crate::config::{ConfigError, VisualizerConfig};
use crate::visual::{
    Arrangement, BackgroundFade, BassKick, Color, HighlightWindow, SpectrumAggregator,
    VisualLayoutProvider, VisualScaleSmoother,
};
use glam::Vec3;
use log::{debug, info, warn};

#[derive(Clone, Debug, PartialEq)]
pub struct VisualOutput {
    pub loudness: LoudnessState,
    pub background: Color,
    pub background_intensity: f32,
    /// Tallest element height after smoothing.
    pub peak_scale: f32,
    /// Only present in circle mode.
    pub bass_plane: Option<Vec3>,
    /// Only present while the highlight particle is enabled.
    pub highlight_visible: Option<bool>,
}

impl Default for VisualOutput {
    fn default() -> Self {
        Self {
            loudness: LoudnessState::default(),
            background: Color::BLACK,
            background_intensity: 0.0,
            peak_scale: 0.0,
            bass_plane: None,
            highlight_visible: None,
        }
    }
}

/// Runs the audio-to-visual pipeline once per frame and pushes element scales into the
/// layout collaborator.
pub struct Controller<L: VisualLayoutProvider> {
    config: VisualizerConfig,
    layout: L,
    handles: Vec<L::Handle>,
    analyzer: SignalAnalyzer,
    aggregator: SpectrumAggregator,
    smoother: VisualScaleSmoother,
    background: BackgroundFade,
    bass_kick: BassKick,
    highlight: HighlightWindow,
}

impl<L: VisualLayoutProvider> Controller<L> {
    pub fn new(config: VisualizerConfig, mut layout: L) -> Result<Self, ConfigError> {
        config.validate()?;

        let arrangement = Arrangement::from_config(&config);
        let handles = layout.initialize(config.amn_visual, arrangement);
        let aggregator = SpectrumAggregator::new(&config);
        info!(
            "Spawned {} visual elements ({arrangement:?}), {} spectrum bin(s) each",
            handles.len(),
            aggregator.average_size()
        );
        if config.bass_max != VisualizerConfig::default().bass_max {
            debug!("bass_max is set but not used by the bass kick");
        }

        Ok(Self {
            analyzer: SignalAnalyzer::new(),
            aggregator,
            smoother: VisualScaleSmoother::new(&config),
            background: BackgroundFade::new(&config),
            bass_kick: BassKick::new(&config),
            highlight: HighlightWindow::new(&config),
            handles,
            layout,
            config,
        })
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Starts a new run: the highlight may fire again. Element heights, background and
    /// bass plane carry over and settle on their own.
    pub fn restart(&mut self) {
        debug!("Restarting run");
        self.highlight.reset();
    }

    /// Advances the pipeline by one frame. `dt` is the frame time and `elapsed` the time
    /// since the run started, both in seconds.
    pub fn tick(&mut self, dt: f32, elapsed: f32, frame: &AudioFrame) -> VisualOutput {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!("Ignoring invalid frame time {dt}");
            0.0
        };

        let loudness = self.analyzer.analyze(frame);
        let background = self.background.update(loudness.db, dt);

        let targets = self.aggregator.aggregate(frame.spectrum());
        let scales = self.smoother.step(&targets, dt);
        for (&handle, &scale) in self.handles.iter().zip(scales) {
            self.layout.apply_scale(handle, scale);
        }
        let peak_scale = scales.iter().copied().fold(0.0, f32::max);

        let highlight_visible = self
            .config
            .turn_on_highlight_particle
            .then(|| self.highlight.update(elapsed));

        let bass_plane = self.config.is_circle.then(|| self.bass_kick.update(loudness.db));

        if self.config.debug_logging {
            debug!(
                "t={elapsed:.3} rms={:.4} db={:.2} background={:.3} peak={peak_scale:.2}",
                loudness.rms,
                loudness.db,
                self.background.intensity(),
            );
            debug!("bass={bass_plane:?} highlight={highlight_visible:?}");
        }

        VisualOutput {
            loudness,
            background,
            background_intensity: self.background.intensity(),
            peak_scale,
            bass_plane,
            highlight_visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BASS_REST_Z, DB_FLOOR};
    use crate::visual::SceneLayout;

    #[derive(Default)]
    struct RecordingLayout {
        spawned: Option<(usize, Arrangement)>,
        applied: Vec<(usize, f32)>,
    }

    impl VisualLayoutProvider for RecordingLayout {
        type Handle = usize;

        fn initialize(&mut self, count: usize, arrangement: Arrangement) -> Vec<usize> {
            self.spawned = Some((count, arrangement));
            (0..count).collect()
        }

        fn apply_scale(&mut self, handle: usize, scale: f32) {
            self.applied.push((handle, scale));
        }
    }

    fn loud_frame(amplitude: f32, magnitude: f32) -> AudioFrame {
        let mut frame = AudioFrame::silent();
        frame.samples_mut().fill(amplitude);
        frame.spectrum_mut().fill(magnitude);
        frame
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = VisualizerConfig {
            smooth_speed: 0.0,
            ..Default::default()
        };
        let result = Controller::new(config, RecordingLayout::default());
        assert!(matches!(result, Err(ConfigError::SmoothSpeed(_))));
    }

    #[test]
    fn test_spawns_elements_once() {
        let controller =
            Controller::new(VisualizerConfig::default(), RecordingLayout::default()).unwrap();
        assert_eq!(
            controller.layout().spawned,
            Some((100, Arrangement::Circle { radius: 10.0 }))
        );
    }

    #[test]
    fn test_tick_applies_every_scale() {
        let config = VisualizerConfig {
            amn_visual: 8,
            ..Default::default()
        };
        let mut controller = Controller::new(config, RecordingLayout::default()).unwrap();

        controller.tick(0.016, 0.016, &loud_frame(0.1, 0.2));

        let output = controller.tick(0.016, 0.032, &loud_frame(0.1, 0.0));
        // 10 - 0.016 * 10 after one silent frame
        assert!((output.peak_scale - 9.84).abs() < 1e-4);

        let applied = &controller.layout().applied[..8];
        assert_eq!(applied.len(), 8);
        // 0.2 * 50 = 10 on every element
        assert!(applied.iter().all(|&(_, scale)| (scale - 10.0).abs() < 1e-4));
    }

    #[test]
    fn test_silent_tick_is_finite() {
        let mut controller =
            Controller::new(VisualizerConfig::default(), SceneLayout::new()).unwrap();
        let output = controller.tick(0.016, 0.016, &AudioFrame::silent());

        assert_eq!(output.loudness.rms, 0.0);
        assert_eq!(output.loudness.db, DB_FLOOR);
        assert!(output.background.is_finite());
        assert_eq!(output.bass_plane, Some(Vec3::new(0.0, 0.0, BASS_REST_Z)));
        assert_eq!(output.highlight_visible, None);
    }

    #[test]
    fn test_loud_tick_kicks_bass_plane() {
        let mut controller =
            Controller::new(VisualizerConfig::default(), SceneLayout::new()).unwrap();
        // rms 0.5 -> 20 * log10(5) ~ 13.98 dB
        let output = controller.tick(0.016, 0.016, &loud_frame(0.5, 0.0));

        let db = output.loudness.db;
        assert!((db - 13.979).abs() < 1e-2);
        let z = output.bass_plane.unwrap().z;
        assert!((z - (db * -0.1 + 0.2)).abs() < 1e-5);
        assert!((output.background_intensity - db / 40.0).abs() < 1e-5);
    }

    #[test]
    fn test_line_mode_has_no_bass_plane() {
        let config = VisualizerConfig {
            is_circle: false,
            turn_on_highlight_particle: true,
            high_start_time: 1.0,
            high_end_time: 2.0,
            ..Default::default()
        };
        let mut controller = Controller::new(config, SceneLayout::new()).unwrap();
        let positions: Vec<Vec3> = controller
            .layout()
            .elements()
            .take(2)
            .map(|(anchor, _)| anchor.position)
            .collect();
        assert_eq!(positions, vec![Vec3::ZERO, Vec3::X]);

        let output = controller.tick(0.016, 1.5, &AudioFrame::silent());
        assert_eq!(output.bass_plane, None);
        assert_eq!(output.highlight_visible, Some(true));

        let output = controller.tick(0.016, 2.5, &AudioFrame::silent());
        assert_eq!(output.highlight_visible, Some(false));
    }

    #[test]
    fn test_invalid_dt_does_not_decay() {
        let config = VisualizerConfig {
            amn_visual: 2,
            ..Default::default()
        };
        let mut controller = Controller::new(config, SceneLayout::new()).unwrap();
        controller.tick(0.0, 0.0, &loud_frame(0.0, 0.3));

        for dt in [f32::NAN, -1.0, f32::INFINITY] {
            let output = controller.tick(dt, 0.0, &AudioFrame::silent());
            assert!((output.peak_scale - 15.0).abs() < 1e-4);
            let heights: Vec<f32> = controller.layout().elements().map(|(_, s)| s.y).collect();
            assert!(heights.iter().all(|&h| (h - 16.0).abs() < 1e-4));
        }
    }
}

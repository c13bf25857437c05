use crate::config::VisualizerConfig;

/// Per-element attack/decay: heights fall linearly at `smooth_speed` per second and jump
/// straight up to any higher target.
pub struct VisualScaleSmoother {
    scales: Vec<f32>,
    smooth_speed: f32,
    max_visual_scale: f32,
}

impl VisualScaleSmoother {
    pub fn new(config: &VisualizerConfig) -> Self {
        Self {
            scales: vec![0.0; config.amn_visual],
            smooth_speed: config.smooth_speed,
            max_visual_scale: config.max_visual_scale,
        }
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    /// Advances every element by `dt` seconds towards `targets`. Elements without a
    /// matching target only decay.
    pub fn step(&mut self, targets: &[f32], dt: f32) -> &[f32] {
        let decay = dt * self.smooth_speed;
        let targets = targets.iter().copied().chain(std::iter::repeat(f32::NEG_INFINITY));

        for (scale, target) in self.scales.iter_mut().zip(targets) {
            *scale -= decay;
            if *scale < target {
                *scale = target;
            }
            if *scale > self.max_visual_scale {
                *scale = self.max_visual_scale;
            }
        }

        &self.scales
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smoother(elements: usize) -> VisualScaleSmoother {
        VisualScaleSmoother::new(&VisualizerConfig {
            amn_visual: elements,
            ..Default::default()
        })
    }

    #[test]
    fn test_decay_above_target() {
        let mut s = smoother(1);
        s.step(&[20.0], 0.0);
        let scale = s.step(&[5.0], 0.016)[0];
        assert!((scale - 19.84).abs() < 1e-4);
    }

    #[test]
    fn test_attack_snaps_to_target() {
        let mut s = smoother(1);
        s.step(&[1.0], 0.0);
        let scale = s.step(&[5.0], 0.016)[0];
        assert_eq!(scale, 5.0);
    }

    #[test]
    fn test_clamped_to_max_visual_scale() {
        let mut s = smoother(2);
        let scales = s.step(&[1000.0, 3.0], 0.016);
        assert_eq!(scales, &[25.0, 3.0]);
    }

    #[test]
    fn test_non_increasing_between_attacks() {
        let mut s = smoother(1);
        s.step(&[24.0], 0.016);

        let mut previous = s.scales()[0];
        for _ in 0..200 {
            let scale = s.step(&[0.0], 0.016)[0];
            assert!(scale <= previous);
            assert!(scale <= 25.0);
            previous = scale;
        }
        // Decayed all the way down onto the target
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn test_missing_targets_only_decay() {
        let mut s = smoother(3);
        s.step(&[10.0, 10.0, 10.0], 0.0);
        let scales = s.step(&[10.0], 0.1);
        assert_eq!(scales[0], 10.0);
        assert!((scales[1] - 9.0).abs() < 1e-5);
        assert!((scales[2] - 9.0).abs() < 1e-5);
    }
}

use crate::config::VisualizerConfig;

/// Averages consecutive blocks of the low end of the spectrum into one value per element.
pub struct SpectrumAggregator {
    bins: usize,
    average_size: usize,
    visual_modifier: f32,
}

impl SpectrumAggregator {
    pub fn new(config: &VisualizerConfig) -> Self {
        Self {
            bins: config.amn_visual,
            average_size: config.average_size(),
            visual_modifier: config.visual_modifier,
        }
    }

    pub fn average_size(&self) -> usize {
        self.average_size
    }

    /// Returns exactly `amn_visual` raw target scales. Blocks that would start past the end of
    /// `spectrum`, and every block when `average_size` is 0, read as 0.
    pub fn aggregate(&self, spectrum: &[f32]) -> Vec<f32> {
        let mut targets = vec![0.0; self.bins];
        if self.average_size == 0 {
            return targets;
        }

        let width = self.average_size as f32;
        for (target, block) in targets
            .iter_mut()
            .zip(spectrum.chunks_exact(self.average_size))
        {
            *target = block.iter().sum::<f32>() / width * self.visual_modifier;
        }

        targets
    }
}

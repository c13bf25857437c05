use crate::consts::SAMPLE_SIZE;

/// One tick worth of audio: the newest `SAMPLE_SIZE` samples and their magnitude spectrum.
/// Both buffers are allocated once and never resized.
#[derive(Clone, Debug)]
pub struct AudioFrame {
    samples: Box<[f32; SAMPLE_SIZE]>,
    spectrum: Box<[f32; SAMPLE_SIZE]>,
}

impl Default for AudioFrame {
    fn default() -> Self {
        Self::silent()
    }
}

impl AudioFrame {
    pub fn silent() -> Self {
        Self {
            samples: Box::new([0.0; SAMPLE_SIZE]),
            spectrum: Box::new([0.0; SAMPLE_SIZE]),
        }
    }

    pub fn samples(&self) -> &[f32] {
        self.samples.as_slice()
    }

    pub fn spectrum(&self) -> &[f32] {
        self.spectrum.as_slice()
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        self.samples.as_mut_slice()
    }

    pub fn spectrum_mut(&mut self) -> &mut [f32] {
        self.spectrum.as_mut_slice()
    }
}

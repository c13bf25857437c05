use rustfft::{Fft, FftPlanner, num_complex::Complex};
use std::sync::Arc;

use crate::audio::{AudioFrame, window};
use crate::consts::{FFT_SIZE, SAMPLE_SIZE};

/// Rolling capture buffer fed by the input stream. Produces one `AudioFrame` per tick.
pub struct AudioAnalyzer {
    buffer: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    window_gain: f32,
    scratch: Vec<Complex<f32>>,
}

impl Default for AudioAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioAnalyzer {
    pub fn new() -> Self {
        let window = window::blackman_harris(FFT_SIZE);
        let window_gain = window.iter().sum::<f32>();

        Self {
            buffer: Vec::with_capacity(FFT_SIZE),
            fft: FftPlanner::new().plan_fft_forward(FFT_SIZE),
            window,
            window_gain,
            scratch: vec![Complex::new(0.0, 0.0); FFT_SIZE],
        }
    }

    pub fn add_samples(&mut self, samples: &[f32]) {
        self.buffer.extend_from_slice(samples);

        // Keep only the most recent samples
        if self.buffer.len() > FFT_SIZE {
            self.buffer.drain(0..self.buffer.len() - FFT_SIZE);
        }
    }

    /// Copies the newest `SAMPLE_SIZE` samples into `frame` and refreshes its spectrum.
    /// Missing history is treated as silence.
    pub fn capture(&mut self, frame: &mut AudioFrame) {
        let available = self.buffer.len();

        let recent = &self.buffer[available.saturating_sub(SAMPLE_SIZE)..];
        let samples = frame.samples_mut();
        let pad = SAMPLE_SIZE - recent.len();
        samples[..pad].fill(0.0);
        samples[pad..].copy_from_slice(recent);

        // Right-align the history inside the FFT window as well
        let pad = FFT_SIZE - available;
        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { self.buffer[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }
        self.fft.process(&mut self.scratch);

        // Amplitude normalisation: a full-scale sine peaks near 1.0
        let norm = 2.0 / self.window_gain;
        for (magnitude, bin) in frame.spectrum_mut().iter_mut().zip(&self.scratch) {
            *magnitude = bin.norm() * norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_buffer_keeps_most_recent_samples() {
        let mut analyzer = AudioAnalyzer::new();
        analyzer.add_samples(&vec![1.0; FFT_SIZE]);
        analyzer.add_samples(&[2.0; 10]);

        let mut frame = AudioFrame::silent();
        analyzer.capture(&mut frame);
        let samples = frame.samples();
        assert_eq!(samples[SAMPLE_SIZE - 1], 2.0);
        assert_eq!(samples[SAMPLE_SIZE - 10], 2.0);
        assert_eq!(samples[SAMPLE_SIZE - 11], 1.0);
        assert_eq!(samples[0], 1.0);
    }

    #[test]
    fn test_capture_pads_short_history() {
        let mut analyzer = AudioAnalyzer::new();
        analyzer.add_samples(&[0.5; 4]);

        let mut frame = AudioFrame::silent();
        analyzer.capture(&mut frame);

        assert_eq!(frame.samples().len(), SAMPLE_SIZE);
        assert_eq!(frame.samples()[SAMPLE_SIZE - 5], 0.0);
        assert_eq!(frame.samples()[SAMPLE_SIZE - 1], 0.5);
        assert_eq!(frame.spectrum().len(), SAMPLE_SIZE);
    }

    #[test]
    fn test_silence_has_empty_spectrum() {
        let mut analyzer = AudioAnalyzer::new();
        let mut frame = AudioFrame::silent();
        analyzer.capture(&mut frame);
        assert!(frame.spectrum().iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_sine_peaks_in_matching_bin() {
        let sample_rate = 44100.0;
        let bin = 20;
        let freq = bin as f32 * sample_rate / FFT_SIZE as f32;
        let sine: Vec<f32> = (0..FFT_SIZE)
            .map(|i| (TAU * freq * i as f32 / sample_rate).sin())
            .collect();

        let mut analyzer = AudioAnalyzer::new();
        analyzer.add_samples(&sine);
        let mut frame = AudioFrame::silent();
        analyzer.capture(&mut frame);

        let peak = frame
            .spectrum()
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, bin);
        assert!((frame.spectrum()[bin] - 1.0).abs() < 0.05);
    }
}

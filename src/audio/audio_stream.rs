use crate::audio::AudioAnalyzer;
use anyhow::{Context, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat};
use log::{debug, error};
use std::sync::{Arc, Mutex};

pub struct AudioStream {
    _stream: cpal::Stream,
}

impl AudioStream {
    pub fn new(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        sample_format: SampleFormat,
        analyzer: Arc<Mutex<AudioAnalyzer>>,
    ) -> Result<Self, anyhow::Error> {
        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(device, config, analyzer)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(device, config, analyzer)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(device, config, analyzer)?,
            other => return Err(anyhow!("Unsupported sample format {other:?}")),
        };

        stream.play()?;

        Ok(Self { _stream: stream })
    }
}

pub fn list_input_devices() -> Vec<String> {
    cpal::default_host()
        .input_devices()
        .ok()
        .map(|iter| iter.filter_map(|d| d.name().ok()).collect())
        .unwrap_or_default()
}

/// Index of the host's default input device inside `devices`, or 0.
pub fn default_input_device_index(devices: &[String]) -> usize {
    let default_name = cpal::default_host()
        .default_input_device()
        .and_then(|d| d.name().ok());

    default_name
        .and_then(|name| devices.iter().position(|d| *d == name))
        .unwrap_or(0)
}

pub fn create_audio_stream(
    device_idx: usize,
    devices: &[String],
    analyzer: Arc<Mutex<AudioAnalyzer>>,
) -> anyhow::Result<AudioStream> {
    let host = cpal::default_host();

    let device_name = devices
        .get(device_idx)
        .ok_or_else(|| anyhow!("No input device at index {device_idx}"))?;

    let device = host
        .input_devices()
        .context("Failed to enumerate input devices")?
        .find(|d| d.name().ok().as_ref() == Some(device_name))
        .ok_or_else(|| anyhow!("Input device '{device_name}' disappeared"))?;

    let supported_config = device
        .default_input_config()
        .with_context(|| format!("No default input config for '{device_name}'"))?;
    let sample_format = supported_config.sample_format();
    let stream_config: cpal::StreamConfig = supported_config.into();

    debug!(
        "Opening '{device_name}': {} channel(s) at {} Hz, {sample_format:?}",
        stream_config.channels, stream_config.sample_rate.0
    );

    AudioStream::new(&device, &stream_config, sample_format, analyzer)
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    analyzer: Arc<Mutex<AudioAnalyzer>>,
) -> Result<cpal::Stream, anyhow::Error>
where
    T: Sample + FromSample<f32> + cpal::SizedSample,
    f32: FromSample<T>,
{
    let channels = usize::from(config.channels.max(1));

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let samples = downmix(data, channels);
            analyzer.lock().unwrap().add_samples(&samples);
        },
        |err| error!("Stream error: {err}"),
        None,
    )?;

    Ok(stream)
}

/// Averages interleaved frames into a mono signal.
fn downmix<T>(data: &[T], channels: usize) -> Vec<f32>
where
    T: Sample,
    f32: FromSample<T>,
{
    data.chunks(channels)
        .map(|frame| {
            frame.iter().map(|&s| s.to_sample::<f32>()).sum::<f32>() / frame.len() as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_averages_channels() {
        let stereo = [1.0f32, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix(&stereo, 2), vec![0.5, 0.5, 0.0]);
        assert_eq!(downmix(&stereo, 1), stereo.to_vec());
    }

    #[test]
    fn test_downmix_converts_integer_samples() {
        let mono = [i16::MAX, 0];
        let out = downmix(&mono, 1);
        assert!((out[0] - 1.0).abs() < 1e-3);
        assert_eq!(out[1], 0.0);
    }
}

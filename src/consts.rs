/// Number of time-domain samples (and spectrum bins) analyzed per tick.
/// 1024 samples at 44.1kHz = ~23ms of audio
pub const SAMPLE_SIZE: usize = 1024;

/// FFT length used to produce `SAMPLE_SIZE` magnitude bins from 0 Hz up to Nyquist.
/// Must be a power of 2.
pub const FFT_SIZE: usize = SAMPLE_SIZE * 2;

/// Calibration level for the decibel conversion. An RMS equal to this reads as 0 dB.
pub const DB_REFERENCE: f32 = 0.1;

/// Lowest decibel value ever reported. Silence (RMS of 0) maps here instead of -inf.
/// 20 * log10(1e-6 / 0.1) = -100 dB
pub const DB_FLOOR: f32 = -100.0;

/// Resting position of the bass plane along the kick axis (z).
/// This is also the near end of its travel window.
pub const BASS_REST_Z: f32 = -0.4;

/// Far end of the bass plane travel window (z).
/// Kicks that would push the plane further are pulled back to rest.
pub const BASS_TRAVEL_MIN_Z: f32 = -25.0;

/// Local scale given to the bass plane when the circle is spawned.
pub const BASS_PLANE_SCALE: [f32; 3] = [20.0, 20.0, 1.0];

/// Interpolation factor used when the bass plane relaxes back to rest below the threshold.
pub const BASS_RELAX_FACTOR: f32 = 0.5;

/// Divisor mapping decibels to the background intensity floor.
/// 40 dB above the reference saturates the background to `min_color`.
pub const BACKGROUND_DB_DIVISOR: f32 = 40.0;

pub mod analyzer;
pub mod audio_stream;
pub mod frame;
pub mod loudness;
pub mod window;

pub use analyzer::AudioAnalyzer;
pub use audio_stream::AudioStream;
pub use frame::AudioFrame;
pub use loudness::{LoudnessState, SignalAnalyzer};

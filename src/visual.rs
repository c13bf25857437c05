pub mod aggregator;
pub mod color;
pub mod effects;
pub mod engine;
pub mod layout;
pub mod smoother;

pub use aggregator::SpectrumAggregator;
pub use color::Color;
pub use effects::{BackgroundFade, BassKick, HighlightMode, HighlightWindow};
pub use engine::VisualEngine;
pub use layout::{Arrangement, SceneLayout, VisualLayoutProvider};
pub use smoother::VisualScaleSmoother;

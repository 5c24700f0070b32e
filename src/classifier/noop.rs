use anyhow::Result;
use image::RgbImage;

use super::DeepfakeClassifier;

/// No-op classifier that always reports "real" - for running the front-end without weights
pub struct NoOpClassifier;

impl NoOpClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DeepfakeClassifier for NoOpClassifier {
    fn name(&self) -> &str {
        "noop"
    }

    fn fake_probability(&self, _image: &RgbImage) -> Result<f32> {
        Ok(0.0)
    }
}

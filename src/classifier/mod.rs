use anyhow::Result;
use image::RgbImage;
use std::sync::Arc;

use crate::config::{ClassifierKind, ModelConfig};

/// Pluggable image classifier producing a deepfake likelihood
pub trait DeepfakeClassifier: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Probability in [0, 1] that the image is synthetic
    fn fake_probability(&self, image: &RgbImage) -> Result<f32>;
}

/// Decode any supported image format into 3-channel RGB
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, image::ImageError> {
    Ok(image::load_from_memory(bytes)?.to_rgb8())
}

/// Build the classifier selected in config. Downloads weights for `Vit`, so
/// call it off the async runtime.
pub fn load(kind: ClassifierKind, model: &ModelConfig) -> Result<Arc<dyn DeepfakeClassifier>> {
    match kind {
        ClassifierKind::Vit => Ok(Arc::new(VitClassifier::load(model)?)),
        ClassifierKind::NoOp => {
            tracing::warn!("[classifier] Using no-op classifier, every image scores 0");
            Ok(Arc::new(NoOpClassifier::new()))
        }
    }
}

mod noop;
mod vit;

pub use noop::NoOpClassifier;
pub use vit::VitClassifier;

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    #[test]
    fn decode_png_to_rgb() {
        let mut img = RgbImage::new(4, 3);
        img.put_pixel(1, 2, Rgb([10, 20, 30]));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .expect("encode png");

        let decoded = decode_rgb(&png).expect("decode png");
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(1, 2), &Rgb([10, 20, 30]));
    }

    #[test]
    fn decode_rejects_non_image_bytes() {
        assert!(decode_rgb(b"definitely not an image").is_err());
    }
}

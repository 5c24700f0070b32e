use std::path::PathBuf;
use std::sync::Arc;

use crate::analysis::{AnalysisResult, score_from_probability};
use crate::classifier::{DeepfakeClassifier, decode_rgb};
use crate::services::error::AnalyzeError;

/// Decode a stored upload and score it.
///
/// Reading, decoding and the forward pass are CPU/disk bound, so they run on
/// the blocking pool.
pub async fn analyze_file(
    classifier: Arc<dyn DeepfakeClassifier>,
    path: PathBuf,
) -> Result<AnalysisResult, AnalyzeError> {
    let probability = tokio::task::spawn_blocking(move || -> Result<f32, AnalyzeError> {
        let bytes = std::fs::read(&path)?;
        let image = decode_rgb(&bytes)?;
        classifier
            .fake_probability(&image)
            .map_err(AnalyzeError::Inference)
    })
    .await??;

    Ok(AnalysisResult::from_score(score_from_probability(probability)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    struct Fixed(f32);

    impl DeepfakeClassifier for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fake_probability(&self, _image: &RgbImage) -> anyhow::Result<f32> {
            Ok(self.0)
        }
    }

    struct Failing;

    impl DeepfakeClassifier for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn fake_probability(&self, _image: &RgbImage) -> anyhow::Result<f32> {
            Err(anyhow!("model exploded"))
        }
    }

    fn write_png(dir: &std::path::Path) -> PathBuf {
        let mut png = Vec::new();
        RgbImage::new(8, 8)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .expect("encode png");
        let path = dir.join("sample.png");
        std::fs::write(&path, png).expect("write png");
        path
    }

    #[tokio::test]
    async fn scores_are_truncated_and_bucketed() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = write_png(tmp.path());

        let result = analyze_file(Arc::new(Fixed(0.599)), path)
            .await
            .expect("analysis");
        assert_eq!(result.overall_score, 59);
        assert_eq!(result.risk_level.label(), "Medium (Inconclusive)");
        assert_eq!(result.indicators.len(), 1);
    }

    #[tokio::test]
    async fn undecodable_file_is_a_decode_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"not really a png").expect("write");

        let err = analyze_file(Arc::new(Fixed(0.9)), path).await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Decode(_)));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let err = analyze_file(Arc::new(Fixed(0.9)), tmp.path().join("gone.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Read(_)));
    }

    #[tokio::test]
    async fn classifier_failure_is_an_inference_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = write_png(tmp.path());

        let err = analyze_file(Arc::new(Failing), path).await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Inference(_)));
        assert!(err.to_string().contains("model exploded"));
    }
}

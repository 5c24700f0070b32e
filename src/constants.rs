//! Application constants

/// Default port for the HTTP listener
pub const DEFAULT_PORT: u16 = 8000;

/// Default directory where uploads are staged before decoding
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default directory holding the bundled web front-end
pub const DEFAULT_FRONTEND_DIR: &str = "frontend";

/// Default Hugging Face repository for the ViT deepfake classifier
pub const DEFAULT_MODEL_REPO: &str = "dima806/deepfake_vs_real_image_detection";

/// Default Hub revision for the model repository
pub const DEFAULT_MODEL_REVISION: &str = "main";

/// Output class whose probability is reported as the deepfake likelihood
pub const DEFAULT_FAKE_CLASS_INDEX: usize = 1;

/// Maximum accepted request body (200 MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Filename used when the client sends none, or one we can't use
pub const FALLBACK_UPLOAD_NAME: &str = "upload.bin";

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file";

pub const MEDIA_TYPE_IMAGE: &str = "Image";

pub const UNSUPPORTED_MEDIA_MESSAGE: &str = "Only image files are supported";

pub const INDICATOR_NAME: &str = "AI Model Confidence";

pub const INDICATOR_DESCRIPTION: &str = "Pretrained Hugging Face deepfake detection model";

pub const EXPLANATION: &str = "This result is probabilistic and based on a pretrained \
deepfake detection model. It is not definitive proof.";

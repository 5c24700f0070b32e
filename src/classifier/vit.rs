use anyhow::{Result, anyhow, bail};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::vit;
use hf_hub::{Repo, RepoType, api::sync::Api};
use image::RgbImage;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;

use super::DeepfakeClassifier;
use crate::config::ModelConfig;

const DEFAULT_IMAGE_SIZE: u32 = 224;
const DEFAULT_MEAN: [f32; 3] = [0.5, 0.5, 0.5];
const DEFAULT_STD: [f32; 3] = [0.5, 0.5, 0.5];
const DEFAULT_NUM_LABELS: usize = 2;

/// Resize and normalization parameters from `preprocessor_config.json`
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessing {
    pub image_size: u32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for Preprocessing {
    fn default() -> Self {
        Self {
            image_size: DEFAULT_IMAGE_SIZE,
            mean: DEFAULT_MEAN,
            std: DEFAULT_STD,
        }
    }
}

impl Preprocessing {
    /// Read what we need from a Hugging Face image processor config.
    /// `size` is either a bare integer or `{"height": h, "width": w}` /
    /// `{"shortest_edge": n}`; the model input is square so one side is enough.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let defaults = Self::default();

        let image_size = match value.get("size") {
            Some(serde_json::Value::Number(n)) => n.as_u64().map(|n| n as u32),
            Some(serde_json::Value::Object(map)) => map
                .get("height")
                .or_else(|| map.get("shortest_edge"))
                .and_then(|v| v.as_u64())
                .map(|n| n as u32),
            _ => None,
        }
        .filter(|n| *n > 0)
        .unwrap_or(defaults.image_size);

        Ok(Self {
            image_size,
            mean: channel_triplet(value.get("image_mean")).unwrap_or(defaults.mean),
            std: channel_triplet(value.get("image_std"))
                .filter(|s| s.iter().all(|v| *v > 0.0))
                .unwrap_or(defaults.std),
        })
    }

    /// Resize to the model's square input and lay pixels out as normalized CHW floats
    pub fn to_chw(&self, image: &RgbImage) -> Vec<f32> {
        let size = self.image_size;
        let resized = image::imageops::resize(
            image,
            size,
            size,
            image::imageops::FilterType::Triangle,
        );

        let plane = (size * size) as usize;
        let mut data = vec![0f32; 3 * plane];
        for (i, pixel) in resized.pixels().enumerate() {
            for c in 0..3 {
                let v = pixel[c] as f32 / 255.0;
                data[c * plane + i] = (v - self.mean[c]) / self.std[c];
            }
        }
        data
    }
}

fn channel_triplet(value: Option<&serde_json::Value>) -> Option<[f32; 3]> {
    let values = value?.as_array()?;
    if values.len() != 3 {
        return None;
    }
    let mut out = [0f32; 3];
    for (slot, v) in out.iter_mut().zip(values) {
        *slot = v.as_f64()? as f32;
    }
    Some(out)
}

#[derive(Debug, Default, Deserialize)]
struct LabelConfig {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

/// Class names ordered by index. Empty when the config has no `id2label`.
fn class_labels(raw_config: &str) -> Result<Vec<String>> {
    let config: LabelConfig = serde_json::from_str(raw_config)?;
    let mut labels: Vec<(usize, String)> = config
        .id2label
        .into_iter()
        .map(|(id, label)| {
            id.parse::<usize>()
                .map(|id| (id, label))
                .map_err(|_| anyhow!("Invalid id2label key {:?}", id))
        })
        .collect::<Result<_>>()?;
    labels.sort_by_key(|(id, _)| *id);
    Ok(labels.into_iter().map(|(_, label)| label).collect())
}

/// Number of output classes, checked against the configured fake class.
/// A config without `id2label` is taken as a binary classifier.
fn resolve_num_labels(labels: &[String], fake_class_index: usize) -> Result<usize> {
    let num_labels = if labels.is_empty() {
        DEFAULT_NUM_LABELS
    } else {
        labels.len()
    };
    if fake_class_index >= num_labels {
        bail!(
            "Fake class index {} out of range for {} output classes",
            fake_class_index,
            num_labels
        );
    }
    Ok(num_labels)
}

/// Deepfake detector backed by a Hugging Face ViT image classifier.
/// Softmax over the output classes; `fake_class_index` picks the reported probability.
pub struct VitClassifier {
    model: Mutex<vit::Model>,
    device: Device,
    preprocessing: Preprocessing,
    fake_class_index: usize,
    num_labels: usize,
}

impl VitClassifier {
    pub fn load(model_config: &ModelConfig) -> Result<Self> {
        #[cfg(feature = "metal")]
        let device = Device::new_metal(0).unwrap_or(Device::Cpu);
        #[cfg(not(feature = "metal"))]
        let device = Device::Cpu;

        tracing::info!(
            "[classifier] Loading {}@{} on {:?}",
            model_config.repo,
            model_config.revision,
            device
        );

        let api = Api::new()?;
        let repo = api.repo(Repo::with_revision(
            model_config.repo.clone(),
            RepoType::Model,
            model_config.revision.clone(),
        ));

        let model_path = repo.get("model.safetensors")?;
        let config_path = repo.get("config.json")?;
        let raw_config = std::fs::read_to_string(config_path)?;

        let preprocessing = match repo.get("preprocessor_config.json") {
            Ok(path) => Preprocessing::from_json(&std::fs::read_to_string(path)?)?,
            Err(e) => {
                tracing::warn!(
                    "[classifier] No preprocessor_config.json ({}), using defaults",
                    e
                );
                Preprocessing::default()
            }
        };

        let labels = class_labels(&raw_config)?;
        let num_labels = resolve_num_labels(&labels, model_config.fake_class_index)?;
        if let Some(label) = labels.get(model_config.fake_class_index) {
            tracing::info!("[classifier] Reporting class {:?} as fake", label);
        }

        let config: vit::Config = serde_json::from_str(&raw_config)?;
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[model_path], DType::F32, &device)? };
        let model = vit::Model::new(&config, num_labels, vb)?;

        tracing::info!(
            "[classifier] Model loaded ({} classes, {}px input)",
            num_labels,
            preprocessing.image_size
        );

        Ok(Self {
            model: Mutex::new(model),
            device,
            preprocessing,
            fake_class_index: model_config.fake_class_index,
            num_labels,
        })
    }

    fn input_tensor(&self, image: &RgbImage) -> Result<Tensor> {
        let size = self.preprocessing.image_size as usize;
        let data = self.preprocessing.to_chw(image);
        Ok(Tensor::from_vec(data, (1, 3, size, size), &self.device)?)
    }
}

impl DeepfakeClassifier for VitClassifier {
    fn name(&self) -> &str {
        "vit"
    }

    fn fake_probability(&self, image: &RgbImage) -> Result<f32> {
        let input = self.input_tensor(image)?;
        let model = self.model.lock().map_err(|e| anyhow!("Lock error: {}", e))?;
        let logits = model.forward(&input)?;

        // Shape is (1, num_labels)
        let probs = candle_nn::ops::softmax(&logits, 1)?;
        let probs_vec: Vec<f32> = probs.flatten_all()?.to_vec1()?;
        if probs_vec.len() != self.num_labels {
            bail!(
                "Expected {} class probabilities, got {}",
                self.num_labels,
                probs_vec.len()
            );
        }

        let fake_prob = probs_vec[self.fake_class_index];
        tracing::debug!("[classifier] probabilities {:?}", probs_vec);
        Ok(fake_prob)
    }
}

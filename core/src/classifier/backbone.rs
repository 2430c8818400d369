use crate::error::{RadscanError, Result};
use crate::types::NormalizedTensor;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use std::sync::Mutex;

use super::runtime::{load_session, RuntimeConfig};

/// Forward pass producing one raw logit per label
///
/// Implementations are shared read-only across request threads.
pub trait Backbone: Send + Sync {
    fn forward(&self, input: &NormalizedTensor) -> Result<Vec<f32>>;
}

/// DenseNet-style radiograph model exported to ONNX
///
/// Expects a single `[1, 1, 224, 224]` float input and a `[1, N]` logit output.
/// `Session::run` needs `&mut self`, so the session sits behind a mutex: forward
/// passes are serialized while decoding and preprocessing stay parallel.
pub struct OnnxBackbone {
    session: Mutex<Session>,
}

impl OnnxBackbone {
    pub fn load(model_path: &Path, config: &RuntimeConfig) -> Result<Self> {
        let session = load_session(model_path, config)?;
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl Backbone for OnnxBackbone {
    fn forward(&self, input: &NormalizedTensor) -> Result<Vec<f32>> {
        let batch = input.as_model_input();
        let tensor = TensorRef::from_array_view(&batch)
            .map_err(|e| RadscanError::Inference(format!("Failed to create input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| RadscanError::Inference("Session lock poisoned".into()))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| RadscanError::Inference(format!("Failed to run model: {}", e)))?;

        let (shape, logits) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| RadscanError::Inference(format!("Failed to extract output: {}", e)))?;

        if shape.len() != 2 || shape[0] != 1 {
            return Err(RadscanError::Inference(format!(
                "Unexpected output shape {:?}, expected [1, N]",
                shape
            )));
        }

        Ok(logits.to_vec())
    }
}

//! Multi-label classifier over a fixed label vocabulary
//!
//! Each logit is mapped through its own sigmoid; probabilities are independent
//! and need not sum to one.

mod backbone;
mod runtime;

pub use backbone::{Backbone, OnnxBackbone};
pub use runtime::{create_session_builder, ensure_initialized, OptimizationLevel, RuntimeConfig};

use crate::error::{RadscanError, Result};
use crate::types::{LabelSet, NormalizedTensor};
use std::fmt;
use std::path::Path;

/// Numerically stable logistic sigmoid
pub fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Read-only classifier pairing a backbone with its label order
pub struct Classifier {
    labels: LabelSet,
    backbone: Box<dyn Backbone>,
}

// Compile-time verification of thread-safety
const _: () = {
    #[allow(dead_code)]
    fn assert_send_sync<T: Send + Sync>() {}
    #[allow(dead_code)]
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    pub fn new(labels: LabelSet, backbone: Box<dyn Backbone>) -> Self {
        Self { labels, backbone }
    }

    /// Loads an ONNX backbone from disk
    pub fn from_onnx(labels: LabelSet, model_path: &Path, config: &RuntimeConfig) -> Result<Self> {
        let backbone = OnnxBackbone::load(model_path, config)?;
        Ok(Self::new(labels, Box::new(backbone)))
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Returns one probability per label, index-aligned with `labels()`
    ///
    /// # Errors
    ///
    /// Returns `Inference` if the input or output is non-finite, or the backbone
    /// emits a different number of logits than there are labels
    pub fn predict(&self, input: &NormalizedTensor) -> Result<Vec<f32>> {
        if !input.is_finite() {
            return Err(RadscanError::Inference("Input tensor contains NaN/Inf".into()));
        }

        let logits = self.backbone.forward(input)?;
        if logits.len() != self.labels.len() {
            return Err(RadscanError::Inference(format!(
                "Model produced {} logits for {} labels",
                logits.len(),
                self.labels.len()
            )));
        }
        if let Some(i) = logits.iter().position(|v| !v.is_finite()) {
            return Err(RadscanError::Inference(format!(
                "Non-finite logit {} for {}",
                logits[i],
                self.labels.get(i).unwrap_or("?")
            )));
        }

        Ok(logits.into_iter().map(sigmoid).collect())
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("labels", &self.labels.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    struct FixedLogits(Vec<f32>);

    impl Backbone for FixedLogits {
        fn forward(&self, _input: &NormalizedTensor) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    fn zero_tensor() -> NormalizedTensor {
        NormalizedTensor::new(Array2::zeros((224, 224))).unwrap()
    }

    fn labels(n: usize) -> LabelSet {
        LabelSet::new((0..n).map(|i| format!("L{}", i))).unwrap()
    }

    #[test]
    fn test_sigmoid_values() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(2.0) - 0.880797).abs() < 1e-6);
        assert!((sigmoid(-2.0) - 0.119203).abs() < 1e-6);
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert!(sigmoid(-1000.0).is_finite());
    }

    #[test]
    fn test_probabilities_are_independent() {
        let clf = Classifier::new(labels(3), Box::new(FixedLogits(vec![5.0, 5.0, 5.0])));
        let probs = clf.predict(&zero_tensor()).unwrap();
        assert!(probs.iter().sum::<f32>() > 1.0);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_logit_count_mismatch() {
        let clf = Classifier::new(labels(3), Box::new(FixedLogits(vec![0.0, 0.0])));
        let err = clf.predict(&zero_tensor()).unwrap_err();
        assert!(matches!(err, RadscanError::Inference(_)));
    }

    #[test]
    fn test_non_finite_logit() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let clf = Classifier::new(labels(2), Box::new(FixedLogits(vec![0.0, bad])));
            assert!(matches!(
                clf.predict(&zero_tensor()),
                Err(RadscanError::Inference(_))
            ));
        }
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let mut grid = Array2::zeros((224, 224));
        grid[[3, 3]] = f32::NAN;
        let tensor = NormalizedTensor::new(grid).unwrap();
        let clf = Classifier::new(labels(1), Box::new(FixedLogits(vec![0.0])));
        assert!(matches!(
            clf.predict(&tensor),
            Err(RadscanError::Inference(_))
        ));
    }
}

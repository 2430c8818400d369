use crate::classifier::Classifier;
use crate::compose::compose;
use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::intake;
use crate::preprocess::preprocess;
use crate::types::{AnalysisReport, LabelSet, RawImagePayload};
use log::{debug, info};
use std::sync::{Arc, Mutex, OnceLock};

/// Image intake and inference pipeline
///
/// Runs decode, preprocess, predict and compose in sequence. Any stage failure
/// aborts the call; no partial report is returned.
///
/// # Example
///
/// ```
/// use radscan_core::{Backbone, Classifier, ImageAnalyzer, LabelSet, NormalizedTensor, RawImagePayload};
///
/// struct Quiet;
///
/// impl Backbone for Quiet {
///     fn forward(&self, _input: &NormalizedTensor) -> radscan_core::Result<Vec<f32>> {
///         Ok(vec![-4.0; 18])
///     }
/// }
///
/// let classifier = Classifier::new(LabelSet::chest_xray_default(), Box::new(Quiet));
/// let analyzer = ImageAnalyzer::new(classifier, "chest-xray (inferred)");
///
/// let empty = RawImagePayload::new(&[], "upload.png");
/// assert!(analyzer.analyze(&empty).is_err());
/// ```
#[derive(Debug)]
pub struct ImageAnalyzer {
    classifier: Classifier,
    modality: String,
}

impl ImageAnalyzer {
    pub fn new(classifier: Classifier, modality: impl Into<String>) -> Self {
        Self {
            classifier,
            modality: modality.into(),
        }
    }

    /// Loads labels and the ONNX model named by the config
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        let labels = config.load_labels()?;
        let classifier = Classifier::from_onnx(labels, &config.model_path, &config.runtime)?;
        info!(
            "Analyzer ready: {} labels, modality '{}'",
            classifier.labels().len(),
            config.modality
        );
        Ok(Self::new(classifier, config.modality.clone()))
    }

    pub fn labels(&self) -> &LabelSet {
        self.classifier.labels()
    }

    pub fn modality(&self) -> &str {
        &self.modality
    }

    /// Analyzes one uploaded image
    ///
    /// # Errors
    ///
    /// - `Decode` for empty or unparseable bytes
    /// - `UnsupportedModality` for recognized but unhandled DICOM variants
    /// - `Inference` for shape mismatches or non-finite model output
    pub fn analyze(&self, payload: &RawImagePayload) -> Result<AnalysisReport> {
        let (image, format) = intake::decode(payload)?;
        let shape = image.shape();
        let tensor = preprocess(&image)?;
        drop(image);

        let probs = self.classifier.predict(&tensor)?;
        let report = compose(self.classifier.labels(), &probs, shape, &self.modality)?;

        debug!(
            "Analyzed {} ({}, {}x{}): {} positive",
            payload.filename,
            format,
            shape.0,
            shape.1,
            report.positive.len()
        );
        Ok(report)
    }

    /// Convenience wrapper for callers holding bytes and a filename
    pub fn analyze_bytes(&self, bytes: &[u8], filename: &str) -> Result<AnalysisReport> {
        self.analyze(&RawImagePayload::new(bytes, filename))
    }
}

/// Once-only holder for the process-wide analyzer
///
/// The first successful initializer wins and is never re-run. A failed
/// initialization leaves the holder empty so a later caller can retry.
///
/// ```
/// use radscan_core::SharedAnalyzer;
///
/// static ANALYZER: SharedAnalyzer = SharedAnalyzer::new();
/// assert!(ANALYZER.get().is_none());
/// ```
#[derive(Debug, Default)]
pub struct SharedAnalyzer {
    cell: OnceLock<Arc<ImageAnalyzer>>,
    init: Mutex<()>,
}

impl SharedAnalyzer {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Returns the analyzer if it has been initialized
    pub fn get(&self) -> Option<Arc<ImageAnalyzer>> {
        self.cell.get().cloned()
    }

    /// Returns the analyzer, running `init` if no caller has succeeded yet
    pub fn get_or_try_init<F>(&self, init: F) -> Result<Arc<ImageAnalyzer>>
    where
        F: FnOnce() -> Result<ImageAnalyzer>,
    {
        if let Some(analyzer) = self.cell.get() {
            return Ok(Arc::clone(analyzer));
        }

        // The guard protects no data, so a poisoned lock is still usable
        let _guard = self.init.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(analyzer) = self.cell.get() {
            return Ok(Arc::clone(analyzer));
        }

        let analyzer = Arc::new(init()?);
        let _ = self.cell.set(Arc::clone(&analyzer));
        Ok(analyzer)
    }

    /// Initializes from a config on first use
    pub fn get_or_load(&self, config: &AnalyzerConfig) -> Result<Arc<ImageAnalyzer>> {
        self.get_or_try_init(|| ImageAnalyzer::from_config(config))
    }
}

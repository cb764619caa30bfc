//! Loading of the fitted scaler and classifier from JSON files.
//!
//! Loading is the only fallible step of a prediction. Every shape or column
//! order problem is reported here, before any patient data is seen.

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use crate::adapter::InferenceAdapter;
use crate::classifier::{Classifier, ClassifierArtifact};
use crate::error::CardioError;
use crate::features::feature_names;
use crate::scaler::{Scaler, ScalerArtifact};

pub const DEFAULT_MODEL_FILE: &str = "model.json";
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";

/// Adapter over the artifact kinds understood by this crate.
pub type ArtifactAdapter = InferenceAdapter<ScalerArtifact, ClassifierArtifact>;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CardioError> {
    let text = read_to_string(path).map_err(|source| CardioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CardioError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Recorded column names, if any, must equal the encoder's order exactly.
pub fn check_feature_names(what: &str, names: Option<&[String]>) -> Result<(), CardioError> {
    let Some(names) = names else {
        return Ok(());
    };
    let expected = feature_names();
    if names.len() != expected.len() {
        return Err(CardioError::Artifact(format!(
            "{what} was fitted on {} columns, expected {}",
            names.len(),
            expected.len()
        )));
    }
    for (i, (got, want)) in names.iter().zip(expected).enumerate() {
        if got != want {
            return Err(CardioError::Artifact(format!(
                "{what} column {i} is '{got}', expected '{want}'"
            )));
        }
    }
    Ok(())
}

pub fn load_scaler(path: impl AsRef<Path>) -> Result<ScalerArtifact, CardioError> {
    let path = path.as_ref();
    let scaler: ScalerArtifact = read_json(path)?;
    check_feature_names("scaler", scaler.feature_names())?;
    log::debug!("loaded {} scaler from {}", scaler.kind(), path.display());
    Ok(scaler)
}

pub fn load_classifier(path: impl AsRef<Path>) -> Result<ClassifierArtifact, CardioError> {
    let path = path.as_ref();
    let model: ClassifierArtifact = read_json(path)?;
    check_feature_names("classifier", model.feature_names())?;
    log::debug!(
        "loaded {} classifier '{}' from {}",
        model.kind(),
        model.name(),
        path.display()
    );
    Ok(model)
}

/// Locations of the two artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_FILE),
            scaler: PathBuf::from(DEFAULT_SCALER_FILE),
        }
    }
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, scaler: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            scaler: scaler.into(),
        }
    }

    /// Load both artifacts; either both load or neither is used.
    pub fn load(&self) -> Result<ArtifactAdapter, CardioError> {
        let scaler = load_scaler(&self.scaler)?;
        let model = load_classifier(&self.model)?;
        log::info!(
            "artifacts ready: model={} scaler={}",
            self.model.display(),
            self.scaler.display()
        );
        Ok(InferenceAdapter::new(scaler, model))
    }
}

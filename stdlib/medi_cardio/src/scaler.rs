//! Fitted normalization transforms applied before the classifier.

use serde::{Deserialize, Serialize};

use crate::features::{FeatureVector, FEATURE_COUNT};

/// A pre-fitted transform from raw feature scales to model scales.
pub trait Scaler: Send + Sync {
    fn transform(&self, features: &FeatureVector) -> FeatureVector;

    /// Column names the transform was fitted on, when recorded.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}

/// Standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; FEATURE_COUNT],
    pub scale: [f64; FEATURE_COUNT],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn new(mean: [f64; FEATURE_COUNT], scale: [f64; FEATURE_COUNT]) -> Self {
        Self {
            mean,
            scale,
            feature_names: None,
        }
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        features.map(|i, x| {
            // constant training columns are exported with a zero scale
            let s = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            (x - self.mean[i]) / s
        })
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}

/// Min-max scaling in its fitted form: `x * scale + min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: [f64; FEATURE_COUNT],
    pub scale: [f64; FEATURE_COUNT],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl MinMaxScaler {
    /// Build from the observed data range, mapping it onto `[0, 1]`.
    pub fn from_range(data_min: [f64; FEATURE_COUNT], data_max: [f64; FEATURE_COUNT]) -> Self {
        let mut min = [0.0; FEATURE_COUNT];
        let mut scale = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            let range = data_max[i] - data_min[i];
            scale[i] = if range == 0.0 { 1.0 } else { 1.0 / range };
            min[i] = -data_min[i] * scale[i];
        }
        Self {
            min,
            scale,
            feature_names: None,
        }
    }
}

impl Scaler for MinMaxScaler {
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        features.map(|i, x| x * self.scale[i] + self.min[i])
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}

/// Scaler artifact as stored on disk, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl ScalerArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ScalerArtifact::Standard(_) => "standard",
            ScalerArtifact::MinMax(_) => "min_max",
        }
    }
}

impl Scaler for ScalerArtifact {
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        match self {
            ScalerArtifact::Standard(s) => s.transform(features),
            ScalerArtifact::MinMax(s) => s.transform(features),
        }
    }

    fn feature_names(&self) -> Option<&[String]> {
        match self {
            ScalerArtifact::Standard(s) => s.feature_names(),
            ScalerArtifact::MinMax(s) => s.feature_names(),
        }
    }
}

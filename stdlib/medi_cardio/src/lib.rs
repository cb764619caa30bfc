//! Heart failure death-risk inference.
//!
//! Twelve clinical measurements are encoded into a fixed-order
//! [`FeatureVector`], normalized by a fitted [`Scaler`], scored by a fitted
//! [`Classifier`] and thresholded into a [`RiskLabel`].
//!
//! ```no_run
//! use medi_cardio::{form, ArtifactPaths, PatientRecord};
//!
//! let adapter = ArtifactPaths::new("model.json", "scaler.json").load()?;
//! let record = PatientRecord::default();
//! form::validate(&record)?;
//! println!("{}", adapter.assess_record(&record));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adapter;
pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod form;
pub mod scaler;

pub use adapter::{InferenceAdapter, RiskAssessment, RiskLabel, DECISION_THRESHOLD};
pub use artifacts::{load_classifier, load_scaler, ArtifactAdapter, ArtifactPaths};
pub use classifier::{Activation, Classifier, ClassifierArtifact, DenseLayer, DenseNetwork, LogisticModel};
pub use config::{CardioConfig, OutputFormat};
pub use error::{CardioError, FormError, ParseLabelError};
pub use features::{encode, encode_label, Feature, FeatureVector, PatientRecord, Presence, Sex, FEATURE_COUNT};
pub use scaler::{MinMaxScaler, Scaler, ScalerArtifact, StandardScaler};

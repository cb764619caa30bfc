//! Scale, predict, decide.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classifier::Classifier;
use crate::features::{encode, FeatureVector, PatientRecord};
use crate::scaler::Scaler;

/// Probabilities strictly above this are high risk.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    High,
    Low,
}

impl RiskLabel {
    pub fn from_probability(probability: f64) -> Self {
        if probability > DECISION_THRESHOLD {
            RiskLabel::High
        } else {
            RiskLabel::Low
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            RiskLabel::High => "High Risk of Death",
            RiskLabel::Low => "Low Risk of Death",
        }
    }
}

/// Outcome of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub label: RiskLabel,
    pub probability: f64,
    pub features: FeatureVector,
}

impl fmt::Display for RiskAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Probability: {:.2})",
            self.label.headline(),
            self.probability
        )
    }
}

/// Owns the fitted scaler and classifier and runs one-shot predictions.
#[derive(Debug, Clone)]
pub struct InferenceAdapter<S, C> {
    scaler: S,
    classifier: C,
}

impl<S: Scaler, C: Classifier> InferenceAdapter<S, C> {
    pub fn new(scaler: S, classifier: C) -> Self {
        Self { scaler, classifier }
    }

    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn assess(&self, features: &FeatureVector) -> RiskAssessment {
        let normalized = self.scaler.transform(features);
        let probability = self.classifier.predict_proba(&normalized);
        let label = RiskLabel::from_probability(probability);
        log::debug!(
            "{}: p={probability:.4} -> {label:?}",
            self.classifier.name()
        );
        RiskAssessment {
            label,
            probability,
            features: *features,
        }
    }

    pub fn assess_record(&self, record: &PatientRecord) -> RiskAssessment {
        self.assess(&encode(record))
    }
}

//! Feature encoding for the heart failure risk model.
//!
//! The fitted scaler and classifier both expect the twelve clinical
//! measurements in one fixed column order. [`Feature`] names those columns,
//! [`FeatureVector`] holds exactly twelve values in that order, and
//! [`encode`] builds one from a [`PatientRecord`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use crate::error::ParseLabelError;

/// Number of columns the artifacts were fitted on.
pub const FEATURE_COUNT: usize = 12;

/// Model input columns, declared in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Age,
    Anaemia,
    CreatininePhosphokinase,
    Diabetes,
    EjectionFraction,
    HighBloodPressure,
    Platelets,
    SerumCreatinine,
    SerumSodium,
    Sex,
    Smoking,
    Time,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Age,
        Feature::Anaemia,
        Feature::CreatininePhosphokinase,
        Feature::Diabetes,
        Feature::EjectionFraction,
        Feature::HighBloodPressure,
        Feature::Platelets,
        Feature::SerumCreatinine,
        Feature::SerumSodium,
        Feature::Sex,
        Feature::Smoking,
        Feature::Time,
    ];

    /// Column position in the feature vector.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name as used in the training data.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Age => "age",
            Feature::Anaemia => "anaemia",
            Feature::CreatininePhosphokinase => "creatinine_phosphokinase",
            Feature::Diabetes => "diabetes",
            Feature::EjectionFraction => "ejection_fraction",
            Feature::HighBloodPressure => "high_blood_pressure",
            Feature::Platelets => "platelets",
            Feature::SerumCreatinine => "serum_creatinine",
            Feature::SerumSodium => "serum_sodium",
            Feature::Sex => "sex",
            Feature::Smoking => "smoking",
            Feature::Time => "time",
        }
    }

    pub fn is_categorical(self) -> bool {
        matches!(
            self,
            Feature::Anaemia
                | Feature::Diabetes
                | Feature::HighBloodPressure
                | Feature::Sex
                | Feature::Smoking
        )
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column names in vector order.
pub fn feature_names() -> [&'static str; FEATURE_COUNT] {
    Feature::ALL.map(Feature::name)
}

/// Generic label rule: "Yes" and "Male" encode to 1, any other label to 0.
pub fn encode_label(label: &str) -> u8 {
    match label {
        "Yes" | "Male" => 1,
        _ => 0,
    }
}

/// A yes/no clinical finding (anaemia, diabetes, hypertension, smoking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Presence {
    #[serde(rename = "Yes")]
    Present,
    #[serde(rename = "No")]
    Absent,
}

impl Presence {
    pub const LABELS: &'static str = "Yes/No";

    pub fn code(self) -> u8 {
        match self {
            Presence::Present => 1,
            Presence::Absent => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Presence::Present => "Yes",
            Presence::Absent => "No",
        }
    }
}

impl From<bool> for Presence {
    fn from(present: bool) -> Self {
        if present {
            Presence::Present
        } else {
            Presence::Absent
        }
    }
}

impl FromStr for Presence {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Presence::Present),
            "no" | "n" => Ok(Presence::Absent),
            _ => Err(ParseLabelError {
                input: s.to_string(),
                expected: Self::LABELS,
            }),
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Patient sex as recorded in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const LABELS: &'static str = "Male/Female";

    // Kept apart from Presence::code; the two mappings are not related.
    pub fn code(self) -> u8 {
        match self {
            Sex::Male => 1,
            Sex::Female => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl FromStr for Sex {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(ParseLabelError {
                input: s.to_string(),
                expected: Self::LABELS,
            }),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw values for one patient as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientRecord {
    pub age: f64,
    pub anaemia: Presence,
    pub creatinine_phosphokinase: f64,
    pub diabetes: Presence,
    pub ejection_fraction: f64,
    pub high_blood_pressure: Presence,
    pub platelets: f64,
    pub serum_creatinine: f64,
    pub serum_sodium: f64,
    pub sex: Sex,
    pub smoking: Presence,
    pub time: f64,
}

impl PatientRecord {
    /// Current value of a numeric column, `None` for categorical ones.
    pub fn numeric(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::Age => Some(self.age),
            Feature::CreatininePhosphokinase => Some(self.creatinine_phosphokinase),
            Feature::EjectionFraction => Some(self.ejection_fraction),
            Feature::Platelets => Some(self.platelets),
            Feature::SerumCreatinine => Some(self.serum_creatinine),
            Feature::SerumSodium => Some(self.serum_sodium),
            Feature::Time => Some(self.time),
            _ => None,
        }
    }

    pub(crate) fn numeric_mut(&mut self, feature: Feature) -> Option<&mut f64> {
        match feature {
            Feature::Age => Some(&mut self.age),
            Feature::CreatininePhosphokinase => Some(&mut self.creatinine_phosphokinase),
            Feature::EjectionFraction => Some(&mut self.ejection_fraction),
            Feature::Platelets => Some(&mut self.platelets),
            Feature::SerumCreatinine => Some(&mut self.serum_creatinine),
            Feature::SerumSodium => Some(&mut self.serum_sodium),
            Feature::Time => Some(&mut self.time),
            _ => None,
        }
    }

    pub(crate) fn presence_mut(&mut self, feature: Feature) -> Option<&mut Presence> {
        match feature {
            Feature::Anaemia => Some(&mut self.anaemia),
            Feature::Diabetes => Some(&mut self.diabetes),
            Feature::HighBloodPressure => Some(&mut self.high_blood_pressure),
            Feature::Smoking => Some(&mut self.smoking),
            _ => None,
        }
    }

    /// Display text of one field, as the form would show it.
    pub fn display_value(&self, feature: Feature) -> String {
        match feature {
            Feature::Anaemia => self.anaemia.to_string(),
            Feature::Diabetes => self.diabetes.to_string(),
            Feature::HighBloodPressure => self.high_blood_pressure.to_string(),
            Feature::Sex => self.sex.to_string(),
            Feature::Smoking => self.smoking.to_string(),
            other => self.numeric(other).unwrap_or_default().to_string(),
        }
    }
}

/// Exactly twelve model inputs in [`Feature`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Pairs each value with its column.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().copied().zip(self.0.iter().copied())
    }

    pub(crate) fn map(&self, f: impl Fn(usize, f64) -> f64) -> Self {
        let mut out = self.0;
        for (i, v) in out.iter_mut().enumerate() {
            *v = f(i, *v);
        }
        Self(out)
    }
}

impl Index<Feature> for FeatureVector {
    type Output = f64;

    fn index(&self, feature: Feature) -> &f64 {
        &self.0[feature.index()]
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

/// Encode a patient into the fixed-order model input.
///
/// Numeric values pass through untouched; range checks belong to
/// [`crate::form::validate`].
pub fn encode(record: &PatientRecord) -> FeatureVector {
    FeatureVector([
        record.age,
        f64::from(record.anaemia.code()),
        record.creatinine_phosphokinase,
        f64::from(record.diabetes.code()),
        record.ejection_fraction,
        f64::from(record.high_blood_pressure.code()),
        record.platelets,
        record.serum_creatinine,
        record.serum_sodium,
        f64::from(record.sex.code()),
        f64::from(record.smoking.code()),
        record.time,
    ])
}

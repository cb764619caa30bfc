//! Input-collection layer: field domains, defaults and operator input parsing.
//!
//! The encoder trusts its inputs. Range and integrality checks for the
//! twelve fields live here, mirroring the controls of the prediction page.

use crate::error::FormError;
use crate::features::{Feature, PatientRecord, Presence, Sex};

pub const TITLE: &str = "Heart Failure Death Risk Prediction";

pub const SUBTITLE: &str =
    "Provide the patient's medical data to predict the likelihood of a fatal heart failure event.";

pub const INSTRUCTIONS: [&str; 3] = [
    "Input real patient values.",
    "The model will predict the risk of death due to heart failure.",
    "Values must match the format used during training.",
];

/// How a field is entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Numeric {
        min: f64,
        max: Option<f64>,
        default: f64,
        step: f64,
        integer: bool,
    },
    YesNo {
        default: Presence,
    },
    Sex {
        default: Sex,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub feature: Feature,
    pub label: &'static str,
    pub control: Control,
}

const fn integer(min: f64, max: Option<f64>, default: f64) -> Control {
    Control::Numeric {
        min,
        max,
        default,
        step: 1.0,
        integer: true,
    }
}

const fn decimal(min: f64, default: f64, step: f64) -> Control {
    Control::Numeric {
        min,
        max: None,
        default,
        step,
        integer: false,
    }
}

/// Form controls in column order.
pub const FORM_FIELDS: [FieldSpec; 12] = [
    FieldSpec {
        feature: Feature::Age,
        label: "Age",
        control: integer(18.0, Some(100.0), 50.0),
    },
    FieldSpec {
        feature: Feature::Anaemia,
        label: "Anaemia",
        control: Control::YesNo {
            default: Presence::Present,
        },
    },
    FieldSpec {
        feature: Feature::CreatininePhosphokinase,
        label: "Creatinine Phosphokinase (mcg/L)",
        control: integer(0.0, None, 200.0),
    },
    FieldSpec {
        feature: Feature::Diabetes,
        label: "Diabetes",
        control: Control::YesNo {
            default: Presence::Present,
        },
    },
    FieldSpec {
        feature: Feature::EjectionFraction,
        label: "Ejection Fraction (%)",
        control: integer(10.0, Some(80.0), 35.0),
    },
    FieldSpec {
        feature: Feature::HighBloodPressure,
        label: "High Blood Pressure",
        control: Control::YesNo {
            default: Presence::Present,
        },
    },
    FieldSpec {
        feature: Feature::Platelets,
        label: "Platelets (kiloplatelets/mL)",
        control: decimal(0.0, 250000.0, 1000.0),
    },
    FieldSpec {
        feature: Feature::SerumCreatinine,
        label: "Serum Creatinine (mg/dL)",
        control: decimal(0.0, 1.1, 0.1),
    },
    FieldSpec {
        feature: Feature::SerumSodium,
        label: "Serum Sodium (mEq/L)",
        control: integer(100.0, Some(150.0), 137.0),
    },
    FieldSpec {
        feature: Feature::Sex,
        label: "Sex",
        control: Control::Sex { default: Sex::Male },
    },
    FieldSpec {
        feature: Feature::Smoking,
        label: "Smoking",
        control: Control::YesNo {
            default: Presence::Present,
        },
    },
    FieldSpec {
        feature: Feature::Time,
        label: "Follow-up Period (days)",
        control: integer(0.0, Some(300.0), 130.0),
    },
];

pub fn field(feature: Feature) -> &'static FieldSpec {
    &FORM_FIELDS[feature.index()]
}

impl FieldSpec {
    /// Human readable domain, e.g. `18..=100` or `Yes/No`.
    pub fn domain(&self) -> String {
        match self.control {
            Control::Numeric { min, max, .. } => match max {
                Some(max) => format!("{min}..={max}"),
                None => format!(">= {min}"),
            },
            Control::YesNo { .. } => Presence::LABELS.to_string(),
            Control::Sex { .. } => Sex::LABELS.to_string(),
        }
    }

    pub fn default_text(&self) -> String {
        match self.control {
            Control::Numeric {
                default, integer, ..
            } => {
                if integer {
                    format!("{default}")
                } else {
                    format!("{default:.2}")
                }
            }
            Control::YesNo { default } => default.to_string(),
            Control::Sex { default } => default.to_string(),
        }
    }

    /// Range and integrality check for one numeric value.
    pub fn check_number(&self, value: f64) -> Result<(), FormError> {
        let Control::Numeric {
            min, max, integer, ..
        } = self.control
        else {
            return Ok(());
        };
        if !value.is_finite() {
            return Err(FormError::NotFinite {
                field: self.feature,
            });
        }
        match max {
            Some(max) if value < min || value > max => {
                return Err(FormError::OutOfRange {
                    field: self.feature,
                    value,
                    min,
                    max,
                });
            }
            None if value < min => {
                return Err(FormError::BelowMinimum {
                    field: self.feature,
                    value,
                    min,
                });
            }
            _ => {}
        }
        if integer && value.fract() != 0.0 {
            return Err(FormError::NotInteger {
                field: self.feature,
                value,
            });
        }
        Ok(())
    }
}

impl Default for PatientRecord {
    fn default() -> Self {
        let mut record = PatientRecord {
            age: 0.0,
            anaemia: Presence::Absent,
            creatinine_phosphokinase: 0.0,
            diabetes: Presence::Absent,
            ejection_fraction: 0.0,
            high_blood_pressure: Presence::Absent,
            platelets: 0.0,
            serum_creatinine: 0.0,
            serum_sodium: 0.0,
            sex: Sex::Female,
            smoking: Presence::Absent,
            time: 0.0,
        };
        for spec in &FORM_FIELDS {
            match spec.control {
                Control::Numeric { default, .. } => {
                    if let Some(slot) = record.numeric_mut(spec.feature) {
                        *slot = default;
                    }
                }
                Control::YesNo { default } => {
                    if let Some(slot) = record.presence_mut(spec.feature) {
                        *slot = default;
                    }
                }
                Control::Sex { default } => record.sex = default,
            }
        }
        record
    }
}

/// Check every numeric field against its control.
pub fn validate(record: &PatientRecord) -> Result<(), FormError> {
    for spec in &FORM_FIELDS {
        if let Some(value) = record.numeric(spec.feature) {
            spec.check_number(value)?;
        }
    }
    Ok(())
}

/// Parse operator text for one field into `record`.
///
/// Leaves `record` untouched on error.
pub fn apply_input(record: &mut PatientRecord, feature: Feature, input: &str) -> Result<(), FormError> {
    let spec = field(feature);
    let text = input.trim();
    match spec.control {
        Control::Numeric { .. } => {
            let value: f64 = text.parse().map_err(|_| FormError::InvalidNumber {
                field: feature,
                input: input.to_string(),
            })?;
            spec.check_number(value)?;
            if let Some(slot) = record.numeric_mut(feature) {
                *slot = value;
            }
        }
        Control::YesNo { .. } => {
            let value: Presence = text
                .parse()
                .map_err(|source| FormError::InvalidLabel { field: feature, source })?;
            if let Some(slot) = record.presence_mut(feature) {
                *slot = value;
            }
        }
        Control::Sex { .. } => {
            record.sex = text
                .parse()
                .map_err(|source| FormError::InvalidLabel { field: feature, source })?;
        }
    }
    Ok(())
}

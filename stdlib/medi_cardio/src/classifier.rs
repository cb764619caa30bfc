//! Fitted binary classifiers producing P(death event).
//!
//! Two artifact shapes are supported: a feed-forward network of dense
//! layers (the exported form of a Keras `Sequential` of `Dense` layers) and
//! a plain logistic model.

use serde::{Deserialize, Serialize};

use crate::features::{FeatureVector, FEATURE_COUNT};

/// A pre-fitted model mapping a normalized vector to a probability.
pub trait Classifier: Send + Sync {
    /// Probability of the positive class, in `[0, 1]`.
    fn predict_proba(&self, normalized: &FeatureVector) -> f64;

    fn name(&self) -> &str;

    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Sigmoid,
    Tanh,
    Linear,
}

impl Activation {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => sigmoid(x),
            Activation::Tanh => x.tanh(),
            Activation::Linear => x,
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Probabilities leave the model clamped to `[0, 1]`; NaN becomes 0.
fn to_probability(model: &str, raw: f64) -> f64 {
    if raw.is_nan() {
        log::warn!("classifier '{model}' produced NaN; reporting probability 0");
        return 0.0;
    }
    raw.clamp(0.0, 1.0)
}

/// One fully connected layer. `kernel[i][j]` weights input `i` into unit `j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub units: usize,
    pub activation: Activation,
    pub kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

impl DenseLayer {
    pub fn inputs(&self) -> usize {
        self.kernel.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut out = self.bias.clone();
        for (x, row) in input.iter().zip(&self.kernel) {
            for (acc, w) in out.iter_mut().zip(row) {
                *acc += x * w;
            }
        }
        for v in &mut out {
            *v = self.activation.apply(*v);
        }
        out
    }

    fn check(&self, position: usize, expected_inputs: usize) -> Result<(), String> {
        if self.units == 0 {
            return Err(format!("layer {position} has no units"));
        }
        if self.inputs() != expected_inputs {
            return Err(format!(
                "layer {position} expects {} inputs, previous width is {expected_inputs}",
                self.inputs()
            ));
        }
        if self.bias.len() != self.units {
            return Err(format!(
                "layer {position} bias has {} entries for {} units",
                self.bias.len(),
                self.units
            ));
        }
        if let Some(row) = self.kernel.iter().position(|r| r.len() != self.units) {
            return Err(format!(
                "layer {position} kernel row {row} has {} columns for {} units",
                self.kernel[row].len(),
                self.units
            ));
        }
        let finite = self.bias.iter().chain(self.kernel.iter().flatten()).all(|w| w.is_finite());
        if !finite {
            return Err(format!("layer {position} contains non-finite weights"));
        }
        Ok(())
    }
}

/// Serialized layout of a [`DenseNetwork`], checked on conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNetworkSpec {
    #[serde(default = "default_network_name")]
    pub name: String,
    pub layers: Vec<DenseLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

fn default_network_name() -> String {
    "dense".to_string()
}

/// Feed-forward network with a single output unit.
///
/// Construction guarantees the first layer takes twelve inputs, each layer
/// consumes the previous layer's width and the last layer has one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DenseNetworkSpec", into = "DenseNetworkSpec")]
pub struct DenseNetwork {
    name: String,
    layers: Vec<DenseLayer>,
    feature_names: Option<Vec<String>>,
}

impl DenseNetwork {
    pub fn new(name: impl Into<String>, layers: Vec<DenseLayer>) -> Result<Self, String> {
        Self::try_from(DenseNetworkSpec {
            name: name.into(),
            layers,
            feature_names: None,
        })
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }
}

impl TryFrom<DenseNetworkSpec> for DenseNetwork {
    type Error = String;

    fn try_from(spec: DenseNetworkSpec) -> Result<Self, Self::Error> {
        if spec.layers.is_empty() {
            return Err("network has no layers".to_string());
        }
        let mut width = FEATURE_COUNT;
        for (i, layer) in spec.layers.iter().enumerate() {
            layer.check(i, width)?;
            width = layer.units;
        }
        if width != 1 {
            return Err(format!("output layer must have 1 unit, found {width}"));
        }
        Ok(Self {
            name: spec.name,
            layers: spec.layers,
            feature_names: spec.feature_names,
        })
    }
}

impl From<DenseNetwork> for DenseNetworkSpec {
    fn from(net: DenseNetwork) -> Self {
        Self {
            name: net.name,
            layers: net.layers,
            feature_names: net.feature_names,
        }
    }
}

impl Classifier for DenseNetwork {
    fn predict_proba(&self, normalized: &FeatureVector) -> f64 {
        let mut activations = normalized.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }
        to_probability(&self.name, activations.first().copied().unwrap_or(f64::NAN))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}

/// `sigmoid(coefficients · x + intercept)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    #[serde(default = "default_logistic_name")]
    pub name: String,
    pub coefficients: [f64; FEATURE_COUNT],
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

fn default_logistic_name() -> String {
    "logistic".to_string()
}

impl Classifier for LogisticModel {
    fn predict_proba(&self, normalized: &FeatureVector) -> f64 {
        let z = self
            .coefficients
            .iter()
            .zip(normalized.as_slice())
            .map(|(w, x)| w * x)
            .sum::<f64>();
        to_probability(&self.name, sigmoid(z + self.intercept))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}

/// Classifier artifact as stored on disk, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Dense(DenseNetwork),
    Logistic(LogisticModel),
}

impl ClassifierArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierArtifact::Dense(_) => "dense",
            ClassifierArtifact::Logistic(_) => "logistic",
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn predict_proba(&self, normalized: &FeatureVector) -> f64 {
        match self {
            ClassifierArtifact::Dense(m) => m.predict_proba(normalized),
            ClassifierArtifact::Logistic(m) => m.predict_proba(normalized),
        }
    }

    fn name(&self) -> &str {
        match self {
            ClassifierArtifact::Dense(m) => m.name(),
            ClassifierArtifact::Logistic(m) => m.name(),
        }
    }

    fn feature_names(&self) -> Option<&[String]> {
        match self {
            ClassifierArtifact::Dense(m) => m.feature_names(),
            ClassifierArtifact::Logistic(m) => m.feature_names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn single_unit(weights: [f64; FEATURE_COUNT], bias: f64, activation: Activation) -> DenseLayer {
        DenseLayer {
            units: 1,
            activation,
            kernel: weights.iter().map(|w| vec![*w]).collect(),
            bias: vec![bias],
        }
    }

    #[test]
    fn zero_network_predicts_one_half() {
        let layer = single_unit([0.0; FEATURE_COUNT], 0.0, Activation::Sigmoid);
        let net = DenseNetwork::new("zero", vec![layer]).unwrap();
        let p = net.predict_proba(&FeatureVector::new([3.0; FEATURE_COUNT]));
        assert_abs_diff_eq!(p, 0.5);
    }

    #[test]
    fn hidden_relu_layer_feeds_output() {
        // hidden unit 0 = relu(x0), unit 1 = relu(-x0); output = sigmoid(h0 - h1)
        let mut kernel = vec![vec![0.0, 0.0]; FEATURE_COUNT];
        kernel[0] = vec![1.0, -1.0];
        let hidden = DenseLayer {
            units: 2,
            activation: Activation::Relu,
            kernel,
            bias: vec![0.0, 0.0],
        };
        let output = DenseLayer {
            units: 1,
            activation: Activation::Sigmoid,
            kernel: vec![vec![1.0], vec![-1.0]],
            bias: vec![0.0],
        };
        let net = DenseNetwork::new("mlp", vec![hidden, output]).unwrap();
        let mut x = [0.0; FEATURE_COUNT];
        x[0] = 2.0;
        assert_abs_diff_eq!(net.predict_proba(&FeatureVector::new(x)), sigmoid(2.0), epsilon = 1e-12);
        x[0] = -2.0;
        assert_abs_diff_eq!(net.predict_proba(&FeatureVector::new(x)), sigmoid(-2.0), epsilon = 1e-12);
    }

    #[test]
    fn linear_output_is_clamped() {
        let layer = single_unit([1.0; FEATURE_COUNT], 0.0, Activation::Linear);
        let net = DenseNetwork::new("lin", vec![layer]).unwrap();
        assert_eq!(net.predict_proba(&FeatureVector::new([1.0; FEATURE_COUNT])), 1.0);
        assert_eq!(net.predict_proba(&FeatureVector::new([-1.0; FEATURE_COUNT])), 0.0);
    }

    #[test]
    fn nan_output_reports_zero_and_low_risk() {
        use crate::adapter::{InferenceAdapter, RiskLabel};
        use crate::scaler::StandardScaler;

        let layer = single_unit([1.0; FEATURE_COUNT], 0.0, Activation::Linear);
        let net = DenseNetwork::new("lin", vec![layer]).unwrap();
        let mut x = [0.0; FEATURE_COUNT];
        x[0] = f64::INFINITY;
        x[1] = f64::NEG_INFINITY;
        let x = FeatureVector::new(x);
        assert_eq!(net.predict_proba(&x), 0.0);

        let adapter = InferenceAdapter::new(
            StandardScaler::new([0.0; FEATURE_COUNT], [1.0; FEATURE_COUNT]),
            net,
        );
        let assessment = adapter.assess(&x);
        assert_eq!(assessment.probability, 0.0);
        assert_eq!(assessment.label, RiskLabel::Low);
    }

    #[test]
    fn rejects_wrong_input_width() {
        let layer = DenseLayer {
            units: 1,
            activation: Activation::Sigmoid,
            kernel: vec![vec![1.0]; 11],
            bias: vec![0.0],
        };
        let err = DenseNetwork::new("bad", vec![layer]).unwrap_err();
        assert!(err.contains("expects 11 inputs"), "{err}");
    }

    #[test]
    fn rejects_multi_unit_output() {
        let layer = DenseLayer {
            units: 2,
            activation: Activation::Sigmoid,
            kernel: vec![vec![1.0, 1.0]; FEATURE_COUNT],
            bias: vec![0.0, 0.0],
        };
        let err = DenseNetwork::new("bad", vec![layer]).unwrap_err();
        assert!(err.contains("1 unit"), "{err}");
    }

    #[test]
    fn rejects_ragged_kernel_and_empty_network() {
        let mut layer = single_unit([0.0; FEATURE_COUNT], 0.0, Activation::Sigmoid);
        layer.kernel[5].push(1.0);
        assert!(DenseNetwork::new("bad", vec![layer]).is_err());
        assert!(DenseNetwork::new("empty", Vec::new()).is_err());
    }

    #[test]
    fn logistic_model_matches_sigmoid() {
        let mut coefficients = [0.0; FEATURE_COUNT];
        coefficients[4] = -1.5;
        let m = LogisticModel {
            name: "lr".into(),
            coefficients,
            intercept: 0.25,
            feature_names: None,
        };
        let mut x = [0.0; FEATURE_COUNT];
        x[4] = 1.0;
        assert_abs_diff_eq!(m.predict_proba(&FeatureVector::new(x)), sigmoid(-1.25), epsilon = 1e-12);
    }

    #[test]
    fn dense_artifact_round_trips_through_json() {
        let layer = single_unit([0.1; FEATURE_COUNT], -0.2, Activation::Sigmoid);
        let net = DenseNetwork::new("n", vec![layer]).unwrap();
        let artifact = ClassifierArtifact::Dense(net);
        let json = serde_json::to_string(&artifact).unwrap();
        assert!(json.contains(r#""kind":"dense""#));
        let back: ClassifierArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, artifact);
        assert_eq!(back.name(), "n");
    }
}

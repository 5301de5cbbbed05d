//! JSON Parameter Artifacts
//!
//! Linear models and preprocessors exported as plain parameter files, tagged
//! by `"kind"`:
//!
//! ```json
//! { "kind": "standard_scaler", "mean": [ ... ], "scale": [ ... ] }
//! ```

use crate::component::{Capabilities, ClassLabel, Component};
use crate::{ArtifactError, InferenceError};
use serde::{Deserialize, Serialize};

/// Parameters of a supported model family
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactModel {
    /// `(x - mean) / scale`
    StandardScaler { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMaxScaler { min: Vec<f64>, scale: Vec<f64> },
    /// Projection of the centred row onto principal axes
    Pca {
        mean: Vec<f64>,
        components: Vec<Vec<f64>>,
    },
    /// Distances to centroids; nearest centroid as prediction
    KMeans { centroids: Vec<Vec<f64>> },
    /// Binary logistic regression
    LogisticRegression {
        coef: Vec<f64>,
        intercept: f64,
        classes: Vec<ClassLabel>,
    },
    /// Linear SVM, decision function only
    LinearSvc {
        coef: Vec<f64>,
        intercept: f64,
        #[serde(default)]
        classes: Option<Vec<ClassLabel>>,
    },
}

impl ArtifactModel {
    /// Model family name
    pub fn kind(&self) -> &'static str {
        match self {
            ArtifactModel::StandardScaler { .. } => "standard_scaler",
            ArtifactModel::MinMaxScaler { .. } => "min_max_scaler",
            ArtifactModel::Pca { .. } => "pca",
            ArtifactModel::KMeans { .. } => "k_means",
            ArtifactModel::LogisticRegression { .. } => "logistic_regression",
            ArtifactModel::LinearSvc { .. } => "linear_svc",
        }
    }

    /// Number of input features the model expects
    pub fn input_width(&self) -> usize {
        match self {
            ArtifactModel::StandardScaler { mean, .. } => mean.len(),
            ArtifactModel::MinMaxScaler { min, .. } => min.len(),
            ArtifactModel::Pca { mean, .. } => mean.len(),
            ArtifactModel::KMeans { centroids } => centroids.first().map_or(0, Vec::len),
            ArtifactModel::LogisticRegression { coef, .. } => coef.len(),
            ArtifactModel::LinearSvc { coef, .. } => coef.len(),
        }
    }

    /// Check parameter shapes
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let width = self.input_width();
        if width == 0 {
            return Err(ArtifactError::Invalid(format!("{} has no features", self.kind())));
        }

        let consistent = match self {
            ArtifactModel::StandardScaler { scale, .. } => scale.len() == width,
            ArtifactModel::MinMaxScaler { scale, .. } => scale.len() == width,
            ArtifactModel::Pca { components, .. } => {
                !components.is_empty() && components.iter().all(|axis| axis.len() == width)
            }
            ArtifactModel::KMeans { centroids } => centroids.iter().all(|c| c.len() == width),
            ArtifactModel::LogisticRegression { classes, .. } => classes.len() == 2,
            ArtifactModel::LinearSvc { classes, .. } => {
                classes.as_ref().map_or(true, |c| c.len() == 2)
            }
        };

        if consistent {
            Ok(())
        } else {
            Err(ArtifactError::Invalid(format!(
                "{} parameters have inconsistent shapes",
                self.kind()
            )))
        }
    }
}

/// Component backed by a JSON parameter artifact
#[derive(Debug, Clone)]
pub struct JsonComponent {
    name: String,
    model: ArtifactModel,
}

impl JsonComponent {
    /// Parse and validate an artifact
    pub fn from_slice(name: &str, bytes: &[u8]) -> Result<Self, ArtifactError> {
        let model: ArtifactModel = serde_json::from_slice(bytes)?;
        Self::new(name, model)
    }

    /// Wrap already-parsed parameters
    pub fn new(name: &str, model: ArtifactModel) -> Result<Self, ArtifactError> {
        model.validate()?;
        Ok(Self {
            name: name.to_string(),
            model,
        })
    }

    /// Get model parameters
    pub fn model(&self) -> &ArtifactModel {
        &self.model
    }

    fn check_width(&self, row: &[f64]) -> Result<(), InferenceError> {
        let expected = self.model.input_width();
        if row.len() != expected {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[1, {}]", expected),
                actual: format!("[1, {}]", row.len()),
            });
        }
        Ok(())
    }

    fn decision(coef: &[f64], intercept: f64, row: &[f64]) -> f64 {
        dot(coef, row) + intercept
    }
}

impl Component for JsonComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        match &self.model {
            ArtifactModel::StandardScaler { .. }
            | ArtifactModel::MinMaxScaler { .. }
            | ArtifactModel::Pca { .. } => Capabilities::TRANSFORMER,
            ArtifactModel::KMeans { .. } => Capabilities {
                transform: true,
                predict: true,
                ..Default::default()
            },
            ArtifactModel::LogisticRegression { .. } => Capabilities {
                predict: true,
                predict_proba: true,
                classes: true,
                ..Default::default()
            },
            ArtifactModel::LinearSvc { classes, .. } => Capabilities {
                predict: true,
                classes: classes.is_some(),
                ..Default::default()
            },
        }
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        self.check_width(row)?;
        match &self.model {
            ArtifactModel::StandardScaler { mean, scale } => Ok(row
                .iter()
                .zip(mean)
                .zip(scale)
                // Constant features are exported with a zero scale
                .map(|((x, m), s)| (x - m) / if *s == 0.0 { 1.0 } else { *s })
                .collect()),
            ArtifactModel::MinMaxScaler { min, scale } => Ok(row
                .iter()
                .zip(min)
                .zip(scale)
                .map(|((x, m), s)| x * s + m)
                .collect()),
            ArtifactModel::Pca { mean, components } => {
                let centred: Vec<f64> = row.iter().zip(mean).map(|(x, m)| x - m).collect();
                Ok(components.iter().map(|axis| dot(axis, &centred)).collect())
            }
            ArtifactModel::KMeans { centroids } => Ok(centroids
                .iter()
                .map(|centroid| squared_distance(centroid, row).sqrt())
                .collect()),
            _ => Err(InferenceError::Unsupported {
                component: self.name.clone(),
                operation: "transform",
            }),
        }
    }

    fn predict(&self, row: &[f64]) -> Result<ClassLabel, InferenceError> {
        self.check_width(row)?;
        match &self.model {
            ArtifactModel::KMeans { centroids } => {
                let nearest = centroids
                    .iter()
                    .map(|centroid| squared_distance(centroid, row))
                    .enumerate()
                    .fold((0, f64::INFINITY), |best, (i, d)| if d < best.1 { (i, d) } else { best })
                    .0;
                Ok(ClassLabel::Int(nearest as i64))
            }
            ArtifactModel::LogisticRegression {
                coef,
                intercept,
                classes,
            } => {
                let positive = sigmoid(Self::decision(coef, *intercept, row)) > 0.5;
                Ok(classes[usize::from(positive)].clone())
            }
            ArtifactModel::LinearSvc {
                coef,
                intercept,
                classes,
            } => {
                let positive = Self::decision(coef, *intercept, row) > 0.0;
                Ok(match classes {
                    Some(classes) => classes[usize::from(positive)].clone(),
                    None => ClassLabel::Int(i64::from(positive)),
                })
            }
            _ => Err(InferenceError::Unsupported {
                component: self.name.clone(),
                operation: "predict",
            }),
        }
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        self.check_width(row)?;
        match &self.model {
            ArtifactModel::LogisticRegression {
                coef, intercept, ..
            } => {
                let p = sigmoid(Self::decision(coef, *intercept, row));
                Ok(vec![1.0 - p, p])
            }
            _ => Err(InferenceError::Unsupported {
                component: self.name.clone(),
                operation: "predict_proba",
            }),
        }
    }

    fn classes(&self) -> Option<&[ClassLabel]> {
        match &self.model {
            ArtifactModel::LogisticRegression { classes, .. } => Some(classes),
            ArtifactModel::LinearSvc { classes, .. } => classes.as_deref(),
            _ => None,
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

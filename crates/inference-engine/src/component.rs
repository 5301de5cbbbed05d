//! Trained Component Abstraction

use crate::InferenceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Class label produced by a classifier
///
/// Whole-number floats (`1.0`) deserialize as [`ClassLabel::Int`]; other
/// floats keep their text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged, from = "RawLabel")]
pub enum ClassLabel {
    Int(i64),
    Text(String),
}

/// Wire form of a class label
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<RawLabel> for ClassLabel {
    fn from(raw: RawLabel) -> Self {
        match raw {
            RawLabel::Int(v) => ClassLabel::Int(v),
            RawLabel::Float(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                ClassLabel::Int(v as i64)
            }
            RawLabel::Float(v) => ClassLabel::Text(v.to_string()),
            RawLabel::Text(s) => ClassLabel::Text(s),
        }
    }
}

impl ClassLabel {
    /// Whether the label is the integer 1
    pub fn is_one(&self) -> bool {
        matches!(self, ClassLabel::Int(1))
    }

    /// Case-insensitive comparison of the label's text form
    pub fn names(&self, name: &str) -> bool {
        self.to_string().to_lowercase() == name.to_lowercase()
    }

    /// Numeric value of the label, for use as a feature
    pub fn as_feature(&self) -> Result<f64, InferenceError> {
        match self {
            ClassLabel::Int(v) => Ok(*v as f64),
            ClassLabel::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                InferenceError::InferenceFailed(format!("label {:?} is not numeric", s))
            }),
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Int(v) => write!(f, "{}", v),
            ClassLabel::Text(s) => f.write_str(s),
        }
    }
}

/// Operations a component exposes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub transform: bool,
    pub predict: bool,
    pub predict_proba: bool,
    pub classes: bool,
}

impl Capabilities {
    /// Transform only (scalers, projections)
    pub const TRANSFORMER: Self = Self {
        transform: true,
        predict: false,
        predict_proba: false,
        classes: false,
    };
}

/// A loaded, immutable scoring artifact operating on one sample at a time.
///
/// Operations a component does not declare in [`Capabilities`] return
/// [`InferenceError::Unsupported`].
pub trait Component: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Declared operations
    fn capabilities(&self) -> Capabilities;

    /// Map a row to a new row
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let _ = row;
        Err(unsupported(self.name(), "transform"))
    }

    /// Predict a class for a row
    fn predict(&self, row: &[f64]) -> Result<ClassLabel, InferenceError> {
        let _ = row;
        Err(unsupported(self.name(), "predict"))
    }

    /// Class probabilities for a row
    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let _ = row;
        Err(unsupported(self.name(), "predict_proba"))
    }

    /// Known class labels
    fn classes(&self) -> Option<&[ClassLabel]> {
        None
    }
}

impl fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name())
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

fn unsupported(component: &str, operation: &'static str) -> InferenceError {
    InferenceError::Unsupported {
        component: component.to_string(),
        operation,
    }
}

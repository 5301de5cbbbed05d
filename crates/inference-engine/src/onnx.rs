//! ONNX Model Components
//!
//! Runs exported models with tract. Input 0 must be a `[batch, features]`
//! float tensor with a known feature count; batch is fixed to 1. Output 0 is
//! the transform result (or the predicted label), output 1, when present, the
//! class probabilities.

use crate::component::{Capabilities, ClassLabel, Component};
use crate::{ArtifactError, InferenceError};
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::prelude::*;
use tract_onnx::tract_core::internal::DimLike;
use tract_onnx::tract_hir::infer::Factoid;

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// Component backed by an optimized ONNX plan
pub struct OnnxComponent {
    name: String,
    plan: OnnxPlan,
    input_width: usize,
    output_count: usize,
}

impl OnnxComponent {
    /// Load and optimize a model file
    pub fn load(name: &str, path: &Path) -> Result<Self, ArtifactError> {
        info!("Loading ONNX model {} from {}", name, path.display());

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| ArtifactError::Onnx(e.to_string()))?;

        let input_width = model
            .input_fact(0)
            .map_err(|e| ArtifactError::Onnx(e.to_string()))?
            .shape
            .dims()
            .nth(1)
            .and_then(|dim| dim.concretize())
            .and_then(|dim| dim.to_usize().ok())
            .ok_or_else(|| {
                ArtifactError::Invalid(format!("{}: input feature count is not fixed", name))
            })?;

        let plan = model
            .with_input_fact(0, f32::fact([1, input_width]).into())
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| ArtifactError::Onnx(e.to_string()))?;

        let output_count = plan.model().outputs.len();
        debug!(
            "ONNX model {}: {} input features, {} outputs",
            name, input_width, output_count
        );

        Ok(Self {
            name: name.to_string(),
            plan,
            input_width,
            output_count,
        })
    }

    fn run(&self, row: &[f64]) -> Result<TVec<TValue>, InferenceError> {
        if row.len() != self.input_width {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[1, {}]", self.input_width),
                actual: format!("[1, {}]", row.len()),
            });
        }

        let data: Vec<f32> = row.iter().map(|&v| v as f32).collect();
        let input = Tensor::from_shape(&[1, self.input_width], &data).map_err(|e| self.failed(e))?;
        self.plan
            .run(tvec!(input.into()))
            .map_err(|e| self.failed(e))
    }

    fn output_row(&self, value: &TValue) -> Result<Vec<f64>, InferenceError> {
        let values = value.cast_to::<f64>().map_err(|e| self.failed(e))?;
        let slice = values.as_slice::<f64>().map_err(|e| self.failed(e))?;
        Ok(slice.to_vec())
    }

    fn failed(&self, e: impl std::fmt::Display) -> InferenceError {
        InferenceError::InferenceFailed(format!("{}: {}", self.name, e))
    }
}

impl Component for OnnxComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            transform: true,
            predict: true,
            predict_proba: self.output_count > 1,
            classes: false,
        }
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let outputs = self.run(row)?;
        self.output_row(&outputs[0])
    }

    fn predict(&self, row: &[f64]) -> Result<ClassLabel, InferenceError> {
        let outputs = self.run(row)?;
        let label = &outputs[0];

        if label.datum_type() == String::datum_type() {
            let labels = label.as_slice::<String>().map_err(|e| self.failed(e))?;
            labels
                .first()
                .map(|s| ClassLabel::Text(s.clone()))
                .ok_or_else(|| self.failed("empty label output"))
        } else {
            let labels = label.cast_to::<i64>().map_err(|e| self.failed(e))?;
            labels
                .as_slice::<i64>()
                .map_err(|e| self.failed(e))?
                .first()
                .map(|&v| ClassLabel::Int(v))
                .ok_or_else(|| self.failed("empty label output"))
        }
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if self.output_count < 2 {
            return Err(InferenceError::Unsupported {
                component: self.name.clone(),
                operation: "predict_proba",
            });
        }
        let outputs = self.run(row)?;
        self.output_row(&outputs[1])
    }
}

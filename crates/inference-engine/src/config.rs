//! Artifact configuration

use crate::components::Slot;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where trained artifacts live and what each slot's file is called
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Directory searched for artifacts
    pub dir: PathBuf,

    /// File stems, without extension
    pub scaler: String,
    pub enrichment: String,
    pub enrichment_scaler: String,
    pub classifier: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            scaler: "scaler".to_string(),
            enrichment: "quantum_model".to_string(),
            enrichment_scaler: "quantum_scaler".to_string(),
            classifier: "phishing_model".to_string(),
        }
    }
}

impl ArtifactConfig {
    /// Default stems under a given directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// File stem for a slot
    pub fn stem(&self, slot: Slot) -> &str {
        match slot {
            Slot::Scaler => &self.scaler,
            Slot::Enrichment => &self.enrichment,
            Slot::EnrichmentScaler => &self.enrichment_scaler,
            Slot::Classifier => &self.classifier,
        }
    }

    /// Path of a slot's artifact with the given extension
    pub fn path(&self, slot: Slot, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.stem(slot), extension))
    }
}

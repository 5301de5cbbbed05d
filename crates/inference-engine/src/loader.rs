//! Trained Component Loader

use crate::artifact::JsonComponent;
use crate::components::{ComponentSlots, SharedComponent, Slot, TrainedComponents};
use crate::config::ArtifactConfig;
use crate::onnx::OnnxComponent;
use crate::ArtifactError;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Supported artifact encodings, in probe order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Onnx,
}

impl ArtifactFormat {
    pub const PROBE_ORDER: [ArtifactFormat; 2] = [ArtifactFormat::Json, ArtifactFormat::Onnx];

    /// File extension
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Json => "json",
            ArtifactFormat::Onnx => "onnx",
        }
    }
}

/// Deserialize one artifact file
pub fn load_artifact(
    name: &str,
    path: &Path,
    format: ArtifactFormat,
) -> Result<SharedComponent, ArtifactError> {
    match format {
        ArtifactFormat::Json => {
            let bytes = std::fs::read(path)?;
            Ok(Arc::new(JsonComponent::from_slice(name, &bytes)?))
        }
        ArtifactFormat::Onnx => Ok(Arc::new(OnnxComponent::load(name, path)?)),
    }
}

/// Loads the trained component bundle at most once.
///
/// A missing artifact leaves its slot empty, and so does one that fails to
/// load; neither is reported to the caller.
pub struct ComponentLoader {
    config: ArtifactConfig,
    components: OnceLock<Arc<TrainedComponents>>,
    deserializations: AtomicUsize,
}

impl ComponentLoader {
    /// Create a loader; nothing is read until [`ComponentLoader::load`]
    pub fn new(config: ArtifactConfig) -> Self {
        Self {
            config,
            components: OnceLock::new(),
            deserializations: AtomicUsize::new(0),
        }
    }

    /// Load the bundle, or return the one already loaded
    pub fn load(&self) -> Arc<TrainedComponents> {
        Arc::clone(self.components.get_or_init(|| Arc::new(self.load_all())))
    }

    /// Whether the bundle has been loaded
    pub fn is_loaded(&self) -> bool {
        self.components.get().is_some()
    }

    /// Number of artifact files deserialized so far
    pub fn deserializations(&self) -> usize {
        self.deserializations.load(Ordering::Relaxed)
    }

    /// Get configuration
    pub fn config(&self) -> &ArtifactConfig {
        &self.config
    }

    fn load_all(&self) -> TrainedComponents {
        info!("Loading trained components from {}", self.config.dir.display());

        let mut slots = ComponentSlots::default();
        for slot in Slot::ALL {
            slots.set(slot, self.load_slot(slot));
        }

        let components = TrainedComponents::resolve(slots);
        if components.trained_path().is_some() {
            info!("Trained components available: {:?}", components.available());
        } else {
            warn!(
                "Scaler or classifier missing (available: {:?}), scoring will use heuristics",
                components.available()
            );
        }
        components
    }

    fn load_slot(&self, slot: Slot) -> Option<SharedComponent> {
        let name = self.config.stem(slot);

        for format in ArtifactFormat::PROBE_ORDER {
            let path = self.config.path(slot, format.extension());
            if !path.is_file() {
                continue;
            }

            self.deserializations.fetch_add(1, Ordering::Relaxed);
            return match load_artifact(name, &path, format) {
                Ok(component) => {
                    info!("Loaded {} artifact {}", slot, path.display());
                    Some(component)
                }
                Err(e) => {
                    warn!("Ignoring {} artifact {}: {}", slot, path.display(), e);
                    None
                }
            };
        }

        debug!("No {} artifact named {} found", slot, name);
        None
    }
}

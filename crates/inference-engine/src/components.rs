//! Trained Component Bundle
//!
//! Slots are resolved once, when the bundle is built: the enrichment stage is
//! reduced to an [`Enrichment`] variant and the classifier's optional
//! operations are recorded, so scoring never has to probe capabilities.

use crate::component::Component;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Shared, immutable component
pub type SharedComponent = Arc<dyn Component>;

/// Named artifact slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Primary scaler applied to raw features
    Scaler,
    /// Secondary transform whose output is appended to the scaled row
    Enrichment,
    /// Scaler applied to the enrichment output
    EnrichmentScaler,
    /// Final classifier
    Classifier,
}

impl Slot {
    /// All slots in load order
    pub const ALL: [Slot; 4] = [
        Slot::Scaler,
        Slot::Enrichment,
        Slot::EnrichmentScaler,
        Slot::Classifier,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Scaler => "scaler",
            Slot::Enrichment => "enrichment",
            Slot::EnrichmentScaler => "enrichment_scaler",
            Slot::Classifier => "classifier",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the enrichment stage produces its output
#[derive(Debug, Clone, Default)]
pub enum Enrichment {
    /// No enrichment component
    #[default]
    None,
    /// Output of the component's transform
    Transform(SharedComponent),
    /// Single-column output from the component's prediction
    PredictOnly(SharedComponent),
    /// Component exposes neither operation; the scaled row is reused
    Passthrough,
}

impl Enrichment {
    /// Pick the variant from a component's capabilities, transform first
    pub fn resolve(component: Option<SharedComponent>) -> Self {
        let Some(component) = component else {
            return Enrichment::None;
        };
        let caps = component.capabilities();
        if caps.transform {
            Enrichment::Transform(component)
        } else if caps.predict {
            Enrichment::PredictOnly(component)
        } else {
            debug!(
                "Enrichment component {} has no transform or predict, passing through",
                component.name()
            );
            Enrichment::Passthrough
        }
    }

    /// Whether an enrichment component is configured
    pub fn is_present(&self) -> bool {
        !matches!(self, Enrichment::None)
    }
}

/// Final classifier with its optional operations resolved
#[derive(Debug, Clone)]
pub struct ClassifierHandle {
    /// The classifier
    pub component: SharedComponent,
    /// Whether `predict_proba` is available
    pub probabilities: bool,
    /// Whether a non-empty class list is available
    pub class_labels: bool,
}

impl ClassifierHandle {
    /// Resolve optional operations of a classifier
    pub fn resolve(component: SharedComponent) -> Self {
        let caps = component.capabilities();
        let class_labels = caps.classes && component.classes().is_some_and(|c| !c.is_empty());
        Self {
            probabilities: caps.predict_proba,
            class_labels,
            component,
        }
    }
}

/// Components as loaded from storage, one optional entry per slot
#[derive(Clone, Default)]
pub struct ComponentSlots {
    pub scaler: Option<SharedComponent>,
    pub enrichment: Option<SharedComponent>,
    pub enrichment_scaler: Option<SharedComponent>,
    pub classifier: Option<SharedComponent>,
}

impl ComponentSlots {
    /// Set a slot
    pub fn set(&mut self, slot: Slot, component: Option<SharedComponent>) {
        match slot {
            Slot::Scaler => self.scaler = component,
            Slot::Enrichment => self.enrichment = component,
            Slot::EnrichmentScaler => self.enrichment_scaler = component,
            Slot::Classifier => self.classifier = component,
        }
    }
}

/// Immutable set of trained components used by the scoring pipeline
#[derive(Debug, Clone, Default)]
pub struct TrainedComponents {
    /// Primary scaler
    pub scaler: Option<SharedComponent>,
    /// Resolved enrichment stage
    pub enrichment: Enrichment,
    /// Enrichment output scaler, kept only when it can transform
    pub enrichment_scaler: Option<SharedComponent>,
    /// Final classifier
    pub classifier: Option<ClassifierHandle>,
}

impl TrainedComponents {
    /// A bundle with every slot absent
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve loaded slots into a bundle
    pub fn resolve(slots: ComponentSlots) -> Self {
        let enrichment_scaler = slots.enrichment_scaler.filter(|s| {
            let usable = s.capabilities().transform;
            if !usable {
                debug!("Enrichment scaler {} cannot transform, ignoring", s.name());
            }
            usable
        });

        Self {
            scaler: slots.scaler,
            enrichment: Enrichment::resolve(slots.enrichment),
            enrichment_scaler,
            classifier: slots.classifier.map(ClassifierHandle::resolve),
        }
    }

    /// Scaler and classifier, when both are present
    pub fn trained_path(&self) -> Option<(&SharedComponent, &ClassifierHandle)> {
        self.scaler.as_ref().zip(self.classifier.as_ref())
    }

    /// Slots holding a component
    pub fn available(&self) -> Vec<Slot> {
        let mut slots = Vec::new();
        if self.scaler.is_some() {
            slots.push(Slot::Scaler);
        }
        if self.enrichment.is_present() {
            slots.push(Slot::Enrichment);
        }
        if self.enrichment_scaler.is_some() {
            slots.push(Slot::EnrichmentScaler);
        }
        if self.classifier.is_some() {
            slots.push(Slot::Classifier);
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Capabilities, ClassLabel};

    struct Stub {
        caps: Capabilities,
        classes: Vec<ClassLabel>,
    }

    impl Stub {
        fn shared(caps: Capabilities) -> SharedComponent {
            Arc::new(Self {
                caps,
                classes: Vec::new(),
            })
        }
    }

    impl Component for Stub {
        fn name(&self) -> &str {
            "stub"
        }

        fn capabilities(&self) -> Capabilities {
            self.caps
        }

        fn classes(&self) -> Option<&[ClassLabel]> {
            Some(&self.classes)
        }
    }

    const PREDICTOR: Capabilities = Capabilities {
        transform: false,
        predict: true,
        predict_proba: false,
        classes: false,
    };

    #[test]
    fn test_enrichment_prefers_transform() {
        let both = Capabilities {
            transform: true,
            predict: true,
            ..Default::default()
        };
        assert!(matches!(
            Enrichment::resolve(Some(Stub::shared(both))),
            Enrichment::Transform(_)
        ));
        assert!(matches!(
            Enrichment::resolve(Some(Stub::shared(PREDICTOR))),
            Enrichment::PredictOnly(_)
        ));
        assert!(matches!(
            Enrichment::resolve(Some(Stub::shared(Capabilities::default()))),
            Enrichment::Passthrough
        ));
        assert!(matches!(Enrichment::resolve(None), Enrichment::None));
    }

    #[test]
    fn test_enrichment_scaler_without_transform_dropped() {
        let bundle = TrainedComponents::resolve(ComponentSlots {
            enrichment_scaler: Some(Stub::shared(PREDICTOR)),
            ..Default::default()
        });
        assert!(bundle.enrichment_scaler.is_none());
    }

    #[test]
    fn test_empty_class_list_is_not_a_label_list() {
        let caps = Capabilities {
            predict: true,
            classes: true,
            ..Default::default()
        };
        let handle = ClassifierHandle::resolve(Stub::shared(caps));
        assert!(!handle.class_labels);
        assert!(!handle.probabilities);
    }

    #[test]
    fn test_trained_path_needs_scaler_and_classifier() {
        let mut slots = ComponentSlots::default();
        slots.set(Slot::Classifier, Some(Stub::shared(PREDICTOR)));
        assert!(TrainedComponents::resolve(slots.clone()).trained_path().is_none());

        slots.set(Slot::Scaler, Some(Stub::shared(Capabilities::TRANSFORMER)));
        let bundle = TrainedComponents::resolve(slots);
        assert!(bundle.trained_path().is_some());
        assert_eq!(bundle.available(), vec![Slot::Scaler, Slot::Classifier]);
    }

    #[test]
    fn test_empty_bundle() {
        let bundle = TrainedComponents::empty();
        assert!(bundle.trained_path().is_none());
        assert!(bundle.available().is_empty());
    }
}

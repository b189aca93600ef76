pub mod layout;
pub mod ledger;

use std::collections::BTreeSet;
use std::path::Path;
use crate::errors::TriageError;
use crate::interpret::{InterpretationResult, ServiceSignature};

pub use layout::{SessionLayout, validate_target, DEFAULT_TRIAGE_ROOT};
pub use ledger::RecommendationLedger;

/// Mutable state of one workflow run, passed by reference into each step.
#[derive(Debug, Clone)]
pub struct ReconSession {
    target: String,
    layout: SessionLayout,
    pub ledger: RecommendationLedger,
    services: Vec<ServiceSignature>,
}

impl ReconSession {
    pub fn new(triage_root: &Path, target: &str) -> Result<Self, TriageError> {
        Ok(Self {
            target: target.to_string(),
            layout: SessionLayout::new(triage_root, target)?,
            ledger: RecommendationLedger::new(),
            services: Vec::new(),
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn layout(&self) -> &SessionLayout {
        &self.layout
    }

    /// Fold a successful interpretation into the run state.
    pub fn absorb(&mut self, result: &InterpretationResult) {
        self.ledger.record_recommended(result.recommended_steps.iter().cloned());
        self.services.extend(
            result.services_found
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        );
    }

    /// Every signature seen so far, in discovery order, duplicates included.
    pub fn services_seen(&self) -> &[ServiceSignature] {
        &self.services
    }

    /// De-duplicated signatures for cross-referencing.
    pub fn unique_services(&self) -> BTreeSet<ServiceSignature> {
        self.services.iter().cloned().collect()
    }
}

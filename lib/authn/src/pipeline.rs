//! Ordered request stages.

use http::request::Parts;
use std::fmt;
use std::sync::Arc;

use crate::error::Rejection;

/// One step of request pre-processing.
pub trait RequestStage: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Inspects or annotates the request head.
    ///
    /// # Errors
    ///
    /// Returns a `Rejection` to stop the request.
    fn apply(&self, parts: &mut Parts) -> Result<(), Rejection>;
}

/// Stages run in insertion order; the first rejection stops the run.
#[derive(Clone, Default)]
pub struct RequestPipeline {
    stages: Vec<Arc<dyn RequestStage>>,
}

impl RequestPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    #[must_use]
    pub fn with_stage(mut self, stage: impl RequestStage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Runs every stage against the request head.
    ///
    /// # Errors
    ///
    /// Returns the first stage rejection.
    pub fn run(&self, parts: &mut Parts) -> Result<(), Rejection> {
        for stage in &self.stages {
            if let Err(rejection) = stage.apply(parts) {
                tracing::debug!(stage = stage.name(), %rejection, "Request rejected");
                return Err(rejection);
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|s| s.name()))
            .finish()
    }
}

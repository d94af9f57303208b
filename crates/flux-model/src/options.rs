//! Configuration options for notebook generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default Jupyter kernel recorded in generated notebooks.
pub const DEFAULT_KERNEL: &str = "python3";

/// Options controlling pipeline behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Kernel name written to the notebook `kernelspec`.
    pub kernel: String,

    /// Fixed generation timestamp. `None` uses the build time.
    ///
    /// Set this for reproducible notebook bytes across runs.
    pub generated_at: Option<DateTime<Utc>>,

    /// Check declared section context reads against earlier writes before
    /// any section runs.
    pub validate_context: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            kernel: DEFAULT_KERNEL.to_string(),
            generated_at: None,
            validate_context: true,
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kernel(mut self, kernel: impl Into<String>) -> Self {
        self.kernel = kernel.into();
        self
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    pub fn with_context_validation(mut self, enable: bool) -> Self {
        self.validate_context = enable;
        self
    }

    /// Timestamp to stamp on documents built now.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.generated_at.unwrap_or_else(Utc::now)
    }
}

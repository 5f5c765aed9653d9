//! Resolution allow-list.

use crate::config::Config;
use crate::error::PipelineError;

/// Gate on the resolution token of a transform request.
///
/// Matching is exact string comparison against the configured list, so
/// `"0100x100"` and `"100x100"` are distinct tokens. An empty list admits
/// every resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolutionPolicy {
    allowed: Vec<String>,
}

impl ResolutionPolicy {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.allowed_resolutions.clone())
    }

    /// Whether requests for this resolution token may proceed.
    pub fn allows(&self, token: &str) -> bool {
        self.allowed.is_empty() || self.allowed.iter().any(|allowed| allowed == token)
    }

    /// Check a token, producing the pipeline error on denial.
    pub fn check(&self, token: &str) -> Result<(), PipelineError> {
        if self.allows(token) {
            Ok(())
        } else {
            Err(PipelineError::ResolutionDenied {
                requested: token.to_string(),
                allowed: self.allowed.clone(),
            })
        }
    }
}

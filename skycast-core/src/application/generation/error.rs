use crate::a2ui::{PayloadError, ValidationError};
use thiserror::Error;

/// Why a generation attempt did not produce an acceptable reply.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationFailure {
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("the model returned no content")]
    GenerationEmpty,
    #[error("the generation call failed: {0}")]
    GenerationFailed(String),
    #[error("no acceptable reply after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },
}

impl GenerationFailure {
    /// Failures where the model produced nothing usable to critique.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            GenerationFailure::GenerationEmpty | GenerationFailure::GenerationFailed(_)
        )
    }
}

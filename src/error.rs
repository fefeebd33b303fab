use thiserror::Error;

pub type Result<T, E = GenerationError> = std::result::Result<T, E>;

/// Failures that abort a single generation attempt.
///
/// A bailout is not a bug: it means the schema currently has nothing the
/// requested statement kind can target. Callers skip the statement kind (or
/// the whole round) and move on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("bailout: {reason}")]
    Bailout { reason: String },
}

impl GenerationError {
    pub fn bailout(reason: impl Into<String>) -> Self {
        Self::Bailout {
            reason: reason.into(),
        }
    }

    pub fn is_bailout(&self) -> bool {
        matches!(self, Self::Bailout { .. })
    }
}

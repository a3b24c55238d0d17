use std::fmt;

/// Why a public engine operation failed.
///
/// Every fallible entry point in this crate returns `Result<_, EngineError>`
/// rather than panicking, except for the `RuleViolation` cases which are
/// reserved for configurations that should be unreachable from correct
/// calling code (e.g. a zero-sided damage die).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A modifier, value, or cross-entity channel was built with an
    /// inconsistent source/target pairing.
    Validation { message: String },
    /// A referenced id is not present in the relevant registry.
    NotFound { message: String },
    /// The operation's preconditions were not met (occupied slot, out of
    /// range, already-conditioned target, ...). No state was changed.
    Precondition { message: String },
    /// An impossible configuration reached a code path that assumes it
    /// can't happen. Indicates a caller bug.
    RuleViolation { message: String },
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        EngineError::NotFound {
            message: message.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        EngineError::Precondition {
            message: message.into(),
        }
    }

    pub fn rule_violation(message: impl Into<String>) -> Self {
        EngineError::RuleViolation {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            EngineError::Validation { message }
            | EngineError::NotFound { message }
            | EngineError::Precondition { message }
            | EngineError::RuleViolation { message } => message,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            EngineError::Validation { .. } => "validation",
            EngineError::NotFound { .. } => "not found",
            EngineError::Precondition { .. } => "precondition",
            EngineError::RuleViolation { .. } => "rule violation",
        };
        write!(f, "{kind}: {}", self.message())
    }
}

impl std::error::Error for EngineError {}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = EngineError::not_found("entity 123 unknown");
        assert_eq!(err.to_string(), "not found: entity 123 unknown");
    }
}

//! Common error infrastructure for tactics-core.
//!
//! The core has no fatal error states: every failure is either a lookup that
//! yields nothing (no path, over budget) or a rejected request that leaves
//! the encounter untouched. Errors implement [`GameError`] so callers can
//! decide whether to retry.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same request may succeed later.
    ///
    /// Examples: an animation is still playing, it is the enemies' turn
    Recoverable,

    /// Invalid input; do not retry without changing the request.
    ///
    /// Examples: destination unreachable, path over budget, target not adjacent
    Validation,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all tactics-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

//! Error types for the game core.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all game core errors.
///
/// Every failure is a local, recoverable no-op: the state passed into the
/// failing operation is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Not enough of a spendable resource.
    #[error("Insufficient resources: need {required} {resource}, have {available}")]
    InsufficientResources {
        /// Resource type.
        resource: String,
        /// Amount required.
        required: u64,
        /// Amount available.
        available: u64,
    },

    /// An action was attempted before it was unlocked, or after it was used up.
    #[error("Precondition not met: {0}")]
    PreconditionNotMet(String),

    /// A unit or move choice that is not allowed in the current context.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// A command that the current battle phase does not accept.
    #[error("Invalid transition: cannot {command} during {phase}")]
    InvalidTransition {
        /// Phase the battle was in.
        phase: String,
        /// Command that was rejected.
        command: String,
    },

    /// Unknown move identifier.
    #[error("Unknown move: {0}")]
    UnknownMove(String),

    /// Unknown unit template identifier.
    #[error("Unknown unit template: {0}")]
    UnknownTemplate(String),

    /// No template is crafted from this blueprint.
    #[error("Unknown blueprint: {0}")]
    UnknownBlueprint(String),

    /// No unit with this id in the roster.
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// Unknown guild identifier.
    #[error("Unknown guild: {0}")]
    UnknownGuild(String),

    /// Data file parsing error.
    #[error("Failed to parse data '{source_name}': {message}")]
    DataParseError {
        /// Name of the data source that failed to parse.
        source_name: String,
        /// Error message.
        message: String,
    },

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// A replay did not reproduce its recorded final state.
    #[error("Replay desync: expected hash {expected}, got {actual}")]
    ReplayMismatch {
        /// Hash recorded when the replay was finalized.
        expected: u64,
        /// Hash produced by playing the replay back.
        actual: u64,
    },
}

impl GameError {
    /// Shorthand for a resource shortfall.
    #[must_use]
    pub fn insufficient(resource: impl Into<String>, required: u64, available: u64) -> Self {
        Self::InsufficientResources {
            resource: resource.into(),
            required,
            available,
        }
    }

    /// Whether this error belongs to the player-facing "nothing happened" class.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientResources { .. }
                | Self::PreconditionNotMet(_)
                | Self::InvalidSelection(_)
                | Self::InvalidTransition { .. }
        )
    }
}

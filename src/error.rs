//! Error types.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TournamentError>;

/// Errors raised while building patterns or timetables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TournamentError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A supplied sequence breaks the run-length or mirror invariant.
    #[error("invalid sequence for team {team}: {reason}")]
    InvalidSequence { team: usize, reason: String },

    /// Rejection sampling never produced a valid first half.
    #[error("no valid {weeks}-week sequence found after {attempts} attempts")]
    GenerationExhausted { weeks: usize, attempts: usize },

    /// No opponent assignment is compatible with the pattern.
    #[error("no timetable satisfies the pattern ({nodes} assignments explored)")]
    Infeasible { nodes: u64 },
}

impl TournamentError {
    /// Whether the caller can reasonably retry (e.g. with another pattern).
    pub fn is_recoverable(&self) -> bool {
        match self {
            TournamentError::Infeasible { .. } => true,
            TournamentError::InvalidSequence { .. } => true,
            TournamentError::InvalidConfig(_) => false,
            TournamentError::GenerationExhausted { .. } => false,
        }
    }
}

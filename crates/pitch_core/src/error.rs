use thiserror::Error;

use crate::analysis::integrity::IntegrityViolation;
use crate::models::PlayerId;

/// Recoverable errors at the edges of the core.
///
/// In-tick problems never surface here: they are clamped where the mutation
/// happens, or end the match through `Termination::InvariantViolation`.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid team size for {team}: expected 1..={max}, found {found}")]
    InvalidTeamSize { team: String, max: usize, found: usize },

    #[error("Duplicate player id: {0}")]
    DuplicatePlayer(PlayerId),

    #[error("Unknown AI profile: {0}")]
    UnknownProfile(String),

    #[error("Decision outcome already recorded")]
    OutcomeAlreadyRecorded,

    #[error("Integrity check failed: {0}")]
    Integrity(#[from] IntegrityViolation),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Whether the caller can fix the input and retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimError::InvalidConfig(_) => true,
            SimError::InvalidTeamSize { .. } => true,
            SimError::DuplicatePlayer(_) => true,
            SimError::UnknownProfile(_) => true,
            SimError::OutcomeAlreadyRecorded => false,
            SimError::Integrity(_) => false,
            SimError::Serialization(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

//! Error types for the match engine

use thiserror::Error;

/// Errors surfaced by match construction and the deterministic cache
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid noise {noise}: must be a probability in [0, 1]")]
    InvalidNoise { noise: f64 },

    #[error("invalid payoff {name}={value}: must be finite")]
    InvalidPayoff { name: char, value: f64 },

    #[error("deterministic cache is frozen; writes are not permitted")]
    CacheFrozen,

    #[error("deterministic cache lock was poisoned")]
    CachePoisoned,
}

pub type Result<T> = std::result::Result<T, Error>;

//! Error taxonomy for the token pool client.
//!
//! Every failure path maps to its own variant so callers can tell a missing
//! pool from a dropped RPC connection without string matching.

use solana_program::pubkey::{Pubkey, PubkeyError};

/// Byte-level decode failures for pool records and instruction payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Truncated input: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("Trailing bytes: expected {expected} bytes, got {actual}")]
    TrailingBytes { expected: usize, actual: usize },
    #[error("Unknown instruction tag {0}")]
    UnknownTag(u8),
    #[error("Unsupported pool record version {0}")]
    UnsupportedVersion(u8),
    #[error("Serialization failed: {0}")]
    Serialize(String),
}

/// Program-address search failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DerivationError {
    #[error("No bump seed produced an off-curve address")]
    Exhausted,
    #[error("Invalid seeds: {0}")]
    InvalidSeeds(PubkeyError),
}

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Derivation error: {0}")]
    Derivation(#[from] DerivationError),
    #[error("RPC error: {0}")]
    Transient(String),
    #[error("Transaction rejected: {0}")]
    Rejected(String),
    #[error("Pool {0} does not exist")]
    NotFound(Pubkey),
    #[error(
        "Pool authority mismatch: derived {expected} (bump {expected_bump}), stored {stored} (bump {stored_bump})"
    )]
    Consistency {
        expected: Pubkey,
        expected_bump: u8,
        stored: Pubkey,
        stored_bump: u8,
    },
    #[error("Account {0} passed in more than one role")]
    DuplicateAccount(Pubkey),
    #[error("Secure randomness unavailable: {0}")]
    Randomness(String),
    #[error("Signing failed: {0}")]
    Signing(String),
}

impl PoolError {
    /// Whether retrying the same call may succeed. Only RPC failures qualify.
    pub fn is_transient(&self) -> bool {
        matches!(self, PoolError::Transient(_))
    }
}

//! Program identifiers the client targets, carried in a value rather than
//! read from globals.

use solana_program::{pubkey::Pubkey, sysvar};

use crate::constants::POOL_PROGRAM_ID;

/// External program identifiers the client targets. Passed explicitly to the
/// builders and the orchestrator so different deployments can coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub program_id: Pubkey,
    pub token_program_id: Pubkey,
    pub rent_sysvar_id: Pubkey,
}

impl PoolConfig {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            ..Self::default()
        }
    }

    pub fn with_token_program(mut self, token_program_id: Pubkey) -> Self {
        self.token_program_id = token_program_id;
        self
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            program_id: POOL_PROGRAM_ID,
            token_program_id: spl_token::id(),
            rent_sysvar_id: sysvar::rent::id(),
        }
    }
}

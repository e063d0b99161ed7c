//! Token pool instruction payloads and builders.
//!
//! Instructions:
//!   0 = Initialize
//!   1 = Swap { amount_in: u64 }
//!
//! Payloads are the program's Borsh encoding: a 1-byte variant tag followed
//! by the variant's fields in little-endian.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::config::PoolConfig;
use crate::constants::{IX_INITIALIZE, IX_SWAP};
use crate::error::{LayoutError, PoolError};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolInstruction {
    /// Initialize a freshly created pool account.
    Initialize,
    /// Deposit `amount_in` bank tokens and receive pool tokens.
    Swap { amount_in: u64 },
}

impl PoolInstruction {
    pub const INITIALIZE_LEN: usize = 1;
    pub const SWAP_LEN: usize = 1 + 8;

    pub fn packed_len(&self) -> usize {
        match self {
            PoolInstruction::Initialize => Self::INITIALIZE_LEN,
            PoolInstruction::Swap { .. } => Self::SWAP_LEN,
        }
    }

    pub fn pack(&self) -> Result<Vec<u8>, LayoutError> {
        borsh::to_vec(self).map_err(|e| LayoutError::Serialize(e.to_string()))
    }

    pub fn unpack(input: &[u8]) -> Result<Self, LayoutError> {
        let (&tag, _) = input.split_first().ok_or(LayoutError::Truncated {
            expected: Self::INITIALIZE_LEN,
            actual: 0,
        })?;

        let expected = match tag {
            IX_INITIALIZE => Self::INITIALIZE_LEN,
            IX_SWAP => Self::SWAP_LEN,
            _ => return Err(LayoutError::UnknownTag(tag)),
        };
        let truncated = LayoutError::Truncated {
            expected,
            actual: input.len(),
        };
        if input.len() < expected {
            return Err(truncated);
        }
        if input.len() > expected {
            return Err(LayoutError::TrailingBytes {
                expected,
                actual: input.len(),
            });
        }

        Self::try_from_slice(input).map_err(|_| truncated)
    }
}

/// Convert a caller-supplied amount into the program's `u64` field, refusing
/// anything that would truncate.
pub fn checked_amount<T>(amount: T) -> Result<u64, PoolError>
where
    T: TryInto<u64> + Copy + std::fmt::Display,
{
    amount
        .try_into()
        .map_err(|_| PoolError::Encoding(format!("amount {} out of range for u64", amount)))
}

/// Parse a base-10 token amount. Fractions, signs and overflow are rejected.
pub fn parse_amount(input: &str) -> Result<u64, PoolError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PoolError::Encoding(format!(
            "amount {:?} is not a non-negative integer",
            input
        )));
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| PoolError::Encoding(format!("amount {} out of range for u64", trimmed)))
}

fn ensure_distinct(accounts: &[&Pubkey]) -> Result<(), PoolError> {
    for (i, account) in accounts.iter().enumerate() {
        if accounts[..i].contains(account) {
            return Err(PoolError::DuplicateAccount(**account));
        }
    }
    Ok(())
}

// ── Instruction Builders ────────────────────────────────────────────────────

/// Initialize a pool.
///
/// Accounts:
///   0. `[signer, writable]` pool
///   1. `[]` authority PDA (seeds: [pool])
///   2. `[]` bank_mint
///   3. `[writable]` pool_mint
///   4. `[writable]` bank
///   5. `[]` rent sysvar
///   6. `[]` token_program
pub fn create_initialize_instruction(
    config: &PoolConfig,
    pool: &Pubkey,
    authority: &Pubkey,
    bank_mint: &Pubkey,
    pool_mint: &Pubkey,
    bank: &Pubkey,
) -> Result<Instruction, PoolError> {
    ensure_distinct(&[pool, authority, bank_mint, pool_mint, bank])?;

    Ok(Instruction {
        program_id: config.program_id,
        accounts: vec![
            AccountMeta::new(*pool, true),
            AccountMeta::new_readonly(*authority, false),
            AccountMeta::new_readonly(*bank_mint, false),
            AccountMeta::new(*pool_mint, false),
            AccountMeta::new(*bank, false),
            AccountMeta::new_readonly(config.rent_sysvar_id, false),
            AccountMeta::new_readonly(config.token_program_id, false),
        ],
        data: PoolInstruction::Initialize.pack()?,
    })
}

/// Swap bank tokens for pool tokens.
///
/// Accounts:
///   0. `[]` pool
///   1. `[]` pool authority PDA
///   2. `[signer]` user transfer authority (owner of sender)
///   3. `[writable]` pool_mint
///   4. `[writable]` bank
///   5. `[writable]` sender token account
///   6. `[writable]` recipient token account
///   7. `[]` token_program
#[allow(clippy::too_many_arguments)]
pub fn create_swap_instruction(
    config: &PoolConfig,
    pool: &Pubkey,
    pool_authority: &Pubkey,
    user_authority: &Pubkey,
    pool_mint: &Pubkey,
    bank: &Pubkey,
    sender: &Pubkey,
    recipient: &Pubkey,
    amount_in: u64,
) -> Result<Instruction, PoolError> {
    ensure_distinct(&[pool, pool_authority, pool_mint, bank, sender, recipient])?;

    Ok(Instruction {
        program_id: config.program_id,
        accounts: vec![
            AccountMeta::new_readonly(*pool, false),
            AccountMeta::new_readonly(*pool_authority, false),
            AccountMeta::new_readonly(*user_authority, true),
            AccountMeta::new(*pool_mint, false),
            AccountMeta::new(*bank, false),
            AccountMeta::new(*sender, false),
            AccountMeta::new(*recipient, false),
            AccountMeta::new_readonly(config.token_program_id, false),
        ],
        data: PoolInstruction::Swap { amount_in }.pack()?,
    })
}

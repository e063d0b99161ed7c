//! Program-derived addresses for pool authorities.
//!
//! The authority of a pool is derived from a single seed, the pool's own
//! address. The same seed ordering is used when the program embeds
//! `bump_seed` at initialization and when a client recomputes the authority
//! for a swap.

use solana_program::pubkey::{Pubkey, PubkeyError};

use crate::constants::MAX_BUMP_SEED;
use crate::error::{DerivationError, PoolError};
use crate::state::PoolRecord;

/// Search bumps from 255 down to 0 and return the first off-curve address.
pub fn derive_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8), DerivationError> {
    for bump in (0..=MAX_BUMP_SEED).rev() {
        let bump_seed = [bump];
        let mut seeds_with_bump = seeds.to_vec();
        seeds_with_bump.push(&bump_seed);

        match Pubkey::create_program_address(&seeds_with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            // On-curve candidate, try the next bump
            Err(PubkeyError::InvalidSeeds) => continue,
            Err(e) => return Err(DerivationError::InvalidSeeds(e)),
        }
    }
    Err(DerivationError::Exhausted)
}

pub fn find_pool_authority(program_id: &Pubkey, pool: &Pubkey) -> Result<(Pubkey, u8), DerivationError> {
    derive_address(&[pool.as_ref()], program_id)
}

/// Recompute the authority of `pool` and require it to match the stored
/// record, bump included.
pub fn verify_pool_authority(
    program_id: &Pubkey,
    pool: &Pubkey,
    record: &PoolRecord,
) -> Result<Pubkey, PoolError> {
    let (authority, bump_seed) = find_pool_authority(program_id, pool)?;
    if authority != record.authority || bump_seed != record.bump_seed {
        return Err(PoolError::Consistency {
            expected: authority,
            expected_bump: bump_seed,
            stored: record.authority,
            stored_bump: record.bump_seed,
        });
    }
    Ok(authority)
}

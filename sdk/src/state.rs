//! Pool account record, the 130-byte layout the pool program persists.
//!
//! Field offsets (Borsh, declaration order):
//!   0   version     u8
//!   1   authority   Pubkey
//!   33  bump_seed   u8
//!   34  bank_mint   Pubkey
//!   66  pool_mint   Pubkey
//!   98  bank        Pubkey
//!   130 (end)

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::constants::{POOL_ACCOUNT_LEN, POOL_RECORD_VERSION};
use crate::error::LayoutError;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolRecord {
    pub version: u8,          // 1
    /// Program-derived address that owns the bank and mints pool tokens.
    pub authority: Pubkey,    // 32
    pub bump_seed: u8,        // 1
    /// Mint of the tokens deposited into the bank.
    pub bank_mint: Pubkey,    // 32
    /// Mint of the tokens the pool issues.
    pub pool_mint: Pubkey,    // 32
    /// Token account holding deposits.
    pub bank: Pubkey,         // 32
}

impl PoolRecord {
    pub const LEN: usize = POOL_ACCOUNT_LEN;
    pub const CURRENT_VERSION: u8 = POOL_RECORD_VERSION;

    pub fn is_initialized(&self) -> bool {
        self.version == Self::CURRENT_VERSION
    }

    /// Encode into exactly `LEN` bytes.
    pub fn pack(&self) -> Result<Vec<u8>, LayoutError> {
        borsh::to_vec(self).map_err(|e| LayoutError::Serialize(e.to_string()))
    }

    /// Decode the first `LEN` bytes of `src`, whatever the version byte says.
    pub fn unpack(src: &[u8]) -> Result<Self, LayoutError> {
        let truncated = LayoutError::Truncated {
            expected: Self::LEN,
            actual: src.len(),
        };
        if src.len() < Self::LEN {
            return Err(truncated);
        }
        Self::deserialize(&mut &src[..Self::LEN]).map_err(|_| truncated)
    }

    /// Decode and reject records the program has not initialized at the
    /// current version.
    pub fn unpack_initialized(src: &[u8]) -> Result<Self, LayoutError> {
        let record = Self::unpack(src)?;
        if !record.is_initialized() {
            return Err(LayoutError::UnsupportedVersion(record.version));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PoolRecord {
        PoolRecord {
            version: PoolRecord::CURRENT_VERSION,
            authority: Pubkey::new_from_array([1u8; 32]),
            bump_seed: 254,
            bank_mint: Pubkey::new_from_array([2u8; 32]),
            pool_mint: Pubkey::new_from_array([3u8; 32]),
            bank: Pubkey::new_from_array([4u8; 32]),
        }
    }

    #[test]
    fn test_pool_record_size() {
        let serialized = borsh::to_vec(&sample_record()).unwrap();
        assert_eq!(serialized.len(), PoolRecord::LEN);
        assert_eq!(PoolRecord::LEN, 130);
    }

    #[test]
    fn test_field_offsets() {
        let packed = sample_record().pack().unwrap();
        assert_eq!(packed[0], 1);
        assert_eq!(packed[1..33], [1u8; 32]);
        assert_eq!(packed[33], 254);
        assert_eq!(packed[34..66], [2u8; 32]);
        assert_eq!(packed[66..98], [3u8; 32]);
        assert_eq!(packed[98..130], [4u8; 32]);
    }

    #[test]
    fn test_unpack_roundtrip() {
        let record = sample_record();
        assert_eq!(PoolRecord::unpack(&record.pack().unwrap()).unwrap(), record);

        // Any version decodes through the raw path
        let legacy = PoolRecord { version: 0, ..record };
        assert_eq!(PoolRecord::unpack(&legacy.pack().unwrap()).unwrap(), legacy);
    }

    #[test]
    fn test_unpack_truncated() {
        let packed = sample_record().pack().unwrap();
        for len in [0, 1, 33, 129] {
            assert_eq!(
                PoolRecord::unpack(&packed[..len]),
                Err(LayoutError::Truncated {
                    expected: 130,
                    actual: len
                })
            );
        }
    }

    #[test]
    fn test_unpack_ignores_extra_account_space() {
        let record = sample_record();
        let mut data = record.pack().unwrap();
        data.extend_from_slice(&[0xAA; 16]);
        assert_eq!(PoolRecord::unpack(&data).unwrap(), record);
    }

    #[test]
    fn test_unpack_initialized_rejects_zeroed_account() {
        let zeroed = [0u8; 130];
        assert_eq!(
            PoolRecord::unpack_initialized(&zeroed),
            Err(LayoutError::UnsupportedVersion(0))
        );
        assert!(PoolRecord::unpack_initialized(&sample_record().pack().unwrap()).is_ok());
    }
}

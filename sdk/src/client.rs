//! Pool orchestration — the create-pool and swap workflows.
//!
//! The client never retries and never logs: every failure is returned to the
//! caller as a typed [`PoolError`] and the workflow stops at the failing step.

use solana_program::{instruction::Instruction, pubkey::Pubkey, system_instruction};
use solana_sdk::signature::{keypair_from_seed, Keypair, Signature, Signer};
use zeroize::Zeroize;

use crate::config::PoolConfig;
use crate::constants::{MINT_ACCOUNT_LEN, POOL_ACCOUNT_LEN, TOKEN_ACCOUNT_LEN};
use crate::error::PoolError;
use crate::instruction::{checked_amount, create_initialize_instruction, create_swap_instruction};
use crate::pda::{find_pool_authority, verify_pool_authority};
use crate::state::PoolRecord;

/// Chain access consumed by the client. Implementations own blockhashes,
/// fees, confirmation and any retry policy.
pub trait PoolTransport {
    /// Raw account data, or `None` if the account does not exist.
    fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, PoolError>;

    fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, PoolError>;

    /// Submit `instructions` as one all-or-nothing transaction.
    fn submit_atomic(
        &self,
        instructions: &[Instruction],
        payer: &Pubkey,
        signers: &[&dyn Signer],
    ) -> Result<Signature, PoolError>;

    fn generate_keypair(&self) -> Result<Keypair, PoolError> {
        generate_keypair()
    }
}

/// Fresh keypair seeded from the OS RNG.
pub fn generate_keypair() -> Result<Keypair, PoolError> {
    let mut seed = [0u8; 32];
    getrandom::getrandom(&mut seed).map_err(|e| PoolError::Randomness(e.to_string()))?;
    let keypair = keypair_from_seed(&seed).map_err(|e| PoolError::Randomness(e.to_string()));
    seed.zeroize();
    keypair
}

/// Public identifiers of a newly created pool. The caller persists these;
/// the generated secret keys are dropped once the transaction lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPool {
    pub pool: Pubkey,
    pub pool_mint: Pubkey,
    pub bank: Pubkey,
    pub signature: Signature,
}

/// Lamports required for each account created alongside a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolRent {
    pub pool: u64,
    pub pool_mint: u64,
    pub bank: u64,
}

impl PoolRent {
    pub fn total(&self) -> u64 {
        self.pool
            .saturating_add(self.pool_mint)
            .saturating_add(self.bank)
    }
}

pub struct PoolClient<T> {
    transport: T,
    config: PoolConfig,
}

impl<T: PoolTransport> PoolClient<T> {
    pub fn new(transport: T, config: PoolConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch and decode a pool record. Absent accounts yield `Ok(None)`.
    pub fn get_pool_account(&self, pool: &Pubkey) -> Result<Option<PoolRecord>, PoolError> {
        match self.transport.get_account_data(pool)? {
            Some(data) => Ok(Some(PoolRecord::unpack_initialized(&data)?)),
            None => Ok(None),
        }
    }

    pub fn get_pool_rent(&self) -> Result<PoolRent, PoolError> {
        Ok(PoolRent {
            pool: self
                .transport
                .get_minimum_balance_for_rent_exemption(POOL_ACCOUNT_LEN)?,
            pool_mint: self
                .transport
                .get_minimum_balance_for_rent_exemption(MINT_ACCOUNT_LEN)?,
            bank: self
                .transport
                .get_minimum_balance_for_rent_exemption(TOKEN_ACCOUNT_LEN)?,
        })
    }

    /// The three account creations followed by `Initialize`. Order matters:
    /// the program expects its accounts to exist before it initializes them.
    pub fn create_pool_instructions(
        &self,
        payer: &Pubkey,
        bank_mint: &Pubkey,
        pool: &Pubkey,
        pool_mint: &Pubkey,
        bank: &Pubkey,
        rent: &PoolRent,
    ) -> Result<Vec<Instruction>, PoolError> {
        let (authority, _) = find_pool_authority(&self.config.program_id, pool)?;

        Ok(vec![
            system_instruction::create_account(
                payer,
                pool,
                rent.pool,
                POOL_ACCOUNT_LEN as u64,
                &self.config.program_id,
            ),
            system_instruction::create_account(
                payer,
                pool_mint,
                rent.pool_mint,
                MINT_ACCOUNT_LEN as u64,
                &self.config.token_program_id,
            ),
            system_instruction::create_account(
                payer,
                bank,
                rent.bank,
                TOKEN_ACCOUNT_LEN as u64,
                &self.config.token_program_id,
            ),
            create_initialize_instruction(&self.config, pool, &authority, bank_mint, pool_mint, bank)?,
        ])
    }

    /// Create and initialize a pool for deposits of `bank_mint`.
    pub fn create_pool(&self, payer: &dyn Signer, bank_mint: &Pubkey) -> Result<CreatedPool, PoolError> {
        let pool = self.transport.generate_keypair()?;
        let pool_mint = self.transport.generate_keypair()?;
        let bank = self.transport.generate_keypair()?;

        let rent = self.get_pool_rent()?;
        let instructions = self.create_pool_instructions(
            &payer.pubkey(),
            bank_mint,
            &pool.pubkey(),
            &pool_mint.pubkey(),
            &bank.pubkey(),
            &rent,
        )?;

        let signers: [&dyn Signer; 4] = [payer, &pool, &pool_mint, &bank];
        let signature = self
            .transport
            .submit_atomic(&instructions, &payer.pubkey(), &signers)?;

        Ok(CreatedPool {
            pool: pool.pubkey(),
            pool_mint: pool_mint.pubkey(),
            bank: bank.pubkey(),
            signature,
        })
    }

    /// Read the pool, check its authority, and build the swap instruction.
    pub fn swap_instruction(
        &self,
        pool: &Pubkey,
        owner: &Pubkey,
        sender: &Pubkey,
        recipient: &Pubkey,
        amount_in: u64,
    ) -> Result<Instruction, PoolError> {
        let record = self
            .get_pool_account(pool)?
            .ok_or(PoolError::NotFound(*pool))?;
        let pool_authority = verify_pool_authority(&self.config.program_id, pool, &record)?;

        create_swap_instruction(
            &self.config,
            pool,
            &pool_authority,
            owner,
            &record.pool_mint,
            &record.bank,
            sender,
            recipient,
            amount_in,
        )
    }

    /// Move `amount_in` bank tokens from `sender` into the pool and mint pool
    /// tokens to `recipient`. `owner` must own `sender`; `fee_payer` may be
    /// the same signer.
    pub fn swap<A>(
        &self,
        fee_payer: &dyn Signer,
        owner: &dyn Signer,
        pool: &Pubkey,
        sender: &Pubkey,
        recipient: &Pubkey,
        amount_in: A,
    ) -> Result<Signature, PoolError>
    where
        A: TryInto<u64> + Copy + std::fmt::Display,
    {
        let amount_in = checked_amount(amount_in)?;
        let ix = self.swap_instruction(pool, &owner.pubkey(), sender, recipient, amount_in)?;

        let signers = unique_signers(&[fee_payer, owner]);
        self.transport
            .submit_atomic(&[ix], &fee_payer.pubkey(), &signers)
    }
}

fn unique_signers<'a>(signers: &[&'a dyn Signer]) -> Vec<&'a dyn Signer> {
    let mut unique: Vec<&'a dyn Signer> = Vec::with_capacity(signers.len());
    for signer in signers {
        if !unique.iter().any(|s| s.pubkey() == signer.pubkey()) {
            unique.push(*signer);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_keypair_is_fresh() {
        let a = generate_keypair().unwrap();
        let b = generate_keypair().unwrap();
        assert_ne!(a.pubkey(), b.pubkey());
    }

    #[test]
    fn test_unique_signers() {
        let payer = Keypair::new();
        let owner = Keypair::new();

        let same: Vec<Pubkey> = unique_signers(&[&payer, &payer])
            .iter()
            .map(|s| s.pubkey())
            .collect();
        assert_eq!(same, vec![payer.pubkey()]);

        let distinct: Vec<Pubkey> = unique_signers(&[&payer, &owner])
            .iter()
            .map(|s| s.pubkey())
            .collect();
        assert_eq!(distinct, vec![payer.pubkey(), owner.pubkey()]);
    }

    #[test]
    fn test_pool_rent_total() {
        let rent = PoolRent {
            pool: 1_000,
            pool_mint: 2_000,
            bank: 3_000,
        };
        assert_eq!(rent.total(), 6_000);
    }
}

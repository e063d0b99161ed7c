//! Token pool program ID, account sizes, and record versioning.

use solana_program::{program_pack::Pack, pubkey::Pubkey};

// ── Program IDs ─────────────────────────────────────────────────────────────

/// Token pool program — holds `Initialize` and `Swap`.
pub const POOL_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("4fn9mVmVG4kLDi1iacUyGpbGUH9qrisNHHWd9PueJLiw");

// ── Instruction Discriminators ──────────────────────────────────────────────

pub const IX_INITIALIZE: u8 = 0;
pub const IX_SWAP: u8 = 1;

// ── Account Sizes ───────────────────────────────────────────────────────────

/// Pool record: version(1) + authority(32) + bump_seed(1) + bank_mint(32) + pool_mint(32) + bank(32).
pub const POOL_ACCOUNT_LEN: usize = 1 + 32 + 1 + 32 + 32 + 32; // 130

/// SPL token mint record size, owned by the token program.
pub const MINT_ACCOUNT_LEN: usize = spl_token::state::Mint::LEN;

/// SPL token account record size, owned by the token program.
pub const TOKEN_ACCOUNT_LEN: usize = spl_token::state::Account::LEN;

// ── Versioning ──────────────────────────────────────────────────────────────

/// Version the program writes into a freshly initialized pool record.
pub const POOL_RECORD_VERSION: u8 = 1;

/// Highest bump tried when deriving a program address.
pub const MAX_BUMP_SEED: u8 = u8::MAX;

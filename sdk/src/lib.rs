//! Token pool SDK — layout codec, instruction builders, authority derivation
//! and the create-pool / swap workflows for the token pool program.

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod instruction;
pub mod pda;
pub mod state;

pub use client::{CreatedPool, PoolClient, PoolRent, PoolTransport};
pub use config::PoolConfig;
pub use error::{DerivationError, LayoutError, PoolError};
pub use instruction::PoolInstruction;
pub use state::PoolRecord;

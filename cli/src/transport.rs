// RPC-backed pool transport. Read-only queries, including the blockhash fetch
// ahead of signing, retry transient failures with exponential backoff;
// transaction submission is attempted exactly once.

use solana_client::{client_error::ClientError, rpc_client::RpcClient};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Signature, Signer},
    transaction::Transaction,
};
use token_pool_sdk::{PoolError, PoolTransport};

const INITIAL_BACKOFF_MS: u64 = 500;
const MAX_BACKOFF_MS: u64 = 30_000;

pub struct RpcTransport {
    client: RpcClient,
    max_retries: u32,
}

impl RpcTransport {
    pub fn new(rpc_url: String, max_retries: u32) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed()),
            max_retries: max_retries.max(1),
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }

    pub fn get_balance(&self, address: &Pubkey) -> Result<u64, PoolError> {
        retry_with_backoff(|| self.client.get_balance(address).map_err(rpc_error), self.max_retries)
    }
}

impl PoolTransport for RpcTransport {
    fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, PoolError> {
        retry_with_backoff(
            || {
                self.client
                    .get_account_with_commitment(address, self.client.commitment())
                    .map(|response| response.value.map(|account| account.data))
                    .map_err(rpc_error)
            },
            self.max_retries,
        )
    }

    fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, PoolError> {
        retry_with_backoff(
            || {
                self.client
                    .get_minimum_balance_for_rent_exemption(data_len)
                    .map_err(rpc_error)
            },
            self.max_retries,
        )
    }

    fn submit_atomic(
        &self,
        instructions: &[Instruction],
        payer: &Pubkey,
        signers: &[&dyn Signer],
    ) -> Result<Signature, PoolError> {
        let recent_hash = retry_with_backoff(
            || self.client.get_latest_blockhash().map_err(rpc_error),
            self.max_retries,
        )?;

        let mut tx = Transaction::new_with_payer(instructions, Some(payer));
        tx.try_sign(signers, recent_hash)
            .map_err(|e| PoolError::Signing(e.to_string()))?;

        self.client
            .send_and_confirm_transaction(&tx)
            .map_err(rpc_error)
    }
}

/// Failures the cluster reported for the transaction itself are final;
/// everything else is treated as a transport hiccup.
fn rpc_error(err: ClientError) -> PoolError {
    match err.get_transaction_error() {
        Some(tx_err) => PoolError::Rejected(tx_err.to_string()),
        None => PoolError::Transient(err.to_string()),
    }
}

// ── Retry Logic ─────────────────────────────────────────────────────────────

fn retry_with_backoff<F, T>(mut f: F, max_retries: u32) -> Result<T, PoolError>
where
    F: FnMut() -> Result<T, PoolError>,
{
    let mut delay_ms = INITIAL_BACKOFF_MS;
    let mut attempt = 1;
    loop {
        match f() {
            Ok(val) => return Ok(val),
            Err(e) if e.is_transient() && attempt < max_retries => {
                eprintln!(
                    "[RETRY] Attempt {}/{} failed: {}. Retrying in {}ms...",
                    attempt, max_retries, e, delay_ms
                );
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                delay_ms = (delay_ms * 2).min(MAX_BACKOFF_MS);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

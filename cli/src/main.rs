// token-pool: command line client for the token pool program.
// Creates pools, swaps bank tokens into them, and inspects pool records.

mod transport;

use serde::{Deserialize, Serialize};
use solana_sdk::{
    native_token::lamports_to_sol,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signer},
};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use token_pool_sdk::{
    constants::POOL_PROGRAM_ID, instruction::parse_amount, CreatedPool, PoolClient, PoolConfig,
    PoolError,
};

use crate::transport::RpcTransport;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("Failed to write pool state to {path}: {reason}")]
    State { path: String, reason: String },
    #[error(
        "Fee payer, {payer}, has insufficient balance: {} SOL required, {} SOL available",
        sol(.required),
        sol(.available)
    )]
    InsufficientBalance {
        payer: Pubkey,
        required: u64,
        available: u64,
    },
}

fn sol(lamports: &u64) -> f64 {
    lamports_to_sol(*lamports)
}

// ── Pool State Persistence ──────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug)]
struct PoolState {
    pool: String,
    pool_mint: String,
    bank: String,
    bank_mint: String,
    program_id: String,
    signature: String,
}

impl PoolState {
    fn new(created: &CreatedPool, bank_mint: &Pubkey, program_id: &Pubkey) -> Self {
        Self {
            pool: created.pool.to_string(),
            pool_mint: created.pool_mint.to_string(),
            bank: created.bank.to_string(),
            bank_mint: bank_mint.to_string(),
            program_id: program_id.to_string(),
            signature: created.signature.to_string(),
        }
    }

    fn save(&self, path: &PathBuf) -> Result<(), CliError> {
        let state_error = |reason: String| CliError::State {
            path: path.display().to_string(),
            reason,
        };
        let json = serde_json::to_string_pretty(self).map_err(|e| state_error(e.to_string()))?;
        fs::write(path, json).map_err(|e| state_error(e.to_string()))
    }
}

// ── Config ──────────────────────────────────────────────────────────────────

struct CliConfig {
    rpc_url: String,
    payer: Keypair,
    owner: Option<Keypair>,
    pool_config: PoolConfig,
    state_file: PathBuf,
    max_retries: u32,
}

impl CliConfig {
    fn from_env() -> Result<Self, String> {
        let rpc_url =
            std::env::var("RPC_URL").unwrap_or_else(|_| "http://localhost:8899".to_string());

        let payer_path = std::env::var("PAYER_KEYPAIR_PATH")
            .map_err(|_| "PAYER_KEYPAIR_PATH is not set".to_string())?;
        let payer = read_keypair_file(&payer_path)
            .map_err(|e| format!("Failed to read keypair from {}: {}", payer_path, e))?;

        let owner = match std::env::var("OWNER_KEYPAIR_PATH") {
            Ok(path) => Some(
                read_keypair_file(&path)
                    .map_err(|e| format!("Failed to read keypair from {}: {}", path, e))?,
            ),
            Err(_) => None,
        };

        let program_id = Pubkey::from_str(
            &std::env::var("POOL_PROGRAM_ID").unwrap_or_else(|_| POOL_PROGRAM_ID.to_string()),
        )
        .map_err(|e| format!("Invalid POOL_PROGRAM_ID: {}", e))?;

        let mut pool_config = PoolConfig::new(program_id);
        if let Ok(token_program) = std::env::var("TOKEN_PROGRAM_ID") {
            let token_program_id = Pubkey::from_str(&token_program)
                .map_err(|e| format!("Invalid TOKEN_PROGRAM_ID: {}", e))?;
            pool_config = pool_config.with_token_program(token_program_id);
        }

        let state_file =
            PathBuf::from(std::env::var("POOL_STATE_FILE").unwrap_or_else(|_| "pool.json".to_string()));

        let max_retries: u32 = std::env::var("MAX_RETRIES")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|e| format!("Invalid MAX_RETRIES: {}", e))?;

        Ok(Self {
            rpc_url,
            payer,
            owner,
            pool_config,
            state_file,
            max_retries,
        })
    }

    fn owner(&self) -> &Keypair {
        self.owner.as_ref().unwrap_or(&self.payer)
    }
}

// ── Commands ────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum Command {
    CreatePool {
        bank_mint: Pubkey,
    },
    Swap {
        pool: Pubkey,
        sender: Pubkey,
        recipient: Pubkey,
        amount_in: u64,
    },
    ShowPool {
        pool: Pubkey,
    },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self, CliError> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["create-pool", bank_mint] => Ok(Command::CreatePool {
                bank_mint: parse_pubkey("BANK_MINT", bank_mint)?,
            }),
            ["swap", pool, sender, recipient, amount_in] => Ok(Command::Swap {
                pool: parse_pubkey("POOL", pool)?,
                sender: parse_pubkey("SENDER", sender)?,
                recipient: parse_pubkey("RECIPIENT", recipient)?,
                amount_in: parse_amount(amount_in)?,
            }),
            ["show-pool", pool] => Ok(Command::ShowPool {
                pool: parse_pubkey("POOL", pool)?,
            }),
            _ => Err(CliError::Usage("Unrecognized command".to_string())),
        }
    }
}

fn parse_pubkey(name: &str, value: &str) -> Result<Pubkey, CliError> {
    Pubkey::from_str(value).map_err(|e| CliError::Usage(format!("Invalid {}: {}", name, e)))
}

/// The payer funds all three rent-exempt accounts; refuse before submitting
/// when it cannot.
fn check_payer_balance(payer: &Pubkey, required: u64, available: u64) -> Result<(), CliError> {
    if available < required {
        return Err(CliError::InsufficientBalance {
            payer: *payer,
            required,
            available,
        });
    }
    Ok(())
}

fn command_create_pool(
    client: &PoolClient<RpcTransport>,
    config: &CliConfig,
    bank_mint: &Pubkey,
) -> Result<(), CliError> {
    println!("[CREATE_POOL] Bank mint: {}", bank_mint);

    let rent = client.get_pool_rent()?;
    let balance = client.transport().get_balance(&config.payer.pubkey())?;
    println!(
        "[CREATE_POOL] Rent required: {} SOL, payer balance: {} SOL",
        lamports_to_sol(rent.total()),
        lamports_to_sol(balance)
    );
    check_payer_balance(&config.payer.pubkey(), rent.total(), balance).map_err(|e| {
        eprintln!("[CREATE_POOL] {}", e);
        e
    })?;

    let created = client.create_pool(&config.payer, bank_mint).map_err(|e| {
        eprintln!("[CREATE_POOL] Failed: {}", e);
        e
    })?;

    println!("[CREATE_POOL] Pool:      {}", created.pool);
    println!("[CREATE_POOL] Pool mint: {}", created.pool_mint);
    println!("[CREATE_POOL] Bank:      {}", created.bank);
    println!("[CREATE_POOL] Signature: {}", created.signature);

    PoolState::new(&created, bank_mint, &client.config().program_id).save(&config.state_file)?;
    println!("[CREATE_POOL] Saved to {}", config.state_file.display());
    Ok(())
}

fn command_swap(
    client: &PoolClient<RpcTransport>,
    config: &CliConfig,
    pool: &Pubkey,
    sender: &Pubkey,
    recipient: &Pubkey,
    amount_in: u64,
) -> Result<(), CliError> {
    println!(
        "[SWAP] pool={} sender={} recipient={} amount={}",
        pool, sender, recipient, amount_in
    );

    let signature = client
        .swap(&config.payer, config.owner(), pool, sender, recipient, amount_in)
        .map_err(|e| {
            eprintln!("[SWAP] Failed: {}", e);
            e
        })?;

    println!("[SWAP] Signature: {}", signature);
    Ok(())
}

fn command_show_pool(client: &PoolClient<RpcTransport>, pool: &Pubkey) -> Result<(), CliError> {
    match client.get_pool_account(pool)? {
        Some(record) => {
            println!("[POOL] Address:   {}", pool);
            println!("[POOL] Version:   {}", record.version);
            println!("[POOL] Authority: {} (bump {})", record.authority, record.bump_seed);
            println!("[POOL] Bank mint: {}", record.bank_mint);
            println!("[POOL] Pool mint: {}", record.pool_mint);
            println!("[POOL] Bank:      {}", record.bank);
            Ok(())
        }
        None => Err(PoolError::NotFound(*pool).into()),
    }
}

fn run(config: CliConfig, command: Command) -> Result<(), CliError> {
    let transport = RpcTransport::new(config.rpc_url.clone(), config.max_retries);
    println!("RPC:             {}", transport.url());
    println!("Program:         {}", config.pool_config.program_id);
    println!("Payer:           {}", config.payer.pubkey());
    println!();

    let client = PoolClient::new(transport, config.pool_config);

    match command {
        Command::CreatePool { bank_mint } => command_create_pool(&client, &config, &bank_mint),
        Command::Swap {
            pool,
            sender,
            recipient,
            amount_in,
        } => command_swap(&client, &config, &pool, &sender, &recipient, amount_in),
        Command::ShowPool { pool } => command_show_pool(&client, &pool),
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  token-pool create-pool <BANK_MINT>");
    eprintln!("  token-pool swap <POOL> <SENDER> <RECIPIENT> <AMOUNT_IN>");
    eprintln!("  token-pool show-pool <POOL>");
    eprintln!();
    eprintln!("Required environment variables:");
    eprintln!("  PAYER_KEYPAIR_PATH  Path to fee payer keypair JSON file");
    eprintln!();
    eprintln!("Optional environment variables:");
    eprintln!("  RPC_URL             JSON RPC URL (default: http://localhost:8899)");
    eprintln!("  OWNER_KEYPAIR_PATH  Owner of the swap sender account (default: payer)");
    eprintln!("  POOL_PROGRAM_ID     Token pool program ID");
    eprintln!("  TOKEN_PROGRAM_ID    SPL token program ID");
    eprintln!("  POOL_STATE_FILE     Where create-pool saves the new pool (default: pool.json)");
    eprintln!("  MAX_RETRIES         Attempts for read-only RPC queries (default: 5)");
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() {
    println!("Token Pool CLI v0.1.0");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    let config = match CliConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[CONFIG] {}", e);
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config, command) {
        eprintln!("[ERROR] {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_create_pool() {
        let mint = Pubkey::new_unique();
        let command = Command::parse(&args(&["create-pool", &mint.to_string()])).unwrap();
        assert_eq!(command, Command::CreatePool { bank_mint: mint });
    }

    #[test]
    fn test_parse_swap() {
        let keys: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        let command = Command::parse(&args(&[
            "swap",
            &keys[0].to_string(),
            &keys[1].to_string(),
            &keys[2].to_string(),
            "100",
        ]))
        .unwrap();
        assert_eq!(
            command,
            Command::Swap {
                pool: keys[0],
                sender: keys[1],
                recipient: keys[2],
                amount_in: 100,
            }
        );
    }

    #[test]
    fn test_parse_swap_rejects_bad_amounts() {
        let pool = Pubkey::new_unique().to_string();
        for amount in ["-1", "1.5", "18446744073709551616"] {
            let result = Command::parse(&args(&["swap", &pool, &pool, &pool, amount]));
            assert!(matches!(result, Err(CliError::Pool(PoolError::Encoding(_)))));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        assert!(matches!(Command::parse(&args(&["withdraw"])), Err(CliError::Usage(_))));
        assert!(matches!(
            Command::parse(&args(&["show-pool", "not-a-key"])),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn test_check_payer_balance() {
        let payer = Pubkey::new_unique();
        assert!(check_payer_balance(&payer, 6_000, 6_000).is_ok());
        assert!(check_payer_balance(&payer, 6_000, 10_000).is_ok());

        let err = check_payer_balance(&payer, 3_000_000_000, 1_500_000_000).unwrap_err();
        assert!(matches!(
            err,
            CliError::InsufficientBalance { required: 3_000_000_000, available: 1_500_000_000, .. }
        ));
        let message = err.to_string();
        assert!(message.contains(&payer.to_string()));
        assert!(message.contains("3 SOL required"));
        assert!(message.contains("1.5 SOL available"));
    }

    #[test]
    fn test_pool_state_json() {
        let created = CreatedPool {
            pool: Pubkey::new_unique(),
            pool_mint: Pubkey::new_unique(),
            bank: Pubkey::new_unique(),
            signature: Default::default(),
        };
        let bank_mint = Pubkey::new_unique();
        let state = PoolState::new(&created, &bank_mint, &POOL_PROGRAM_ID);

        let json = serde_json::to_string(&state).unwrap();
        let decoded: PoolState = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.pool, created.pool.to_string());
        assert_eq!(decoded.bank_mint, bank_mint.to_string());
        assert_eq!(decoded.program_id, POOL_PROGRAM_ID.to_string());
    }
}

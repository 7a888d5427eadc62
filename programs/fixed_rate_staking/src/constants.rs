//! Program constants for the Fixed-Rate Staking program.
//!
//! This module defines PDA seeds, the fixed-point scales used by the reward
//! formula and the limits applied to pool parameters.

/// Seed for deriving the staking pool PDA
pub const STAKING_POOL_SEED: &[u8] = b"staking_pool";

/// Seed for deriving position PDAs
pub const POSITION_SEED: &[u8] = b"position";

/// Seed for deriving the stake vault PDA
pub const STAKE_VAULT_SEED: &[u8] = b"stake_vault";

/// Seed for deriving the reward vault PDA
pub const REWARD_VAULT_SEED: &[u8] = b"reward_vault";

/// Seed for deriving per-depositor receipt mint PDAs
pub const RECEIPT_MINT_SEED: &[u8] = b"receipt_mint";

/// Seed for deriving receipt index PDAs (one per token id)
pub const RECEIPT_INDEX_SEED: &[u8] = b"receipt_index";

/// Denominator of the simple-interest rate (5% = 5_000)
pub const RATE_DENOMINATOR: u128 = 100_000;

/// Fixed-point scale of the reward token price (0.01 = 1_000_000)
pub const PRICE_SCALE: u128 = 100_000_000;

/// Smallest accepted deposit, in whole stake tokens; scaled by the mint's decimals
pub const MINIMUM_STAKE_TOKENS: u64 = 1;

/// Maximum byte length of the receipt collection name
pub const MAX_NAME_LEN: usize = 32;

/// Maximum byte length of the receipt collection symbol
pub const MAX_SYMBOL_LEN: usize = 10;

/// Number of receipt units minted per position
pub const RECEIPT_SUPPLY: u64 = 1;

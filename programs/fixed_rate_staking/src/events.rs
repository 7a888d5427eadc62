use anchor_lang::prelude::*;

// ============================================================
// POOL LIFECYCLE EVENTS
// ============================================================

#[event]
pub struct PoolInitialized {
    pub staking_pool: Pubkey,
    pub owner: Pubkey,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub window_start: i64,
    pub window_end: i64,
    pub maturity: i64,
    pub interest_rate: u32,
    pub reward_token_price: u64,
    pub minimum_stake: u64,
}

#[event]
pub struct PoolActivated {
    pub staking_pool: Pubkey,
    pub owner: Pubkey,
}

#[event]
pub struct PoolDisabled {
    pub staking_pool: Pubkey,
    pub owner: Pubkey,
}

#[event]
pub struct OwnershipTransferred {
    pub staking_pool: Pubkey,
    pub previous_owner: Pubkey,
    pub new_owner: Pubkey,
}

// ============================================================
// POSITION EVENTS
// ============================================================

#[event]
pub struct Staked {
    pub staking_pool: Pubkey,
    pub depositor: Pubkey,
    pub token_id: u64,
    pub nonce: u64,
    pub amount: u64,
    pub reserved: u64,
    pub total_stake: u64,
    pub total_reward: u64,
    pub pool_reserved: u64,
}

#[event]
pub struct PositionClosed {
    pub staking_pool: Pubkey,
    pub depositor: Pubkey,
    pub token_id: u64,
    pub stake: u64,
    pub reward: u64,
    pub pool_reserved: u64,
}

// ============================================================
// FUNDING EVENTS
// ============================================================

#[event]
pub struct RewardsFunded {
    pub staking_pool: Pubkey,
    pub funder: Pubkey,
    pub amount: u64,
    pub vault_balance: u64,
}

#[event]
pub struct FundsSwept {
    pub staking_pool: Pubkey,
    pub token_account: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

//! Read-only instructions.
//!
//! Values are returned to the caller through Anchor return data, so clients
//! can simulate these instead of re-implementing pool arithmetic.

use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::error::StakingError;
use crate::state::StakingPool;

#[derive(Accounts)]
pub struct PoolView<'info> {
    pub staking_pool: Account<'info, StakingPool>,
}

#[derive(Accounts)]
pub struct TokenView<'info> {
    pub staking_pool: Account<'info, StakingPool>,

    /// Any token account held by the pool.
    #[account(
        constraint = token_account.owner == staking_pool.key() @ StakingError::InvalidVaultOwner
    )]
    pub token_account: Account<'info, TokenAccount>,
}

pub fn calculate_reward_handler(ctx: Context<PoolView>, amount: u64) -> Result<u64> {
    ctx.accounts.staking_pool.calculate_reward(amount)
}

pub fn balance_handler(ctx: Context<TokenView>) -> Result<u64> {
    Ok(ctx.accounts.token_account.amount)
}

pub fn remaining_handler(ctx: Context<TokenView>) -> Result<u64> {
    let token_account = &ctx.accounts.token_account;
    ctx.accounts
        .staking_pool
        .remaining(&token_account.key(), token_account.amount)
}

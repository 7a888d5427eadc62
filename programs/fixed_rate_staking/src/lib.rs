//! # Fixed-Rate Staking Program
//!
//! A fixed-term staking pool that pays simple interest in a second token.
//!
//! - Deposits of the stake token are accepted while the pool is active and
//!   the clock is inside `[window_start, window_end)`
//! - Each depositor holds one position, represented by a 0-decimal receipt
//!   token frozen in their wallet; re-stakes accumulate into the same position
//! - A `ReceiptIndex` account per token id resolves a receipt to its owner
//! - The reward is fixed at deposit time and reserved against the reward
//!   vault balance, so promised rewards are always funded
//! - Principal and reward are withdrawn together at or after `maturity`
//!
//! ## Reward Formula
//! `reward = stake * interest_rate * reward_token_price / (100_000 * 10^8)`
//!
//! ## Features
//! - Owner-controlled activation and disabling
//! - Permissionless reward funding
//! - Owner sweep of any unreserved balance
//! - Safe math with overflow protection

use anchor_lang::prelude::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;

use instructions::*;

#[program]
pub mod fixed_rate_staking {
    use super::*;

    /// Creates a staking pool and its two vaults.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for initialization
    /// * `params` - Window, maturity, rate, price and receipt labels
    ///
    /// # Errors
    /// Returns an error if the labels are too long or both mints are the same.
    pub fn initialize_pool(
        ctx: Context<InitializePool>,
        params: InitializePoolParams,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Opens the pool for deposits. Owner only.
    pub fn activate(ctx: Context<AdminControl>) -> Result<()> {
        instructions::admin::activate_handler(ctx)
    }

    /// Closes the pool for deposits. Owner only.
    ///
    /// # Errors
    /// Returns an error if the caller is not the owner or the pool is not active.
    pub fn disable(ctx: Context<AdminControl>) -> Result<()> {
        instructions::admin::disable_handler(ctx)
    }

    /// Stakes tokens, reserving the reward and minting a receipt on first deposit.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for depositing
    /// * `amount` - Amount of stake tokens to deposit
    ///
    /// # Errors
    /// Returns an error if:
    /// - The pool is not active
    /// - The deposit window has not started or has finished
    /// - Amount is below the minimum stake
    /// - The caller already withdrew their position
    /// - The reward would exceed the funded reward balance
    /// - The caller has insufficient stake tokens
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Withdraws principal and reward of a matured position and burns its receipt.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The caller has no position
    /// - The position is already closed
    /// - Maturity has not been reached
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::withdraw::handler(ctx)
    }

    /// Adds reward tokens to the reward vault.
    ///
    /// # Arguments
    /// * `ctx` - The context containing funding accounts
    /// * `amount` - Amount of reward tokens to fund
    pub fn fund_rewards(ctx: Context<FundRewards>, amount: u64) -> Result<()> {
        instructions::fund_rewards::handler(ctx, amount)
    }

    /// Moves the unreserved balance of a pool-owned token account to the owner.
    ///
    /// # Errors
    /// Returns an error if the caller is not the owner or nothing is unreserved.
    pub fn sweep(ctx: Context<Sweep>) -> Result<()> {
        instructions::sweep::handler(ctx)
    }

    /// Hands pool ownership to a new address. Owner only.
    pub fn transfer_ownership(ctx: Context<AdminControl>, new_owner: Pubkey) -> Result<()> {
        instructions::admin::transfer_ownership_handler(ctx, new_owner)
    }

    /// Returns the reward a deposit of `amount` would reserve.
    pub fn calculate_reward(ctx: Context<PoolView>, amount: u64) -> Result<u64> {
        instructions::views::calculate_reward_handler(ctx, amount)
    }

    /// Returns the balance of a pool-owned token account.
    pub fn balance(ctx: Context<TokenView>) -> Result<u64> {
        instructions::views::balance_handler(ctx)
    }

    /// Returns the part of a pool-owned balance not reserved for positions.
    pub fn remaining(ctx: Context<TokenView>) -> Result<u64> {
        instructions::views::remaining_handler(ctx)
    }
}

/// Fund rewards instruction handler.
///
/// Handles depositing reward tokens into the reward vault.
///
/// ## Security Guarantees
/// - Vault validation ensures correct PDA
/// - Mint validation prevents wrong token deposits
/// - Anyone can fund (no owner restriction)

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::RewardsFunded;
use crate::state::StakingPool;

/// Accounts required for funding rewards.
///
/// ## Security Notes
/// - Vault must match the pool's reward vault
/// - Funder token account must be for the reward mint
#[derive(Accounts)]
pub struct FundRewards<'info> {
    /// The funder (anyone can fund).
    pub funder: Signer<'info>,

    /// The staking pool.
    #[account(
        seeds = [
            STAKING_POOL_SEED,
            staking_pool.stake_mint.as_ref(),
            staking_pool.reward_mint.as_ref(),
            &staking_pool.seed.to_le_bytes()
        ],
        bump = staking_pool.bump,
        has_one = reward_vault @ StakingError::VaultMismatch,
        has_one = reward_mint @ StakingError::MintMismatch
    )]
    pub staking_pool: Box<Account<'info, StakingPool>>,

    /// The reward token mint.
    pub reward_mint: Box<Account<'info, Mint>>,

    /// Funder's reward token account.
    #[account(
        mut,
        constraint = funder_token_account.mint == reward_mint.key() @ StakingError::MintMismatch,
        constraint = funder_token_account.owner == funder.key() @ StakingError::InvalidTokenOwner
    )]
    pub funder_token_account: Box<Account<'info, TokenAccount>>,

    /// Pool's reward vault.
    #[account(
        mut,
        constraint = reward_vault.owner == staking_pool.key() @ StakingError::InvalidVaultOwner
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    /// Token program.
    pub token_program: Program<'info, Token>,
}

/// Fund the reward vault.
///
/// New funding immediately raises the ceiling on reward reservations.
///
/// # Arguments
/// * `ctx` - FundRewards accounts context
/// * `amount` - Amount of reward tokens to add
///
/// # Returns
/// Result indicating success or error
pub fn handler(ctx: Context<FundRewards>, amount: u64) -> Result<()> {
    require!(amount > 0, StakingError::ZeroAmount);

    let cpi_accounts = Transfer {
        from: ctx.accounts.funder_token_account.to_account_info(),
        to: ctx.accounts.reward_vault.to_account_info(),
        authority: ctx.accounts.funder.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);
    token::transfer(cpi_ctx, amount)?;

    // Reload vault to get updated balance
    ctx.accounts.reward_vault.reload()?;
    let vault_balance = ctx.accounts.reward_vault.amount;
    let staking_pool = &ctx.accounts.staking_pool;

    msg!("Reward vault funded with {} tokens", amount);
    msg!(
        "Vault balance: {}, unreserved: {}",
        vault_balance,
        staking_pool.remaining(&staking_pool.reward_vault, vault_balance)?
    );
    msg!("Funder: {}", ctx.accounts.funder.key());

    emit!(RewardsFunded {
        staking_pool: staking_pool.key(),
        funder: ctx.accounts.funder.key(),
        amount,
        vault_balance,
    });

    Ok(())
}

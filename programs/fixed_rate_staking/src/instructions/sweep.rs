//! Sweep instruction handler.
//!
//! Lets the owner pull whatever a pool-owned token account holds beyond the
//! reward reserved for open positions.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::FundsSwept;
use crate::state::StakingPool;

/// Accounts required for sweeping unreserved funds.
#[derive(Accounts)]
pub struct Sweep<'info> {
    /// The caller claiming to be the pool owner.
    pub authority: Signer<'info>,

    /// The staking pool.
    #[account(
        seeds = [
            STAKING_POOL_SEED,
            staking_pool.stake_mint.as_ref(),
            staking_pool.reward_mint.as_ref(),
            &staking_pool.seed.to_le_bytes()
        ],
        bump = staking_pool.bump
    )]
    pub staking_pool: Box<Account<'info, StakingPool>>,

    /// Any token account held by the pool, vaults included.
    #[account(
        mut,
        constraint = source.owner == staking_pool.key() @ StakingError::InvalidVaultOwner
    )]
    pub source: Box<Account<'info, TokenAccount>>,

    /// Owner's token account of the same mint.
    #[account(
        mut,
        constraint = destination.mint == source.mint @ StakingError::MintMismatch,
        constraint = destination.owner == authority.key() @ StakingError::InvalidTokenOwner
    )]
    pub destination: Box<Account<'info, TokenAccount>>,

    /// Token program.
    pub token_program: Program<'info, Token>,
}

/// Transfer the unreserved balance of `source` to the owner.
///
/// # Security
/// - Only pool.owner can call this
/// - The reward vault never drops below `total_reserved`
///
/// # Arguments
/// * `ctx` - Sweep accounts context
///
/// # Returns
/// Result indicating success or error
pub fn handler(ctx: Context<Sweep>) -> Result<()> {
    let staking_pool = &ctx.accounts.staking_pool;
    staking_pool.assert_owner(&ctx.accounts.authority.key())?;

    let source = &ctx.accounts.source;
    let amount = staking_pool.sweepable(&source.key(), source.amount)?;

    let stake_mint_key = staking_pool.stake_mint;
    let reward_mint_key = staking_pool.reward_mint;
    let seed = staking_pool.seed.to_le_bytes();
    let seeds = &[
        STAKING_POOL_SEED,
        stake_mint_key.as_ref(),
        reward_mint_key.as_ref(),
        &seed,
        &[staking_pool.bump],
    ];
    let signer_seeds = &[&seeds[..]];

    let cpi_accounts = Transfer {
        from: ctx.accounts.source.to_account_info(),
        to: ctx.accounts.destination.to_account_info(),
        authority: ctx.accounts.staking_pool.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
    token::transfer(cpi_ctx, amount)?;

    msg!("Swept {} tokens of mint {}", amount, source.mint);
    msg!("Still reserved for positions: {}", staking_pool.total_reserved);

    emit!(FundsSwept {
        staking_pool: staking_pool.key(),
        token_account: source.key(),
        mint: source.mint,
        amount,
    });

    Ok(())
}

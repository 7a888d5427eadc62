/// Admin instruction handlers.
///
/// Handles owner-only operations for the staking pool.
///
/// ## Security Guarantees
/// - All admin functions require signer == pool.owner
/// - PDA validation ensures correct pool
/// - Activation is independent of the deposit window

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::events::{OwnershipTransferred, PoolActivated, PoolDisabled};
use crate::state::StakingPool;

/// Accounts required for admin operations.
///
/// ## Security Notes
/// - Authority must be signer
/// - Authority is compared to pool.owner in the handler so the rejected
///   caller can be logged
/// - Pool PDA validated via seeds
#[derive(Accounts)]
pub struct AdminControl<'info> {
    /// The caller claiming to be the pool owner.
    pub authority: Signer<'info>,

    /// The staking pool to modify.
    #[account(
        mut,
        seeds = [
            STAKING_POOL_SEED,
            staking_pool.stake_mint.as_ref(),
            staking_pool.reward_mint.as_ref(),
            &staking_pool.seed.to_le_bytes()
        ],
        bump = staking_pool.bump
    )]
    pub staking_pool: Account<'info, StakingPool>,
}

/// Open the pool for deposits.
///
/// Activating an already active pool succeeds without changes.
pub fn activate_handler(ctx: Context<AdminControl>) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let staking_pool_key = ctx.accounts.staking_pool.key();
    let staking_pool = &mut ctx.accounts.staking_pool;
    staking_pool.assert_owner(&authority)?;

    let was_active = staking_pool.active;
    staking_pool.activate();

    msg!(
        "Staking pool ACTIVE (was {})",
        if was_active { "active" } else { "inactive" }
    );
    msg!("Owner: {}", authority);

    emit!(PoolActivated {
        staking_pool: staking_pool_key,
        owner: authority,
    });

    Ok(())
}

/// Close the pool for deposits.
///
/// # Security
/// - Only pool.owner can call this
/// - Withdrawals of matured positions remain available
pub fn disable_handler(ctx: Context<AdminControl>) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let staking_pool_key = ctx.accounts.staking_pool.key();
    let staking_pool = &mut ctx.accounts.staking_pool;
    staking_pool.assert_owner(&authority)?;

    staking_pool.disable()?;

    msg!("Staking pool DISABLED");
    msg!("Owner: {}", authority);

    emit!(PoolDisabled {
        staking_pool: staking_pool_key,
        owner: authority,
    });

    Ok(())
}

/// Transfer pool ownership to a new address.
///
/// # Security
/// - Only the current owner can call this
/// - New owner must be a valid pubkey (non-zero)
///
/// # Arguments
/// * `ctx` - AdminControl accounts context
/// * `new_owner` - New owner pubkey
pub fn transfer_ownership_handler(ctx: Context<AdminControl>, new_owner: Pubkey) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let staking_pool_key = ctx.accounts.staking_pool.key();
    let staking_pool = &mut ctx.accounts.staking_pool;
    staking_pool.assert_owner(&authority)?;

    require!(new_owner != Pubkey::default(), StakingError::InvalidNewOwner);

    let previous_owner = staking_pool.owner;
    staking_pool.owner = new_owner;

    msg!("Ownership transferred: {} -> {}", previous_owner, new_owner);

    emit!(OwnershipTransferred {
        staking_pool: staking_pool_key,
        previous_owner,
        new_owner,
    });

    Ok(())
}

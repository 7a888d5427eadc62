//! Withdraw instruction handler.
//!
//! Closes a matured position: pays out principal and reserved reward, then
//! thaws and burns the receipt.

use anchor_lang::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_spl::associated_token::{get_associated_token_address, AssociatedToken};
use anchor_spl::token::{
    self, Burn, CloseAccount, Mint, ThawAccount, Token, TokenAccount, Transfer,
};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::PositionClosed;
use crate::state::{Position, StakingPool};

/// Accounts required for withdrawing a position.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// The depositor closing their position.
    #[account(mut)]
    pub depositor: Signer<'info>,

    /// The staking pool.
    #[account(
        mut,
        seeds = [
            STAKING_POOL_SEED,
            staking_pool.stake_mint.as_ref(),
            staking_pool.reward_mint.as_ref(),
            &staking_pool.seed.to_le_bytes()
        ],
        bump = staking_pool.bump,
        has_one = stake_mint @ StakingError::MintMismatch,
        has_one = reward_mint @ StakingError::MintMismatch,
        has_one = stake_vault @ StakingError::VaultMismatch,
        has_one = reward_vault @ StakingError::VaultMismatch
    )]
    pub staking_pool: Box<Account<'info, StakingPool>>,

    /// Depositor's position.
    /// CHECK: May be uninitialized; the handler rejects that with NotValidPosition
    /// and otherwise deserializes it with owner and discriminator checks.
    #[account(
        mut,
        seeds = [POSITION_SEED, staking_pool.key().as_ref(), depositor.key().as_ref()],
        bump
    )]
    pub position: UncheckedAccount<'info>,

    /// Receipt mint of the position.
    /// CHECK: PDA address enforced by seeds; the token program validates it on burn.
    #[account(
        mut,
        seeds = [RECEIPT_MINT_SEED, staking_pool.key().as_ref(), depositor.key().as_ref()],
        bump
    )]
    pub receipt_mint: UncheckedAccount<'info>,

    /// Depositor's receipt token account.
    /// CHECK: Address enforced; the token program validates mint and owner on burn.
    #[account(
        mut,
        address = get_associated_token_address(&depositor.key(), &receipt_mint.key())
    )]
    pub receipt_account: UncheckedAccount<'info>,

    /// The stake token mint.
    pub stake_mint: Box<Account<'info, Mint>>,

    /// The reward token mint.
    pub reward_mint: Box<Account<'info, Mint>>,

    /// Depositor's token account receiving principal.
    #[account(
        mut,
        constraint = depositor_stake_account.mint == stake_mint.key() @ StakingError::MintMismatch,
        constraint = depositor_stake_account.owner == depositor.key() @ StakingError::InvalidTokenOwner
    )]
    pub depositor_stake_account: Box<Account<'info, TokenAccount>>,

    /// Depositor's token account receiving the reward (created if missing).
    #[account(
        init_if_needed,
        payer = depositor,
        associated_token::mint = reward_mint,
        associated_token::authority = depositor
    )]
    pub depositor_reward_account: Box<Account<'info, TokenAccount>>,

    /// Pool's stake vault.
    #[account(mut)]
    pub stake_vault: Box<Account<'info, TokenAccount>>,

    /// Pool's reward vault.
    #[account(mut)]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    /// System program.
    pub system_program: Program<'info, System>,

    /// Token program.
    pub token_program: Program<'info, Token>,

    /// Associated token program.
    pub associated_token_program: Program<'info, AssociatedToken>,
}

/// Withdraw a matured position.
///
/// # Arguments
/// * `ctx` - Withdraw accounts context
///
/// # Returns
/// Result indicating success or error
pub fn handler(ctx: Context<Withdraw>) -> Result<()> {
    let position_info = ctx.accounts.position.to_account_info();
    require!(!position_info.data_is_empty(), StakingError::NotValidPosition);
    require_keys_eq!(
        *position_info.owner,
        *ctx.program_id,
        ErrorCode::AccountOwnedByWrongProgram
    );
    let mut position = Position::load(&position_info.try_borrow_data()?)?;

    let clock = Clock::get()?;
    let (stake, reward) = ctx
        .accounts
        .staking_pool
        .record_withdrawal(&mut position, clock.unix_timestamp)?;

    let staking_pool = &ctx.accounts.staking_pool;
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

    // Principal back to the depositor
    let cpi_accounts = Transfer {
        from: ctx.accounts.stake_vault.to_account_info(),
        to: ctx.accounts.depositor_stake_account.to_account_info(),
        authority: ctx.accounts.staking_pool.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
    token::transfer(cpi_ctx, stake)?;

    // Reserved reward
    if reward > 0 {
        let cpi_accounts = Transfer {
            from: ctx.accounts.reward_vault.to_account_info(),
            to: ctx.accounts.depositor_reward_account.to_account_info(),
            authority: ctx.accounts.staking_pool.to_account_info(),
        };
        let cpi_program = ctx.accounts.token_program.to_account_info();
        let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
        token::transfer(cpi_ctx, reward)?;
    }

    // Retire the receipt and hand the account rent back
    let cpi_accounts = ThawAccount {
        account: ctx.accounts.receipt_account.to_account_info(),
        mint: ctx.accounts.receipt_mint.to_account_info(),
        authority: ctx.accounts.staking_pool.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    token::thaw_account(CpiContext::new_with_signer(
        cpi_program,
        cpi_accounts,
        signer_seeds,
    ))?;

    let cpi_accounts = Burn {
        mint: ctx.accounts.receipt_mint.to_account_info(),
        from: ctx.accounts.receipt_account.to_account_info(),
        authority: ctx.accounts.depositor.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    token::burn(CpiContext::new(cpi_program, cpi_accounts), RECEIPT_SUPPLY)?;

    let cpi_accounts = CloseAccount {
        account: ctx.accounts.receipt_account.to_account_info(),
        destination: ctx.accounts.depositor.to_account_info(),
        authority: ctx.accounts.depositor.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    token::close_account(CpiContext::new(cpi_program, cpi_accounts))?;

    position.store(&mut position_info.try_borrow_mut_data()?)?;

    msg!("Position #{} closed", position.token_id);
    msg!("Returned {} staked tokens and {} reward tokens", stake, reward);
    msg!("Total reserved: {}", ctx.accounts.staking_pool.total_reserved);

    emit!(PositionClosed {
        staking_pool: ctx.accounts.staking_pool.key(),
        depositor: ctx.accounts.depositor.key(),
        token_id: position.token_id,
        stake,
        reward,
        pool_reserved: ctx.accounts.staking_pool.total_reserved,
    });

    Ok(())
}

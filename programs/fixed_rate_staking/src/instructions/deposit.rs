//! Deposit instruction handler.
//!
//! Stakes tokens into the pool, reserving the fixed-rate reward and minting
//! the position receipt on a depositor's first deposit.
//!
//! The receipt account is frozen right after minting, so the single unit
//! stays with the depositor until withdraw thaws and burns it.

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{self, FreezeAccount, Mint, MintTo, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::Staked;
use crate::state::{Position, ReceiptIndex, StakingPool};

/// Accounts required for depositing.
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// The user staking tokens.
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
        has_one = stake_vault @ StakingError::VaultMismatch,
        has_one = reward_vault @ StakingError::VaultMismatch
    )]
    pub staking_pool: Box<Account<'info, StakingPool>>,

    /// Depositor's position (created on first deposit).
    #[account(
        init_if_needed,
        payer = depositor,
        space = Position::LEN,
        seeds = [POSITION_SEED, staking_pool.key().as_ref(), depositor.key().as_ref()],
        bump
    )]
    pub position: Box<Account<'info, Position>>,

    /// Receipt mint for this position; one unit is ever minted.
    #[account(
        init_if_needed,
        payer = depositor,
        seeds = [RECEIPT_MINT_SEED, staking_pool.key().as_ref(), depositor.key().as_ref()],
        bump,
        mint::decimals = 0,
        mint::authority = staking_pool,
        mint::freeze_authority = staking_pool
    )]
    pub receipt_mint: Box<Account<'info, Mint>>,

    /// Depositor's token account for the receipt.
    #[account(
        init_if_needed,
        payer = depositor,
        associated_token::mint = receipt_mint,
        associated_token::authority = depositor
    )]
    pub receipt_account: Box<Account<'info, TokenAccount>>,

    /// Index entry for the token id the next opened position receives.
    /// CHECK: PDA address enforced by seeds; created and written by the handler
    /// only when this deposit opens a position, untouched on re-stakes.
    #[account(
        mut,
        seeds = [
            RECEIPT_INDEX_SEED,
            staking_pool.key().as_ref(),
            &staking_pool.next_token_id.to_le_bytes()
        ],
        bump
    )]
    pub receipt_index: UncheckedAccount<'info>,

    /// The stake token mint.
    pub stake_mint: Box<Account<'info, Mint>>,

    /// Depositor's token account for the stake token.
    #[account(
        mut,
        constraint = depositor_stake_account.mint == stake_mint.key() @ StakingError::MintMismatch,
        constraint = depositor_stake_account.owner == depositor.key() @ StakingError::InvalidTokenOwner
    )]
    pub depositor_stake_account: Box<Account<'info, TokenAccount>>,

    /// Pool's stake vault.
    #[account(mut)]
    pub stake_vault: Box<Account<'info, TokenAccount>>,

    /// Pool's reward vault; its balance caps total reservations.
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    /// System program.
    pub system_program: Program<'info, System>,

    /// Token program.
    pub token_program: Program<'info, Token>,

    /// Associated token program.
    pub associated_token_program: Program<'info, AssociatedToken>,

    /// Rent sysvar.
    pub rent: Sysvar<'info, Rent>,
}

/// Deposit tokens into the pool.
///
/// # Arguments
/// * `ctx` - Deposit accounts context
/// * `amount` - Amount of stake tokens to deposit
///
/// # Returns
/// Result indicating success or error
pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let reward_balance = ctx.accounts.reward_vault.amount;
    let staking_pool_key = ctx.accounts.staking_pool.key();
    let depositor_key = ctx.accounts.depositor.key();
    let receipt_mint_key = ctx.accounts.receipt_mint.key();

    // Every check runs before any account is touched
    let outcome = {
        let staking_pool = &mut ctx.accounts.staking_pool;
        let position = &mut ctx.accounts.position;

        let outcome =
            staking_pool.record_deposit(position, amount, reward_balance, clock.unix_timestamp)?;

        if outcome.opened {
            position.owner = depositor_key;
            position.staking_pool = staking_pool_key;
            position.receipt_mint = receipt_mint_key;
            position.bump = ctx.bumps.position;
        }
        outcome
    };

    // Transfer tokens from depositor to vault
    let cpi_accounts = Transfer {
        from: ctx.accounts.depositor_stake_account.to_account_info(),
        to: ctx.accounts.stake_vault.to_account_info(),
        authority: ctx.accounts.depositor.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);
    token::transfer(cpi_ctx, amount)?;

    if outcome.opened {
        let stake_mint_key = ctx.accounts.staking_pool.stake_mint;
        let reward_mint_key = ctx.accounts.staking_pool.reward_mint;
        let seed = ctx.accounts.staking_pool.seed.to_le_bytes();
        let seeds = &[
            STAKING_POOL_SEED,
            stake_mint_key.as_ref(),
            reward_mint_key.as_ref(),
            &seed,
            &[ctx.accounts.staking_pool.bump],
        ];
        let signer_seeds = &[&seeds[..]];

        let cpi_accounts = MintTo {
            mint: ctx.accounts.receipt_mint.to_account_info(),
            to: ctx.accounts.receipt_account.to_account_info(),
            authority: ctx.accounts.staking_pool.to_account_info(),
        };
        let cpi_program = ctx.accounts.token_program.to_account_info();
        let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
        token::mint_to(cpi_ctx, RECEIPT_SUPPLY)?;

        let cpi_accounts = FreezeAccount {
            account: ctx.accounts.receipt_account.to_account_info(),
            mint: ctx.accounts.receipt_mint.to_account_info(),
            authority: ctx.accounts.staking_pool.to_account_info(),
        };
        let cpi_program = ctx.accounts.token_program.to_account_info();
        let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
        token::freeze_account(cpi_ctx)?;

        msg!("Receipt #{} minted to {}", outcome.token_id, depositor_key);

        let token_id_bytes = outcome.token_id.to_le_bytes();
        let index_seeds = &[
            RECEIPT_INDEX_SEED,
            staking_pool_key.as_ref(),
            &token_id_bytes,
            &[ctx.bumps.receipt_index],
        ];
        create_receipt_index(
            &ctx.accounts.depositor,
            &ctx.accounts.receipt_index,
            &ctx.accounts.system_program,
            &[&index_seeds[..]],
        )?;

        let index = ReceiptIndex {
            staking_pool: staking_pool_key,
            token_id: outcome.token_id,
            owner: depositor_key,
            position: ctx.accounts.position.key(),
            receipt_mint: receipt_mint_key,
            bump: ctx.bumps.receipt_index,
        };
        let index_info = ctx.accounts.receipt_index.to_account_info();
        let mut data = index_info.try_borrow_mut_data()?;
        index.try_serialize(&mut &mut data[..])?;
    }

    let position = &ctx.accounts.position;
    let staking_pool = &ctx.accounts.staking_pool;

    msg!("Staked {} tokens (deposit #{})", amount, outcome.nonce);
    msg!(
        "Position #{}: stake {}, reward {}",
        position.token_id,
        position.stake,
        position.reward
    );
    msg!("Total reserved: {}", staking_pool.total_reserved);

    emit!(Staked {
        staking_pool: staking_pool_key,
        depositor: depositor_key,
        token_id: outcome.token_id,
        nonce: outcome.nonce,
        amount,
        reserved: outcome.reserved,
        total_stake: position.stake,
        total_reward: position.reward,
        pool_reserved: staking_pool.total_reserved,
    });

    Ok(())
}

/// Allocates the receipt index PDA owned by this program.
///
/// The address may already hold lamports sent by anyone, in which case
/// `create_account` would fail; top it up and allocate/assign instead.
fn create_receipt_index<'info>(
    payer: &Signer<'info>,
    receipt_index: &UncheckedAccount<'info>,
    system: &Program<'info, System>,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let required = Rent::get()?.minimum_balance(ReceiptIndex::LEN);
    let current = receipt_index.lamports();

    if current == 0 {
        let cpi_accounts = system_program::CreateAccount {
            from: payer.to_account_info(),
            to: receipt_index.to_account_info(),
        };
        let cpi_ctx =
            CpiContext::new_with_signer(system.to_account_info(), cpi_accounts, signer_seeds);
        return system_program::create_account(
            cpi_ctx,
            required,
            ReceiptIndex::LEN as u64,
            &crate::ID,
        );
    }

    let shortfall = required.saturating_sub(current);
    if shortfall > 0 {
        let cpi_accounts = system_program::Transfer {
            from: payer.to_account_info(),
            to: receipt_index.to_account_info(),
        };
        system_program::transfer(
            CpiContext::new(system.to_account_info(), cpi_accounts),
            shortfall,
        )?;
    }

    let cpi_accounts = system_program::Allocate {
        account_to_allocate: receipt_index.to_account_info(),
    };
    system_program::allocate(
        CpiContext::new_with_signer(system.to_account_info(), cpi_accounts, signer_seeds),
        ReceiptIndex::LEN as u64,
    )?;

    let cpi_accounts = system_program::Assign {
        account_to_assign: receipt_index.to_account_info(),
    };
    system_program::assign(
        CpiContext::new_with_signer(system.to_account_info(), cpi_accounts, signer_seeds),
        &crate::ID,
    )
}

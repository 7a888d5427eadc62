/// Initialize instruction handler.
///
/// Creates and configures a new fixed-rate staking pool.
///
/// ## Security Guarantees
/// - Stake and reward vaults are PDAs owned by the staking pool
/// - Both mints are locked to pool state permanently
/// - The pool starts inactive; the owner must activate it before deposits

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::PoolInitialized;
use crate::state::StakingPool;

/// Immutable pool configuration supplied at creation.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitializePoolParams {
    /// Distinguishes several pools over the same mint pair
    pub seed: u64,
    pub name: String,
    pub symbol: String,
    pub window_start: i64,
    pub window_end: i64,
    pub maturity: i64,
    /// Simple-interest rate over `RATE_DENOMINATOR`
    pub interest_rate: u32,
    /// Reward tokens per stake token, scaled by `PRICE_SCALE`
    pub reward_token_price: u64,
}

impl InitializePoolParams {
    /// Window ordering is not checked; deposit and withdraw compare against
    /// the clock on every call.
    pub fn validate(&self) -> Result<()> {
        require!(self.name.len() <= MAX_NAME_LEN, StakingError::NameTooLong);
        require!(self.symbol.len() <= MAX_SYMBOL_LEN, StakingError::SymbolTooLong);
        Ok(())
    }
}

/// Accounts required for pool initialization.
///
/// ## Security Notes
/// - `stake_vault` and `reward_vault` are PDAs with `staking_pool` as authority
/// - Seeds ensure these accounts cannot be swapped or replaced
#[derive(Accounts)]
#[instruction(params: InitializePoolParams)]
pub struct InitializePool<'info> {
    /// The pool owner.
    /// SECURITY: Stored in pool state; gates activate/disable/sweep.
    #[account(mut)]
    pub authority: Signer<'info>,

    /// The staking pool account to be created.
    /// SECURITY: PDA derived from both mints and the caller-chosen seed.
    #[account(
        init,
        payer = authority,
        space = StakingPool::LEN,
        seeds = [
            STAKING_POOL_SEED,
            stake_mint.key().as_ref(),
            reward_mint.key().as_ref(),
            &params.seed.to_le_bytes()
        ],
        bump
    )]
    pub staking_pool: Box<Account<'info, StakingPool>>,

    /// The mint depositors stake.
    pub stake_mint: Box<Account<'info, Mint>>,

    /// The mint rewards are paid in.
    #[account(
        constraint = reward_mint.key() != stake_mint.key() @ StakingError::IdenticalMints
    )]
    pub reward_mint: Box<Account<'info, Mint>>,

    /// The vault that will hold staked principal.
    #[account(
        init,
        payer = authority,
        seeds = [STAKE_VAULT_SEED, staking_pool.key().as_ref()],
        bump,
        token::mint = stake_mint,
        token::authority = staking_pool
    )]
    pub stake_vault: Box<Account<'info, TokenAccount>>,

    /// The vault that will hold reward funding.
    #[account(
        init,
        payer = authority,
        seeds = [REWARD_VAULT_SEED, staking_pool.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = staking_pool
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    /// System program for account creation.
    pub system_program: Program<'info, System>,

    /// Token program for token account operations.
    pub token_program: Program<'info, Token>,

    /// Rent sysvar for rent-exempt calculations.
    pub rent: Sysvar<'info, Rent>,
}

/// Initialize a new staking pool.
///
/// # Arguments
/// * `ctx` - InitializePool accounts context
/// * `params` - Pool configuration
///
/// # Returns
/// Result indicating success or error
pub fn handler(ctx: Context<InitializePool>, params: InitializePoolParams) -> Result<()> {
    params.validate()?;

    let staking_pool_key = ctx.accounts.staking_pool.key();
    let staking_pool = &mut ctx.accounts.staking_pool;
    let clock = Clock::get()?;

    staking_pool.owner = ctx.accounts.authority.key();
    staking_pool.stake_mint = ctx.accounts.stake_mint.key();
    staking_pool.reward_mint = ctx.accounts.reward_mint.key();
    staking_pool.stake_vault = ctx.accounts.stake_vault.key();
    staking_pool.reward_vault = ctx.accounts.reward_vault.key();
    staking_pool.seed = params.seed;
    staking_pool.name = params.name;
    staking_pool.symbol = params.symbol;
    staking_pool.window_start = params.window_start;
    staking_pool.window_end = params.window_end;
    staking_pool.maturity = params.maturity;
    staking_pool.interest_rate = params.interest_rate;
    staking_pool.reward_token_price = params.reward_token_price;
    staking_pool.minimum_stake =
        StakingPool::minimum_stake_for(ctx.accounts.stake_mint.decimals)?;
    staking_pool.active = false;
    staking_pool.total_reserved = 0;
    staking_pool.next_token_id = 1;
    staking_pool.open_positions = 0;
    staking_pool.created_at = clock.unix_timestamp;

    staking_pool.bump = ctx.bumps.staking_pool;
    staking_pool.stake_vault_bump = ctx.bumps.stake_vault;
    staking_pool.reward_vault_bump = ctx.bumps.reward_vault;

    msg!("Staking pool {} ({}) initialized", staking_pool.name, staking_pool.symbol);
    msg!("Owner: {}", staking_pool.owner);
    msg!(
        "Window: [{}, {}), maturity: {}",
        staking_pool.window_start,
        staking_pool.window_end,
        staking_pool.maturity
    );
    msg!(
        "Rate: {}/{}, reward price: {}/{}",
        staking_pool.interest_rate,
        RATE_DENOMINATOR,
        staking_pool.reward_token_price,
        PRICE_SCALE
    );
    msg!("Minimum stake: {}", staking_pool.minimum_stake);

    emit!(PoolInitialized {
        staking_pool: staking_pool_key,
        owner: staking_pool.owner,
        stake_mint: staking_pool.stake_mint,
        reward_mint: staking_pool.reward_mint,
        window_start: staking_pool.window_start,
        window_end: staking_pool.window_end,
        maturity: staking_pool.maturity,
        interest_rate: staking_pool.interest_rate,
        reward_token_price: staking_pool.reward_token_price,
        minimum_stake: staking_pool.minimum_stake,
    });

    Ok(())
}

//! Error types for the Fixed-Rate Staking program.
//!
//! This module defines all custom error codes that can be returned by the program.
//! Codes are assigned sequentially from 6000 (Anchor's custom error offset).
//!
//! ## Error Code Ranges
//! - 6000-6003: Input validation errors
//! - 6004-6007: Lifecycle (activation/time window) errors
//! - 6008-6010: Position state errors
//! - 6011-6013: Accounting errors
//! - 6014-6016: Math/overflow errors
//! - 6017-6018: Authorization errors
//! - 6019-6022: Account validation errors

use anchor_lang::prelude::*;

/// Custom error codes for the Fixed-Rate Staking program.
#[error_code]
pub enum StakingError {
    // ========== Input Validation Errors ==========

    /// [6000] Receipt collection name is longer than `MAX_NAME_LEN`.
    #[msg("Pool name exceeds 32 bytes")]
    NameTooLong,

    /// [6001] Receipt collection symbol is longer than `MAX_SYMBOL_LEN`.
    #[msg("Pool symbol exceeds 10 bytes")]
    SymbolTooLong,

    /// [6002] Stake and reward mints must differ.
    #[msg("Stake mint and reward mint must be different")]
    IdenticalMints,

    /// [6003] Cannot fund with zero amount.
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    // ========== Lifecycle Errors ==========

    /// [6004] The pool has not been activated, or has been disabled.
    #[msg("err-not-active: pool is not active")]
    NotActive,

    /// [6005] The deposit window has not opened yet.
    #[msg("err-not-started: deposit window has not started")]
    NotStarted,

    /// [6006] The deposit window has closed.
    #[msg("err-finished: deposit window has finished")]
    Finished,

    /// [6007] Positions cannot be withdrawn before maturity.
    #[msg("err-maturity: position has not matured")]
    BeforeMaturity,

    // ========== Position State Errors ==========

    /// [6008] A withdrawn position cannot receive new deposits.
    #[msg("err-already-claimed: position was already withdrawn")]
    AlreadyClaimed,

    /// [6009] A withdrawn position cannot be withdrawn again.
    #[msg("err-closed: position is closed")]
    Closed,

    /// [6010] The caller never opened a position in this pool.
    #[msg("err-not-valid: no position for this account")]
    NotValidPosition,

    // ========== Accounting Errors ==========

    /// [6011] Reserving this reward would exceed the reward vault balance.
    #[msg("err-overlimit: reward liability would exceed funded rewards")]
    OverLimit,

    /// [6012] Deposit is smaller than the pool's `minimum_stake`.
    #[msg("err-not-min: deposit below minimum stake")]
    BelowMinimum,

    /// [6013] Nothing unreserved is left to sweep.
    #[msg("err-no-funds: nothing available to withdraw")]
    NoFunds,

    // ========== Math/Overflow Errors ==========

    /// [6014] Arithmetic overflow occurred during calculation.
    #[msg("Arithmetic overflow occurred during calculation")]
    MathOverflow,

    /// [6015] Arithmetic underflow occurred during calculation.
    #[msg("Arithmetic underflow occurred during calculation")]
    MathUnderflow,

    /// [6016] Integer conversion failed (value out of range).
    #[msg("Integer conversion failed - value out of range")]
    ConversionOverflow,

    // ========== Authorization Errors ==========

    /// [6017] Caller is not the pool owner.
    #[msg("Unauthorized: caller is not the pool owner")]
    Unauthorized,

    /// [6018] Ownership cannot be handed to the default pubkey.
    #[msg("New owner must not be the default pubkey")]
    InvalidNewOwner,

    // ========== Account Validation Errors ==========

    /// [6019] Token account mint does not match the expected mint.
    #[msg("Token mint mismatch - wrong token for this pool")]
    MintMismatch,

    /// [6020] The provided vault does not match the pool's vault.
    #[msg("Vault address mismatch")]
    VaultMismatch,

    /// [6021] Token account is not owned by the signer.
    #[msg("Token account owner does not match signer")]
    InvalidTokenOwner,

    /// [6022] Token account is not held by the staking pool PDA.
    #[msg("Token account must be owned by the staking pool PDA")]
    InvalidVaultOwner,
}

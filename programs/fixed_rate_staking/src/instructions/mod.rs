//! Instruction handlers for the Fixed-Rate Staking program.
//!
//! This module contains all instruction implementations.

pub mod admin;
pub mod deposit;
pub mod fund_rewards;
pub mod initialize;
pub mod sweep;
pub mod views;
pub mod withdraw;

pub use admin::*;
pub use deposit::*;
pub use fund_rewards::*;
pub use initialize::*;
pub use sweep::*;
pub use views::*;
pub use withdraw::*;

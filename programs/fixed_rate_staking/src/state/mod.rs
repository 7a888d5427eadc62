//! State structures for the Fixed-Rate Staking program.
//!
//! This module defines all account structures used to store program state.

pub mod position;
pub mod receipt_index;
pub mod staking_pool;

pub use position::*;
pub use receipt_index::*;
pub use staking_pool::*;

use anchor_lang::prelude::*;

/// Maps a receipt `token_id` back to its holder.
///
/// Written once when the position opens and never changed afterwards;
/// `Position::open` tells whether the receipt is still live.
#[account]
#[derive(Default, Debug, PartialEq, Eq)]
pub struct ReceiptIndex {
    pub staking_pool: Pubkey,
    pub token_id: u64,
    pub owner: Pubkey,
    pub position: Pubkey,
    pub receipt_mint: Pubkey,
    pub bump: u8,
}

impl ReceiptIndex {
    pub const LEN: usize = 8 + 32 + 8 + (32 * 3) + 1;
}

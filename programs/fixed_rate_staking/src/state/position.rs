use anchor_lang::prelude::*;

use crate::error::StakingError;

/// One depositor's stake in one pool, backed by a single receipt token.
///
/// A zero `token_id` means the account has never been used; ids are handed
/// out from 1.
#[account]
#[derive(Default, Debug, PartialEq, Eq)]
pub struct Position {
    pub owner: Pubkey,
    pub staking_pool: Pubkey,
    pub receipt_mint: Pubkey,

    pub token_id: u64,
    /// Number of deposits made into this position
    pub nonce: u64,
    pub stake: u64,
    pub reward: u64,

    pub open: bool,

    pub opened_at: i64,
    pub closed_at: i64,

    pub bump: u8,
}

impl Position {
    pub const LEN: usize = 8 + (32 * 3) + (8 * 4) + 1 + (8 * 2) + 1;

    pub fn exists(&self) -> bool {
        self.token_id != 0
    }

    /// Withdrawn positions stay closed for good.
    pub fn is_closed(&self) -> bool {
        self.exists() && !self.open
    }

    pub fn is_mature(&self, now: i64, maturity: i64) -> bool {
        now >= maturity
    }

    /// Reads a position from raw account data. An empty account means the
    /// depositor never opened a position.
    pub fn load(data: &[u8]) -> Result<Self> {
        require!(!data.is_empty(), StakingError::NotValidPosition);
        Position::try_deserialize(&mut &data[..])
    }

    /// Writes the position, discriminator included, back into account data.
    pub fn store(&self, data: &mut [u8]) -> Result<()> {
        self.try_serialize(&mut &mut data[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::{Error, ErrorCode};

    #[test]
    fn test_fresh_position_does_not_exist() {
        let position = Position::default();
        assert!(!position.exists());
        assert!(!position.is_closed());
    }

    #[test]
    fn test_open_and_closed() {
        let mut position = Position {
            token_id: 3,
            nonce: 1,
            open: true,
            ..Default::default()
        };
        assert!(position.exists());
        assert!(!position.is_closed());

        position.open = false;
        assert!(position.is_closed());
    }

    #[test]
    fn test_load_empty_account() {
        let expected: Error = StakingError::NotValidPosition.into();
        assert_eq!(Position::load(&[]).unwrap_err(), expected);
    }

    #[test]
    fn test_store_then_load_closed_position() {
        let position = Position {
            owner: Pubkey::new_unique(),
            staking_pool: Pubkey::new_unique(),
            receipt_mint: Pubkey::new_unique(),
            token_id: 7,
            nonce: 2,
            stake: 2_000,
            reward: 10,
            open: false,
            opened_at: 100,
            closed_at: 200,
            bump: 254,
        };
        let mut data = vec![0u8; Position::LEN];
        position.store(&mut data).unwrap();

        assert_eq!(Position::load(&data).unwrap(), position);
    }

    #[test]
    fn test_load_rejects_foreign_data() {
        let mut data = vec![0u8; Position::LEN];
        data[..8].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let expected: Error = ErrorCode::AccountDiscriminatorMismatch.into();
        assert_eq!(Position::load(&data).unwrap_err(), expected);
    }

    #[test]
    fn test_store_into_short_buffer_fails() {
        let mut data = vec![0u8; 8];
        assert!(Position::default().store(&mut data).is_err());
    }

    #[test]
    fn test_is_mature_boundary() {
        let position = Position::default();
        assert!(!position.is_mature(99, 100));
        assert!(position.is_mature(100, 100));
        assert!(position.is_mature(101, 100));
    }
}

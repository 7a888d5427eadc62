use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::state::Position;

#[account]
#[derive(Default)]
pub struct StakingPool {
    pub owner: Pubkey,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub stake_vault: Pubkey,
    pub reward_vault: Pubkey,

    pub seed: u64,
    pub name: String,
    pub symbol: String,

    pub window_start: i64,
    pub window_end: i64,
    pub maturity: i64,

    /// Simple-interest rate over `RATE_DENOMINATOR` (exposed to clients as SI_RATE)
    pub interest_rate: u32,
    /// Reward tokens per stake token, scaled by `PRICE_SCALE`
    pub reward_token_price: u64,
    /// Smallest accepted deposit in stake token base units
    pub minimum_stake: u64,

    pub active: bool,
    pub total_reserved: u64,
    pub next_token_id: u64,
    pub open_positions: u64,

    pub created_at: i64,

    pub stake_vault_bump: u8,
    pub reward_vault_bump: u8,
    pub bump: u8,
}

/// What a successful deposit did to the position and the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositOutcome {
    pub token_id: u64,
    pub nonce: u64,
    /// Reward reserved by this deposit alone
    pub reserved: u64,
    /// True when the deposit opened a new position (receipt must be minted)
    pub opened: bool,
}

impl StakingPool {
    pub const LEN: usize = 8
        + (32 * 5)
        + 8
        + (4 + MAX_NAME_LEN)
        + (4 + MAX_SYMBOL_LEN)
        + (8 * 3)
        + 4
        + (8 * 2)
        + 1
        + (8 * 3)
        + 8
        + 3;

    /// `MINIMUM_STAKE_TOKENS` whole tokens expressed in base units of a mint
    /// with `decimals` decimals.
    pub fn minimum_stake_for(decimals: u8) -> Result<u64> {
        10u64
            .checked_pow(decimals as u32)
            .and_then(|unit| unit.checked_mul(MINIMUM_STAKE_TOKENS))
            .ok_or_else(|| error!(StakingError::MathOverflow))
    }

    pub fn assert_owner(&self, caller: &Pubkey) -> Result<()> {
        if *caller != self.owner {
            msg!("Unauthorized account: {}", caller);
            return Err(error!(StakingError::Unauthorized));
        }
        Ok(())
    }

    /// Redundant activation is a no-op.
    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn disable(&mut self) -> Result<()> {
        require!(self.active, StakingError::NotActive);
        self.active = false;
        Ok(())
    }

    /// Deposits are accepted only while active and inside `[window_start, window_end)`.
    pub fn check_deposit_window(&self, now: i64) -> Result<()> {
        require!(self.active, StakingError::NotActive);
        require!(now >= self.window_start, StakingError::NotStarted);
        require!(now < self.window_end, StakingError::Finished);
        Ok(())
    }

    /// Simple interest on `amount`, converted into reward token units.
    ///
    /// reward = amount * rate * price / (RATE_DENOMINATOR * PRICE_SCALE)
    ///
    /// Every multiplication happens before the single division so that the
    /// only rounding is the final floor.
    pub fn calculate_reward(&self, amount: u64) -> Result<u64> {
        let reward = (amount as u128)
            .checked_mul(self.interest_rate as u128)
            .ok_or(StakingError::MathOverflow)?
            .checked_mul(self.reward_token_price as u128)
            .ok_or(StakingError::MathOverflow)?
            .checked_div(
                RATE_DENOMINATOR
                    .checked_mul(PRICE_SCALE)
                    .ok_or(StakingError::MathOverflow)?,
            )
            .ok_or(StakingError::MathOverflow)?;

        u64::try_from(reward).map_err(|_| error!(StakingError::ConversionOverflow))
    }

    /// Balance of a pool-owned token account that is not promised to any position.
    ///
    /// Only the reward vault carries reservations; every other account is
    /// entirely unreserved.
    pub fn remaining(&self, token_account: &Pubkey, balance: u64) -> Result<u64> {
        if *token_account != self.reward_vault {
            return Ok(balance);
        }
        balance
            .checked_sub(self.total_reserved)
            .ok_or_else(|| error!(StakingError::MathUnderflow))
    }

    /// What the owner may sweep out of `token_account`.
    pub fn sweepable(&self, token_account: &Pubkey, balance: u64) -> Result<u64> {
        let amount = self.remaining(token_account, balance)?;
        require!(amount > 0, StakingError::NoFunds);
        Ok(amount)
    }

    pub fn allocate_token_id(&mut self) -> Result<u64> {
        let token_id = self.next_token_id;
        self.next_token_id = token_id
            .checked_add(1)
            .ok_or(StakingError::MathOverflow)?;
        Ok(token_id)
    }

    /// Validates a deposit into `position` and applies it.
    ///
    /// Nothing is mutated unless every check passes. The position reward is
    /// recomputed from the cumulative stake and only the difference is
    /// reserved, so `position.reward == calculate_reward(position.stake)`
    /// holds after any number of deposits.
    pub fn record_deposit(
        &mut self,
        position: &mut Position,
        amount: u64,
        reward_balance: u64,
        now: i64,
    ) -> Result<DepositOutcome> {
        self.check_deposit_window(now)?;
        require!(amount >= self.minimum_stake, StakingError::BelowMinimum);
        require!(!position.is_closed(), StakingError::AlreadyClaimed);

        let stake = position
            .stake
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        let reward = self.calculate_reward(stake)?;
        let reserved = reward
            .checked_sub(position.reward)
            .ok_or(StakingError::MathUnderflow)?;
        let total_reserved = self
            .total_reserved
            .checked_add(reserved)
            .ok_or(StakingError::MathOverflow)?;
        require!(total_reserved <= reward_balance, StakingError::OverLimit);

        let opened = !position.exists();
        if opened {
            position.token_id = self.allocate_token_id()?;
            position.open = true;
            position.opened_at = now;
            self.open_positions = self
                .open_positions
                .checked_add(1)
                .ok_or(StakingError::MathOverflow)?;
        }
        position.nonce = position
            .nonce
            .checked_add(1)
            .ok_or(StakingError::MathOverflow)?;
        position.stake = stake;
        position.reward = reward;
        self.total_reserved = total_reserved;

        Ok(DepositOutcome {
            token_id: position.token_id,
            nonce: position.nonce,
            reserved,
            opened,
        })
    }

    /// Closes a matured position and releases its reservation.
    ///
    /// Returns the `(stake, reward)` owed to the depositor. The position keeps
    /// both amounts as a historical record.
    pub fn record_withdrawal(&mut self, position: &mut Position, now: i64) -> Result<(u64, u64)> {
        require!(position.exists(), StakingError::NotValidPosition);
        require!(position.open, StakingError::Closed);
        require!(position.is_mature(now, self.maturity), StakingError::BeforeMaturity);

        self.total_reserved = self
            .total_reserved
            .checked_sub(position.reward)
            .ok_or(StakingError::MathUnderflow)?;
        self.open_positions = self.open_positions.saturating_sub(1);

        position.open = false;
        position.closed_at = now;

        Ok((position.stake, position.reward))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    const TOKEN: u64 = 1_000_000_000;
    const DAY: i64 = 86_400;
    const WEEK: i64 = 7 * DAY;
    const START: i64 = 1_700_000_000;
    const END: i64 = START + WEEK;
    const MATURITY: i64 = END + WEEK;
    const INTEREST_RATE: u32 = 5_000;
    /// 0.01 reward tokens per stake token
    const PRICE: u64 = 1_000_000;

    fn err(e: StakingError) -> Error {
        e.into()
    }

    fn new_pool(interest_rate: u32) -> StakingPool {
        let reward_vault = Pubkey::new_unique();
        StakingPool {
            owner: Pubkey::new_unique(),
            stake_mint: Pubkey::new_unique(),
            reward_mint: Pubkey::new_unique(),
            stake_vault: Pubkey::new_unique(),
            reward_vault,
            name: "Staking".to_string(),
            symbol: "STS".to_string(),
            window_start: START,
            window_end: END,
            maturity: MATURITY,
            interest_rate,
            reward_token_price: PRICE,
            minimum_stake: TOKEN,
            next_token_id: 1,
            ..Default::default()
        }
    }

    fn active_pool() -> StakingPool {
        let mut pool = new_pool(INTEREST_RATE);
        pool.activate();
        pool
    }

    #[test]
    fn test_new_pool_is_inactive() {
        let pool = new_pool(INTEREST_RATE);
        assert!(!pool.active);
        assert_eq!(pool.total_reserved, 0);
        assert_eq!(pool.next_token_id, 1);
    }

    #[test]
    fn test_activate_and_disable() {
        let mut pool = new_pool(INTEREST_RATE);
        assert_eq!(pool.disable().unwrap_err(), err(StakingError::NotActive));

        pool.activate();
        assert!(pool.active);
        pool.activate();
        assert!(pool.active);

        pool.disable().unwrap();
        assert!(!pool.active);
        assert_eq!(pool.disable().unwrap_err(), err(StakingError::NotActive));
    }

    #[test]
    fn test_assert_owner() {
        let pool = new_pool(INTEREST_RATE);
        assert!(pool.assert_owner(&pool.owner).is_ok());
        assert_eq!(
            pool.assert_owner(&Pubkey::new_unique()).unwrap_err(),
            err(StakingError::Unauthorized)
        );
    }

    #[test]
    fn test_calculate_reward_exchange_rate() {
        let pool = new_pool(INTEREST_RATE);
        // 5% of 1_000 = 50 stake tokens = 0.5 reward tokens
        assert_eq!(pool.calculate_reward(1_000 * TOKEN).unwrap(), TOKEN / 2);
        // 5% of 10_000 = 500 = 5 reward tokens
        assert_eq!(pool.calculate_reward(10_000 * TOKEN).unwrap(), 5 * TOKEN);
        // 5% of 8_800 = 440 = 4.4 reward tokens
        assert_eq!(pool.calculate_reward(8_800 * TOKEN).unwrap(), 4_400_000_000);

        let pool = new_pool(1_500);
        // 1.5% of 2_000_000 = 30_000 = 300 reward tokens
        assert_eq!(pool.calculate_reward(2_000_000 * TOKEN).unwrap(), 300 * TOKEN);
    }

    #[test]
    fn test_calculate_reward_floors_small_amounts() {
        let pool = new_pool(INTEREST_RATE);
        assert_eq!(pool.calculate_reward(0).unwrap(), 0);
        // 1999 * 5000 * 1e6 / 1e13 = 0.9995
        assert_eq!(pool.calculate_reward(1_999).unwrap(), 0);
        assert_eq!(pool.calculate_reward(2_000).unwrap(), 1);
    }

    #[test]
    fn test_calculate_reward_overflow() {
        let mut pool = new_pool(INTEREST_RATE);
        // Fits in u128 but not in u64
        pool.reward_token_price = 1_000_000_000_000;
        assert_eq!(
            pool.calculate_reward(u64::MAX).unwrap_err(),
            err(StakingError::ConversionOverflow)
        );

        // Does not even fit in u128
        pool.reward_token_price = u64::MAX;
        assert_eq!(
            pool.calculate_reward(u64::MAX).unwrap_err(),
            err(StakingError::MathOverflow)
        );
    }

    #[test]
    fn test_deposit_window_checks() {
        let mut pool = new_pool(INTEREST_RATE);
        assert_eq!(
            pool.check_deposit_window(START).unwrap_err(),
            err(StakingError::NotActive)
        );

        pool.activate();
        assert_eq!(
            pool.check_deposit_window(START - 1).unwrap_err(),
            err(StakingError::NotStarted)
        );
        assert!(pool.check_deposit_window(START).is_ok());
        assert!(pool.check_deposit_window(END - 1).is_ok());
        assert_eq!(
            pool.check_deposit_window(END).unwrap_err(),
            err(StakingError::Finished)
        );

        pool.disable().unwrap();
        assert_eq!(
            pool.check_deposit_window(START).unwrap_err(),
            err(StakingError::NotActive)
        );
    }

    #[test]
    fn test_first_deposit_opens_position() {
        let mut pool = active_pool();
        let mut position = Position::default();

        let outcome = pool
            .record_deposit(&mut position, 10_000 * TOKEN, 1_000 * TOKEN, START)
            .unwrap();

        assert_eq!(
            outcome,
            DepositOutcome {
                token_id: 1,
                nonce: 1,
                reserved: 5 * TOKEN,
                opened: true,
            }
        );
        assert!(position.open);
        assert_eq!(position.stake, 10_000 * TOKEN);
        assert_eq!(position.reward, 5 * TOKEN);
        assert_eq!(position.opened_at, START);
        assert_eq!(pool.total_reserved, 5 * TOKEN);
        assert_eq!(pool.next_token_id, 2);
        assert_eq!(pool.open_positions, 1);
        assert_eq!(
            pool.remaining(&pool.reward_vault, 1_000 * TOKEN).unwrap(),
            995 * TOKEN
        );
    }

    #[test]
    fn test_restake_accumulates_into_same_position() {
        let mut pool = active_pool();
        let mut first = Position::default();
        let mut second = Position::default();
        let funded = 1_000 * TOKEN;

        pool.record_deposit(&mut first, 10_000 * TOKEN, funded, START).unwrap();
        let outcome = pool
            .record_deposit(&mut first, 10_000 * TOKEN, funded, START + DAY)
            .unwrap();

        assert!(!outcome.opened);
        assert_eq!(first.token_id, 1);
        assert_eq!(first.nonce, 2);
        assert_eq!(first.stake, 20_000 * TOKEN);
        assert_eq!(first.reward, 10 * TOKEN);
        assert_eq!(first.opened_at, START);

        let outcome = pool
            .record_deposit(&mut second, 1_000 * TOKEN, funded, START + DAY)
            .unwrap();
        assert!(outcome.opened);
        assert_eq!(second.token_id, 2);
        assert_eq!(second.nonce, 1);
        assert_eq!(second.reward, TOKEN / 2);

        assert_eq!(pool.total_reserved, first.reward + second.reward);
        assert_eq!(
            pool.remaining(&pool.reward_vault, funded).unwrap(),
            funded - 10 * TOKEN - TOKEN / 2
        );
    }

    #[test]
    fn test_restake_reward_tracks_cumulative_stake() {
        let mut pool = active_pool();
        let mut position = Position::default();
        // Each of these rounds down on its own; the sum must not drift.
        let deposits = [TOKEN + 1_999, TOKEN + 1_999, TOKEN + 1_999, 7 * TOKEN + 3];

        for (i, amount) in deposits.iter().enumerate() {
            pool.record_deposit(&mut position, *amount, u64::MAX, START)
                .unwrap();
            assert_eq!(position.nonce, i as u64 + 1);
        }

        let total: u64 = deposits.iter().sum();
        assert_eq!(position.stake, total);
        assert_eq!(position.reward, pool.calculate_reward(total).unwrap());
        assert_eq!(pool.total_reserved, position.reward);
    }

    #[test]
    fn test_deposit_rejections_leave_state_unchanged() {
        let mut pool = new_pool(INTEREST_RATE);
        let mut position = Position::default();

        assert_eq!(
            pool.record_deposit(&mut position, 10_000 * TOKEN, 0, START)
                .unwrap_err(),
            err(StakingError::NotActive)
        );

        pool.activate();
        // No reward funding at all
        assert_eq!(
            pool.record_deposit(&mut position, 10_000 * TOKEN, 0, START)
                .unwrap_err(),
            err(StakingError::OverLimit)
        );
        // Funding one unit short of the reward
        assert_eq!(
            pool.record_deposit(&mut position, 10_000 * TOKEN, 5 * TOKEN - 1, START)
                .unwrap_err(),
            err(StakingError::OverLimit)
        );
        assert_eq!(
            pool.record_deposit(&mut position, 10, 1_000 * TOKEN, START)
                .unwrap_err(),
            err(StakingError::BelowMinimum)
        );
        assert_eq!(
            pool.record_deposit(&mut position, 10_000 * TOKEN, 1_000 * TOKEN, START - DAY)
                .unwrap_err(),
            err(StakingError::NotStarted)
        );
        assert_eq!(
            pool.record_deposit(&mut position, 10_000 * TOKEN, 1_000 * TOKEN, END)
                .unwrap_err(),
            err(StakingError::Finished)
        );

        assert_eq!(position, Position::default());
        assert_eq!(pool.total_reserved, 0);
        assert_eq!(pool.next_token_id, 1);
        assert_eq!(pool.open_positions, 0);

        // Exactly funded is accepted
        pool.record_deposit(&mut position, 10_000 * TOKEN, 5 * TOKEN, START)
            .unwrap();
        assert_eq!(pool.total_reserved, 5 * TOKEN);
    }

    #[test]
    fn test_below_minimum_on_existing_position() {
        let mut pool = active_pool();
        let mut position = Position::default();
        pool.record_deposit(&mut position, 10_000 * TOKEN, 1_000 * TOKEN, START)
            .unwrap();

        let before = position.clone();
        assert_eq!(
            pool.record_deposit(&mut position, 10, 1_000 * TOKEN, START)
                .unwrap_err(),
            err(StakingError::BelowMinimum)
        );
        assert_eq!(position, before);
    }

    #[test]
    fn test_withdraw_before_maturity() {
        let mut pool = active_pool();
        let mut position = Position::default();
        pool.record_deposit(&mut position, 1_000 * TOKEN, 10_000 * TOKEN, START)
            .unwrap();

        assert_eq!(
            pool.record_withdrawal(&mut position, MATURITY - 1)
                .unwrap_err(),
            err(StakingError::BeforeMaturity)
        );
        assert!(position.open);
        assert_eq!(pool.total_reserved, TOKEN / 2);
    }

    #[test]
    fn test_withdraw_releases_reservation_once() {
        let mut pool = active_pool();
        let mut position = Position::default();
        let funded = 10_000 * TOKEN;
        pool.record_deposit(&mut position, 1_000 * TOKEN, funded, START)
            .unwrap();

        let (stake, reward) = pool.record_withdrawal(&mut position, MATURITY).unwrap();
        assert_eq!(stake, 1_000 * TOKEN);
        assert_eq!(reward, TOKEN / 2);
        assert!(!position.open);
        assert_eq!(position.closed_at, MATURITY);
        assert_eq!(pool.total_reserved, 0);
        assert_eq!(pool.open_positions, 0);

        // Reward tokens left the vault with the withdrawal.
        let balance = funded - reward;
        assert_eq!(
            pool.remaining(&pool.reward_vault, balance).unwrap(),
            balance
        );

        assert_eq!(
            pool.record_withdrawal(&mut position, MATURITY + DAY)
                .unwrap_err(),
            err(StakingError::Closed)
        );
        assert_eq!(pool.total_reserved, 0);
    }

    #[test]
    fn test_withdraw_without_position() {
        let mut pool = active_pool();
        let mut position = Position::default();
        assert_eq!(
            pool.record_withdrawal(&mut position, MATURITY).unwrap_err(),
            err(StakingError::NotValidPosition)
        );
    }

    #[test]
    fn test_deposit_after_claim_is_refused() {
        let mut pool = new_pool(INTEREST_RATE);
        // Maturity at the window start, so positions can close inside the window.
        pool.maturity = START;
        pool.activate();

        let mut position = Position::default();
        pool.record_deposit(&mut position, 1_000 * TOKEN, 1_000 * TOKEN, START)
            .unwrap();
        pool.record_withdrawal(&mut position, START).unwrap();

        assert_eq!(
            pool.record_deposit(&mut position, 1_000 * TOKEN, 1_000 * TOKEN, START)
                .unwrap_err(),
            err(StakingError::AlreadyClaimed)
        );
        assert_eq!(position.nonce, 1);
        assert_eq!(pool.next_token_id, 2);
    }

    #[test]
    fn test_withdraw_is_independent_of_activation() {
        let mut pool = active_pool();
        let mut position = Position::default();
        pool.record_deposit(&mut position, 1_000 * TOKEN, 1_000 * TOKEN, START)
            .unwrap();
        pool.disable().unwrap();

        assert!(pool.record_withdrawal(&mut position, MATURITY).is_ok());
    }

    #[test]
    fn test_remaining_reward_vault_and_other_accounts() {
        let mut pool = active_pool();
        let reward_vault = pool.reward_vault;
        let stake_vault = pool.stake_vault;

        assert_eq!(pool.remaining(&reward_vault, 0).unwrap(), 0);
        assert_eq!(pool.remaining(&reward_vault, 1_000 * TOKEN).unwrap(), 1_000 * TOKEN);

        let mut position = Position::default();
        pool.record_deposit(&mut position, 1_000 * TOKEN, 1_000 * TOKEN, START)
            .unwrap();

        // Stake collected from deposits is never reserved.
        assert_eq!(pool.remaining(&stake_vault, 1_000 * TOKEN).unwrap(), 1_000 * TOKEN);
        assert_eq!(
            pool.remaining(&reward_vault, 1_000 * TOKEN).unwrap(),
            1_000 * TOKEN - TOKEN / 2
        );
        // A vault holding exactly the reserved amount has nothing left to sweep.
        assert_eq!(pool.remaining(&reward_vault, TOKEN / 2).unwrap(), 0);
        assert_eq!(pool.remaining(&Pubkey::new_unique(), 0).unwrap(), 0);
    }

    #[test]
    fn test_allocate_token_id_is_monotonic() {
        let mut pool = new_pool(INTEREST_RATE);
        assert_eq!(pool.allocate_token_id().unwrap(), 1);
        assert_eq!(pool.allocate_token_id().unwrap(), 2);
        assert_eq!(pool.next_token_id, 3);

        pool.next_token_id = u64::MAX;
        assert_eq!(
            pool.allocate_token_id().unwrap_err(),
            err(StakingError::MathOverflow)
        );
    }

    #[test]
    fn test_minimum_stake_follows_mint_decimals() {
        assert_eq!(StakingPool::minimum_stake_for(9).unwrap(), TOKEN);
        assert_eq!(StakingPool::minimum_stake_for(6).unwrap(), 1_000_000);
        assert_eq!(StakingPool::minimum_stake_for(0).unwrap(), 1);
        assert_eq!(
            StakingPool::minimum_stake_for(20).unwrap_err(),
            err(StakingError::MathOverflow)
        );
    }

    #[test]
    fn test_minimum_stake_on_six_decimal_mint() {
        const MICRO_TOKEN: u64 = 1_000_000;
        let mut pool = active_pool();
        pool.minimum_stake = StakingPool::minimum_stake_for(6).unwrap();

        let mut position = Position::default();
        assert_eq!(
            pool.record_deposit(&mut position, MICRO_TOKEN - 1, TOKEN, START)
                .unwrap_err(),
            err(StakingError::BelowMinimum)
        );

        // One whole token is enough, not a thousand
        let outcome = pool
            .record_deposit(&mut position, MICRO_TOKEN, TOKEN, START)
            .unwrap();
        assert!(outcome.opened);
        assert_eq!(position.stake, MICRO_TOKEN);
    }

    #[test]
    fn test_sweepable_empty_stake_vault() {
        let pool = active_pool();
        assert_eq!(
            pool.sweepable(&pool.stake_vault, 0).unwrap_err(),
            err(StakingError::NoFunds)
        );
        assert_eq!(pool.sweepable(&pool.stake_vault, 7 * TOKEN).unwrap(), 7 * TOKEN);
    }

    #[test]
    fn test_sweepable_fully_reserved_reward_vault() {
        let mut pool = active_pool();
        let mut position = Position::default();
        pool.record_deposit(&mut position, 10_000 * TOKEN, 5 * TOKEN, START)
            .unwrap();
        assert_eq!(pool.total_reserved, 5 * TOKEN);

        assert_eq!(
            pool.sweepable(&pool.reward_vault, pool.total_reserved)
                .unwrap_err(),
            err(StakingError::NoFunds)
        );
    }

    #[test]
    fn test_sweepable_funded_reward_vault() {
        let mut pool = active_pool();
        let mut position = Position::default();
        let funded = 100 * TOKEN;
        pool.record_deposit(&mut position, 10_000 * TOKEN, funded, START)
            .unwrap();

        let amount = pool.sweepable(&pool.reward_vault, funded).unwrap();
        assert_eq!(amount, 95 * TOKEN);
        // Sweeping that amount leaves exactly the reservation behind
        assert_eq!(funded - amount, pool.total_reserved);
        assert_eq!(
            pool.sweepable(&pool.reward_vault, funded - amount)
                .unwrap_err(),
            err(StakingError::NoFunds)
        );
    }
}

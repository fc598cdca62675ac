//! Basis-point fee arithmetic.
//!
//! Every fee is `amount * bps / 10_000` computed on a 256-bit intermediate
//! and truncated toward zero. Truncated dust is never paid out: it stays in
//! the party pool and is eventually collected by the last redeemer.

use ruint::aliases::U256;
use serde::{Deserialize, Serialize};

use crate::{PartyBidError, Result, constants::BASIS_POINTS_DENOMINATOR};

/// `floor(a * b / denominator)` without intermediate overflow.
///
/// Returns `None` when `denominator` is zero or the quotient does not fit
/// in a `u128`.
#[must_use]
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let product = U256::from(a) * U256::from(b);
    u128::try_from(product / U256::from(denominator)).ok()
}

/// `floor(amount * bps / 10_000)`.
#[must_use]
pub fn bps_of(amount: u128, bps: u16) -> u128 {
    // Configuration caps bps at 10_000, so the quotient never exceeds amount.
    mul_div(amount, u128::from(bps), BASIS_POINTS_DENOMINATOR).unwrap_or(u128::MAX)
}

/// Largest bid whose ETH fee still fits in `funds`:
/// `floor(funds * 10_000 / (10_000 + eth_fee_bps))`.
#[must_use]
pub fn max_bid_with_fee(funds: u128, eth_fee_bps: u16) -> u128 {
    let denominator = BASIS_POINTS_DENOMINATOR + u128::from(eth_fee_bps);
    mul_div(funds, BASIS_POINTS_DENOMINATOR, denominator).unwrap_or(0)
}

/// Fee parameters fixed at party creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// ETH fee on the winning bid, paid to the fee recipient.
    pub eth_fee_bps: u16,
    /// Share-token fee minted to the fee recipient.
    pub token_fee_bps: u16,
    /// Share-token credit for the split recipient, taken from the
    /// supply left after the token fee.
    pub split_bps: u16,
}

/// The fees charged when a party wins. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeSplit {
    /// Shares minted to the fee recipient.
    pub token_fee: u128,
    /// Wei transferred to the fee recipient.
    pub eth_fee: u128,
    /// Shares minted to the split recipient.
    pub split_recipient_share: u128,
}

impl FeeSplit {
    /// Compute the fees for a win at `winning_bid` with `share_supply`
    /// shares outstanding before any fee mint.
    ///
    /// Both share credits are computed from the same pre-mint supply, so
    /// the order in which they are minted does not matter.
    #[must_use]
    pub fn compute(schedule: &FeeSchedule, winning_bid: u128, share_supply: u128) -> Self {
        let eth_fee = bps_of(winning_bid, schedule.eth_fee_bps);
        let token_fee = bps_of(share_supply, schedule.token_fee_bps);
        let split_recipient_share =
            bps_of(share_supply.saturating_sub(token_fee), schedule.split_bps);
        Self {
            token_fee,
            eth_fee,
            split_recipient_share,
        }
    }

    /// Total wei leaving the party on a win: bid plus ETH fee.
    pub fn total_spent(&self, winning_bid: u128) -> Result<u128> {
        winning_bid
            .checked_add(self.eth_fee)
            .ok_or(PartyBidError::ArithmeticOverflow {
                context: "total spent",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eth;

    #[test]
    fn mul_div_truncates() {
        assert_eq!(mul_div(10, 3, 4), Some(7));
        assert_eq!(mul_div(1, 1, 3), Some(0));
        assert_eq!(mul_div(5, 5, 0), None);
    }

    #[test]
    fn mul_div_survives_wide_products() {
        let big = u128::MAX / 2;
        assert_eq!(mul_div(big, 4, 4), Some(big));
        assert_eq!(mul_div(u128::MAX, 2, 1), None);
    }

    #[test]
    fn eth_fee_is_exact_floor() {
        // 8 ETH at 2.5% = 0.2 ETH exactly.
        assert_eq!(bps_of(eth("8"), 250), eth("0.2"));
        // 1 wei at 2.5% truncates to zero.
        assert_eq!(bps_of(1, 250), 0);
        // 39 wei at 2.5% = 0.975 -> 0
        assert_eq!(bps_of(39, 250), 0);
        assert_eq!(bps_of(41, 250), 1);
    }

    #[test]
    fn max_bid_leaves_room_for_fee() {
        let funds = eth("10");
        let max = max_bid_with_fee(funds, 250);
        assert!(max + bps_of(max, 250) <= funds);
        assert_eq!(max_bid_with_fee(funds, 0), funds);
    }

    #[test]
    fn fee_split_scenario() {
        let schedule = FeeSchedule {
            eth_fee_bps: 250,
            token_fee_bps: 250,
            split_bps: 1000,
        };
        let split = FeeSplit::compute(&schedule, eth("8"), 10_000);
        assert_eq!(split.eth_fee, eth("0.2"));
        assert_eq!(split.token_fee, 250);
        // 10% of the 9_750 shares left after the token fee.
        assert_eq!(split.split_recipient_share, 975);
        assert_eq!(split.total_spent(eth("8")).unwrap(), eth("8.2"));
    }

    #[test]
    fn zero_schedule_charges_nothing() {
        let split = FeeSplit::compute(&FeeSchedule::default(), eth("3"), 1_000);
        assert_eq!(split, FeeSplit::default());
    }
}

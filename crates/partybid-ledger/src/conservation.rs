//! Funds conservation invariant checker.
//!
//! Invariant enforced after every committed mutation:
//! ```text
//! held == Σ(contributions) - Σ(outflows)
//! ```
//! where outflows are the winning bid, the ETH fee, redemptions and excess
//! refunds. If this ever breaks, wei has been created or lost.

use std::{collections::BTreeMap, fmt};

use partybid_types::{PartyBidError, Result};

/// Where wei left the party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outflow {
    /// Paid to the auction house for the asset.
    WinningBid,
    /// Paid to the fee recipient.
    EthFee,
    /// Paid to share holders.
    Redemption,
    /// Unneeded contributions returned to their contributor.
    ExcessRefund,
}

impl fmt::Display for Outflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WinningBid => write!(f, "WINNING_BID"),
            Self::EthFee => write!(f, "ETH_FEE"),
            Self::Redemption => write!(f, "REDEMPTION"),
            Self::ExcessRefund => write!(f, "EXCESS_REFUND"),
        }
    }
}

/// Tracks inflows and outflows and validates the party's holdings.
#[derive(Debug, Clone, Default)]
pub struct FundsConservation {
    inflow: u128,
    outflows: BTreeMap<Outflow, u128>,
}

impl FundsConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record wei received from a contributor.
    pub fn record_inflow(&mut self, amount: u128) {
        self.inflow = self.inflow.saturating_add(amount);
    }

    /// Record wei leaving the party.
    pub fn record_outflow(&mut self, kind: Outflow, amount: u128) {
        let entry = self.outflows.entry(kind).or_default();
        *entry = entry.saturating_add(amount);
    }

    #[must_use]
    pub fn total_inflow(&self) -> u128 {
        self.inflow
    }

    #[must_use]
    pub fn total_outflow(&self, kind: Outflow) -> u128 {
        self.outflows.get(&kind).copied().unwrap_or(0)
    }

    /// What the party should be holding right now.
    #[must_use]
    pub fn expected_held(&self) -> Option<u128> {
        let out = self
            .outflows
            .values()
            .try_fold(0u128, |acc, v| acc.checked_add(*v))?;
        self.inflow.checked_sub(out)
    }

    /// Verify that `actual_held` matches inflows minus outflows.
    ///
    /// # Errors
    /// Returns [`PartyBidError::ConservationViolation`] if they differ.
    pub fn verify(&self, actual_held: u128) -> Result<()> {
        match self.expected_held() {
            Some(expected) if expected == actual_held => Ok(()),
            expected => Err(PartyBidError::ConservationViolation {
                reason: format!(
                    "held {actual_held} != expected {expected:?} (inflow={}, outflows={:?})",
                    self.inflow, self.outflows
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_balanced() {
        let fc = FundsConservation::new();
        assert_eq!(fc.expected_held(), Some(0));
        assert!(fc.verify(0).is_ok());
    }

    #[test]
    fn outflows_reduce_expected() {
        let mut fc = FundsConservation::new();
        fc.record_inflow(10_000);
        fc.record_outflow(Outflow::WinningBid, 8_000);
        fc.record_outflow(Outflow::EthFee, 200);
        assert_eq!(fc.expected_held(), Some(1_800));
        assert!(fc.verify(1_800).is_ok());
        assert_eq!(fc.total_outflow(Outflow::EthFee), 200);
    }

    #[test]
    fn imbalance_detected() {
        let mut fc = FundsConservation::new();
        fc.record_inflow(10);
        let err = fc.verify(11).unwrap_err();
        assert!(matches!(err, PartyBidError::ConservationViolation { .. }));
    }

    #[test]
    fn overdrawn_is_a_violation() {
        let mut fc = FundsConservation::new();
        fc.record_inflow(5);
        fc.record_outflow(Outflow::Redemption, 6);
        assert_eq!(fc.expected_held(), None);
        assert!(fc.verify(0).is_err());
    }
}

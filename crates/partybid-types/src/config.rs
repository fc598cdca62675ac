//! Party configuration, fixed at creation time.

use serde::{Deserialize, Serialize};

use crate::{
    Address, AuctionId, FeeSchedule, MarketKind, PartyBidError, Result, TokenId, constants,
};

/// Everything a party instance needs to know about its auction and fees.
///
/// Passed explicitly at construction so every party is independently
/// testable; there is no global fee state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyConfig {
    /// The party's own identity: the bidder the market sees and the owner
    /// the asset must end up with for a win.
    pub party_address: Address,
    /// Receives the ETH fee and the token fee (the party multisig).
    pub fee_recipient: Address,
    /// Auction house variant.
    pub market: MarketKind,
    pub auction_id: AuctionId,
    pub token_id: TokenId,
    /// The party never bids below this, whatever the house reports.
    pub auction_reserve_price: u128,
    /// Optional third party credited `split_basis_points` of the shares.
    #[serde(default)]
    pub split_recipient: Option<Address>,
    #[serde(default)]
    pub split_basis_points: u16,
    #[serde(default = "default_token_fee_bps")]
    pub token_fee_basis_points: u16,
    #[serde(default = "default_eth_fee_bps")]
    pub eth_fee_basis_points: u16,
    /// Shares minted per accepted wei.
    #[serde(default = "default_token_scale")]
    pub token_scale: u128,
    /// Maximum wei the party accepts toward bidding. Anything beyond is
    /// recorded as excess and refunded in full after finalize.
    #[serde(default)]
    pub contribution_ceiling: Option<u128>,
}

fn default_token_fee_bps() -> u16 {
    constants::TOKEN_FEE_BASIS_POINTS
}

fn default_eth_fee_bps() -> u16 {
    constants::ETH_FEE_BASIS_POINTS
}

fn default_token_scale() -> u128 {
    constants::TOKEN_SCALE
}

impl PartyConfig {
    /// A config with default fees and no split recipient.
    #[must_use]
    pub fn new(
        party_address: Address,
        fee_recipient: Address,
        market: MarketKind,
        auction_id: AuctionId,
        token_id: TokenId,
    ) -> Self {
        Self {
            party_address,
            fee_recipient,
            market,
            auction_id,
            token_id,
            auction_reserve_price: 0,
            split_recipient: None,
            split_basis_points: 0,
            token_fee_basis_points: constants::TOKEN_FEE_BASIS_POINTS,
            eth_fee_basis_points: constants::ETH_FEE_BASIS_POINTS,
            token_scale: constants::TOKEN_SCALE,
            contribution_ceiling: None,
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        for (name, bps) in [
            ("split_basis_points", self.split_basis_points),
            ("token_fee_basis_points", self.token_fee_basis_points),
            ("eth_fee_basis_points", self.eth_fee_basis_points),
        ] {
            if bps > constants::MAX_BASIS_POINTS {
                return Err(PartyBidError::Configuration(format!(
                    "{name} = {bps} exceeds {}",
                    constants::MAX_BASIS_POINTS
                )));
            }
        }
        if u32::from(self.token_fee_basis_points) + u32::from(self.split_basis_points)
            > u32::from(constants::MAX_BASIS_POINTS)
        {
            return Err(PartyBidError::Configuration(
                "token fee and split together exceed 100%".into(),
            ));
        }
        if self.split_basis_points > 0 && self.split_recipient.is_none() {
            return Err(PartyBidError::Configuration(
                "split_basis_points set without a split_recipient".into(),
            ));
        }
        if self.token_scale == 0 {
            return Err(PartyBidError::Configuration("token_scale must be > 0".into()));
        }
        if self.party_address.is_zero() {
            return Err(PartyBidError::Configuration(
                "party_address must not be zero".into(),
            ));
        }
        if self.contribution_ceiling == Some(0) {
            return Err(PartyBidError::Configuration(
                "contribution_ceiling must be > 0 when set".into(),
            ));
        }
        Ok(())
    }

    /// Fee parameters as one value.
    #[must_use]
    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            eth_fee_bps: self.eth_fee_basis_points,
            token_fee_bps: self.token_fee_basis_points,
            split_bps: if self.split_recipient.is_some() {
                self.split_basis_points
            } else {
                0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PartyConfig {
        PartyConfig::new(
            Address::dummy(1),
            Address::dummy(2),
            MarketKind::Nouns,
            AuctionId(1),
            TokenId(95),
        )
    }

    #[test]
    fn defaults_validate() {
        let cfg = config();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.eth_fee_basis_points, 250);
        assert_eq!(cfg.token_fee_basis_points, 250);
        assert_eq!(cfg.token_scale, 1000);
    }

    #[test]
    fn bps_over_100_percent_rejected() {
        let mut cfg = config();
        cfg.eth_fee_basis_points = 10_001;
        assert!(matches!(
            cfg.validate().unwrap_err(),
            PartyBidError::Configuration(_)
        ));
    }

    #[test]
    fn split_without_recipient_rejected() {
        let mut cfg = config();
        cfg.split_basis_points = 500;
        assert!(cfg.validate().is_err());
        cfg.split_recipient = Some(Address::dummy(3));
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.fee_schedule().split_bps, 500);
    }

    #[test]
    fn token_fee_plus_split_capped() {
        let mut cfg = config();
        cfg.split_recipient = Some(Address::dummy(3));
        cfg.split_basis_points = 9_800;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_token_scale_rejected() {
        let mut cfg = config();
        cfg.token_scale = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn from_json_fills_defaults() {
        let json = format!(
            r#"{{
                "party_address": "{}",
                "fee_recipient": "{}",
                "market": "zora",
                "auction_id": 7,
                "token_id": 95,
                "auction_reserve_price": 1000000000000000000
            }}"#,
            Address::dummy(1),
            Address::dummy(2)
        );
        let cfg = PartyConfig::from_json(&json).unwrap();
        assert_eq!(cfg.market, MarketKind::Zora);
        assert_eq!(cfg.auction_id, AuctionId(7));
        assert_eq!(cfg.token_fee_basis_points, 250);
        assert_eq!(cfg.split_recipient, None);
        assert_eq!(cfg.contribution_ceiling, None);
    }

    #[test]
    fn from_json_rejects_invalid() {
        let json = format!(
            r#"{{
                "party_address": "{}",
                "fee_recipient": "{}",
                "market": "nouns",
                "auction_id": 1,
                "token_id": 1,
                "auction_reserve_price": 0,
                "token_scale": 0
            }}"#,
            Address::dummy(1),
            Address::dummy(2)
        );
        assert!(matches!(
            PartyConfig::from_json(&json).unwrap_err(),
            PartyBidError::Configuration(_)
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = config();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PartyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}

//! Conversions between human-denominated ETH and wei.
//!
//! All engine arithmetic is integer wei. Decimals only appear at the edges
//! (configuration, logs, tests) where amounts like `8.2` are written by hand.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{PartyBidError, Result, constants::ETH_DECIMALS};

/// Convert an ETH amount to wei. Fails on negative values, more than 18
/// fractional digits, or overflow.
pub fn eth_to_wei(amount: Decimal) -> Result<u128> {
    let amount = amount.normalize();
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PartyBidError::InvalidAmount {
            reason: format!("negative ETH amount {amount}"),
        });
    }
    let scale = amount.scale();
    if scale > ETH_DECIMALS {
        return Err(PartyBidError::InvalidAmount {
            reason: format!("{amount} has more than {ETH_DECIMALS} decimals"),
        });
    }
    let mantissa = amount.mantissa().unsigned_abs();
    10u128
        .checked_pow(ETH_DECIMALS - scale)
        .and_then(|factor| mantissa.checked_mul(factor))
        .ok_or(PartyBidError::ArithmeticOverflow {
            context: "eth to wei",
        })
}

/// Parse a decimal ETH string (`"8.2"`) into wei.
pub fn parse_eth(s: &str) -> Result<u128> {
    let amount = Decimal::from_str(s.trim())
        .map_err(|e| PartyBidError::InvalidAmount {
            reason: format!("{s}: {e}"),
        })?;
    eth_to_wei(amount)
}

/// Wei for a literal ETH amount, like `parseEther`.
///
/// # Panics
/// Panics if `s` is not a valid non-negative ETH amount. Use [`parse_eth`]
/// for untrusted input.
#[must_use]
pub fn eth(s: &str) -> u128 {
    match parse_eth(s) {
        Ok(wei) => wei,
        Err(err) => panic!("invalid ETH literal {s:?}: {err}"),
    }
}

/// Render wei as ETH, like `formatEther`.
pub fn wei_to_eth(wei: u128) -> Result<Decimal> {
    let signed = i128::try_from(wei).map_err(|_| PartyBidError::ArithmeticOverflow {
        context: "wei to eth",
    })?;
    Decimal::try_from_i128_with_scale(signed, ETH_DECIMALS)
        .map(|d| d.normalize())
        .map_err(|_| PartyBidError::ArithmeticOverflow {
            context: "wei to eth",
        })
}

//! Error types for the PartyBid settlement engine.
//!
//! All errors use the `PB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Party lifecycle errors
//! - 2xx: Amount / balance errors
//! - 3xx: External market errors
//! - 4xx: Settlement errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Address, PartyStatus};

/// Central error enum for all PartyBid operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartyBidError {
    // =================================================================
    // Lifecycle Errors (1xx)
    // =================================================================
    /// The operation is not valid for the party's current status.
    #[error("PB_ERR_100: {operation} not allowed while party is {status}")]
    InvalidState {
        operation: &'static str,
        status: PartyStatus,
    },

    /// `finalize` was already executed; the outcome is fixed.
    #[error("PB_ERR_101: Party already finalized as {status}")]
    AlreadyFinalized { status: PartyStatus },

    /// The auction's end time has not passed yet.
    #[error("PB_ERR_102: Auction still open: ends at {end_time}, now {now}")]
    AuctionStillOpen { end_time: u64, now: u64 },

    /// Only accounts that contributed may trigger a bid.
    #[error("PB_ERR_103: {0} has not contributed to the party")]
    NotContributor(Address),

    // =================================================================
    // Amount Errors (2xx)
    // =================================================================
    /// A zero or otherwise malformed quantity.
    #[error("PB_ERR_200: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Pooled funds cannot cover the minimum valid bid.
    #[error("PB_ERR_201: Insufficient funds to bid: need {needed}, have {available}")]
    InsufficientFunds { needed: u128, available: u128 },

    /// The caller holds fewer shares than it tried to redeem.
    #[error("PB_ERR_202: Insufficient shares: need {needed}, hold {held}")]
    InsufficientShares { needed: u128, held: u128 },

    /// Integer arithmetic would overflow.
    #[error("PB_ERR_203: Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },

    // =================================================================
    // Market Errors (3xx)
    // =================================================================
    /// The auction house rejected the operation.
    #[error("PB_ERR_300: Market rejected operation: {reason}")]
    MarketRejected { reason: String },

    /// The auction house is paused; bidding is not possible.
    #[error("PB_ERR_301: Market is paused")]
    MarketPaused,

    /// The auction house refuses to settle before the end time.
    #[error("PB_ERR_302: Auction not yet endable: ends at {end_time}")]
    NotYetEndable { end_time: u64 },

    /// The external finalize call failed for any other reason.
    #[error("PB_ERR_303: Market finalize failed: {reason}")]
    MarketFinalizeFailed { reason: String },

    // =================================================================
    // Settlement Errors (4xx)
    // =================================================================
    /// Funds conservation invariant violated.
    #[error("PB_ERR_400: Conservation invariant violation: {reason}")]
    ConservationViolation { reason: String },

    /// The account has nothing left to claim.
    #[error("PB_ERR_401: Nothing to claim for {0}")]
    NothingToClaim(Address),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Configuration error (invalid values, missing fields, etc.).
    #[error("PB_ERR_900: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("PB_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// The party service task is gone.
    #[error("PB_ERR_902: Party service unavailable")]
    ServiceUnavailable,
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, PartyBidError>;

impl From<serde_json::Error> for PartyBidError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

//! System-wide constants for the PartyBid settlement engine.

/// Basis-point denominator: 10 000 bps == 100%.
pub const BASIS_POINTS_DENOMINATOR: u128 = 10_000;

/// Largest basis-point value accepted in configuration.
pub const MAX_BASIS_POINTS: u16 = 10_000;

/// Default ETH fee charged on a winning bid (2.5%).
pub const ETH_FEE_BASIS_POINTS: u16 = 250;

/// Default share-token fee minted to the fee recipient on a win (2.5%).
pub const TOKEN_FEE_BASIS_POINTS: u16 = 250;

/// Default number of share units minted per wei contributed.
pub const TOKEN_SCALE: u128 = 1000;

/// Wei per ether.
pub const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

/// Decimal places of one ether expressed in wei.
pub const ETH_DECIMALS: u32 = 18;

/// Default minimum bid increment of an auction house, in percent.
pub const DEFAULT_MIN_BID_INCREMENT_PERCENTAGE: u8 = 5;

/// Default time buffer: bids in the final window extend the auction (seconds).
pub const DEFAULT_TIME_BUFFER_SECS: u64 = 5 * 60;

/// Default auction duration (seconds).
pub const DEFAULT_AUCTION_DURATION_SECS: u64 = 24 * 60 * 60;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "PartyBid";

//! Contribution records and the receipts handed back to contributors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Address, ContributionId};

/// One deposit into the party. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: ContributionId,
    pub contributor: Address,
    /// Wei received, including any excess portion.
    pub amount: u128,
    /// Portion of `amount` beyond the contribution ceiling. Mints no shares.
    pub excess: u128,
    /// Shares minted for the accepted portion.
    pub shares: u128,
    /// Submission order. Used for ordering only, never for fees.
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
}

impl Contribution {
    /// Wei that counts toward the bidding pool.
    #[must_use]
    pub fn accepted(&self) -> u128 {
        self.amount - self.excess
    }

    /// Canonical digest payload.
    ///
    /// Format: `"partybid:contribution:v1:" || id || contributor || amount || excess || shares || sequence || recorded_at`
    #[must_use]
    pub fn digest_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(128);
        payload.extend_from_slice(b"partybid:contribution:v1:");
        payload.extend_from_slice(self.id.0.as_bytes());
        payload.extend_from_slice(self.contributor.as_bytes());
        payload.extend_from_slice(&self.amount.to_le_bytes());
        payload.extend_from_slice(&self.excess.to_le_bytes());
        payload.extend_from_slice(&self.shares.to_le_bytes());
        payload.extend_from_slice(&self.sequence.to_le_bytes());
        payload.extend_from_slice(&self.recorded_at.timestamp().to_le_bytes());
        payload
    }

    /// SHA-256 over [`Self::digest_payload`].
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        Sha256::digest(self.digest_payload()).into()
    }
}

/// What `contribute` hands back: the recorded contribution plus the
/// contributor's running totals after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionReceipt {
    pub contribution: Contribution,
    /// Contributor's total after this contribution.
    pub total_contributed_by: u128,
    /// Party total after this contribution.
    pub total_contributed: u128,
    /// SHA-256 digest of the contribution, for the audit trail.
    pub digest: [u8; 32],
}

impl ContributionReceipt {
    #[must_use]
    pub fn new(contribution: Contribution, total_contributed_by: u128, total_contributed: u128) -> Self {
        let digest = contribution.digest();
        Self {
            contribution,
            total_contributed_by,
            total_contributed,
            digest,
        }
    }

    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// Recompute the digest and compare.
    #[must_use]
    pub fn verify(&self) -> bool {
        self.contribution.digest() == self.digest
    }
}

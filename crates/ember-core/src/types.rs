//! Core engine types: addresses, tiers, quota records and reward events.
//!
//! All token amounts are [`Amount`] values in base units (18 decimals).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::TIER_BASE;
use crate::error::AddressError;

/// Token amount in base units.
pub type Amount = u128;

/// A 20-byte account or contract address.
///
/// Identifies routers, recipients, the governance identity, the engine's
/// own holding account and pools.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Address(pub [u8; 20]);

/// Opaque identifier of a pool (pair) against which emission is metered.
pub type PoolKey = Address;

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Create an address from a byte array.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Parse a hex address, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| AddressError::InvalidHex)?;
        let array: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Discrete turnover multiplier assigned from a pool's `y / x` imbalance.
///
/// Variants are ordered by multiplier, so `Ord` follows the band order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// 0.5×
    Dormant,
    /// 0.75×
    Low,
    /// 1.0×
    Neutral,
    /// 1.25×
    High,
    /// 1.5×
    Peak,
}

impl Tier {
    /// All tiers in ascending order.
    pub const ALL: [Tier; 5] = [Tier::Dormant, Tier::Low, Tier::Neutral, Tier::High, Tier::Peak];

    /// Multiplier in hundredths ([`TIER_BASE`] = 1.0×).
    pub fn multiplier(&self) -> u64 {
        match self {
            Self::Dormant => 50,
            Self::Low => 75,
            Self::Neutral => TIER_BASE,
            Self::High => 125,
            Self::Peak => 150,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.multiplier())
    }
}

/// Persistent per-pool emission state.
///
/// `cumulative_density` is the running total of requested (undecayed)
/// emission for the pool. It only ever grows.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct QuotaRecord {
    pub cumulative_density: Amount,
}

/// Full preview of one reward event, identical to what a committed
/// distribution would compute against the same persisted state.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmissionQuote {
    /// Baseline rate after the ceiling clamp.
    pub rate: Amount,
    /// Undecayed amount: `rate * fee / fee_unit`.
    pub std_amount: Amount,
    /// Amount actually minted after quota pressure.
    pub actual_amount: Amount,
    pub tier: Tier,
    /// Tier-scaled quota derived from the reserves of this call.
    pub quota: Amount,
    /// Density the pool will hold once the event is committed.
    pub density: Amount,
}

impl EmissionQuote {
    /// Whether quota pressure reduced the payout.
    pub fn is_decayed(&self) -> bool {
        self.actual_amount < self.std_amount
    }
}

/// A single credit requested from the minting collaborator.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub to: Address,
    pub amount: Amount,
}

/// Record of a committed reward event.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Distribution {
    pub pool: PoolKey,
    pub fee: Amount,
    pub recipient: Address,
    pub std_amount: Amount,
    /// Total minted for this event.
    pub actual_amount: Amount,
    /// Part of `actual_amount` credited to the recipient.
    pub to_recipient: Amount,
    /// Part of `actual_amount` kept at the engine's holding address.
    pub retained: Amount,
    pub tier: Tier,
    /// Pool density after the event.
    pub density: Amount,
}

/// Change-of-state notifications published by the distributor.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum EmissionEvent {
    RouterAllowed(Address),
    RouterDisallowed(Address),
    PoolRegistrySet,
    Distributed(Distribution),
}

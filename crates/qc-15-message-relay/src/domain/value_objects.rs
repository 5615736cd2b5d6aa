//! # Domain Value Objects
//!
//! Immutable value types for Cross-Chain Messaging.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Connected chain identifier (16-bit, big-endian on the wire).
///
/// `0` is reserved and never names a real chain.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChainId(pub u16);

impl ChainId {
    /// The reserved "no chain" identifier.
    pub const UNSET: ChainId = ChainId(0);

    /// Raw identifier.
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Check if this is the reserved zero identifier.
    pub fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for ChainId {
    fn from(id: u16) -> Self {
        ChainId(id)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain-{}", self.0)
    }
}

/// Confirmation depth requested of the publisher before it attests a message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finality {
    /// Attest once the block is confirmed.
    Confirmed,
    /// Attest only once the block is finalized.
    #[default]
    Finalized,
}

impl Finality {
    /// Consistency byte carried in the attestation body.
    pub fn consistency_level(&self) -> u8 {
        match self {
            Finality::Confirmed => 0,
            Finality::Finalized => 1,
        }
    }

    /// Inverse of [`Finality::consistency_level`].
    pub fn from_consistency_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Finality::Confirmed),
            1 => Some(Finality::Finalized),
            _ => None,
        }
    }

    /// Parse the config spelling (`confirmed` / `finalized`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirmed" => Some(Finality::Confirmed),
            "finalized" => Some(Finality::Finalized),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_unset() {
        assert!(ChainId::UNSET.is_unset());
        assert!(!ChainId(2).is_unset());
    }

    #[test]
    fn test_chain_id_display() {
        assert_eq!(ChainId(10002).to_string(), "chain-10002");
    }

    #[test]
    fn test_finality_consistency_levels() {
        assert_eq!(Finality::Confirmed.consistency_level(), 0);
        assert_eq!(Finality::Finalized.consistency_level(), 1);
        assert_eq!(Finality::from_consistency_level(1), Some(Finality::Finalized));
        assert_eq!(Finality::from_consistency_level(7), None);
    }

    #[test]
    fn test_finality_parse() {
        assert_eq!(Finality::parse(" Confirmed "), Some(Finality::Confirmed));
        assert_eq!(Finality::parse("finalized"), Some(Finality::Finalized));
        assert_eq!(Finality::parse("instant"), None);
    }

    #[test]
    fn test_finality_default_is_finalized() {
        assert_eq!(Finality::default(), Finality::Finalized);
    }
}

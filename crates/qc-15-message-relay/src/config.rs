//! # Message Relay Configuration
//!
//! Configuration for the message router.
//!
//! Environment overrides:
//!
//! | Variable | Format |
//! |----------|--------|
//! | `QC_RELAY_LOCAL_CHAIN_ID` | decimal u16, non-zero |
//! | `QC_RELAY_OWNER` | 64 hex chars, optional `0x` prefix |
//! | `QC_RELAY_FINALITY` | `confirmed` or `finalized` |

use crate::domain::{CallerId, ChainId, Finality, RelayError};
use serde::{Deserialize, Serialize};

/// Environment variable for the local chain id.
pub const ENV_LOCAL_CHAIN_ID: &str = "QC_RELAY_LOCAL_CHAIN_ID";
/// Environment variable for the owner identity.
pub const ENV_OWNER: &str = "QC_RELAY_OWNER";
/// Environment variable for the publish finality.
pub const ENV_FINALITY: &str = "QC_RELAY_FINALITY";

/// Router configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// This deployment's chain id. Never registrable as a remote.
    pub local_chain_id: ChainId,

    /// Sole identity allowed to register emitters. Fixed for the router's lifetime.
    #[serde(with = "hex_bytes")]
    pub owner: CallerId,

    /// Finality requested for outbound messages.
    #[serde(default)]
    pub finality: Finality,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            local_chain_id: ChainId(1),
            owner: [0u8; 32],
            finality: Finality::Finalized,
        }
    }
}

impl RouterConfig {
    /// Create a config.
    pub fn new(local_chain_id: ChainId, owner: CallerId) -> Self {
        Self {
            local_chain_id,
            owner,
            finality: Finality::Finalized,
        }
    }

    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            local_chain_id: ChainId(2),
            owner: [0x0Au8; 32],
            finality: Finality::Confirmed,
        }
    }

    /// Builder-style finality override.
    pub fn with_finality(mut self, finality: Finality) -> Self {
        self.finality = finality;
        self
    }

    /// Validate configuration.
    ///
    /// The default config has no owner and fails here on purpose: a router
    /// must be given one explicitly.
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.local_chain_id.is_unset() {
            return Err(RelayError::InvalidConfig(
                "local_chain_id cannot be 0".to_string(),
            ));
        }
        if self.owner == [0u8; 32] {
            return Err(RelayError::InvalidConfig("owner cannot be zero".to_string()));
        }
        Ok(())
    }

    /// Load from environment variables on top of the defaults.
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup(ENV_LOCAL_CHAIN_ID) {
            let id = val.trim().parse::<u16>().map_err(|e| {
                RelayError::InvalidConfig(format!("{}: {}", ENV_LOCAL_CHAIN_ID, e))
            })?;
            config.local_chain_id = ChainId(id);
        }

        if let Some(val) = lookup(ENV_OWNER) {
            config.owner = parse_hex32(&val)
                .map_err(|e| RelayError::InvalidConfig(format!("{}: {}", ENV_OWNER, e)))?;
        }

        if let Some(val) = lookup(ENV_FINALITY) {
            config.finality = Finality::parse(&val).ok_or_else(|| {
                RelayError::InvalidConfig(format!("{}: unknown finality '{}'", ENV_FINALITY, val))
            })?;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Parse a 32-byte hex string, with or without `0x`.
fn parse_hex32(s: &str) -> Result<[u8; 32], String> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s).map_err(|e| e.to_string())?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| format!("expected 32 bytes, got {}", b.len()))
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(d)?;
        super::parse_hex32(&s).map_err(serde::de::Error::custom)
    }
}

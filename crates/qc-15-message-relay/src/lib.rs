//! # QC-15 Message Relay
//!
//! Attested cross-chain messaging between trusted deployments.
//!
//! **Subsystem ID:** 15  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Let a local application publish an arbitrary payload to an external
//! attestation network, and accept payloads attested for a trusted remote
//! deployment of the same application:
//! - A fixed envelope codec (`payload_id ++ u16 length ++ payload`)
//! - One trusted emitter per remote chain, owner-gated
//! - Replay protection keyed by attestation hash
//!
//! ## Security Properties
//!
//! | Defense | Description |
//! |---------|-------------|
//! | Fail-closed receive | Unverified, untrusted, malformed or replayed messages are rejected |
//! | Exact-length envelopes | No trailing bytes after the payload |
//! | Single critical section | Check-then-consume cannot interleave across callers |
//! | Validate-then-commit | A failed operation leaves no partial state |
//!
//! ## Module Structure
//!
//! ```text
//! qc-15-message-relay/
//! ├── domain/          # Message codec, EmitterRegistry, ReplayGuard, errors
//! ├── config           # RouterConfig
//! ├── ports/           # MessageRelayApi, AttestationVerifier, MessagePublisher
//! ├── service/         # MessageRouter
//! └── adapters/        # InMemoryAttestationNetwork
//! ```
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_15_message_relay::{
//!     ChainId, InMemoryAttestationNetwork, MessageRelayApi, MessageRouter, RouterConfig,
//! };
//! use std::sync::Arc;
//!
//! let network = InMemoryAttestationNetwork::with_fee(0);
//! let router = MessageRouter::new(
//!     RouterConfig::from_env()?,
//!     Arc::new(network.verifier()),
//!     Arc::new(network.publisher(ChainId(2), [0xAA; 32])),
//! )?;
//!
//! let sequence = router.send_message(b"hello".to_vec(), 0).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{InMemoryAttestationNetwork, NetworkPublisher, NetworkVerifier};
pub use config::RouterConfig;
pub use domain::{
    AttestationBody, CallerId, ChainId, EmitterRegistry, Finality, Hash, Message, MessageRecord,
    RelayError, ReplayGuard, UniversalAddress, MAX_PAYLOAD_LEN, PAYLOAD_ID_MESSAGE,
};
pub use ports::{
    AttestationVerifier, MessagePublisher, MessageRelayApi, MockAttestationVerifier,
    ParsedAttestation,
};
pub use service::MessageRouter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}

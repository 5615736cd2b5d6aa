//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for the attestation network.

mod attestation_network;

pub use attestation_network::{
    InMemoryAttestationNetwork, NetworkPublisher, NetworkVerifier, UNSIGNED_DIGEST_REASON,
};

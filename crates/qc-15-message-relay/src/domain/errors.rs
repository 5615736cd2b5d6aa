//! # Domain Errors
//!
//! Error types for Cross-Chain Messaging.
//!
//! Every variant is a synchronous, caller-visible failure. None are retried
//! internally and none leave partial state behind.

use super::value_objects::ChainId;
use thiserror::Error;

/// Hash type (32-byte Keccak-256 message digest).
pub type Hash = [u8; 32];

/// Chain-agnostic 32-byte address.
pub type UniversalAddress = [u8; 32];

/// Authenticated caller identity.
pub type CallerId = [u8; 32];

/// The all-zero address. Doubles as the "not registered" sentinel.
pub const ZERO_ADDRESS: UniversalAddress = [0u8; 32];

/// Cross-chain messaging error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// Payload does not fit the 16-bit length field.
    #[error("Message too large: {len} bytes (max {max})")]
    MessageTooLarge {
        /// Payload length supplied.
        len: usize,
        /// Largest accepted payload length.
        max: usize,
    },

    /// Attached value differs from the publisher fee.
    #[error("Insufficient fee: supplied {supplied}, required {required}")]
    InsufficientFee {
        /// Value attached by the caller.
        supplied: u64,
        /// Fee quoted by the publisher.
        required: u64,
    },

    /// Envelope tag is not a recognized payload id.
    #[error("Invalid payload id: {0}")]
    InvalidPayloadId(u8),

    /// Envelope length field disagrees with the bytes present.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Total envelope length implied by the header.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// The verifier rejected the attestation.
    #[error("Attestation invalid: {0}")]
    AttestationInvalid(String),

    /// Emitter is not the registered trusted address for its chain.
    #[error("Unknown emitter on {0}")]
    UnknownEmitter(ChainId),

    /// Message hash has already been consumed.
    #[error("Message already consumed: {}", hex::encode(.0))]
    AlreadyConsumed(Hash),

    /// Caller is not the owner.
    #[error("Unauthorized caller")]
    Unauthorized,

    /// Chain id is reserved (zero or local).
    #[error("Invalid chain id: {0}")]
    InvalidChainId(u16),

    /// Address is the all-zero value.
    #[error("Invalid emitter address")]
    InvalidAddress,

    /// The publisher could not be reached or refused the message.
    #[error("Publisher failure: {0}")]
    PublisherFailure(String),

    /// The verifier could not be reached.
    #[error("Verifier failure: {0}")]
    VerifierFailure(String),

    /// Router configuration rejected.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_too_large_error() {
        let err = RelayError::MessageTooLarge {
            len: 65536,
            max: 65535,
        };
        assert!(err.to_string().contains("65536"));
    }

    #[test]
    fn test_insufficient_fee_error() {
        let err = RelayError::InsufficientFee {
            supplied: 5,
            required: 10,
        };
        assert_eq!(err.to_string(), "Insufficient fee: supplied 5, required 10");
    }

    #[test]
    fn test_already_consumed_error_shows_hex() {
        let err = RelayError::AlreadyConsumed([0xABu8; 32]);
        assert!(err.to_string().contains("abababab"));
    }

    #[test]
    fn test_attestation_invalid_keeps_reason() {
        let err = RelayError::AttestationInvalid("guardian quorum not met".to_string());
        assert!(err.to_string().contains("guardian quorum not met"));
    }

    #[test]
    fn test_unknown_emitter_error() {
        let err = RelayError::UnknownEmitter(ChainId(6));
        assert!(err.to_string().contains("chain-6"));
    }
}

//! # Outbound Ports
//!
//! Traits for the external attestation network. The relay trusts whatever
//! these report; it never inspects signatures itself.

use crate::domain::{ChainId, Finality, Hash, RelayError, UniversalAddress};
use async_trait::async_trait;

/// Verifier output, taken verbatim by the router.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedAttestation {
    /// Chain the emitter lives on.
    pub emitter_chain: ChainId,
    /// Emitter address.
    pub emitter_address: UniversalAddress,
    /// Message hash (replay key).
    pub hash: Hash,
    /// Attested payload (an encoded envelope).
    pub payload: Vec<u8>,
    /// Whether the attestation verified.
    pub valid: bool,
    /// Rejection reason when `valid` is false.
    pub reason: String,
}

impl ParsedAttestation {
    /// Build an invalid outcome carrying only a reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            emitter_chain: ChainId::UNSET,
            emitter_address: [0u8; 32],
            hash: [0u8; 32],
            payload: Vec::new(),
            valid: false,
            reason: reason.into(),
        }
    }
}

/// Attestation verifier - outbound port.
#[async_trait]
pub trait AttestationVerifier: Send + Sync {
    /// Parse and verify a raw attestation.
    ///
    /// `Err` means the verifier itself failed; a rejected attestation is
    /// `Ok` with `valid == false`.
    async fn parse_and_verify(&self, raw: &[u8]) -> Result<ParsedAttestation, RelayError>;
}

/// Message publisher - outbound port.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Current fee for one message.
    async fn fee_of(&self) -> Result<u64, RelayError>;

    /// Publish `payload`. Returns the emitter sequence number.
    async fn publish(
        &self,
        batch_id: u32,
        payload: Vec<u8>,
        finality: Finality,
    ) -> Result<u64, RelayError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock verifier returning a fixed outcome.
#[derive(Clone, Debug, Default)]
pub struct MockAttestationVerifier {
    /// Outcome to report. `None` reports an invalid attestation.
    pub outcome: Option<ParsedAttestation>,
    /// Should fail?
    pub should_fail: bool,
}

#[async_trait]
impl AttestationVerifier for MockAttestationVerifier {
    async fn parse_and_verify(&self, _raw: &[u8]) -> Result<ParsedAttestation, RelayError> {
        if self.should_fail {
            return Err(RelayError::VerifierFailure("Mock failure".to_string()));
        }
        Ok(self
            .outcome
            .clone()
            .unwrap_or_else(|| ParsedAttestation::invalid("no outcome configured")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_verifier_returns_outcome() {
        let outcome = ParsedAttestation {
            emitter_chain: ChainId(5),
            emitter_address: [1u8; 32],
            hash: [2u8; 32],
            payload: vec![0x01, 0x00, 0x00],
            valid: true,
            reason: String::new(),
        };
        let verifier = MockAttestationVerifier {
            outcome: Some(outcome.clone()),
            ..Default::default()
        };
        assert_eq!(verifier.parse_and_verify(&[]).await.unwrap(), outcome);
    }

    #[tokio::test]
    async fn test_mock_verifier_defaults_to_invalid() {
        let verifier = MockAttestationVerifier::default();
        let parsed = verifier.parse_and_verify(&[]).await.unwrap();
        assert!(!parsed.valid);
    }

    #[tokio::test]
    async fn test_mock_verifier_failure() {
        let verifier = MockAttestationVerifier {
            should_fail: true,
            ..Default::default()
        };
        assert!(matches!(
            verifier.parse_and_verify(&[]).await,
            Err(RelayError::VerifierFailure(_))
        ));
    }
}

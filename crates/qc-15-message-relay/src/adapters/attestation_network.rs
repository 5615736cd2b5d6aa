//! In-Memory Attestation Network Adapter
//!
//! Implements `MessagePublisher` and `AttestationVerifier` over a shared
//! in-process network. Published bodies are "signed" by recording their
//! digest; verification accepts exactly the recorded digests.

use crate::domain::{AttestationBody, ChainId, Finality, Hash, RelayError, UniversalAddress};
use crate::ports::outbound::{AttestationVerifier, MessagePublisher, ParsedAttestation};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Reason reported for well-formed bodies the network never attested.
pub const UNSIGNED_DIGEST_REASON: &str = "attestation digest not signed by network";

type EmitterKey = (ChainId, UniversalAddress);

/// In-memory attestation network for testing and local wiring.
///
/// In production, publishing and verification go through the real network.
pub struct InMemoryAttestationNetwork {
    /// Flat per-message fee.
    fee: RwLock<u64>,
    /// Network clock (unix seconds) stamped into bodies.
    current_time: RwLock<u32>,
    /// Next sequence per emitter.
    sequences: RwLock<HashMap<EmitterKey, u64>>,
    /// Digests the network has attested.
    attested: RwLock<HashSet<Hash>>,
    /// Raw bodies by (emitter, sequence).
    outbox: RwLock<HashMap<(ChainId, UniversalAddress, u64), Vec<u8>>>,
    /// Simulated transport outage.
    offline: RwLock<bool>,
}

impl InMemoryAttestationNetwork {
    /// Create a new network with zero fee.
    pub fn new() -> Self {
        Self {
            fee: RwLock::new(0),
            current_time: RwLock::new(1_700_000_000),
            sequences: RwLock::new(HashMap::new()),
            attested: RwLock::new(HashSet::new()),
            outbox: RwLock::new(HashMap::new()),
            offline: RwLock::new(false),
        }
    }

    /// Create a shared network with the given fee.
    pub fn with_fee(fee: u64) -> Arc<Self> {
        let network = Self::new();
        *network.fee.write() = fee;
        Arc::new(network)
    }

    /// Set the message fee.
    pub fn set_fee(&self, fee: u64) {
        *self.fee.write() = fee;
    }

    /// Advance the network clock.
    pub fn advance_time(&self, secs: u32) {
        let mut now = self.current_time.write();
        *now = now.saturating_add(secs);
    }

    /// Simulate a transport outage for both capabilities.
    pub fn set_offline(&self, offline: bool) {
        *self.offline.write() = offline;
    }

    /// Publisher bound to one emitter.
    pub fn publisher(
        self: &Arc<Self>,
        chain: ChainId,
        emitter: UniversalAddress,
    ) -> NetworkPublisher {
        NetworkPublisher {
            network: Arc::clone(self),
            chain,
            emitter,
        }
    }

    /// Verifier backed by this network.
    pub fn verifier(self: &Arc<Self>) -> NetworkVerifier {
        NetworkVerifier {
            network: Arc::clone(self),
        }
    }

    /// Raw attestation for a published message.
    pub fn attestation(
        &self,
        chain: ChainId,
        emitter: UniversalAddress,
        sequence: u64,
    ) -> Option<Vec<u8>> {
        self.outbox.read().get(&(chain, emitter, sequence)).cloned()
    }

    /// Serialize `body` without attesting it.
    pub fn forge(&self, body: &AttestationBody) -> Vec<u8> {
        body.serialize()
    }

    /// Sequence the emitter will be assigned next.
    pub fn next_sequence(&self, chain: ChainId, emitter: UniversalAddress) -> u64 {
        self.sequences
            .read()
            .get(&(chain, emitter))
            .copied()
            .unwrap_or(0)
    }

    /// Number of attested messages.
    pub fn attested_count(&self) -> usize {
        self.attested.read().len()
    }

    fn ensure_online(&self) -> Result<(), String> {
        if *self.offline.read() {
            return Err("attestation network unreachable".to_string());
        }
        Ok(())
    }

    fn attest(
        &self,
        chain: ChainId,
        emitter: UniversalAddress,
        batch_id: u32,
        payload: Vec<u8>,
        finality: Finality,
    ) -> Result<u64, RelayError> {
        let mut sequences = self.sequences.write();
        let next = sequences.entry((chain, emitter)).or_insert(0);
        let sequence = *next;
        *next = sequence
            .checked_add(1)
            .ok_or_else(|| RelayError::PublisherFailure("sequence overflow".to_string()))?;

        let body = AttestationBody {
            timestamp: *self.current_time.read(),
            nonce: batch_id,
            emitter_chain: chain,
            emitter_address: emitter,
            sequence,
            consistency_level: finality.consistency_level(),
            payload,
        };
        let digest = body.digest();

        self.attested.write().insert(digest);
        self.outbox
            .write()
            .insert((chain, emitter, sequence), body.serialize());

        info!(
            "[qc-15] Attested message {:02x}{:02x}... from {} seq={}",
            digest[0], digest[1], chain, sequence
        );

        Ok(sequence)
    }

    fn verify(&self, raw: &[u8]) -> ParsedAttestation {
        let body = match AttestationBody::parse(raw) {
            Ok(body) => body,
            Err(RelayError::AttestationInvalid(reason)) => {
                return ParsedAttestation::invalid(reason)
            }
            Err(other) => return ParsedAttestation::invalid(other.to_string()),
        };
        let hash = body.digest();
        let valid = self.attested.read().contains(&hash);

        debug!(
            "[qc-15] Verified {:02x}{:02x}... from {}: valid={}",
            hash[0], hash[1], body.emitter_chain, valid
        );

        ParsedAttestation {
            emitter_chain: body.emitter_chain,
            emitter_address: body.emitter_address,
            hash,
            payload: body.payload,
            valid,
            reason: if valid {
                String::new()
            } else {
                UNSIGNED_DIGEST_REASON.to_string()
            },
        }
    }
}

impl Default for InMemoryAttestationNetwork {
    fn default() -> Self {
        Self::new()
    }
}

/// Publisher handle for one emitter.
#[derive(Clone)]
pub struct NetworkPublisher {
    network: Arc<InMemoryAttestationNetwork>,
    chain: ChainId,
    emitter: UniversalAddress,
}

impl NetworkPublisher {
    /// Emitter chain.
    pub fn chain(&self) -> ChainId {
        self.chain
    }

    /// Emitter address.
    pub fn emitter(&self) -> UniversalAddress {
        self.emitter
    }
}

#[async_trait]
impl MessagePublisher for NetworkPublisher {
    async fn fee_of(&self) -> Result<u64, RelayError> {
        self.network
            .ensure_online()
            .map_err(RelayError::PublisherFailure)?;
        Ok(*self.network.fee.read())
    }

    async fn publish(
        &self,
        batch_id: u32,
        payload: Vec<u8>,
        finality: Finality,
    ) -> Result<u64, RelayError> {
        self.network
            .ensure_online()
            .map_err(RelayError::PublisherFailure)?;
        self.network
            .attest(self.chain, self.emitter, batch_id, payload, finality)
    }
}

/// Verifier handle.
#[derive(Clone)]
pub struct NetworkVerifier {
    network: Arc<InMemoryAttestationNetwork>,
}

#[async_trait]
impl AttestationVerifier for NetworkVerifier {
    async fn parse_and_verify(&self, raw: &[u8]) -> Result<ParsedAttestation, RelayError> {
        self.network
            .ensure_online()
            .map_err(RelayError::VerifierFailure)?;
        Ok(self.network.verify(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAIN: ChainId = ChainId(2);
    const EMITTER: UniversalAddress = [0xEEu8; 32];

    #[tokio::test]
    async fn test_publish_assigns_sequential_numbers() {
        let network = InMemoryAttestationNetwork::with_fee(0);
        let publisher = network.publisher(CHAIN, EMITTER);

        assert_eq!(publisher.publish(0, vec![1], Finality::Finalized).await.unwrap(), 0);
        assert_eq!(publisher.publish(0, vec![2], Finality::Finalized).await.unwrap(), 1);
        assert_eq!(network.next_sequence(CHAIN, EMITTER), 2);
        assert_eq!(network.attested_count(), 2);
    }

    #[tokio::test]
    async fn test_sequences_are_per_emitter() {
        let network = InMemoryAttestationNetwork::with_fee(0);
        let a = network.publisher(CHAIN, EMITTER);
        let b = network.publisher(CHAIN, [0xDDu8; 32]);

        a.publish(0, vec![], Finality::Finalized).await.unwrap();
        assert_eq!(b.publish(0, vec![], Finality::Finalized).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_published_body_verifies() {
        let network = InMemoryAttestationNetwork::with_fee(0);
        let publisher = network.publisher(CHAIN, EMITTER);
        let seq = publisher
            .publish(7, vec![0x01, 0x00, 0x00], Finality::Confirmed)
            .await
            .unwrap();

        let raw = network.attestation(CHAIN, EMITTER, seq).unwrap();
        let body = AttestationBody::parse(&raw).unwrap();
        assert_eq!(body.nonce, 7);
        assert_eq!(body.consistency_level, 0);

        let parsed = network.verifier().parse_and_verify(&raw).await.unwrap();
        assert!(parsed.valid);
        assert_eq!(parsed.emitter_chain, CHAIN);
        assert_eq!(parsed.emitter_address, EMITTER);
        assert_eq!(parsed.hash, body.digest());
        assert_eq!(parsed.payload, vec![0x01, 0x00, 0x00]);
    }

    #[tokio::test]
    async fn test_forged_body_rejected() {
        let network = InMemoryAttestationNetwork::with_fee(0);
        let raw = network.forge(&AttestationBody {
            timestamp: 1,
            nonce: 0,
            emitter_chain: CHAIN,
            emitter_address: EMITTER,
            sequence: 0,
            consistency_level: 1,
            payload: vec![],
        });

        let parsed = network.verifier().parse_and_verify(&raw).await.unwrap();
        assert!(!parsed.valid);
        assert_eq!(parsed.reason, UNSIGNED_DIGEST_REASON);
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let network = InMemoryAttestationNetwork::with_fee(0);
        let parsed = network.verifier().parse_and_verify(&[1, 2, 3]).await.unwrap();
        assert!(!parsed.valid);
        assert!(parsed.reason.starts_with("malformed attestation"));
    }

    #[tokio::test]
    async fn test_fee_quote() {
        let network = InMemoryAttestationNetwork::with_fee(25);
        let publisher = network.publisher(CHAIN, EMITTER);
        assert_eq!(publisher.fee_of().await.unwrap(), 25);
        network.set_fee(30);
        assert_eq!(publisher.fee_of().await.unwrap(), 30);
    }

    #[tokio::test]
    async fn test_offline_network_fails_both_ports() {
        let network = InMemoryAttestationNetwork::with_fee(0);
        network.set_offline(true);

        let publisher = network.publisher(CHAIN, EMITTER);
        assert!(matches!(
            publisher.fee_of().await,
            Err(RelayError::PublisherFailure(_))
        ));
        assert!(matches!(
            publisher.publish(0, vec![], Finality::Finalized).await,
            Err(RelayError::PublisherFailure(_))
        ));
        assert!(matches!(
            network.verifier().parse_and_verify(&[]).await,
            Err(RelayError::VerifierFailure(_))
        ));
        assert_eq!(network.next_sequence(CHAIN, EMITTER), 0);
    }

    #[tokio::test]
    async fn test_clock_stamped_into_body() {
        let network = InMemoryAttestationNetwork::with_fee(0);
        network.advance_time(60);
        let seq = network
            .publisher(CHAIN, EMITTER)
            .publish(0, vec![], Finality::Finalized)
            .await
            .unwrap();
        let raw = network.attestation(CHAIN, EMITTER, seq).unwrap();
        let body = AttestationBody::parse(&raw).unwrap();
        assert_eq!(body.timestamp, 1_700_000_060);
    }
}

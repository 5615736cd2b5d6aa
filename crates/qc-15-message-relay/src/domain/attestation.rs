//! # Attestation Body
//!
//! The body an attestation network signs over. Its Keccak-256 digest is the
//! message hash used for replay protection.
//!
//! ```text
//! timestamp          u32  big-endian
//! nonce              u32  big-endian (batch id)
//! emitter_chain      u16  big-endian
//! emitter_address    [u8; 32]
//! sequence           u64  big-endian
//! consistency_level  u8
//! payload            remaining bytes
//! ```

use super::errors::{Hash, RelayError, UniversalAddress};
use super::value_objects::ChainId;
use sha3::{Digest, Keccak256};

/// Fixed-size prefix before the payload.
pub const ATTESTATION_BODY_HEADER_LEN: usize = 4 + 4 + 2 + 32 + 8 + 1;

/// Attested message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttestationBody {
    /// Observation time (unix seconds).
    pub timestamp: u32,
    /// Batch id supplied at publish time.
    pub nonce: u32,
    /// Chain the emitter lives on.
    pub emitter_chain: ChainId,
    /// Emitter address.
    pub emitter_address: UniversalAddress,
    /// Per-emitter sequence number.
    pub sequence: u64,
    /// Requested finality.
    pub consistency_level: u8,
    /// Published bytes (an encoded envelope for this relay).
    pub payload: Vec<u8>,
}

impl AttestationBody {
    /// Serialize to the signed wire layout.
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(ATTESTATION_BODY_HEADER_LEN + self.payload.len());
        bytes.extend_from_slice(&self.timestamp.to_be_bytes());
        bytes.extend_from_slice(&self.nonce.to_be_bytes());
        bytes.extend_from_slice(&self.emitter_chain.value().to_be_bytes());
        bytes.extend_from_slice(&self.emitter_address);
        bytes.extend_from_slice(&self.sequence.to_be_bytes());
        bytes.push(self.consistency_level);
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// Parse the signed wire layout.
    pub fn parse(bytes: &[u8]) -> Result<Self, RelayError> {
        if bytes.len() < ATTESTATION_BODY_HEADER_LEN {
            return Err(RelayError::AttestationInvalid(format!(
                "malformed attestation: {} bytes, need at least {}",
                bytes.len(),
                ATTESTATION_BODY_HEADER_LEN
            )));
        }

        let (header, payload) = bytes.split_at(ATTESTATION_BODY_HEADER_LEN);
        let mut emitter_address = [0u8; 32];
        emitter_address.copy_from_slice(&header[10..42]);
        let mut sequence = [0u8; 8];
        sequence.copy_from_slice(&header[42..50]);

        Ok(Self {
            timestamp: u32::from_be_bytes([header[0], header[1], header[2], header[3]]),
            nonce: u32::from_be_bytes([header[4], header[5], header[6], header[7]]),
            emitter_chain: ChainId(u16::from_be_bytes([header[8], header[9]])),
            emitter_address,
            sequence: u64::from_be_bytes(sequence),
            consistency_level: header[50],
            payload: payload.to_vec(),
        })
    }

    /// Keccak-256 of the serialized body.
    pub fn digest(&self) -> Hash {
        let mut hasher = Keccak256::new();
        hasher.update(self.serialize());
        hasher.finalize().into()
    }
}

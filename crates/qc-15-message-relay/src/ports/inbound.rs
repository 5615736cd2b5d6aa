//! # Inbound Ports
//!
//! API trait defining what the message relay can do.

use crate::domain::{CallerId, ChainId, Hash, RelayError, UniversalAddress};
use async_trait::async_trait;

/// Message relay API - inbound port.
#[async_trait]
pub trait MessageRelayApi: Send + Sync {
    /// Publish `payload`, paying exactly the publisher fee. Returns the
    /// publisher's sequence number.
    async fn send_message(&self, payload: Vec<u8>, fee: u64) -> Result<u64, RelayError>;

    /// Accept an attested message from a trusted remote emitter, at most once.
    async fn receive_message(&self, attestation: &[u8]) -> Result<(), RelayError>;

    /// Register the trusted emitter for `chain`. Owner only.
    fn register_emitter(
        &self,
        caller: &CallerId,
        chain: ChainId,
        address: UniversalAddress,
    ) -> Result<(), RelayError>;

    /// Trusted emitter for `chain`, if any.
    fn get_registered_emitter(&self, chain: ChainId) -> Option<UniversalAddress>;

    /// Check if the message with `hash` was consumed.
    fn is_message_consumed(&self, hash: &Hash) -> bool;

    /// Payload stored for a consumed message.
    fn get_message_payload(&self, hash: &Hash) -> Option<Vec<u8>>;
}

//! Message Router Service
//!
//! Orchestrates send and receive over the domain components and the two
//! outbound ports.
//!
//! ```text
//! send:    size check -> fee check -> encode -> publish -> sequence
//! receive: verify -> emitter check -> decode -> replay check -> consume
//! ```
//!
//! All validation runs before the single mutation of each operation, and
//! registry and replay state share one lock per router, so a failed call
//! never leaves partial state and two receives of one hash cannot both pass
//! the replay check.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::RouterConfig;
use crate::domain::{
    invariant_exact_fee, CallerId, ChainId, EmitterRegistry, Hash, Message, RelayError,
    ReplayGuard, UniversalAddress,
};
use crate::ports::{AttestationVerifier, MessagePublisher, MessageRelayApi, ParsedAttestation};

/// Batch id passed to the publisher. Batching is not used.
pub const BATCH_ID: u32 = 0;

/// State owned by one router instance.
struct RouterState {
    emitters: EmitterRegistry,
    replay: ReplayGuard,
}

/// Message router.
///
/// Implements the `MessageRelayApi` port using injected dependencies.
pub struct MessageRouter<V: AttestationVerifier, P: MessagePublisher> {
    config: RouterConfig,
    /// Attestation verifier (driven port)
    verifier: Arc<V>,
    /// Message publisher (driven port)
    publisher: Arc<P>,
    state: Mutex<RouterState>,
}

impl<V: AttestationVerifier, P: MessagePublisher> MessageRouter<V, P> {
    /// Create a router. Fails if the config does not validate.
    pub fn new(
        config: RouterConfig,
        verifier: Arc<V>,
        publisher: Arc<P>,
    ) -> Result<Self, RelayError> {
        config.validate()?;

        info!(
            "[qc-15] Message router starting on {} (finality {:?})",
            config.local_chain_id, config.finality
        );

        let state = RouterState {
            emitters: EmitterRegistry::new(config.owner, config.local_chain_id),
            replay: ReplayGuard::new(),
        };

        Ok(Self {
            config,
            verifier,
            publisher,
            state: Mutex::new(state),
        })
    }

    /// Router configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Registry owner.
    pub fn owner(&self) -> CallerId {
        self.config.owner
    }

    /// Local chain id.
    pub fn local_chain_id(&self) -> ChainId {
        self.config.local_chain_id
    }

    /// Number of consumed messages.
    pub fn consumed_count(&self) -> usize {
        self.state.lock().replay.len()
    }

    /// Emitter check, decode, replay check and consume under one lock.
    fn commit_receipt(&self, parsed: ParsedAttestation) -> Result<(), RelayError> {
        let mut state = self.state.lock();

        if !state
            .emitters
            .is_trusted(parsed.emitter_chain, &parsed.emitter_address)
        {
            warn!(
                "[qc-15] Rejected message from untrusted emitter on {}",
                parsed.emitter_chain
            );
            return Err(RelayError::UnknownEmitter(parsed.emitter_chain));
        }

        let message = Message::decode(&parsed.payload)?;

        if state.replay.is_consumed(&parsed.hash) {
            warn!(
                "[qc-15] Replay of {:02x}{:02x}... rejected",
                parsed.hash[0], parsed.hash[1]
            );
            return Err(RelayError::AlreadyConsumed(parsed.hash));
        }

        state.replay.consume(parsed.hash, message.into_payload())?;

        info!(
            "[qc-15] Consumed message {:02x}{:02x}... from {}",
            parsed.hash[0], parsed.hash[1], parsed.emitter_chain
        );
        Ok(())
    }
}

#[async_trait]
impl<V, P> MessageRelayApi for MessageRouter<V, P>
where
    V: AttestationVerifier + 'static,
    P: MessagePublisher + 'static,
{
    async fn send_message(&self, payload: Vec<u8>, fee: u64) -> Result<u64, RelayError> {
        // 1. Size
        let message = Message::new(payload)?;

        // 2. Fee
        let required = self.publisher.fee_of().await?;
        invariant_exact_fee(fee, required)?;

        // 3. Encode and publish
        let sequence = self
            .publisher
            .publish(BATCH_ID, message.encode(), self.config.finality)
            .await?;

        info!(
            "[qc-15] Sent {} byte message, sequence {}",
            message.payload().len(),
            sequence
        );
        Ok(sequence)
    }

    async fn receive_message(&self, attestation: &[u8]) -> Result<(), RelayError> {
        let parsed = self.verifier.parse_and_verify(attestation).await?;
        if !parsed.valid {
            warn!("[qc-15] Attestation rejected: {}", parsed.reason);
            return Err(RelayError::AttestationInvalid(parsed.reason));
        }

        self.commit_receipt(parsed)
    }

    fn register_emitter(
        &self,
        caller: &CallerId,
        chain: ChainId,
        address: UniversalAddress,
    ) -> Result<(), RelayError> {
        let mut state = self.state.lock();
        match state.emitters.register(caller, chain, address) {
            Ok(previous) => {
                info!(
                    "[qc-15] Registered emitter {}... for {} (replaced: {})",
                    hex::encode(&address[..4]),
                    chain,
                    previous.is_some()
                );
                Ok(())
            }
            Err(e) => {
                warn!("[qc-15] Emitter registration for {} refused: {}", chain, e);
                Err(e)
            }
        }
    }

    fn get_registered_emitter(&self, chain: ChainId) -> Option<UniversalAddress> {
        self.state.lock().emitters.lookup(chain)
    }

    fn is_message_consumed(&self, hash: &Hash) -> bool {
        self.state.lock().replay.is_consumed(hash)
    }

    fn get_message_payload(&self, hash: &Hash) -> Option<Vec<u8>> {
        self.state
            .lock()
            .replay
            .record(hash)
            .map(|r| r.payload.clone())
    }
}

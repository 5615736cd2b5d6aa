//! # Emitter Registry
//!
//! Trusted remote emitter per connected chain. At most one address per
//! chain; re-registration overwrites and no history is kept.

use super::errors::{CallerId, RelayError, UniversalAddress};
use super::invariants::{invariant_nonzero_address, invariant_owner, invariant_remote_chain};
use super::value_objects::ChainId;
use std::collections::HashMap;

/// Registry of trusted remote emitters.
///
/// The zero address can never be stored, so `None` from [`lookup`] is the
/// only representation of "not registered".
///
/// [`lookup`]: EmitterRegistry::lookup
#[derive(Clone, Debug)]
pub struct EmitterRegistry {
    owner: CallerId,
    local_chain: ChainId,
    emitters: HashMap<ChainId, UniversalAddress>,
}

impl EmitterRegistry {
    /// Create an empty registry.
    pub fn new(owner: CallerId, local_chain: ChainId) -> Self {
        Self {
            owner,
            local_chain,
            emitters: HashMap::new(),
        }
    }

    /// Registry owner.
    pub fn owner(&self) -> &CallerId {
        &self.owner
    }

    /// Local chain id (never registrable).
    pub fn local_chain(&self) -> ChainId {
        self.local_chain
    }

    /// Register or overwrite the trusted emitter for `chain`.
    ///
    /// Checks run owner, chain, address in that order; nothing is written
    /// unless all pass.
    pub fn register(
        &mut self,
        caller: &CallerId,
        chain: ChainId,
        address: UniversalAddress,
    ) -> Result<Option<UniversalAddress>, RelayError> {
        invariant_owner(caller, &self.owner)?;
        invariant_remote_chain(chain, self.local_chain)?;
        invariant_nonzero_address(&address)?;

        Ok(self.emitters.insert(chain, address))
    }

    /// Trusted emitter for `chain`, if any.
    pub fn lookup(&self, chain: ChainId) -> Option<UniversalAddress> {
        self.emitters.get(&chain).copied()
    }

    /// Check that `address` is the registered emitter for `chain`.
    pub fn is_trusted(&self, chain: ChainId, address: &UniversalAddress) -> bool {
        self.emitters.get(&chain) == Some(address)
    }

    /// Number of registered chains.
    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    /// Check if no chains are registered.
    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }
}

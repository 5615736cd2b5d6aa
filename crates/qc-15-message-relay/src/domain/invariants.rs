//! # Domain Invariants
//!
//! Business rules for Cross-Chain Messaging. Each guard is pure so the
//! router can run all of them before it mutates anything.

use super::errors::{CallerId, RelayError, UniversalAddress, ZERO_ADDRESS};
use super::value_objects::ChainId;

/// Largest payload the 16-bit envelope length field can describe.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Invariant: payload fits the envelope length field.
pub fn invariant_payload_fits(len: usize) -> Result<(), RelayError> {
    if len > MAX_PAYLOAD_LEN {
        return Err(RelayError::MessageTooLarge {
            len,
            max: MAX_PAYLOAD_LEN,
        });
    }
    Ok(())
}

/// Invariant: attached value equals the quoted fee exactly.
///
/// Overpaying is rejected just like underpaying.
pub fn invariant_exact_fee(supplied: u64, required: u64) -> Result<(), RelayError> {
    if supplied != required {
        return Err(RelayError::InsufficientFee { supplied, required });
    }
    Ok(())
}

/// Invariant: only the owner mutates the registry.
pub fn invariant_owner(caller: &CallerId, owner: &CallerId) -> Result<(), RelayError> {
    if caller != owner {
        return Err(RelayError::Unauthorized);
    }
    Ok(())
}

/// Invariant: a remote chain id is neither zero nor the local chain.
pub fn invariant_remote_chain(chain: ChainId, local_chain: ChainId) -> Result<(), RelayError> {
    if chain.is_unset() || chain == local_chain {
        return Err(RelayError::InvalidChainId(chain.value()));
    }
    Ok(())
}

/// Invariant: emitter addresses are never the zero sentinel.
pub fn invariant_nonzero_address(address: &UniversalAddress) -> Result<(), RelayError> {
    if *address == ZERO_ADDRESS {
        return Err(RelayError::InvalidAddress);
    }
    Ok(())
}

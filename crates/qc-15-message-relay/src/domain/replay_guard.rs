//! # Replay Guard
//!
//! Ledger of consumed message hashes. A record is created on the first
//! successful receipt of a hash and is terminal from then on.

use super::errors::{Hash, RelayError};
use std::collections::HashMap;

/// Stored outcome of a consumed message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRecord {
    /// Decoded application payload.
    pub payload: Vec<u8>,
    /// Always `true` once stored; never reverts.
    pub consumed: bool,
}

/// Replay-protection ledger keyed by message hash.
#[derive(Clone, Debug, Default)]
pub struct ReplayGuard {
    records: HashMap<Hash, MessageRecord>,
}

impl ReplayGuard {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if `hash` was consumed. Unseen hashes are not consumed.
    pub fn is_consumed(&self, hash: &Hash) -> bool {
        self.records.get(hash).is_some_and(|r| r.consumed)
    }

    /// Record `payload` under `hash` and mark it consumed.
    ///
    /// Callers hold the router lock across the `is_consumed` check and this
    /// call. A second consume of the same hash is refused and leaves the
    /// first record intact.
    pub fn consume(&mut self, hash: Hash, payload: Vec<u8>) -> Result<(), RelayError> {
        if self.is_consumed(&hash) {
            return Err(RelayError::AlreadyConsumed(hash));
        }
        self.records.insert(
            hash,
            MessageRecord {
                payload,
                consumed: true,
            },
        );
        Ok(())
    }

    /// Stored record for `hash`.
    pub fn record(&self, hash: &Hash) -> Option<&MessageRecord> {
        self.records.get(hash)
    }

    /// Number of consumed messages.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing has been consumed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unseen_hash_not_consumed() {
        let guard = ReplayGuard::new();
        assert!(!guard.is_consumed(&[1u8; 32]));
        assert!(guard.record(&[1u8; 32]).is_none());
    }

    #[test]
    fn test_consume_marks_and_stores() {
        let mut guard = ReplayGuard::new();
        guard.consume([1u8; 32], b"first".to_vec()).unwrap();

        assert!(guard.is_consumed(&[1u8; 32]));
        let record = guard.record(&[1u8; 32]).unwrap();
        assert!(record.consumed);
        assert_eq!(record.payload, b"first".to_vec());
    }

    #[test]
    fn test_second_consume_rejected_and_payload_kept() {
        let mut guard = ReplayGuard::new();
        guard.consume([1u8; 32], b"first".to_vec()).unwrap();

        let result = guard.consume([1u8; 32], b"second".to_vec());
        assert_eq!(result, Err(RelayError::AlreadyConsumed([1u8; 32])));
        assert_eq!(guard.record(&[1u8; 32]).unwrap().payload, b"first".to_vec());
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn test_distinct_hashes_independent() {
        let mut guard = ReplayGuard::new();
        guard.consume([1u8; 32], vec![]).unwrap();
        assert!(!guard.is_consumed(&[2u8; 32]));
        guard.consume([2u8; 32], vec![9]).unwrap();
        assert_eq!(guard.len(), 2);
    }
}

//! # Domain Module
//!
//! Core domain types for Cross-Chain Messaging: the envelope codec, the
//! trusted-emitter registry and the replay ledger.

pub mod attestation;
pub mod emitter_registry;
pub mod errors;
pub mod invariants;
pub mod message;
pub mod replay_guard;
pub mod value_objects;

pub use attestation::*;
pub use emitter_registry::EmitterRegistry;
pub use errors::*;
pub use invariants::*;
pub use message::*;
pub use replay_guard::{MessageRecord, ReplayGuard};
pub use value_objects::*;

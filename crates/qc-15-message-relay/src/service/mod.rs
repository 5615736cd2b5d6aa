//! Service layer
//!
//! Orchestrates domain logic and coordinates with external dependencies.

mod router;

pub use router::{MessageRouter, BATCH_ID};

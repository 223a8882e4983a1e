//! Port contracts for the task board.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod blob_store;
pub mod suggestion;

pub use blob_store::{BlobStore, BlobStoreError, BlobStoreResult};
pub use suggestion::{GatewayError, GatewayResult, SuggestionGateway, SuggestionRecord};

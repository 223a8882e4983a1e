//! Personal task board state engine.
//!
//! The board keeps a collection of tasks moving through four workflow
//! stages, persists every change to a single named blob, derives filtered
//! and ordered stage columns for display, resolves drag gestures into stage
//! moves and reorders, and proxies an optional suggestion provider. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

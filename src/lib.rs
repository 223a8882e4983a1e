//! Taskboard: state engine for a personal task board.
//!
//! The crate keeps a single user's tasks moving through four workflow
//! stages, persists the collection after every change, derives the filtered
//! and ordered board view, resolves drag gestures into moves and reorders,
//! and surfaces task suggestions from a pluggable provider.
//!
//! # Architecture
//!
//! The board follows hexagonal architecture principles:
//!
//! - **Domain**: Tasks, stages, and identifiers with no infrastructure
//!   dependencies
//! - **Ports**: Trait interfaces for blob storage and suggestions
//! - **Adapters**: In-memory and directory blob stores, a canned suggestion
//!   gateway, and a manual clock
//!
//! # Modules
//!
//! - [`board`]: The task board bounded context
//! - [`app`]: Session composition root
//! - [`config`]: Layered configuration
//! - [`logging`]: Tracing subscriber setup

pub mod app;
pub mod board;
pub mod config;
pub mod logging;

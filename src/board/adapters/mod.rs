//! Adapter implementations for board ports.

pub mod clock;
pub mod fs;
pub mod memory;
pub mod mock;

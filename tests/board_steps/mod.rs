//! Step definitions shared by the task board behaviour tests.

mod given;
mod then;
mod when;
pub mod world;

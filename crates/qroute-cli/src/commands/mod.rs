//! CLI command implementations.

pub mod bench;
pub mod common;
pub mod generate;
pub mod route;
pub mod verify;
pub mod version;

//! Domain logic shared by the SAMS gateway crates.
//!
//! Pure functions and types only -- no I/O, no HTTP. The gateway's
//! handlers and the upstream client both build on this crate.

pub mod error;
pub mod literal;

//! # Bully peer test cases
//!
//! This subproject provides integration tests for the Bully algorithm over real
//! TCP connections between peers started in one process.

#[macro_use]
extern crate log;
mod steps;

pub use self::cases::smoke;

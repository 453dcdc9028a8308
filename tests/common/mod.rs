//! Common test utilities for integration tests.
//!
//! - `fixtures`: isolated invocations of the `oraq` binary
//! - `logger`: structured test logging
//! - `node`: in-process gRPC oracle node

pub mod fixtures;
pub mod logger;
pub mod node;

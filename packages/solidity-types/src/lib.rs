//! Solidity-compatible types for the SP1 ICS-07 Tendermint light client.
//!
//! Everything that crosses the proof boundary is ABI-encoded with the
//! definitions in this crate. The SP1 programs commit their public values
//! with the same definitions, so any change here is a breaking change to the
//! proof contract.

#![deny(clippy::nursery, clippy::pedantic, warnings, unused_crate_dependencies)]

pub mod msgs;

//! The SP1 ICS-07 Tendermint light client.
//!
//! This crate implements the on-chain half of the light client: the
//! persistent state (client state and trusted consensus state hashes), the
//! four message handlers driven by SP1 proofs, and the per-transaction cache
//! that lets one batched membership proof serve many queries. Consensus
//! verification itself happens inside the SP1 programs; this side only binds
//! each proof's public values to the state trusted here and applies the
//! resulting transition.
//!
//! The proof system is abstracted behind [`Sp1Verifier`], and the host
//! chain's atomic-transaction semantics are modeled by the client itself:
//! every handler call (or [`Sp1Ics07Tendermint::multicall`] batch) either
//! commits all of its writes or none of them.

#![deny(missing_docs, clippy::nursery, clippy::pedantic, warnings)]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub mod cache;
pub mod client;
pub mod error;
pub mod state;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod validation;
pub mod verifier;

mod membership;
mod misbehaviour;
mod update_client;

pub use client::{CallResult, ClientCall, ProgramVkeys, Sp1Ics07Tendermint, UpdateResult};
pub use error::ClientError;
pub use membership::{MAX_KV_PAIRS_PER_PROOF, MIN_KV_PAIRS_PER_PROOF};
pub use verifier::{Sp1Verifier, VerifierError};

#[cfg(feature = "groth16")]
pub use verifier::Sp1Groth16Verifier;

/// Returns the given error from the enclosing function unless the condition
/// holds.
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !($cond) {
            return Err($err);
        }
    };
}

pub(crate) use ensure;

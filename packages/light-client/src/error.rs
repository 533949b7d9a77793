//! Defines [`ClientError`].

use alloy_primitives::{Bytes, B256};
use sp1_ics07_solidity_types::msgs::Height;

use crate::verifier::VerifierError;

/// Errors returned by the light client handlers.
///
/// Every error is fatal to the enclosing transaction: persistent writes made
/// before the failure unwind. The only exception is the freeze accompanying
/// [`ClientError::CannotHandleMisbehavior`], which is re-applied after the
/// unwind (see [`crate::client`]).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A write-capable handler was invoked on a frozen client.
    #[error("client is frozen")]
    FrozenClientState,

    /// The proof is tagged with the wrong program.
    #[error("verification key mismatch: expected {expected}, got {actual}")]
    VerificationKeyMismatch {
        /// The verification key of the expected program.
        expected: B256,
        /// The verification key carried by the proof.
        actual: B256,
    },

    /// A consensus state in the public values does not hash to the stored
    /// trusted hash.
    #[error("consensus state hash mismatch: stored {expected}, computed {actual}")]
    ConsensusStateHashMismatch {
        /// The hash stored for the height.
        expected: B256,
        /// The canonical hash of the submitted consensus state.
        actual: B256,
    },

    /// The proof's commitment root differs from the trusted consensus
    /// state's root.
    #[error("commitment root mismatch: expected {expected}, got {actual}")]
    ConsensusStateRootMismatch {
        /// The trusted consensus state's root.
        expected: B256,
        /// The root committed by the proof.
        actual: B256,
    },

    /// No consensus state has been trusted at the given height.
    #[error("no consensus state stored at revision height {revision_height}")]
    ConsensusStateNotFound {
        /// The revision height that was queried.
        revision_height: u64,
    },

    /// The prover ran against a different chain id.
    #[error("chain id mismatch: expected {expected}, got {actual}")]
    ChainIdMismatch {
        /// The stored chain id.
        expected: String,
        /// The chain id in the public values.
        actual: String,
    },

    /// The prover ran with a different trust threshold.
    #[error(
        "trust threshold mismatch: expected {expected_numerator}/{expected_denominator}, \
         got {actual_numerator}/{actual_denominator}"
    )]
    TrustThresholdMismatch {
        /// The stored numerator.
        expected_numerator: u64,
        /// The stored denominator.
        expected_denominator: u64,
        /// The numerator in the public values.
        actual_numerator: u64,
        /// The denominator in the public values.
        actual_denominator: u64,
    },

    /// The prover ran with a different trusting period.
    #[error("trusting period mismatch: expected {expected}, got {actual}")]
    TrustingPeriodMismatch {
        /// The stored trusting period in seconds.
        expected: u64,
        /// The trusting period in the public values.
        actual: u64,
    },

    /// The prover ran with a different unbonding period.
    #[error("unbonding period mismatch: expected {expected}, got {actual}")]
    UnbondingPeriodMismatch {
        /// The stored unbonding period in seconds.
        expected: u64,
        /// The unbonding period in the public values.
        actual: u64,
    },

    /// The proof's clock reading is ahead of the host's clock.
    #[error("proof time {proof_time} is in the future (now: {now})")]
    ProofIsInTheFuture {
        /// The host's unix timestamp in seconds.
        now: u64,
        /// The time committed in the public values.
        proof_time: u64,
    },

    /// The proof's clock reading is older than the allowed drift, so the
    /// proof could be a replay.
    #[error("proof time {proof_time} is too old (now: {now})")]
    ProofIsTooOld {
        /// The host's unix timestamp in seconds.
        now: u64,
        /// The time committed in the public values.
        proof_time: u64,
    },

    /// No key-value pair in the batched proof carries the requested path.
    #[error("no key-value pair in the proof has path ({path})", path = fmt_path(path))]
    MembershipProofKeyNotFound {
        /// The requested path.
        path: Vec<Bytes>,
    },

    /// The value proven for the requested path differs from the requested
    /// value.
    #[error(
        "membership value mismatch: expected ({expected}), got ({actual})",
        expected = hex::encode(expected),
        actual = hex::encode(actual)
    )]
    MembershipProofValueMismatch {
        /// The requested value.
        expected: Bytes,
        /// The value carried by the proof.
        actual: Bytes,
    },

    /// The batched proof carries an out-of-range number of key-value pairs.
    #[error("kv pair count {actual} out of range [{min}, {max}]")]
    LengthIsOutOfRange {
        /// The number of pairs in the proof.
        actual: usize,
        /// The smallest allowed batch.
        min: usize,
        /// The largest allowed batch.
        max: usize,
    },

    /// The membership proof envelope carries an unknown tag.
    #[error("unknown membership proof type: {0}")]
    UnknownMembershipProofType(u8),

    /// The pair was not verified earlier in this transaction.
    #[error(
        "key-value pair not in the transaction cache: path ({path}), value ({value})",
        path = fmt_path(path),
        value = hex::encode(value)
    )]
    KeyValuePairNotInCache {
        /// The requested path.
        path: Vec<Bytes>,
        /// The requested value.
        value: Bytes,
    },

    /// The queried proof height differs from the height the combined proof
    /// updates to.
    #[error(
        "proof height mismatch: expected {}-{}, got {}-{}",
        expected.revisionNumber,
        expected.revisionHeight,
        actual.revisionNumber,
        actual.revisionHeight
    )]
    ProofHeightMismatch {
        /// The height the combined proof updates to.
        expected: Height,
        /// The height the query asked for.
        actual: Height,
    },

    /// A combined update-and-membership proof detected misbehaviour; the
    /// client freezes and refuses to serve the membership query.
    #[error("cannot serve membership: the update is misbehaviour")]
    CannotHandleMisbehavior,

    /// The client state was constructed with a trusting period exceeding the
    /// unbonding period.
    #[error(
        "trusting period {trusting_period} is longer than the unbonding period {unbonding_period}"
    )]
    TrustingPeriodTooLong {
        /// The trusting period in seconds.
        trusting_period: u64,
        /// The unbonding period in seconds.
        unbonding_period: u64,
    },

    /// The operation is reserved for a future version of the client.
    #[error("feature is not supported")]
    FeatureNotSupported,

    /// The verifier rejected the proof. The inner error is whatever the
    /// verifier reported, propagated verbatim.
    #[error("proof verification failed: {0}")]
    VerificationFailed(#[from] VerifierError),

    /// A message or public-value blob is not valid canonical encoding.
    #[error("abi decoding failed: {0}")]
    DecodeFailed(#[from] alloy_sol_types::Error),
}

fn fmt_path(path: &[Bytes]) -> String {
    path.iter().map(hex::encode).collect::<Vec<_>>().join("/")
}

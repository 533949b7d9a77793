//! Public-input validation binding proof outputs to stored state.
//!
//! These checks are the security boundary of the client: the SP1 programs
//! prove consensus transitions over whatever inputs the prover fed them, and
//! the checks here are what ties those inputs to the state trusted on this
//! side.

use alloy_primitives::B256;
use sp1_ics07_solidity_types::msgs::{ClientState, ConsensusState, UpdateClientOutput};

use crate::{
    client::{Transaction, UpdateResult},
    ensure,
    error::ClientError,
    verifier::Sp1Verifier,
};

/// Maximum age of a proof's clock reading, in seconds.
///
/// Bounds how stale the time committed in the public values may be relative
/// to the host's clock, so that an old proof cannot be replayed in a later
/// block.
pub const ALLOWED_SP1_CLOCK_DRIFT: u64 = 30 * 60;

impl<V: Sp1Verifier> Transaction<'_, V> {
    /// Checks that the client state the prover ran against matches the one
    /// stored here, and that the proof's clock reading is within the drift
    /// window.
    ///
    /// `latestHeight` and `isFrozen` are intentionally not compared: the
    /// prover's view of both is allowed to lag the state stored here.
    pub(crate) fn validate_client_state_and_time(
        &self,
        public_client_state: &ClientState,
        time: u64,
    ) -> Result<(), ClientError> {
        ensure!(
            time <= self.now,
            ClientError::ProofIsInTheFuture {
                now: self.now,
                proof_time: time,
            }
        );
        ensure!(
            self.now - time <= ALLOWED_SP1_CLOCK_DRIFT,
            ClientError::ProofIsTooOld {
                now: self.now,
                proof_time: time,
            }
        );

        let client_state = self.store.client_state();
        ensure!(
            public_client_state.chainId == client_state.chainId,
            ClientError::ChainIdMismatch {
                expected: client_state.chainId.clone(),
                actual: public_client_state.chainId.clone(),
            }
        );
        ensure!(
            public_client_state.trustLevel == client_state.trustLevel,
            ClientError::TrustThresholdMismatch {
                expected_numerator: client_state.trustLevel.numerator,
                expected_denominator: client_state.trustLevel.denominator,
                actual_numerator: public_client_state.trustLevel.numerator,
                actual_denominator: public_client_state.trustLevel.denominator,
            }
        );
        ensure!(
            public_client_state.trustingPeriod == client_state.trustingPeriod,
            ClientError::TrustingPeriodMismatch {
                expected: client_state.trustingPeriod,
                actual: public_client_state.trustingPeriod,
            }
        );
        ensure!(
            public_client_state.unbondingPeriod == client_state.unbondingPeriod,
            ClientError::UnbondingPeriodMismatch {
                expected: client_state.unbondingPeriod,
                actual: public_client_state.unbondingPeriod,
            }
        );

        Ok(())
    }

    /// Checks that a membership proof's commitment root is the root of a
    /// consensus state trusted at `revision_height`.
    pub(crate) fn validate_membership_output(
        &self,
        output_root: B256,
        revision_height: u64,
        trusted_consensus_state: &ConsensusState,
    ) -> Result<(), ClientError> {
        let stored = self.store.consensus_state_hash(revision_height)?;
        let computed = trusted_consensus_state.keccak256_hash();
        ensure!(
            stored == computed,
            ClientError::ConsensusStateHashMismatch {
                expected: stored,
                actual: computed,
            }
        );
        ensure!(
            output_root == trusted_consensus_state.root,
            ClientError::ConsensusStateRootMismatch {
                expected: trusted_consensus_state.root,
                actual: output_root,
            }
        );

        Ok(())
    }

    /// Checks that the consensus state the prover trusted hashes to the one
    /// stored at its height.
    pub(crate) fn validate_trusted_consensus_state(
        &self,
        revision_height: u64,
        trusted_consensus_state: &ConsensusState,
    ) -> Result<(), ClientError> {
        let stored = self.store.consensus_state_hash(revision_height)?;
        let computed = trusted_consensus_state.keccak256_hash();
        ensure!(
            stored == computed,
            ClientError::ConsensusStateHashMismatch {
                expected: stored,
                actual: computed,
            }
        );

        Ok(())
    }

    /// Decides what an update's public values mean against the stored map.
    ///
    /// Decided purely from on-chain state: an unknown height is a fresh
    /// update; a known height with a conflicting consensus state, or a
    /// timestamp that does not advance past the trusted one, is
    /// misbehaviour; a known height with the identical consensus state is a
    /// no-op.
    pub(crate) fn check_update_result(&self, output: &UpdateClientOutput) -> UpdateResult {
        let stored = self
            .store
            .raw_consensus_state_hash(output.newHeight.revisionHeight);

        if stored.is_zero() {
            UpdateResult::Update
        } else if stored != output.newConsensusState.keccak256_hash()
            || output.trustedConsensusState.timestamp >= output.newConsensusState.timestamp
        {
            UpdateResult::Misbehaviour
        } else {
            UpdateResult::NoOp
        }
    }
}

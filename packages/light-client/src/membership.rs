//! The membership handler and its combined update-and-membership variant.

use alloy_sol_types::SolValue;
use sp1_ics07_solidity_types::msgs::{
    Height, KVPair, MembershipOutput, MembershipProof, MembershipProofType, MsgMembership,
    SP1MembershipAndUpdateClientProof, SP1MembershipProof, UcAndMembershipOutput,
};

use crate::{
    client::{Transaction, UpdateResult},
    ensure,
    error::ClientError,
    verifier::Sp1Verifier,
};

/// Smallest allowed batch in a membership proof.
pub const MIN_KV_PAIRS_PER_PROOF: usize = 1;

/// Largest allowed batch in a membership proof.
pub const MAX_KV_PAIRS_PER_PROOF: usize = 256;

impl<V: Sp1Verifier> Transaction<'_, V> {
    /// Answers a (non-)membership query, returning the timestamp (unix
    /// seconds) the pair was trusted at.
    ///
    /// An empty proof is served from the transient cache populated by an
    /// earlier batched proof in the same transaction. Otherwise the proof
    /// envelope dispatches to the single-height or the combined
    /// update-and-membership variant.
    pub(crate) fn membership(&mut self, msg: MsgMembership) -> Result<u64, ClientError> {
        self.ensure_not_frozen()?;

        let MsgMembership {
            proofHeight: proof_height,
            path,
            value,
            proof,
        } = msg;
        let kv_pair = KVPair::new(path, value);

        if proof.is_empty() {
            return self
                .cache
                .get_kv_pair(proof_height.revisionHeight, &kv_pair);
        }

        let membership_proof = MembershipProof::abi_decode(&proof)?;
        match MembershipProofType::try_from(membership_proof.proofType)
            .map_err(ClientError::UnknownMembershipProofType)?
        {
            MembershipProofType::Sp1Membership => {
                self.sp1_membership(&proof_height, &kv_pair, &membership_proof.proof)
            }
            MembershipProofType::Sp1MembershipAndUpdateClient => {
                self.sp1_uc_and_membership(&proof_height, &kv_pair, &membership_proof.proof)
            }
        }
    }

    /// Membership against a consensus state already trusted at the proof
    /// height.
    fn sp1_membership(
        &mut self,
        proof_height: &Height,
        kv_pair: &KVPair,
        proof_bytes: &[u8],
    ) -> Result<u64, ClientError> {
        let proof = SP1MembershipProof::abi_decode(proof_bytes)?;
        ensure!(
            proof.sp1Proof.vKey == self.vkeys.membership,
            ClientError::VerificationKeyMismatch {
                expected: self.vkeys.membership,
                actual: proof.sp1Proof.vKey,
            }
        );
        let output = MembershipOutput::abi_decode(&proof.sp1Proof.publicValues)?;
        ensure_kv_pairs_length(&output.kvPairs)?;

        find_kv_pair(&output.kvPairs, kv_pair)?;
        self.validate_membership_output(
            output.commitmentRoot,
            proof_height.revisionHeight,
            &proof.trustedConsensusState,
        )?;

        self.verify_sp1_proof(&proof.sp1Proof)?;

        let timestamp = proof.trustedConsensusState.timestamp;
        if output.kvPairs.len() > 1 {
            self.cache
                .insert_kv_pairs(proof_height.revisionHeight, &output.kvPairs, timestamp);
        }
        Ok(timestamp)
    }

    /// Membership against the consensus state a combined proof updates to,
    /// applying the update in the same call.
    ///
    /// Unlike the plain update handler, the verifier runs before any state
    /// is touched: a detected misbehaviour freezes the client and must
    /// survive the abort below, so the freeze may only follow a proof the
    /// verifier accepted.
    fn sp1_uc_and_membership(
        &mut self,
        proof_height: &Height,
        kv_pair: &KVPair,
        proof_bytes: &[u8],
    ) -> Result<u64, ClientError> {
        let proof = SP1MembershipAndUpdateClientProof::abi_decode(proof_bytes)?;
        ensure!(
            proof.sp1Proof.vKey == self.vkeys.uc_and_membership,
            ClientError::VerificationKeyMismatch {
                expected: self.vkeys.uc_and_membership,
                actual: proof.sp1Proof.vKey,
            }
        );
        let output = UcAndMembershipOutput::abi_decode(&proof.sp1Proof.publicValues)?;
        ensure_kv_pairs_length(&output.kvPairs)?;

        let uc_output = &output.updateClientOutput;
        ensure!(
            *proof_height == uc_output.newHeight,
            ClientError::ProofHeightMismatch {
                expected: uc_output.newHeight.clone(),
                actual: proof_height.clone(),
            }
        );

        self.validate_client_state_and_time(&uc_output.clientState, uc_output.time)?;
        self.validate_trusted_consensus_state(
            uc_output.trustedHeight.revisionHeight,
            &uc_output.trustedConsensusState,
        )?;

        self.verify_sp1_proof(&proof.sp1Proof)?;

        match self.check_update_result(uc_output) {
            UpdateResult::Update => {
                if uc_output.newHeight.revisionHeight
                    > self.store.client_state().latestHeight.revisionHeight
                {
                    self.store.set_latest_height(uc_output.newHeight.clone());
                }
                self.store.set_consensus_state_hash(
                    proof_height.revisionHeight,
                    uc_output.newConsensusState.keccak256_hash(),
                );
            }
            UpdateResult::Misbehaviour => {
                // The transaction wrapper re-applies this freeze after
                // unwinding the writes.
                self.store.freeze();
                return Err(ClientError::CannotHandleMisbehavior);
            }
            UpdateResult::NoOp => {}
        }

        find_kv_pair(&output.kvPairs, kv_pair)?;
        self.validate_membership_output(
            uc_output.newConsensusState.root,
            uc_output.newHeight.revisionHeight,
            &uc_output.newConsensusState,
        )?;

        let timestamp = uc_output.newConsensusState.timestamp;
        if output.kvPairs.len() > 1 {
            self.cache
                .insert_kv_pairs(proof_height.revisionHeight, &output.kvPairs, timestamp);
        }
        Ok(timestamp)
    }
}

fn ensure_kv_pairs_length(kv_pairs: &[KVPair]) -> Result<(), ClientError> {
    ensure!(
        (MIN_KV_PAIRS_PER_PROOF..=MAX_KV_PAIRS_PER_PROOF).contains(&kv_pairs.len()),
        ClientError::LengthIsOutOfRange {
            actual: kv_pairs.len(),
            min: MIN_KV_PAIRS_PER_PROOF,
            max: MAX_KV_PAIRS_PER_PROOF,
        }
    );
    Ok(())
}

/// Finds the requested pair in a verified batch by its path and checks the
/// value byte-for-byte. An empty value encodes non-membership and is
/// compared the same way.
///
/// The scan stops at the first path match, so a later duplicate of the same
/// path can never change the outcome.
fn find_kv_pair<'a>(kv_pairs: &'a [KVPair], expected: &KVPair) -> Result<&'a KVPair, ClientError> {
    let found = kv_pairs
        .iter()
        .find(|kv_pair| kv_pair.path == expected.path)
        .ok_or_else(|| ClientError::MembershipProofKeyNotFound {
            path: expected.path.clone(),
        })?;

    ensure!(
        found.value == expected.value,
        ClientError::MembershipProofValueMismatch {
            expected: expected.value.clone(),
            actual: found.value.clone(),
        }
    );

    Ok(found)
}

//! The update client handler.

use alloy_sol_types::SolValue;
use sp1_ics07_solidity_types::msgs::{MsgUpdateClient, UpdateClientOutput};

use crate::{
    client::{Transaction, UpdateResult},
    ensure,
    error::ClientError,
    verifier::Sp1Verifier,
};

impl<V: Sp1Verifier> Transaction<'_, V> {
    /// Applies or rejects a new consensus snapshot, or freezes the client if
    /// the snapshot conflicts with one already stored.
    ///
    /// State effects land before the verifier call: a verifier abort unwinds
    /// the transaction, so the order is unobservable, and a `NoOp` can skip
    /// verification entirely since it writes nothing.
    pub(crate) fn update_client(&mut self, update_msg: &[u8]) -> Result<UpdateResult, ClientError> {
        self.ensure_not_frozen()?;

        let msg = MsgUpdateClient::abi_decode(update_msg)?;
        ensure!(
            msg.sp1Proof.vKey == self.vkeys.update_client,
            ClientError::VerificationKeyMismatch {
                expected: self.vkeys.update_client,
                actual: msg.sp1Proof.vKey,
            }
        );
        let output = UpdateClientOutput::abi_decode(&msg.sp1Proof.publicValues)?;

        self.validate_client_state_and_time(&output.clientState, output.time)?;
        self.validate_trusted_consensus_state(
            output.trustedHeight.revisionHeight,
            &output.trustedConsensusState,
        )?;

        let update_result = self.check_update_result(&output);
        match update_result {
            UpdateResult::Update => {
                if output.newHeight.revisionHeight
                    > self.store.client_state().latestHeight.revisionHeight
                {
                    self.store.set_latest_height(output.newHeight.clone());
                }
                self.store.set_consensus_state_hash(
                    output.newHeight.revisionHeight,
                    output.newConsensusState.keccak256_hash(),
                );
            }
            UpdateResult::Misbehaviour => self.store.freeze(),
            UpdateResult::NoOp => return Ok(UpdateResult::NoOp),
        }

        self.verify_sp1_proof(&msg.sp1Proof)?;

        Ok(update_result)
    }
}

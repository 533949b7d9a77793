//! The misbehaviour handler.

use alloy_sol_types::SolValue;
use sp1_ics07_solidity_types::msgs::{MisbehaviourOutput, MsgSubmitMisbehaviour};

use crate::{client::Transaction, ensure, error::ClientError, verifier::Sp1Verifier};

impl<V: Sp1Verifier> Transaction<'_, V> {
    /// Freezes the client on valid evidence of two conflicting headers.
    ///
    /// The proof attests that both headers verified against the trusted
    /// consensus states in the public values; this side only checks that
    /// those states are ones trusted here.
    pub(crate) fn misbehaviour(&mut self, misbehaviour_msg: &[u8]) -> Result<(), ClientError> {
        self.ensure_not_frozen()?;

        let msg = MsgSubmitMisbehaviour::abi_decode(misbehaviour_msg)?;
        ensure!(
            msg.sp1Proof.vKey == self.vkeys.misbehaviour,
            ClientError::VerificationKeyMismatch {
                expected: self.vkeys.misbehaviour,
                actual: msg.sp1Proof.vKey,
            }
        );
        let output = MisbehaviourOutput::abi_decode(&msg.sp1Proof.publicValues)?;

        self.validate_client_state_and_time(&output.clientState, output.time)?;
        self.validate_trusted_consensus_state(
            output.trustedHeight1.revisionHeight,
            &output.trustedConsensusState1,
        )?;
        self.validate_trusted_consensus_state(
            output.trustedHeight2.revisionHeight,
            &output.trustedConsensusState2,
        )?;

        self.verify_sp1_proof(&msg.sp1Proof)?;

        self.store.freeze();
        Ok(())
    }
}

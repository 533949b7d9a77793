//! Shared fixtures for the light client integration tests.
#![allow(dead_code)]

use alloy_primitives::{Bytes, B256};
use alloy_sol_types::SolValue;
use sp1_ics07_light_client::{test_utils::MockSp1Verifier, ProgramVkeys, Sp1Ics07Tendermint};
use sp1_ics07_solidity_types::msgs::{
    ClientState, ConsensusState, Height, KVPair, MembershipOutput, MembershipProof,
    MisbehaviourOutput, MsgMembership, MsgSubmitMisbehaviour, MsgUpdateClient,
    SP1MembershipAndUpdateClientProof, SP1MembershipProof, SP1Proof, TrustThreshold,
    UcAndMembershipOutput, UpdateClientOutput,
};

/// The host clock used by every test, in unix seconds.
pub const NOW: u64 = 1_750_000_000;

/// The genesis latest height used by [`setup`].
pub const GENESIS_HEIGHT: u64 = 10;

pub fn vkeys() -> ProgramVkeys {
    ProgramVkeys {
        update_client: B256::repeat_byte(0x01),
        membership: B256::repeat_byte(0x02),
        uc_and_membership: B256::repeat_byte(0x03),
        misbehaviour: B256::repeat_byte(0x04),
    }
}

pub fn height(revision_height: u64) -> Height {
    Height::new(0, revision_height)
}

pub fn client_state(latest_height: u64) -> ClientState {
    ClientState {
        chainId: "cosmoshub-4".to_string(),
        trustLevel: TrustThreshold {
            numerator: 1,
            denominator: 3,
        },
        latestHeight: height(latest_height),
        trustingPeriod: 1_209_600,
        unbondingPeriod: 1_814_400,
        isFrozen: false,
    }
}

/// A consensus state whose root and validators hash are derived from `seed`.
pub fn consensus_state(timestamp: u64, seed: u8) -> ConsensusState {
    ConsensusState {
        timestamp,
        root: B256::repeat_byte(seed),
        nextValidatorsHash: B256::repeat_byte(seed.wrapping_add(1)),
    }
}

pub struct TestClient {
    pub client: Sp1Ics07Tendermint<MockSp1Verifier>,
    pub verifier: MockSp1Verifier,
    /// The consensus state trusted at [`GENESIS_HEIGHT`].
    pub trusted_consensus_state: ConsensusState,
}

/// A client at height [`GENESIS_HEIGHT`] with one trusted consensus state.
pub fn setup() -> TestClient {
    let verifier = MockSp1Verifier::default();
    let trusted_consensus_state = consensus_state(NOW - 60, 0x10);
    let client = Sp1Ics07Tendermint::new(
        vkeys(),
        verifier.clone(),
        &client_state(GENESIS_HEIGHT).abi_encode(),
        trusted_consensus_state.keccak256_hash(),
    )
    .expect("valid genesis");

    TestClient {
        client,
        verifier,
        trusted_consensus_state,
    }
}

pub fn update_output(
    trusted_height: u64,
    trusted: &ConsensusState,
    new_height: u64,
    new: &ConsensusState,
) -> UpdateClientOutput {
    UpdateClientOutput {
        trustedHeight: height(trusted_height),
        trustedConsensusState: trusted.clone(),
        newHeight: height(new_height),
        newConsensusState: new.clone(),
        clientState: client_state(GENESIS_HEIGHT),
        time: NOW,
    }
}

pub fn update_msg_with_vkey(vkey: B256, output: &UpdateClientOutput) -> Vec<u8> {
    MsgUpdateClient {
        sp1Proof: SP1Proof::new(vkey, output.abi_encode(), b"proof".to_vec()),
    }
    .abi_encode()
}

pub fn update_msg(output: &UpdateClientOutput) -> Vec<u8> {
    update_msg_with_vkey(vkeys().update_client, output)
}

pub fn kv_pair(path: &[&[u8]], value: &[u8]) -> KVPair {
    KVPair::new(
        path.iter().map(|p| Bytes::copy_from_slice(p)).collect(),
        Bytes::copy_from_slice(value),
    )
}

/// The three-pair batch used by the caching scenarios.
pub fn kv_batch() -> Vec<KVPair> {
    vec![
        kv_pair(&[b"ibc", b"commitments/channel-0/1"], b"value-1"),
        kv_pair(&[b"ibc", b"commitments/channel-0/2"], b"value-2"),
        kv_pair(&[b"ibc", b"receipts/channel-0/3"], b""),
    ]
}

pub fn membership_msg(proof_height: u64, kv_pair: &KVPair, proof: Vec<u8>) -> MsgMembership {
    MsgMembership {
        proofHeight: height(proof_height),
        path: kv_pair.path.clone(),
        value: kv_pair.value.clone(),
        proof: proof.into(),
    }
}

pub fn membership_proof_with_vkey(
    vkey: B256,
    commitment_root: B256,
    trusted: &ConsensusState,
    kv_pairs: Vec<KVPair>,
) -> Vec<u8> {
    let output = MembershipOutput {
        commitmentRoot: commitment_root,
        kvPairs: kv_pairs,
    };
    let proof = SP1MembershipProof {
        sp1Proof: SP1Proof::new(vkey, output.abi_encode(), b"proof".to_vec()),
        trustedConsensusState: trusted.clone(),
    };
    MembershipProof::from(proof).abi_encode()
}

/// A membership proof bound to `trusted`'s root.
pub fn membership_proof(trusted: &ConsensusState, kv_pairs: Vec<KVPair>) -> Vec<u8> {
    membership_proof_with_vkey(vkeys().membership, trusted.root, trusted, kv_pairs)
}

pub fn uc_and_membership_proof_with_vkey(vkey: B256, output: &UcAndMembershipOutput) -> Vec<u8> {
    let proof = SP1MembershipAndUpdateClientProof {
        sp1Proof: SP1Proof::new(vkey, output.abi_encode(), b"proof".to_vec()),
    };
    MembershipProof::from(proof).abi_encode()
}

pub fn uc_and_membership_proof(update: &UpdateClientOutput, kv_pairs: Vec<KVPair>) -> Vec<u8> {
    uc_and_membership_proof_with_vkey(
        vkeys().uc_and_membership,
        &UcAndMembershipOutput {
            updateClientOutput: update.clone(),
            kvPairs: kv_pairs,
        },
    )
}

pub fn misbehaviour_output(
    height_1: u64,
    consensus_state_1: &ConsensusState,
    height_2: u64,
    consensus_state_2: &ConsensusState,
) -> MisbehaviourOutput {
    MisbehaviourOutput {
        clientState: client_state(GENESIS_HEIGHT),
        trustedHeight1: height(height_1),
        trustedConsensusState1: consensus_state_1.clone(),
        trustedHeight2: height(height_2),
        trustedConsensusState2: consensus_state_2.clone(),
        time: NOW,
    }
}

pub fn misbehaviour_msg_with_vkey(vkey: B256, output: &MisbehaviourOutput) -> Vec<u8> {
    MsgSubmitMisbehaviour {
        sp1Proof: SP1Proof::new(vkey, output.abi_encode(), b"proof".to_vec()),
    }
    .abi_encode()
}

pub fn misbehaviour_msg(output: &MisbehaviourOutput) -> Vec<u8> {
    misbehaviour_msg_with_vkey(vkeys().misbehaviour, output)
}

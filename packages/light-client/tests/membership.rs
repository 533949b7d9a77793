//! Integration tests for membership verification and the transient cache.

mod helpers;

use alloy_primitives::B256;
use alloy_sol_types::SolValue;
use helpers::*;
use sp1_ics07_light_client::{CallResult, ClientCall, ClientError, MAX_KV_PAIRS_PER_PROOF};
use sp1_ics07_solidity_types::msgs::MembershipProof;

#[test]
fn single_pair_returns_the_trusted_timestamp() {
    let mut t = setup();
    let pair = kv_pair(&[b"ibc", b"commitments/channel-0/1"], b"value-1");
    let proof = membership_proof(&t.trusted_consensus_state, vec![pair.clone()]);

    let timestamp = t
        .client
        .membership(membership_msg(GENESIS_HEIGHT, &pair, proof), NOW)
        .unwrap();

    assert_eq!(timestamp, t.trusted_consensus_state.timestamp);
    assert_eq!(t.verifier.call_count(), 1);
}

#[test]
fn batched_proof_answers_any_contained_pair() {
    let mut t = setup();
    let batch = kv_batch();
    let proof = membership_proof(&t.trusted_consensus_state, batch.clone());

    let timestamp = t
        .client
        .membership(membership_msg(GENESIS_HEIGHT, &batch[1], proof), NOW)
        .unwrap();

    assert_eq!(timestamp, t.trusted_consensus_state.timestamp);
}

#[test]
fn empty_value_serves_non_membership() {
    let mut t = setup();
    let batch = kv_batch();
    let absent = batch[2].clone();
    assert!(absent.is_non_membership());
    let proof = membership_proof(&t.trusted_consensus_state, batch);

    let timestamp = t
        .client
        .membership(membership_msg(GENESIS_HEIGHT, &absent, proof), NOW)
        .unwrap();

    assert_eq!(timestamp, t.trusted_consensus_state.timestamp);
}

#[test]
fn fails_if_the_value_differs() {
    let mut t = setup();
    let batch = kv_batch();
    let proof = membership_proof(&t.trusted_consensus_state, batch.clone());
    let mut tampered = batch[0].clone();
    tampered.value = b"value-0".to_vec().into();

    assert!(matches!(
        t.client
            .membership(membership_msg(GENESIS_HEIGHT, &tampered, proof), NOW),
        Err(ClientError::MembershipProofValueMismatch { .. })
    ));
}

#[test]
fn fails_if_the_path_is_not_in_the_batch() {
    let mut t = setup();
    let proof = membership_proof(&t.trusted_consensus_state, kv_batch());
    let missing = kv_pair(&[b"ibc", b"commitments/channel-1/1"], b"value-1");

    assert!(matches!(
        t.client
            .membership(membership_msg(GENESIS_HEIGHT, &missing, proof), NOW),
        Err(ClientError::MembershipProofKeyNotFound { .. })
    ));
}

#[test]
fn fails_if_the_batch_is_empty() {
    let mut t = setup();
    let pair = kv_batch().remove(0);
    let proof = membership_proof(&t.trusted_consensus_state, vec![]);

    assert!(matches!(
        t.client
            .membership(membership_msg(GENESIS_HEIGHT, &pair, proof), NOW),
        Err(ClientError::LengthIsOutOfRange { actual: 0, .. })
    ));
}

#[test]
fn fails_if_the_batch_is_oversized() {
    let mut t = setup();
    let pair = kv_batch().remove(0);
    let oversized = vec![pair.clone(); MAX_KV_PAIRS_PER_PROOF + 1];
    let proof = membership_proof(&t.trusted_consensus_state, oversized);

    assert!(matches!(
        t.client
            .membership(membership_msg(GENESIS_HEIGHT, &pair, proof), NOW),
        Err(ClientError::LengthIsOutOfRange { .. })
    ));
}

#[test]
fn fails_if_the_envelope_tag_is_unknown() {
    let mut t = setup();
    let pair = kv_batch().remove(0);
    let envelope = MembershipProof {
        proofType: 7,
        proof: b"junk".to_vec().into(),
    }
    .abi_encode();

    assert!(matches!(
        t.client
            .membership(membership_msg(GENESIS_HEIGHT, &pair, envelope), NOW),
        Err(ClientError::UnknownMembershipProofType(7))
    ));
}

#[test]
fn fails_if_the_commitment_root_is_not_the_trusted_root() {
    let mut t = setup();
    let pair = kv_batch().remove(0);
    let proof = membership_proof_with_vkey(
        vkeys().membership,
        B256::repeat_byte(0x99),
        &t.trusted_consensus_state,
        vec![pair.clone()],
    );

    assert!(matches!(
        t.client
            .membership(membership_msg(GENESIS_HEIGHT, &pair, proof), NOW),
        Err(ClientError::ConsensusStateRootMismatch { .. })
    ));
}

#[test]
fn fails_if_the_height_is_untrusted() {
    let mut t = setup();
    let pair = kv_batch().remove(0);
    let proof = membership_proof(&t.trusted_consensus_state, vec![pair.clone()]);

    assert!(matches!(
        t.client.membership(membership_msg(42, &pair, proof), NOW),
        Err(ClientError::ConsensusStateNotFound { .. })
    ));
}

#[test]
fn fails_if_the_proof_targets_another_program() {
    let mut t = setup();
    let pair = kv_batch().remove(0);
    let proof = membership_proof_with_vkey(
        B256::repeat_byte(0xff),
        t.trusted_consensus_state.root,
        &t.trusted_consensus_state,
        vec![pair.clone()],
    );

    assert!(matches!(
        t.client
            .membership(membership_msg(GENESIS_HEIGHT, &pair, proof), NOW),
        Err(ClientError::VerificationKeyMismatch { .. })
    ));
}

#[test]
fn batch_order_does_not_change_the_outcome() {
    let batch = kv_batch();
    let requested = batch[1].clone();
    let missing = kv_pair(&[b"ibc", b"acks/channel-0/9"], b"value-9");

    let rotations: Vec<Vec<_>> = (0..batch.len())
        .map(|i| {
            let mut rotated = batch.clone();
            rotated.rotate_left(i);
            rotated
        })
        .collect();

    for rotated in rotations {
        let mut t = setup();
        let proof = membership_proof(&t.trusted_consensus_state, rotated.clone());
        let timestamp = t
            .client
            .membership(membership_msg(GENESIS_HEIGHT, &requested, proof), NOW)
            .unwrap();
        assert_eq!(timestamp, t.trusted_consensus_state.timestamp);

        let proof = membership_proof(&t.trusted_consensus_state, rotated);
        assert!(matches!(
            t.client
                .membership(membership_msg(GENESIS_HEIGHT, &missing, proof), NOW),
            Err(ClientError::MembershipProofKeyNotFound { .. })
        ));
    }
}

#[test]
fn batched_proof_populates_the_cache_for_the_whole_transaction() {
    let mut t = setup();
    let batch = kv_batch();
    let proof = membership_proof(&t.trusted_consensus_state, batch.clone());

    let results = t
        .client
        .multicall(
            vec![
                ClientCall::Membership(membership_msg(GENESIS_HEIGHT, &batch[1], proof)),
                ClientCall::Membership(membership_msg(GENESIS_HEIGHT, &batch[0], vec![])),
                ClientCall::Membership(membership_msg(GENESIS_HEIGHT, &batch[2], vec![])),
            ],
            NOW,
        )
        .unwrap();

    let expected = CallResult::Membership(t.trusted_consensus_state.timestamp);
    assert_eq!(results, vec![expected, expected, expected]);
    // One proof served all three queries.
    assert_eq!(t.verifier.call_count(), 1);
}

#[test]
fn cached_lookup_fails_for_a_value_that_was_not_proven() {
    let mut t = setup();
    let batch = kv_batch();
    let proof = membership_proof(&t.trusted_consensus_state, batch.clone());
    let mut wrong = batch[0].clone();
    wrong.value = b"wrong".to_vec().into();

    let result = t.client.multicall(
        vec![
            ClientCall::Membership(membership_msg(GENESIS_HEIGHT, &batch[1], proof)),
            ClientCall::Membership(membership_msg(GENESIS_HEIGHT, &wrong, vec![])),
        ],
        NOW,
    );

    assert!(matches!(
        result,
        Err(ClientError::KeyValuePairNotInCache { .. })
    ));
}

#[test]
fn single_pair_proof_does_not_populate_the_cache() {
    let mut t = setup();
    let pair = kv_batch().remove(0);
    let proof = membership_proof(&t.trusted_consensus_state, vec![pair.clone()]);

    let result = t.client.multicall(
        vec![
            ClientCall::Membership(membership_msg(GENESIS_HEIGHT, &pair, proof)),
            ClientCall::Membership(membership_msg(GENESIS_HEIGHT, &pair, vec![])),
        ],
        NOW,
    );

    assert!(matches!(
        result,
        Err(ClientError::KeyValuePairNotInCache { .. })
    ));
}

#[test]
fn the_cache_does_not_outlive_its_transaction() {
    let mut t = setup();
    let batch = kv_batch();
    let proof = membership_proof(&t.trusted_consensus_state, batch.clone());

    t.client
        .membership(membership_msg(GENESIS_HEIGHT, &batch[1], proof), NOW)
        .unwrap();

    // A new transaction starts with a cleared cache.
    assert!(matches!(
        t.client
            .membership(membership_msg(GENESIS_HEIGHT, &batch[0], vec![]), NOW),
        Err(ClientError::KeyValuePairNotInCache { .. })
    ));
}

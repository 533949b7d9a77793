//! Message, output, and state types shared with the SP1 programs.
//!
//! The structs are generated by [`alloy_sol_types::sol!`] so that
//! `abi_encode`/`abi_decode` agree bit-for-bit with the `abi.encode` calls
//! the programs use when committing public values.

use alloy_primitives::{keccak256, B256};
use alloy_sol_types::SolValue;

alloy_sol_types::sol! {
    #![sol(all_derives)]

    /// Height of the counterparty chain.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct Height {
        uint64 revisionNumber;
        uint64 revisionHeight;
    }

    /// Tendermint trust threshold fraction.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct TrustThreshold {
        uint64 numerator;
        uint64 denominator;
    }

    /// The client state of the Tendermint light client.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct ClientState {
        string chainId;
        TrustThreshold trustLevel;
        Height latestHeight;
        uint64 trustingPeriod;
        uint64 unbondingPeriod;
        bool isFrozen;
    }

    /// A snapshot of the counterparty chain at some height. Timestamps are
    /// unix seconds.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct ConsensusState {
        uint64 timestamp;
        bytes32 root;
        bytes32 nextValidatorsHash;
    }

    /// An SP1 proof together with the identifier of the program that
    /// produced it and the public values it commits to.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct SP1Proof {
        bytes32 vKey;
        bytes publicValues;
        bytes proof;
    }

    /// A key-value pair under the counterparty's commitment root. An empty
    /// value attests non-membership of the path.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct KVPair {
        bytes[] path;
        bytes value;
    }

    /// The message for an update client call.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct MsgUpdateClient {
        SP1Proof sp1Proof;
    }

    /// The message for a misbehaviour submission.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct MsgSubmitMisbehaviour {
        SP1Proof sp1Proof;
    }

    /// The message for a (non-)membership query at a proven height.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct MsgMembership {
        Height proofHeight;
        bytes[] path;
        bytes value;
        bytes proof;
    }

    /// Public values committed by the update client program.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct UpdateClientOutput {
        Height trustedHeight;
        ConsensusState trustedConsensusState;
        Height newHeight;
        ConsensusState newConsensusState;
        ClientState clientState;
        uint64 time;
    }

    /// Public values committed by the membership program.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct MembershipOutput {
        bytes32 commitmentRoot;
        KVPair[] kvPairs;
    }

    /// Public values committed by the combined update client and membership
    /// program.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct UcAndMembershipOutput {
        UpdateClientOutput updateClientOutput;
        KVPair[] kvPairs;
    }

    /// Public values committed by the misbehaviour program.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct MisbehaviourOutput {
        ClientState clientState;
        Height trustedHeight1;
        ConsensusState trustedConsensusState1;
        Height trustedHeight2;
        ConsensusState trustedConsensusState2;
        uint64 time;
    }

    /// Envelope carrying one of the membership proof variants. The tag
    /// encodes exactly like a Solidity enum, so the layout matches the
    /// counterpart contracts.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct MembershipProof {
        uint8 proofType;
        bytes proof;
    }

    /// A proof produced by the membership program, bound to the consensus
    /// state it was proven against.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct SP1MembershipProof {
        SP1Proof sp1Proof;
        ConsensusState trustedConsensusState;
    }

    /// A proof produced by the combined update client and membership
    /// program.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct SP1MembershipAndUpdateClientProof {
        SP1Proof sp1Proof;
    }
}

/// Discriminant of the [`MembershipProof`] tagged union.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MembershipProofType {
    /// The proof was produced by the membership program alone.
    Sp1Membership = 0,
    /// The proof was produced by the combined update client and membership
    /// program.
    Sp1MembershipAndUpdateClient = 1,
}

impl TryFrom<u8> for MembershipProofType {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, u8> {
        match tag {
            0 => Ok(Self::Sp1Membership),
            1 => Ok(Self::Sp1MembershipAndUpdateClient),
            other => Err(other),
        }
    }
}

impl From<MembershipProofType> for u8 {
    fn from(proof_type: MembershipProofType) -> Self {
        proof_type as Self
    }
}

impl Height {
    /// Creates a new height.
    #[must_use]
    pub const fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revisionNumber: revision_number,
            revisionHeight: revision_height,
        }
    }
}

impl SP1Proof {
    /// Creates a new proof for the program identified by `vkey`.
    #[must_use]
    pub fn new(vkey: B256, public_values: Vec<u8>, proof: Vec<u8>) -> Self {
        Self {
            vKey: vkey,
            publicValues: public_values.into(),
            proof: proof.into(),
        }
    }
}

impl KVPair {
    /// Creates a new key-value pair.
    #[must_use]
    pub fn new(path: Vec<alloy_primitives::Bytes>, value: alloy_primitives::Bytes) -> Self {
        Self { path, value }
    }

    /// Whether this pair attests non-membership of its path.
    #[must_use]
    pub fn is_non_membership(&self) -> bool {
        self.value.is_empty()
    }
}

impl ConsensusState {
    /// The canonical hash of this consensus state: keccak256 over the
    /// canonical ABI encoding. This is the identity used by the consensus
    /// state store; the zero hash is reserved there as the "absent"
    /// sentinel, which is sound because keccak256 of a real encoding is
    /// never zero in practice.
    #[must_use]
    pub fn keccak256_hash(&self) -> B256 {
        keccak256(self.abi_encode())
    }
}

impl From<SP1MembershipProof> for MembershipProof {
    fn from(proof: SP1MembershipProof) -> Self {
        Self {
            proofType: MembershipProofType::Sp1Membership.into(),
            proof: proof.abi_encode().into(),
        }
    }
}

impl From<SP1MembershipAndUpdateClientProof> for MembershipProof {
    fn from(proof: SP1MembershipAndUpdateClientProof) -> Self {
        Self {
            proofType: MembershipProofType::Sp1MembershipAndUpdateClient.into(),
            proof: proof.abi_encode().into(),
        }
    }
}

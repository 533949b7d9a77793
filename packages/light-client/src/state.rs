//! Storage for the light client's persistent state.

use std::collections::BTreeMap;

use alloy_primitives::B256;
use alloy_sol_types::SolValue;
use sp1_ics07_solidity_types::msgs::{ClientState, Height};

use crate::{ensure, error::ClientError};

/// The persistent state of the light client: the client state plus the
/// canonical hashes of every trusted consensus state, keyed by revision
/// height.
///
/// Consensus states are stored by hash only; handlers receive the full state
/// in proof public values and bind it to the stored hash. The zero hash is
/// reserved as the "absent" sentinel, so a missing map entry and a zero
/// entry read the same.
#[derive(Clone, Debug)]
pub struct ClientStore {
    client_state: ClientState,
    consensus_state_hashes: BTreeMap<u64, B256>,
}

impl ClientStore {
    pub(crate) fn new(client_state: ClientState, initial_consensus_state_hash: B256) -> Self {
        let mut consensus_state_hashes = BTreeMap::new();
        consensus_state_hashes.insert(
            client_state.latestHeight.revisionHeight,
            initial_consensus_state_hash,
        );
        Self {
            client_state,
            consensus_state_hashes,
        }
    }

    /// Returns the current client state.
    #[must_use]
    pub const fn client_state(&self) -> &ClientState {
        &self.client_state
    }

    /// Returns the canonical encoding of the current client state.
    #[must_use]
    pub fn client_state_bytes(&self) -> Vec<u8> {
        self.client_state.abi_encode()
    }

    /// Returns the consensus state hash trusted at `revision_height`.
    ///
    /// # Errors
    /// Fails with [`ClientError::ConsensusStateNotFound`] if no consensus
    /// state has been trusted at that height.
    pub fn consensus_state_hash(&self, revision_height: u64) -> Result<B256, ClientError> {
        let hash = self.raw_consensus_state_hash(revision_height);
        ensure!(
            !hash.is_zero(),
            ClientError::ConsensusStateNotFound { revision_height }
        );
        Ok(hash)
    }

    /// Returns the stored hash, or the zero sentinel when the height has no
    /// entry.
    pub(crate) fn raw_consensus_state_hash(&self, revision_height: u64) -> B256 {
        self.consensus_state_hashes
            .get(&revision_height)
            .copied()
            .unwrap_or(B256::ZERO)
    }

    pub(crate) fn set_consensus_state_hash(&mut self, revision_height: u64, hash: B256) {
        self.consensus_state_hashes.insert(revision_height, hash);
    }

    /// Advances `latestHeight`. Monotonicity is guarded at the call sites;
    /// heights below the current latest are never passed in.
    pub(crate) fn set_latest_height(&mut self, height: Height) {
        self.client_state.latestHeight = height;
    }

    /// Freezes the client. Monotonic; nothing ever clears the flag.
    pub(crate) fn freeze(&mut self) {
        self.client_state.isFrozen = true;
    }
}

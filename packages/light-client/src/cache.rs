//! The per-transaction cache of verified key-value pairs.

use std::collections::HashMap;

use alloy_primitives::{keccak256, B256};
use alloy_sol_types::SolValue;
use sp1_ics07_solidity_types::msgs::KVPair;

use crate::{ensure, error::ClientError};

/// Verified `(height, path, value) -> timestamp` entries, scoped to one
/// transaction so that a single batched membership proof can serve several
/// queries.
///
/// This models the host's transient storage: one instance lives exactly as
/// long as one transaction. Entries are written only after validation and
/// proof verification have succeeded, so presence of an entry always implies
/// the pair was proven at that height against a trusted root earlier in the
/// same transaction. A zero timestamp is reserved as the "absent" sentinel,
/// mirroring the transient slot layout this stands in for.
#[derive(Debug, Default)]
pub struct TransientKvCache {
    entries: HashMap<B256, u64>,
}

impl TransientKvCache {
    fn entry_key(revision_height: u64, kv_pair: &KVPair) -> B256 {
        keccak256((revision_height, kv_pair.clone()).abi_encode())
    }

    /// Records every pair of a verified batch with the trusted timestamp.
    pub fn insert_kv_pairs(&mut self, revision_height: u64, kv_pairs: &[KVPair], timestamp: u64) {
        for kv_pair in kv_pairs {
            self.entries
                .insert(Self::entry_key(revision_height, kv_pair), timestamp);
        }
    }

    /// Looks up a pair verified earlier in this transaction and returns the
    /// timestamp it was trusted at.
    ///
    /// # Errors
    /// Fails with [`ClientError::KeyValuePairNotInCache`] if the pair was
    /// not verified at `revision_height` in this transaction.
    pub fn get_kv_pair(&self, revision_height: u64, kv_pair: &KVPair) -> Result<u64, ClientError> {
        let timestamp = self
            .entries
            .get(&Self::entry_key(revision_height, kv_pair))
            .copied()
            .unwrap_or(0);
        ensure!(
            timestamp != 0,
            ClientError::KeyValuePairNotInCache {
                path: kv_pair.path.clone(),
                value: kv_pair.value.clone(),
            }
        );
        Ok(timestamp)
    }
}

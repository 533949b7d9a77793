//! The light client object and its transactional handler surface.

use alloy_primitives::B256;
use alloy_sol_types::SolValue;
use sp1_ics07_solidity_types::msgs::{ClientState, MsgMembership, SP1Proof};

use crate::{
    cache::TransientKvCache, ensure, error::ClientError, state::ClientStore, verifier::Sp1Verifier,
};

/// Verification keys binding proofs to the four SP1 programs. Fixed at
/// construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramVkeys {
    /// The update client program.
    pub update_client: B256,
    /// The membership program.
    pub membership: B256,
    /// The combined update client and membership program.
    pub uc_and_membership: B256,
    /// The misbehaviour program.
    pub misbehaviour: B256,
}

/// Outcome of an update client invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateResult {
    /// A new consensus state was accepted.
    Update,
    /// The update conflicted with stored state; the client is now frozen.
    Misbehaviour,
    /// The update was already known; nothing changed.
    NoOp,
}

/// One handler invocation inside a [`Sp1Ics07Tendermint::multicall`] batch.
#[derive(Clone, Debug)]
pub enum ClientCall {
    /// `updateClient` with an ABI-encoded
    /// [`sp1_ics07_solidity_types::msgs::MsgUpdateClient`].
    UpdateClient(Vec<u8>),
    /// A (non-)membership query. An empty `proof` is served from the cache
    /// populated by an earlier call in the same batch.
    Membership(MsgMembership),
    /// `misbehaviour` with an ABI-encoded
    /// [`sp1_ics07_solidity_types::msgs::MsgSubmitMisbehaviour`].
    SubmitMisbehaviour(Vec<u8>),
    /// `upgradeClient`; always fails [`ClientError::FeatureNotSupported`].
    UpgradeClient(Vec<u8>),
}

/// The value produced by one call of a successful
/// [`Sp1Ics07Tendermint::multicall`] batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallResult {
    /// Result of an update client call.
    UpdateClient(UpdateResult),
    /// The timestamp (unix seconds) the queried pair was trusted at.
    Membership(u64),
    /// A misbehaviour submission was accepted; the client is frozen.
    Misbehaviour,
}

/// The SP1 ICS-07 Tendermint light client.
///
/// Holds the immutable configuration (program verification keys and the
/// proof verifier) and the persistent state. Handlers mirror a blockchain
/// host's transaction semantics: each public call runs atomically, and a
/// failed call leaves the state exactly as it was — with the single
/// deliberate exception of the freeze accompanying
/// [`ClientError::CannotHandleMisbehavior`], which survives the unwind.
#[derive(Clone, Debug)]
pub struct Sp1Ics07Tendermint<V> {
    vkeys: ProgramVkeys,
    verifier: V,
    store: ClientStore,
}

impl<V: Sp1Verifier> Sp1Ics07Tendermint<V> {
    /// Creates the client from its genesis state.
    ///
    /// `initial_client_state` is the canonical encoding of the client state;
    /// `initial_consensus_state_hash` is stored at the client state's latest
    /// height.
    ///
    /// # Errors
    /// Fails if the client state does not decode, or if its trusting period
    /// exceeds its unbonding period.
    pub fn new(
        vkeys: ProgramVkeys,
        verifier: V,
        initial_client_state: &[u8],
        initial_consensus_state_hash: B256,
    ) -> Result<Self, ClientError> {
        let client_state = ClientState::abi_decode(initial_client_state)?;
        ensure!(
            client_state.trustingPeriod <= client_state.unbondingPeriod,
            ClientError::TrustingPeriodTooLong {
                trusting_period: client_state.trustingPeriod,
                unbonding_period: client_state.unbondingPeriod,
            }
        );

        Ok(Self {
            vkeys,
            verifier,
            store: ClientStore::new(client_state, initial_consensus_state_hash),
        })
    }

    /// Returns the current client state.
    #[must_use]
    pub const fn client_state(&self) -> &ClientState {
        self.store.client_state()
    }

    /// Returns the canonical encoding of the current client state.
    #[must_use]
    pub fn client_state_bytes(&self) -> Vec<u8> {
        self.store.client_state_bytes()
    }

    /// Returns the consensus state hash trusted at `revision_height`.
    ///
    /// # Errors
    /// Fails with [`ClientError::ConsensusStateNotFound`] if no consensus
    /// state has been trusted at that height.
    pub fn consensus_state_hash(&self, revision_height: u64) -> Result<B256, ClientError> {
        self.store.consensus_state_hash(revision_height)
    }

    /// Handles an update client message. `now` is the host's unix timestamp
    /// in seconds.
    ///
    /// # Errors
    /// Fails if the client is frozen, the message or its public values do
    /// not validate against stored state, or the verifier rejects the proof.
    pub fn update_client(
        &mut self,
        update_msg: &[u8],
        now: u64,
    ) -> Result<UpdateResult, ClientError> {
        self.transact(now, |tx| tx.update_client(update_msg))
    }

    /// Handles a (non-)membership query and returns the timestamp (unix
    /// seconds) the pair was trusted at.
    ///
    /// # Errors
    /// Fails if the client is frozen, the proof does not validate, the
    /// requested pair is not in the proof, or — for an empty proof — the
    /// pair was not verified earlier in the same transaction.
    pub fn membership(&mut self, msg: MsgMembership, now: u64) -> Result<u64, ClientError> {
        self.transact(now, |tx| tx.membership(msg))
    }

    /// Handles a misbehaviour submission; on success the client is frozen.
    ///
    /// # Errors
    /// Fails if the client is already frozen, the evidence does not bind to
    /// stored consensus states, or the verifier rejects the proof.
    pub fn misbehaviour(&mut self, misbehaviour_msg: &[u8], now: u64) -> Result<(), ClientError> {
        self.transact(now, |tx| tx.misbehaviour(misbehaviour_msg))
    }

    /// Client upgrades are reserved for a future version.
    ///
    /// # Errors
    /// Always fails: [`ClientError::FrozenClientState`] on a frozen client,
    /// [`ClientError::FeatureNotSupported`] otherwise.
    pub fn upgrade_client(&mut self, upgrade_msg: &[u8]) -> Result<(), ClientError> {
        let _ = upgrade_msg;
        ensure!(
            !self.store.client_state().isFrozen,
            ClientError::FrozenClientState
        );
        Err(ClientError::FeatureNotSupported)
    }

    /// Runs a batch of handler calls in one transaction.
    ///
    /// The calls share one transient cache, so a `membership` call with an
    /// empty proof can consume pairs planted by an earlier batched proof in
    /// the same batch. The batch is atomic: the first error unwinds every
    /// call before it.
    ///
    /// # Errors
    /// Fails with the first failing call's error.
    pub fn multicall(
        &mut self,
        calls: Vec<ClientCall>,
        now: u64,
    ) -> Result<Vec<CallResult>, ClientError> {
        self.transact(now, |tx| {
            calls.into_iter().map(|call| tx.dispatch(call)).collect()
        })
    }

    /// Runs `f` with host-transaction semantics: all writes commit, or none
    /// do. A freeze signalled by [`ClientError::CannotHandleMisbehavior`] is
    /// re-applied after the unwind; that error is only constructed after the
    /// proof carrying the misbehaviour has verified.
    fn transact<T>(
        &mut self,
        now: u64,
        f: impl FnOnce(&mut Transaction<'_, V>) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let snapshot = self.store.clone();
        let mut cache = TransientKvCache::default();
        let mut tx = Transaction {
            vkeys: &self.vkeys,
            verifier: &self.verifier,
            store: &mut self.store,
            cache: &mut cache,
            now,
        };

        match f(&mut tx) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.store = snapshot;
                if matches!(err, ClientError::CannotHandleMisbehavior) {
                    self.store.freeze();
                }
                Err(err)
            }
        }
    }
}

/// A single in-flight transaction over the client's state.
///
/// Handlers write through this; the wrapper in `transact` restores the
/// pre-transaction snapshot if any of them fail. The cache dies with the
/// transaction.
pub(crate) struct Transaction<'a, V> {
    pub(crate) vkeys: &'a ProgramVkeys,
    pub(crate) verifier: &'a V,
    pub(crate) store: &'a mut ClientStore,
    pub(crate) cache: &'a mut TransientKvCache,
    pub(crate) now: u64,
}

impl<V: Sp1Verifier> Transaction<'_, V> {
    pub(crate) fn dispatch(&mut self, call: ClientCall) -> Result<CallResult, ClientError> {
        match call {
            ClientCall::UpdateClient(update_msg) => self
                .update_client(&update_msg)
                .map(CallResult::UpdateClient),
            ClientCall::Membership(msg) => self.membership(msg).map(CallResult::Membership),
            ClientCall::SubmitMisbehaviour(misbehaviour_msg) => self
                .misbehaviour(&misbehaviour_msg)
                .map(|()| CallResult::Misbehaviour),
            ClientCall::UpgradeClient(_) => {
                self.ensure_not_frozen()?;
                Err(ClientError::FeatureNotSupported)
            }
        }
    }

    pub(crate) fn ensure_not_frozen(&self) -> Result<(), ClientError> {
        ensure!(
            !self.store.client_state().isFrozen,
            ClientError::FrozenClientState
        );
        Ok(())
    }

    pub(crate) fn verify_sp1_proof(&self, proof: &SP1Proof) -> Result<(), ClientError> {
        self.verifier
            .verify(proof.vKey, &proof.publicValues, &proof.proof)?;
        Ok(())
    }
}

//! Test utilities for exercising the light client without a proof system.

use std::{cell::Cell, rc::Rc};

use alloy_primitives::B256;

use crate::verifier::{Sp1Verifier, VerifierError};

/// A verifier that accepts every proof, records how often it was called, and
/// can be switched to reject everything.
///
/// Clones share their counters, so a test can hold a handle while the client
/// owns another.
#[derive(Clone, Debug, Default)]
pub struct MockSp1Verifier {
    calls: Rc<Cell<usize>>,
    reject: Rc<Cell<bool>>,
}

impl MockSp1Verifier {
    /// Number of `verify` calls observed so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    /// Makes every subsequent `verify` call fail.
    pub fn reject_proofs(&self) {
        self.reject.set(true);
    }
}

impl Sp1Verifier for MockSp1Verifier {
    fn verify(&self, _vkey: B256, _public_values: &[u8], _proof: &[u8]) -> Result<(), VerifierError> {
        self.calls.set(self.calls.get() + 1);
        if self.reject.get() {
            return Err(VerifierError("mock verifier rejected the proof".into()));
        }
        Ok(())
    }
}

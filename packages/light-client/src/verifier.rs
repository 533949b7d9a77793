//! The seam to the succinct-proof verifier.

use alloy_primitives::B256;

/// Error raised by an [`Sp1Verifier`] implementation.
///
/// The light client treats the message as opaque and propagates it verbatim
/// inside [`crate::ClientError::VerificationFailed`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct VerifierError(
    /// The verifier's reported reason.
    pub String,
);

/// Verifies succinct proofs against a program verification key.
///
/// Implementations wrap whatever the host offers: a precompile, a native
/// pairing library, or a mock in tests. The only success signal is a normal
/// return; a boolean result must never be interpreted.
pub trait Sp1Verifier {
    /// Verifies that `proof` attests an execution of the program identified
    /// by `vkey` that committed exactly `public_values`.
    ///
    /// # Errors
    /// Fails if the proof does not verify. The error aborts the enclosing
    /// transaction, unwinding its persistent writes.
    fn verify(&self, vkey: B256, public_values: &[u8], proof: &[u8]) -> Result<(), VerifierError>;
}

#[cfg(feature = "groth16")]
mod groth16 {
    use alloy_primitives::B256;
    use sp1_verifier::Groth16Verifier;

    use super::{Sp1Verifier, VerifierError};

    /// Verifies SP1 Groth16 proofs in-process with the universal verifying
    /// key embedded in the `sp1-verifier` crate.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Sp1Groth16Verifier;

    impl Sp1Verifier for Sp1Groth16Verifier {
        fn verify(
            &self,
            vkey: B256,
            public_values: &[u8],
            proof: &[u8],
        ) -> Result<(), VerifierError> {
            Groth16Verifier::verify(
                proof,
                public_values,
                &vkey.to_string(),
                sp1_verifier::GROTH16_VK_BYTES,
            )
            .map_err(|err| VerifierError(err.to_string()))
        }
    }
}

#[cfg(feature = "groth16")]
pub use groth16::Sp1Groth16Verifier;

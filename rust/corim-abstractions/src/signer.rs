// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::CoseAlgorithm;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    #[error("algorithm {alg} does not correspond to {key_type} key material")]
    AlgorithmMismatch {
        alg: CoseAlgorithm,
        key_type: &'static str,
    },

    #[error("signature primitive failed: {0}")]
    Primitive(String),
}

/// A signing capability.
///
/// `sign` receives the exact Sig_structure bytes and returns the COSE
/// signature value. Implementations must not assume they are called only
/// once; randomized schemes draw fresh randomness per call.
///
/// Key material must correspond to [`Signer::algorithm`]. A mismatch is
/// reported by `sign`, not at construction.
pub trait Signer {
    fn algorithm(&self) -> CoseAlgorithm;

    fn sign(&self, tbs: &[u8]) -> Result<Vec<u8>, SignError>;
}

impl<S: Signer + ?Sized> Signer for Box<S> {
    fn algorithm(&self) -> CoseAlgorithm {
        (**self).algorithm()
    }

    fn sign(&self, tbs: &[u8]) -> Result<Vec<u8>, SignError> {
        (**self).sign(tbs)
    }
}

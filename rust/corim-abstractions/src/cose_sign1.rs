// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::header::{HeaderLabel, HeaderMap, HeaderValue, ProtectedHeader};

/// CBOR tag for COSE_Sign1.
pub const COSE_SIGN1_TAG: u64 = 18;

/// Sig_structure context string for COSE_Sign1.
pub const SIGNATURE1_CONTEXT: &str = "Signature1";

/// A decoded COSE_Sign1. Nothing here checks the signature.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CoseSign1 {
    pub protected: ProtectedHeader,
    pub unprotected: HeaderMap,
    /// `None` for a detached payload.
    pub payload: Option<Vec<u8>>,
    pub signature: Vec<u8>,
}

impl CoseSign1 {
    /// Look a parameter up in the protected header, then the unprotected one.
    pub fn header(&self, label: impl Into<HeaderLabel>) -> Option<&HeaderValue> {
        let label = label.into();
        self.protected
            .get(label.clone())
            .or_else(|| self.unprotected.get(label))
    }

    pub fn is_detached(&self) -> bool {
        self.payload.is_none()
    }
}

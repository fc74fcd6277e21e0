// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use corim_abstractions::{DecodeError, EncodeError, SignError, ValidationError};
use corim_common::CodecError;
use corim_x509::CertificateError;

#[derive(thiserror::Error, Debug)]
pub enum CorimError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("malformed DER certificate data: {0}")]
    CertificateFormat(String),

    #[error("cannot add intermediate certificates without a signing certificate")]
    MissingLeafCertificate,

    #[error("signing failed: {0}")]
    Signing(#[from] SignError),

    #[error("encoding failed: {0}")]
    Encode(String),
}

impl From<CertificateError> for CorimError {
    fn from(e: CertificateError) -> Self {
        match e {
            CertificateError::Format(msg) => Self::CertificateFormat(msg),
            CertificateError::MissingLeaf => Self::MissingLeafCertificate,
        }
    }
}

impl From<EncodeError> for CorimError {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e.0)
    }
}

impl From<CodecError> for CorimError {
    fn from(e: CodecError) -> Self {
        Self::Encode(e.to_string())
    }
}

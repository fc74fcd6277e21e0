// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Display;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("CBOR: {0}")]
    Cbor(String),

    #[error("unexpected CBOR tag {0}, expected COSE_Sign1 (18)")]
    UnexpectedTag(u64),

    #[error("COSE_Sign1 must be an array of 4 items, got {0}")]
    WrongArity(u64),

    #[error("indefinite-length {0} are not supported")]
    IndefiniteLength(&'static str),

    #[error("unsupported {context} type {found}")]
    UnsupportedType { context: &'static str, found: String },

    #[error("header nesting exceeds {0} levels")]
    TooDeep(usize),

    #[error("trailing bytes after {0}")]
    TrailingBytes(&'static str),

    #[error("detached payload requires external payload bytes")]
    DetachedPayload,
}

impl From<minicbor::decode::Error> for CodecError {
    fn from(e: minicbor::decode::Error) -> Self {
        Self::Cbor(e.to_string())
    }
}

impl<E: Display> From<minicbor::encode::Error<E>> for CodecError {
    fn from(e: minicbor::encode::Error<E>) -> Self {
        Self::Cbor(e.to_string())
    }
}

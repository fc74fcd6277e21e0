// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Document capabilities consumed by the signed-manifest assembler.
//!
//! The assembler never looks inside a manifest or its metadata. It only needs
//! to know that a document decodes, validates, and can produce the bytes that
//! go into the envelope. One conforming type exists per supported schema
//! version.

use std::ops::Deref;

/// Malformed binary or text input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DecodeError(pub String);

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Structurally decodable input that is semantically invalid.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EncodeError(pub String);

impl EncodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// An unsigned manifest carried as the COSE payload.
pub trait UnsignedManifest: Validate + Sized {
    /// Media type advertised in the envelope's content-type header.
    const CONTENT_TYPE: &'static str;

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError>;

    /// The exact bytes to embed as the envelope payload.
    fn payload(&self) -> &[u8];
}

/// Metadata carried in the envelope's protected header.
pub trait ManifestMeta: Validate + Sized {
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError>;

    /// CBOR encoding embedded in the envelope.
    fn to_cbor(&self) -> Result<Vec<u8>, EncodeError>;
}

/// A document that has passed [`Validate::validate`].
///
/// The only way to obtain one is [`Validated::new`], so holding a
/// `Validated<T>` is proof that validation ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T>(T);

impl<T: Validate> Validated<T> {
    pub fn new(inner: T) -> Result<Self, ValidationError> {
        inner.validate()?;
        Ok(Self(inner))
    }
}

impl<T> Validated<T> {
    pub fn get(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

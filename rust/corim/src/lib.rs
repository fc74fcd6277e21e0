// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Signed CoRIM assembly.
//!
//! A signed CoRIM is a COSE_Sign1 whose payload is an unsigned CoRIM and whose
//! protected header carries the CoRIM metadata and, optionally, the signing
//! certificate chain. Typical flow:
//!
//! 1. Decode and validate an [`UnsignedCorim`] and a [`Meta`].
//! 2. Build a [`SignedCorimBuilder`] from the validated pair.
//! 3. Optionally attach the leaf certificate, then intermediates.
//! 4. Call [`SignedCorimBuilder::sign`] with any [`Signer`].

mod cbor;
mod error;
mod meta;
mod signed_corim;
mod unsigned_corim;
mod validity;

pub use error::CorimError;
pub use meta::{Meta, MetaSigner};
pub use signed_corim::{SignedCorimBuilder, SignedCorimView};
pub use unsigned_corim::{
    ConciseTag, ConciseTagKind, CorimId, Entity, Locator, Profile, UnsignedCorim, CORIM_CONTENT_TYPE,
    ROLE_MANIFEST_CREATOR, ROLE_MANIFEST_SIGNER, UNSIGNED_CORIM_TAG,
};
pub use validity::Validity;

pub use corim_abstractions::{
    labels, CoseAlgorithm, DecodeError, ManifestMeta, SignError, Signer, UnsignedManifest, Validate, Validated,
    ValidationError,
};
pub use corim_x509::CertificateChain;

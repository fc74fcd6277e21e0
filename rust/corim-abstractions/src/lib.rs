// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Traits and datatypes shared by the CoRIM signing crates.
//!
//! The assembler in `corim` works against the capabilities defined here
//! ([`UnsignedManifest`], [`ManifestMeta`], [`Signer`]) so key formats and
//! document versions plug in without touching it. Signer plugins register
//! themselves at link time through [`SignerProviderRegistration`].

pub mod algorithm;
pub mod cose_sign1;
pub mod document;
pub mod header;
pub mod signer;
pub mod signer_provider;

pub use algorithm::CoseAlgorithm;
pub use document::{
    DecodeError, EncodeError, ManifestMeta, UnsignedManifest, Validate, Validated, ValidationError,
};
pub use cose_sign1::{CoseSign1, COSE_SIGN1_TAG, SIGNATURE1_CONTEXT};
pub use header::{labels, HeaderLabel, HeaderMap, HeaderValue, ProtectedHeader};
pub use signer::{SignError, Signer};

pub use signer_provider::{
    load_signer, provider_name, providers_ordered, LoadSignerError, LoadedSigner, SignerProvider,
    SignerProviderError, SignerProviderId, SignerProviderRegistration,
};

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! JSON Web Key (RFC 7517) private keys as COSE signers.
//!
//! Linking this crate registers the `jwk` signer provider, so
//! `corim_abstractions::load_signer` accepts JWK key files.

pub mod jwk;
mod jwk_signer_provider;

pub use jwk::{signer_from_jwk, Jwk, JwkError, JwkSigner};

/// Stable ID for the JWK signer provider.
pub const JWK_PROVIDER_ID: corim_abstractions::SignerProviderId =
    corim_abstractions::SignerProviderId(uuid::Uuid::from_u128(0x4b1e_3f0a_9c2d_4e71_8a55_61d0_2f7c_b914));

pub const JWK_PROVIDER_NAME: &str = "jwk";

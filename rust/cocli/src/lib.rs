// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! `cocli corim sign`: read an unsigned CoRIM, its metadata and a JWK signing
//! key, optionally attach certificates, and write the signed CoRIM.

// Registers the JWK signer provider.
use corim_jwk as _;

pub mod config;
pub mod sign;

pub use config::{ConfigError, SignConfig, SignInputs};
pub use sign::{default_output_path, run_sign, SignCommandError, SignedOutput};

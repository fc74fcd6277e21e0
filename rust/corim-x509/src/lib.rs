// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! X.509 certificate material for COSE `x5chain`.
//!
//! The COSE header parameter `x5chain` (label 33, RFC 9360) carries the
//! signing certificate followed by the intermediates that link it to a trust
//! anchor. This crate splits caller-supplied DER into certificates, enforces
//! the leaf-before-intermediates rule, and converts the chain to and from the
//! header value. It does not validate issuer/subject linkage.

pub mod certificate_chain;
pub mod x5c_header;

pub use certificate_chain::{split_der_certificates, CertificateChain, CertificateError};
pub use x5c_header::{x5chain_certificates, x5chain_from_header, x5chain_header_value};

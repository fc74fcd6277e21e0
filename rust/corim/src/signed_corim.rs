// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Signed CoRIM assembly and inspection.

use corim_abstractions::{
    labels, CoseAlgorithm, CoseSign1, DecodeError, HeaderMap, HeaderValue, ManifestMeta, Signer, UnsignedManifest,
    Validated,
};
use corim_common::{decode_cose_sign1, encode_cose_sign1, encode_header_map, sig_structure, to_be_signed};
use corim_x509::{x5chain_certificates, x5chain_header_value, CertificateChain};
use tracing::{debug, warn};

use crate::error::CorimError;
use crate::meta::Meta;
use crate::unsigned_corim::UnsignedCorim;

/// Assembles one signed envelope from a validated manifest and metadata pair.
///
/// The builder only accepts [`Validated`] inputs, so an unvalidated manifest
/// cannot reach the signer. [`sign`](Self::sign) consumes the builder; sign
/// another envelope with a fresh builder.
pub struct SignedCorimBuilder<'a, M, T> {
    manifest: &'a Validated<M>,
    meta: &'a Validated<T>,
    chain: CertificateChain,
}

impl<'a, M: UnsignedManifest, T: ManifestMeta> SignedCorimBuilder<'a, M, T> {
    pub fn new(manifest: &'a Validated<M>, meta: &'a Validated<T>) -> Self {
        Self {
            manifest,
            meta,
            chain: CertificateChain::new(),
        }
    }

    /// Attach the signing certificate. `der` may hold several concatenated
    /// certificates; only the first is kept.
    pub fn attach_leaf(&mut self, der: &[u8]) -> Result<(), CorimError> {
        let ignored = self.chain.attach_leaf(der)?;
        if ignored > 0 {
            warn!(ignored, "signing certificate input holds more than one certificate, using the first");
        }
        debug!(len = der.len(), "attached signing certificate");
        Ok(())
    }

    /// Attach intermediates in the order given. Requires a leaf.
    pub fn attach_intermediates(&mut self, der: &[u8]) -> Result<(), CorimError> {
        self.chain.attach_intermediates(der)?;
        debug!(count = self.chain.intermediates().len(), "attached intermediate certificates");
        Ok(())
    }

    pub fn certificate_chain(&self) -> Option<&CertificateChain> {
        if self.chain.is_empty() {
            None
        } else {
            Some(&self.chain)
        }
    }

    /// Serialized protected header for `alg`.
    pub fn protected_header(&self, alg: CoseAlgorithm) -> Result<Vec<u8>, CorimError> {
        let mut headers = HeaderMap::new();
        headers.insert(labels::ALG, HeaderValue::Int(alg.id()));
        headers.insert(labels::CONTENT_TYPE, HeaderValue::Text(M::CONTENT_TYPE.to_string()));
        headers.insert(labels::CORIM_META, HeaderValue::Bytes(self.meta.to_cbor()?));
        if let Some(x5chain) = x5chain_header_value(&self.chain.to_x5chain()) {
            headers.insert(labels::X5CHAIN, x5chain);
        }
        Ok(encode_header_map(&headers)?)
    }

    /// Sign and return the tagged COSE_Sign1 bytes.
    pub fn sign<S: Signer + ?Sized>(self, signer: &S) -> Result<Vec<u8>, CorimError> {
        let alg = signer.algorithm();
        let protected = self.protected_header(alg)?;
        let payload = self.manifest.payload();
        let tbs = sig_structure(&protected, payload)?;

        let signature = signer.sign(&tbs)?;
        let envelope = encode_cose_sign1(&protected, &HeaderMap::new(), payload, &signature)?;

        debug!(
            alg = %alg,
            certificates = self.chain.to_x5chain().len(),
            payload_len = payload.len(),
            envelope_len = envelope.len(),
            "assembled signed CoRIM"
        );
        Ok(envelope)
    }
}

/// Read-only view over a signed CoRIM envelope. Does not verify the signature.
#[derive(Debug, Clone)]
pub struct SignedCorimView {
    message: CoseSign1,
}

fn decode_err(e: impl std::fmt::Display) -> DecodeError {
    DecodeError::new(e.to_string())
}

impl SignedCorimView {
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, DecodeError> {
        let message = decode_cose_sign1(bytes).map_err(decode_err)?;
        if message.is_detached() {
            return Err(DecodeError::new("signed CoRIM must embed its payload"));
        }
        Ok(Self { message })
    }

    pub fn message(&self) -> &CoseSign1 {
        &self.message
    }

    pub fn payload(&self) -> &[u8] {
        self.message.payload.as_deref().unwrap_or_default()
    }

    pub fn signature(&self) -> &[u8] {
        &self.message.signature
    }

    pub fn algorithm(&self) -> Option<CoseAlgorithm> {
        self.message.protected.algorithm()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.message.protected.content_type()
    }

    pub fn meta(&self) -> Result<Meta, DecodeError> {
        let raw = self
            .message
            .protected
            .get(labels::CORIM_META)
            .and_then(HeaderValue::as_bytes)
            .ok_or_else(|| DecodeError::new("missing corim-meta header"))?;
        Meta::from_cbor(raw)
    }

    pub fn unsigned_corim(&self) -> Result<UnsignedCorim, DecodeError> {
        UnsignedCorim::from_cbor(self.payload())
    }

    /// `x5chain` certificates in header order; empty when none were attached.
    pub fn certificates(&self) -> Result<Vec<Vec<u8>>, DecodeError> {
        x5chain_certificates(&self.message).map_err(decode_err)
    }

    /// The Sig_structure bytes the signature covers.
    pub fn to_be_signed(&self) -> Result<Vec<u8>, DecodeError> {
        to_be_signed(&self.message, None).map_err(decode_err)
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! CoRIM metadata: who signed the manifest and, optionally, for how long the
//! signature is meant to be trusted.
//!
//! Operators supply it as JSON:
//!
//! ```json
//! { "signer": { "name": "ACME Ltd", "uri": "https://acme.example" },
//!   "validity": { "not-before": "2024-01-01T00:00:00Z", "not-after": "2025-01-01T00:00:00Z" } }
//! ```
//!
//! and it travels in the protected header as
//! `{ 0: { 0: name, ? 1: uri }, ? 1: { ? 0: time, 1: time } }`.

use corim_abstractions::{DecodeError, EncodeError, ManifestMeta, Validate, ValidationError};
use minicbor::{Decoder, Encoder};
use serde::{Deserialize, Serialize};

use crate::cbor::{self, Enc};
use crate::validity::Validity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaSigner {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub signer: MetaSigner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<Validity>,
}

impl Meta {
    pub fn from_json(bytes: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(bytes).map_err(|e| DecodeError::new(format!("meta JSON: {e}")))
    }

    pub fn to_json(&self) -> Result<String, EncodeError> {
        serde_json::to_string_pretty(self).map_err(|e| EncodeError::new(format!("meta JSON: {e}")))
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, DecodeError> {
        const CTX: &str = "corim-meta-map";

        let mut dec = Decoder::new(bytes);
        let len = cbor::map_len(&mut dec, CTX)?;
        let mut signer = None;
        let mut validity = None;
        for _ in 0..len {
            match cbor::map_key(&mut dec, CTX)? {
                0 => signer = Some(decode_signer(&mut dec)?),
                1 => validity = Some(Validity::decode(&mut dec)?),
                _ => dec.skip().map_err(|e| cbor::err(CTX, e))?,
            }
        }
        cbor::ensure_consumed(&dec, bytes, CTX)?;

        let signer = signer.ok_or_else(|| DecodeError::new("corim-meta-map: missing signer"))?;
        Ok(Self { signer, validity })
    }

    fn encode(&self, enc: &mut Enc<'_>) -> Result<(), String> {
        let len = if self.validity.is_some() { 2 } else { 1 };
        enc.map(len).map_err(cbor::enc_err)?;

        enc.u8(0).map_err(cbor::enc_err)?;
        let signer_len = if self.signer.uri.is_some() { 2 } else { 1 };
        enc.map(signer_len).map_err(cbor::enc_err)?;
        enc.u8(0).map_err(cbor::enc_err)?;
        enc.str(&self.signer.name).map_err(cbor::enc_err)?;
        if let Some(uri) = &self.signer.uri {
            enc.u8(1).map_err(cbor::enc_err)?;
            cbor::encode_uri(enc, uri)?;
        }

        if let Some(validity) = &self.validity {
            enc.u8(1).map_err(cbor::enc_err)?;
            validity.encode(enc)?;
        }
        Ok(())
    }
}

fn decode_signer(dec: &mut Decoder<'_>) -> Result<MetaSigner, DecodeError> {
    const CTX: &str = "corim-signer-map";

    let len = cbor::map_len(dec, CTX)?;
    let mut name = None;
    let mut uri = None;
    for _ in 0..len {
        match cbor::map_key(dec, CTX)? {
            0 => name = Some(cbor::text(dec, "corim-signer-map name")?),
            1 => uri = Some(cbor::uri(dec, "corim-signer-map uri")?),
            _ => dec.skip().map_err(|e| cbor::err(CTX, e))?,
        }
    }
    let name = name.ok_or_else(|| DecodeError::new("corim-signer-map: missing name"))?;
    Ok(MetaSigner { name, uri })
}

impl Validate for Meta {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.signer.name.is_empty() {
            return Err(ValidationError::new("signer: empty name"));
        }
        if let Some(uri) = &self.signer.uri {
            url::Url::parse(uri).map_err(|e| ValidationError::new(format!("signer: invalid uri {uri:?}: {e}")))?;
        }
        if let Some(validity) = &self.validity {
            validity.validate()?;
        }
        Ok(())
    }
}

impl ManifestMeta for Meta {
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_json(bytes)
    }

    fn to_cbor(&self) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        let mut enc = Encoder::new(&mut out);
        self.encode(&mut enc).map_err(EncodeError::new)?;
        Ok(out)
    }
}

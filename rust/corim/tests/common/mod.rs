// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(dead_code)]

use std::cell::Cell;

use corim::{CoseAlgorithm, Meta, SignError, Signer, UnsignedCorim, Validated};
use minicbor::data::Tag;
use minicbor::Encoder;

pub const COMID_BODY: &[u8] = &[0xa1, 0x00, 0x00];

/// `#6.501({0: id, 1: [#6.506(h'a10000')]})`
pub fn minimal_corim(id: &str) -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    enc.tag(Tag::new(501)).unwrap().map(2).unwrap();
    enc.u8(0).unwrap().str(id).unwrap();
    enc.u8(1).unwrap().array(1).unwrap();
    enc.tag(Tag::new(506)).unwrap().bytes(COMID_BODY).unwrap();
    out
}

/// A CoRIM using every supported field plus an unknown key.
pub fn full_corim() -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    enc.tag(Tag::new(501)).unwrap().map(7).unwrap();

    enc.u8(0).unwrap().tag(Tag::new(37)).unwrap().bytes(&[0x11; 16]).unwrap();

    enc.u8(1).unwrap().array(2).unwrap();
    enc.tag(Tag::new(506)).unwrap().bytes(COMID_BODY).unwrap();
    enc.tag(Tag::new(505)).unwrap().bytes(&[0xa0]).unwrap();

    enc.u8(2).unwrap().array(1).unwrap();
    enc.map(2).unwrap();
    enc.u8(0).unwrap().tag(Tag::new(32)).unwrap().str("https://acme.example/base.corim").unwrap();
    enc.u8(1).unwrap().array(2).unwrap().i8(-16).unwrap().bytes(&[0xab; 32]).unwrap();

    enc.u8(3).unwrap().tag(Tag::new(32)).unwrap().str("https://acme.example/profile").unwrap();

    enc.u8(4).unwrap().map(2).unwrap();
    enc.u8(0).unwrap().tag(Tag::new(1)).unwrap().i64(1_700_000_000).unwrap();
    enc.u8(1).unwrap().tag(Tag::new(1)).unwrap().i64(1_800_000_000).unwrap();

    enc.u8(5).unwrap().array(1).unwrap();
    enc.map(3).unwrap();
    enc.u8(0).unwrap().str("ACME Ltd").unwrap();
    enc.u8(1).unwrap().tag(Tag::new(32)).unwrap().str("https://acme.example").unwrap();
    enc.u8(2).unwrap().array(2).unwrap().u8(1).unwrap().u8(2).unwrap();

    enc.u8(99).unwrap().str("extension").unwrap();
    out
}

/// Decodes, but has no id and therefore fails validation.
pub fn corim_without_id() -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    enc.tag(Tag::new(501)).unwrap().map(1).unwrap();
    enc.u8(1).unwrap().array(1).unwrap();
    enc.tag(Tag::new(506)).unwrap().bytes(COMID_BODY).unwrap();
    out
}

pub fn meta_json() -> &'static [u8] {
    br#"{
        "signer": { "name": "ACME Ltd", "uri": "https://acme.example" },
        "validity": { "not-before": "2023-11-14T22:13:20Z", "not-after": "2027-01-15T08:00:00Z" }
    }"#
}

pub fn validated_corim(bytes: &[u8]) -> Validated<UnsignedCorim> {
    Validated::new(UnsignedCorim::from_cbor(bytes).unwrap()).unwrap()
}

pub fn validated_meta() -> Validated<Meta> {
    Validated::new(Meta::from_json(meta_json()).unwrap()).unwrap()
}

pub fn cert_der(name: &str) -> Vec<u8> {
    rcgen::generate_simple_self_signed(vec![name.to_string()])
        .unwrap()
        .cert
        .der()
        .to_vec()
}

pub fn p256_key() -> p256::ecdsa::SigningKey {
    p256::ecdsa::SigningKey::from_bytes(&[5u8; 32].into()).unwrap()
}

/// ECDSA P-256 signer that draws fresh randomness per signature.
pub struct RandomizedP256(pub p256::ecdsa::SigningKey);

impl Signer for RandomizedP256 {
    fn algorithm(&self) -> CoseAlgorithm {
        CoseAlgorithm::ES256
    }

    fn sign(&self, tbs: &[u8]) -> Result<Vec<u8>, SignError> {
        use signature::RandomizedSigner as _;
        let sig: p256::ecdsa::Signature = self
            .0
            .try_sign_with_rng(&mut rand_core::OsRng, tbs)
            .map_err(|e| SignError::Primitive(e.to_string()))?;
        Ok(sig.to_bytes().to_vec())
    }
}

/// Records how often it was asked to sign.
#[derive(Default)]
pub struct CountingSigner {
    pub calls: Cell<usize>,
}

impl Signer for CountingSigner {
    fn algorithm(&self) -> CoseAlgorithm {
        CoseAlgorithm::ES256
    }

    fn sign(&self, _tbs: &[u8]) -> Result<Vec<u8>, SignError> {
        self.calls.set(self.calls.get() + 1);
        Ok(vec![0u8; 64])
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use minicbor::data::Tag;
use minicbor::Encoder;

pub fn unsigned_corim(id: &str) -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    enc.tag(Tag::new(501)).unwrap().map(2).unwrap();
    enc.u8(0).unwrap().str(id).unwrap();
    enc.u8(1).unwrap().array(1).unwrap();
    enc.tag(Tag::new(506)).unwrap().bytes(&[0xa1, 0x00, 0x00]).unwrap();
    out
}

pub const META_JSON: &str = r#"{"signer": {"name": "ACME Ltd", "uri": "https://acme.example"}}"#;

pub fn p256_key() -> p256::ecdsa::SigningKey {
    p256::ecdsa::SigningKey::from_bytes(&[11u8; 32].into()).unwrap()
}

pub fn jwk() -> String {
    serde_json::json!({
        "kty": "EC",
        "crv": "P-256",
        "alg": "ES256",
        "d": URL_SAFE_NO_PAD.encode(p256_key().to_bytes()),
    })
    .to_string()
}

pub fn cert_der(name: &str) -> Vec<u8> {
    rcgen::generate_simple_self_signed(vec![name.to_string()])
        .unwrap()
        .cert
        .der()
        .to_vec()
}

/// A temp directory holding `unsigned.cbor`, `meta.json` and `key.jwk`.
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let ws = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        ws.write("unsigned.cbor", &unsigned_corim("urn:example:corim"));
        ws.write("meta.json", META_JSON.as_bytes());
        ws.write("key.jwk", jwk().as_bytes());
        ws
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    pub fn files(&self) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(self.dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn exists(path: &Path) -> bool {
    path.try_exists().unwrap()
}

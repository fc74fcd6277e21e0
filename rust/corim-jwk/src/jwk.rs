// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! JWK private key loading.
//!
//! Supported keys:
//! - `kty: "EC"` with `crv` P-256 / P-384 / P-521 (ES256 / ES384 / ES512)
//! - `kty: "RSA"` with `n`, `e`, `d`, `p`, `q` (PS256 / PS384 / PS512)
//! - `kty: "OKP"` with `crv` Ed25519 (EdDSA)
//!
//! The optional `alg` member declares the signing algorithm. When absent it
//! is derived from the curve, or PS256 for RSA. An `alg` that does not fit the
//! key is accepted here and rejected by [`JwkSigner::sign`].
//!
//! ECDSA and Ed25519 signing are deterministic. RSA-PSS draws a fresh salt from
//! the OS RNG on every call. Both keep no mutable state, so one `JwkSigner`
//! may sign from several threads.

use base64::Engine;
use corim_abstractions::{CoseAlgorithm, SignError, Signer};
use rand_core::OsRng;
use rsa::{pss, BigUint, RsaPrivateKey};
use serde::Deserialize;
use sha2::digest::{Digest, FixedOutputReset};
use sha2::{Sha256, Sha384, Sha512};
use signature::{RandomizedSigner as _, SignatureEncoding as _, Signer as _};

#[derive(Debug, thiserror::Error)]
pub enum JwkError {
    /// Not a JSON object. Other key formats may still apply.
    #[error("key material is not a JSON object: {0}")]
    NotJson(String),

    #[error("malformed JWK: {0}")]
    Malformed(String),

    #[error("JWK is missing required member '{0}'")]
    MissingMember(&'static str),

    #[error("JWK member '{member}' is not valid base64url: {reason}")]
    BadEncoding { member: &'static str, reason: String },

    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    #[error("unsupported curve: {0}")]
    UnsupportedCurve(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlg(String),

    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub crv: Option<String>,
    pub alg: Option<String>,
    pub kid: Option<String>,
    pub d: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub n: Option<String>,
    pub e: Option<String>,
    pub p: Option<String>,
    pub q: Option<String>,
}

enum JwkKey {
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
    P521(p521::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
    Rsa(Box<RsaPrivateKey>),
}

impl JwkKey {
    fn key_type(&self) -> &'static str {
        match self {
            Self::P256(_) => "EC P-256",
            Self::P384(_) => "EC P-384",
            Self::P521(_) => "EC P-521",
            Self::Ed25519(_) => "OKP Ed25519",
            Self::Rsa(_) => "RSA",
        }
    }

    fn default_algorithm(&self) -> CoseAlgorithm {
        match self {
            Self::P256(_) => CoseAlgorithm::ES256,
            Self::P384(_) => CoseAlgorithm::ES384,
            Self::P521(_) => CoseAlgorithm::ES512,
            Self::Ed25519(_) => CoseAlgorithm::EdDSA,
            Self::Rsa(_) => CoseAlgorithm::PS256,
        }
    }
}

/// A [`Signer`] backed by a JWK private key.
pub struct JwkSigner {
    key: JwkKey,
    alg: CoseAlgorithm,
    kid: Option<String>,
}

impl std::fmt::Debug for JwkSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwkSigner")
            .field("key_type", &self.key.key_type())
            .field("alg", &self.alg)
            .field("kid", &self.kid)
            .finish_non_exhaustive()
    }
}

/// Parse JWK JSON bytes into a signer.
pub fn signer_from_jwk(bytes: &[u8]) -> Result<JwkSigner, JwkError> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| JwkError::NotJson(e.to_string()))?;
    if !value.is_object() {
        return Err(JwkError::NotJson(format!("found {}", json_kind(&value))));
    }
    let jwk: Jwk = serde_json::from_value(value).map_err(|e| JwkError::Malformed(e.to_string()))?;
    JwkSigner::from_jwk(&jwk)
}

impl JwkSigner {
    pub fn from_jwk(jwk: &Jwk) -> Result<Self, JwkError> {
        let key = match jwk.kty.as_str() {
            "EC" => ec_key(jwk)?,
            "RSA" => rsa_key(jwk)?,
            "OKP" => okp_key(jwk)?,
            other => return Err(JwkError::UnsupportedKeyType(other.to_string())),
        };

        let alg = match jwk.alg.as_deref() {
            Some(name) => CoseAlgorithm::from_name(name).ok_or_else(|| JwkError::UnsupportedAlg(name.to_string()))?,
            None => key.default_algorithm(),
        };

        Ok(Self {
            key,
            alg,
            kid: jwk.kid.clone(),
        })
    }

    pub fn key_id(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    pub fn key_type(&self) -> &'static str {
        self.key.key_type()
    }
}

impl Signer for JwkSigner {
    fn algorithm(&self) -> CoseAlgorithm {
        self.alg
    }

    fn sign(&self, tbs: &[u8]) -> Result<Vec<u8>, SignError> {
        // COSE carries ECDSA signatures as the raw `r || s` concatenation.
        match (&self.key, self.alg) {
            (JwkKey::P256(sk), CoseAlgorithm::ES256) => {
                let sig: p256::ecdsa::Signature = sk.try_sign(tbs).map_err(primitive)?;
                Ok(sig.to_bytes().to_vec())
            }
            (JwkKey::P384(sk), CoseAlgorithm::ES384) => {
                let sig: p384::ecdsa::Signature = sk.try_sign(tbs).map_err(primitive)?;
                Ok(sig.to_bytes().to_vec())
            }
            (JwkKey::P521(sk), CoseAlgorithm::ES512) => {
                let sig: p521::ecdsa::Signature = sk.try_sign(tbs).map_err(primitive)?;
                Ok(sig.to_bytes().to_vec())
            }
            (JwkKey::Ed25519(sk), CoseAlgorithm::EdDSA) => {
                let sig: ed25519_dalek::Signature = sk.try_sign(tbs).map_err(primitive)?;
                Ok(sig.to_bytes().to_vec())
            }
            (JwkKey::Rsa(key), CoseAlgorithm::PS256) => sign_pss::<Sha256>(key, tbs),
            (JwkKey::Rsa(key), CoseAlgorithm::PS384) => sign_pss::<Sha384>(key, tbs),
            (JwkKey::Rsa(key), CoseAlgorithm::PS512) => sign_pss::<Sha512>(key, tbs),
            (key, alg) => Err(SignError::AlgorithmMismatch {
                alg,
                key_type: key.key_type(),
            }),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn primitive(e: signature::Error) -> SignError {
    SignError::Primitive(e.to_string())
}

fn sign_pss<D>(key: &RsaPrivateKey, tbs: &[u8]) -> Result<Vec<u8>, SignError>
where
    D: Digest + FixedOutputReset,
{
    // Salt length equals the digest size, as COSE requires.
    let signer = pss::BlindedSigningKey::<D>::new(key.clone());
    let sig: pss::Signature = signer.try_sign_with_rng(&mut OsRng, tbs).map_err(primitive)?;
    Ok(sig.to_vec())
}

fn decode_member(value: Option<&str>, member: &'static str) -> Result<Vec<u8>, JwkError> {
    let value = value.ok_or(JwkError::MissingMember(member))?;
    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .map_err(|e| JwkError::BadEncoding {
            member,
            reason: e.to_string(),
        })
}

fn ec_key(jwk: &Jwk) -> Result<JwkKey, JwkError> {
    let crv = jwk.crv.as_deref().ok_or(JwkError::MissingMember("crv"))?;
    let d = decode_member(jwk.d.as_deref(), "d")?;

    let expected_len = match crv {
        "P-256" => 32,
        "P-384" => 48,
        "P-521" => 66,
        other => return Err(JwkError::UnsupportedCurve(other.to_string())),
    };
    if d.len() != expected_len {
        return Err(JwkError::InvalidKey(format!(
            "{crv} private scalar must be {expected_len} bytes, got {}",
            d.len()
        )));
    }

    match crv {
        "P-256" => {
            let sk = p256::ecdsa::SigningKey::from_slice(&d)
                .map_err(|e| JwkError::InvalidKey(format!("bad P-256 private key: {e}")))?;
            let point = p256::ecdsa::VerifyingKey::from(&sk).to_encoded_point(false);
            check_public_coordinates(jwk, point.x().map(|x| &x[..]), point.y().map(|y| &y[..]))?;
            Ok(JwkKey::P256(sk))
        }
        "P-384" => {
            let sk = p384::ecdsa::SigningKey::from_slice(&d)
                .map_err(|e| JwkError::InvalidKey(format!("bad P-384 private key: {e}")))?;
            let point = p384::ecdsa::VerifyingKey::from(&sk).to_encoded_point(false);
            check_public_coordinates(jwk, point.x().map(|x| &x[..]), point.y().map(|y| &y[..]))?;
            Ok(JwkKey::P384(sk))
        }
        _ => {
            let sk = p521::ecdsa::SigningKey::from_slice(&d)
                .map_err(|e| JwkError::InvalidKey(format!("bad P-521 private key: {e}")))?;
            let point = p521::ecdsa::VerifyingKey::from(&sk).to_encoded_point(false);
            check_public_coordinates(jwk, point.x().map(|x| &x[..]), point.y().map(|y| &y[..]))?;
            Ok(JwkKey::P521(sk))
        }
    }
}

/// `x` and `y` are optional in a private JWK; when given they must belong to `d`.
fn check_public_coordinates(jwk: &Jwk, x: Option<&[u8]>, y: Option<&[u8]>) -> Result<(), JwkError> {
    for (member, supplied, derived) in [("x", jwk.x.as_deref(), x), ("y", jwk.y.as_deref(), y)] {
        if supplied.is_none() {
            continue;
        }
        let supplied = decode_member(supplied, member)?;
        if Some(supplied.as_slice()) != derived {
            return Err(JwkError::InvalidKey(format!(
                "public coordinate '{member}' does not match private key"
            )));
        }
    }
    Ok(())
}

fn okp_key(jwk: &Jwk) -> Result<JwkKey, JwkError> {
    let crv = jwk.crv.as_deref().ok_or(JwkError::MissingMember("crv"))?;
    if crv != "Ed25519" {
        return Err(JwkError::UnsupportedCurve(crv.to_string()));
    }

    let d = decode_member(jwk.d.as_deref(), "d")?;
    let seed: [u8; 32] = d
        .as_slice()
        .try_into()
        .map_err(|_| JwkError::InvalidKey(format!("Ed25519 private key must be 32 bytes, got {}", d.len())))?;
    let sk = ed25519_dalek::SigningKey::from_bytes(&seed);

    if jwk.x.is_some() {
        let x = decode_member(jwk.x.as_deref(), "x")?;
        if x.as_slice() != sk.verifying_key().to_bytes().as_slice() {
            return Err(JwkError::InvalidKey(
                "public key 'x' does not match private key".to_string(),
            ));
        }
    }
    Ok(JwkKey::Ed25519(sk))
}

fn rsa_key(jwk: &Jwk) -> Result<JwkKey, JwkError> {
    let uint = |value: Option<&str>, member: &'static str| decode_member(value, member).map(|b| BigUint::from_bytes_be(&b));

    let n = uint(jwk.n.as_deref(), "n")?;
    let e = uint(jwk.e.as_deref(), "e")?;
    let d = uint(jwk.d.as_deref(), "d")?;
    let p = uint(jwk.p.as_deref(), "p")?;
    let q = uint(jwk.q.as_deref(), "q")?;

    let key = RsaPrivateKey::from_components(n, e, d, vec![p, q])
        .map_err(|e| JwkError::InvalidKey(format!("bad RSA private key: {e}")))?;
    key.validate()
        .map_err(|e| JwkError::InvalidKey(format!("bad RSA private key: {e}")))?;

    Ok(JwkKey::Rsa(Box::new(key)))
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE header parameters.

use std::collections::BTreeMap;
use std::ops::Deref;

use crate::CoseAlgorithm;

/// Header labels a signed CoRIM uses.
pub mod labels {
    pub const ALG: i64 = 1;
    pub const CONTENT_TYPE: i64 = 3;
    pub const KID: i64 = 4;
    /// `corim-meta` (draft-ietf-rats-corim).
    pub const CORIM_META: i64 = 8;
    /// `x5chain` (RFC 9360).
    pub const X5CHAIN: i64 = 33;
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeaderLabel {
    Int(i64),
    Text(String),
}

impl From<i64> for HeaderLabel {
    fn from(label: i64) -> Self {
        Self::Int(label)
    }
}

impl From<&str> for HeaderLabel {
    fn from(label: &str) -> Self {
        Self::Text(label.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Int(i64),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<HeaderValue>),
    Map(HeaderMap),
    Tagged(u64, Box<HeaderValue>),
    Bool(bool),
    Null,
}

impl HeaderValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[HeaderValue]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

/// Header parameters, iterated in ascending label order (integers before text).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HeaderMap(BTreeMap<HeaderLabel, HeaderValue>);

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, returning the value it replaced.
    pub fn insert(&mut self, label: impl Into<HeaderLabel>, value: HeaderValue) -> Option<HeaderValue> {
        self.0.insert(label.into(), value)
    }

    pub fn get(&self, label: impl Into<HeaderLabel>) -> Option<&HeaderValue> {
        self.0.get(&label.into())
    }

    pub fn contains(&self, label: impl Into<HeaderLabel>) -> bool {
        self.0.contains_key(&label.into())
    }

    pub fn algorithm(&self) -> Option<CoseAlgorithm> {
        self.get(labels::ALG)?.as_int().and_then(CoseAlgorithm::from_id)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get(labels::CONTENT_TYPE)?.as_text()
    }

    pub fn labels(&self) -> impl Iterator<Item = &HeaderLabel> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderLabel, &HeaderValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(HeaderLabel, HeaderValue)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (HeaderLabel, HeaderValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A protected header: the decoded parameters and the exact bytes that the
/// signature covers. Sig_structure must use `raw`, never a re-encoding.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProtectedHeader {
    raw: Vec<u8>,
    map: HeaderMap,
}

impl ProtectedHeader {
    pub fn from_parts(raw: Vec<u8>, map: HeaderMap) -> Self {
        Self { raw, map }
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn map(&self) -> &HeaderMap {
        &self.map
    }
}

impl Deref for ProtectedHeader {
    type Target = HeaderMap;

    fn deref(&self) -> &HeaderMap {
        &self.map
    }
}

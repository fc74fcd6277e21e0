// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CertificateError {
    #[error("malformed DER certificate data: {0}")]
    Format(String),

    #[error("cannot add intermediate certificates without a signing certificate")]
    MissingLeaf,
}

/// Split concatenated DER certificates, preserving their order.
///
/// Every byte must belong to a certificate; empty input and trailing garbage
/// are both rejected.
pub fn split_der_certificates(der: &[u8]) -> Result<Vec<Vec<u8>>, CertificateError> {
    if der.is_empty() {
        return Err(CertificateError::Format("no certificates found".to_string()));
    }

    let mut certs = Vec::new();
    let mut rest = der;
    while !rest.is_empty() {
        let (remaining, _) = x509_parser::parse_x509_certificate(rest)
            .map_err(|e| CertificateError::Format(format!("certificate #{}: {e}", certs.len() + 1)))?;
        let consumed = rest.len() - remaining.len();
        certs.push(rest[..consumed].to_vec());
        rest = remaining;
    }

    Ok(certs)
}

/// Signing certificate plus the intermediates supplied after it.
///
/// Invariant: `intermediates` is non-empty only if `leaf` is set. Intermediate
/// order is whatever the caller supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateChain {
    leaf: Option<Vec<u8>>,
    intermediates: Vec<Vec<u8>>,
}

impl CertificateChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the first certificate in `der` as the leaf.
    ///
    /// Returns how many additional certificates followed the leaf; those are
    /// not kept. On error the chain is left untouched.
    pub fn attach_leaf(&mut self, der: &[u8]) -> Result<usize, CertificateError> {
        let mut certs = split_der_certificates(der)?.into_iter();
        let leaf = certs
            .next()
            .ok_or_else(|| CertificateError::Format("no certificates found".to_string()))?;
        self.leaf = Some(leaf);
        Ok(certs.len())
    }

    /// Record every certificate in `der` as the intermediates, replacing any
    /// previously attached ones. On error the chain is left untouched.
    pub fn attach_intermediates(&mut self, der: &[u8]) -> Result<(), CertificateError> {
        if self.leaf.is_none() {
            return Err(CertificateError::MissingLeaf);
        }
        self.intermediates = split_der_certificates(der)?;
        Ok(())
    }

    pub fn leaf(&self) -> Option<&[u8]> {
        self.leaf.as_deref()
    }

    pub fn intermediates(&self) -> &[Vec<u8>] {
        &self.intermediates
    }

    pub fn is_empty(&self) -> bool {
        self.leaf.is_none()
    }

    /// Leaf first, then intermediates in supplied order.
    pub fn to_x5chain(&self) -> Vec<Vec<u8>> {
        let Some(leaf) = &self.leaf else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(1 + self.intermediates.len());
        out.push(leaf.clone());
        out.extend(self.intermediates.iter().cloned());
        out
    }
}

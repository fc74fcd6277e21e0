// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use corim_abstractions::{labels, CoseSign1, HeaderValue};

use crate::certificate_chain::CertificateError;

/// Header value for a chain, or `None` when it is empty.
///
/// RFC 9360 writes a single certificate as a bare bstr and longer chains as
/// an array of bstr, leaf first.
pub fn x5chain_header_value(chain: &[Vec<u8>]) -> Option<HeaderValue> {
    match chain {
        [] => None,
        [leaf] => Some(HeaderValue::Bytes(leaf.clone())),
        _ => Some(HeaderValue::Array(
            chain.iter().cloned().map(HeaderValue::Bytes).collect(),
        )),
    }
}

/// Inverse of [`x5chain_header_value`]. Accepts either encoding.
pub fn x5chain_from_header(value: &HeaderValue) -> Result<Vec<Vec<u8>>, CertificateError> {
    let malformed = || CertificateError::Format("x5chain must be a bstr or an array of bstr".to_string());

    let certs = match value {
        HeaderValue::Bytes(cert) => vec![cert.clone()],
        HeaderValue::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| item.as_bytes().map(<[u8]>::to_vec).ok_or_else(malformed))
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(malformed()),
    };

    if certs.iter().any(Vec::is_empty) {
        return Err(CertificateError::Format("x5chain holds an empty certificate".to_string()));
    }
    Ok(certs)
}

/// Certificates carried in a message's `x5chain`, looking at the protected
/// header first. Empty when the parameter is absent.
pub fn x5chain_certificates(msg: &CoseSign1) -> Result<Vec<Vec<u8>>, CertificateError> {
    msg.header(labels::X5CHAIN)
        .map_or_else(|| Ok(Vec::new()), x5chain_from_header)
}

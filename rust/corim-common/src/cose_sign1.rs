// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use corim_abstractions::{CoseSign1, HeaderMap, ProtectedHeader, COSE_SIGN1_TAG, SIGNATURE1_CONTEXT};
use minicbor::data::{Tag, Type};
use minicbor::{Decoder, Encoder};

use crate::error::CodecError;
use crate::header::{decode_header_map, read_map, write_map};

/// `["Signature1", protected, h'', payload]` (RFC 9052 section 4.4).
///
/// `protected` is the serialized protected header, exactly as it appears in
/// the message. External AAD is always empty.
pub fn sig_structure(protected: &[u8], payload: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(16 + protected.len() + payload.len());
    Encoder::new(&mut out)
        .array(4)?
        .str(SIGNATURE1_CONTEXT)?
        .bytes(protected)?
        .bytes(&[])?
        .bytes(payload)?;
    Ok(out)
}

/// Sig_structure of a decoded message. A detached message needs `external_payload`.
pub fn to_be_signed(msg: &CoseSign1, external_payload: Option<&[u8]>) -> Result<Vec<u8>, CodecError> {
    let payload = msg
        .payload
        .as_deref()
        .or(external_payload)
        .ok_or(CodecError::DetachedPayload)?;
    sig_structure(msg.protected.raw(), payload)
}

/// Tagged COSE_Sign1 with an embedded payload.
pub fn encode_cose_sign1(
    protected: &[u8],
    unprotected: &HeaderMap,
    payload: &[u8],
    signature: &[u8],
) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(24 + protected.len() + payload.len() + signature.len());
    let mut enc = Encoder::new(&mut out);
    enc.tag(Tag::new(COSE_SIGN1_TAG))?.array(4)?.bytes(protected)?;
    write_map(&mut enc, unprotected)?;
    enc.bytes(payload)?.bytes(signature)?;
    Ok(out)
}

/// Decode a COSE_Sign1, tagged (18) or untagged.
pub fn decode_cose_sign1(input: &[u8]) -> Result<CoseSign1, CodecError> {
    let mut dec = Decoder::new(input);

    if dec.datatype()? == Type::Tag {
        let tag = dec.tag()?.as_u64();
        if tag != COSE_SIGN1_TAG {
            return Err(CodecError::UnexpectedTag(tag));
        }
    }

    let len = dec.array()?.ok_or(CodecError::IndefiniteLength("arrays"))?;
    if len != 4 {
        return Err(CodecError::WrongArity(len));
    }

    let raw = dec.bytes()?.to_vec();
    let protected = ProtectedHeader::from_parts(raw.clone(), decode_header_map(&raw)?);
    let unprotected = read_map(&mut dec, 0)?;
    let payload = match dec.datatype()? {
        Type::Null => {
            dec.null()?;
            None
        }
        _ => Some(dec.bytes()?.to_vec()),
    };
    let signature = dec.bytes()?.to_vec();

    if dec.position() != input.len() {
        return Err(CodecError::TrailingBytes("COSE_Sign1"));
    }

    Ok(CoseSign1 {
        protected,
        unprotected,
        payload,
        signature,
    })
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE_Sign1 encode/decode tests.

use corim_abstractions::{labels, CoseSign1, HeaderMap, HeaderValue};
use corim_common::{decode_cose_sign1, encode_cose_sign1, encode_header_map, sig_structure, to_be_signed, CodecError};
use minicbor::data::Tag;
use minicbor::Encoder;

fn protected_es256() -> Vec<u8> {
    let mut map = HeaderMap::new();
    map.insert(labels::ALG, HeaderValue::Int(-7));
    encode_header_map(&map).unwrap()
}

#[test]
fn empty_input_is_a_cbor_error() {
    assert!(matches!(decode_cose_sign1(&[]), Err(CodecError::Cbor(_))));
}

#[test]
fn encoded_message_is_tagged_and_decodes_back() {
    let protected = protected_es256();
    let cose = encode_cose_sign1(&protected, &HeaderMap::new(), b"payload", b"sig").unwrap();

    // tag(18) is a single initial byte: major type 6, value 18.
    assert_eq!(cose[0], 0xd2);

    let msg = decode_cose_sign1(&cose).unwrap();
    assert_eq!(msg.protected.algorithm(), Some(corim_abstractions::CoseAlgorithm::ES256));
    assert_eq!(msg.protected.raw(), protected.as_slice());
    assert!(msg.unprotected.is_empty());
    assert_eq!(msg.payload.as_deref(), Some(b"payload".as_slice()));
    assert_eq!(msg.signature, b"sig");
}

#[test]
fn unprotected_parameters_are_found_by_header_lookup() {
    let mut unprotected = HeaderMap::new();
    unprotected.insert(labels::KID, HeaderValue::Bytes(b"kid".to_vec()));

    let msg = decode_cose_sign1(&encode_cose_sign1(&protected_es256(), &unprotected, b"p", b"s").unwrap()).unwrap();
    assert_eq!(msg.header(labels::KID).and_then(HeaderValue::as_bytes), Some(b"kid".as_slice()));
    assert_eq!(msg.header(labels::ALG).and_then(HeaderValue::as_int), Some(-7));
}

#[test]
fn sig_structure_matches_rfc9052_layout() {
    // ["Signature1", h'A10126', h'', h'7061796C6F6164']
    assert_eq!(
        hex::encode(sig_structure(&protected_es256(), b"payload").unwrap()),
        "846a5369676e61747572653143a1012640477061796c6f6164"
    );
}

#[test]
fn to_be_signed_uses_the_raw_protected_bytes() {
    let protected = protected_es256();
    let msg = decode_cose_sign1(&encode_cose_sign1(&protected, &HeaderMap::new(), b"payload", b"sig").unwrap()).unwrap();
    assert_eq!(
        to_be_signed(&msg, None).unwrap(),
        sig_structure(&protected, b"payload").unwrap()
    );
}

#[test]
fn detached_payload_needs_external_bytes() {
    let msg = CoseSign1::default();
    assert!(msg.is_detached());
    assert_eq!(to_be_signed(&msg, None).unwrap_err(), CodecError::DetachedPayload);
    assert!(to_be_signed(&msg, Some(b"ext")).is_ok());
}

#[test]
fn rejects_wrong_array_length() {
    let mut out = Vec::new();
    Encoder::new(&mut out).array(3).unwrap().bytes(&[]).unwrap().map(0).unwrap().bytes(b"x").unwrap();
    assert_eq!(decode_cose_sign1(&out).unwrap_err(), CodecError::WrongArity(3));
}

#[test]
fn rejects_unexpected_tag() {
    let mut out = Vec::new();
    Encoder::new(&mut out)
        .tag(Tag::new(999))
        .unwrap()
        .array(4)
        .unwrap()
        .bytes(&[])
        .unwrap()
        .map(0)
        .unwrap()
        .bytes(b"p")
        .unwrap()
        .bytes(b"s")
        .unwrap();
    assert_eq!(decode_cose_sign1(&out).unwrap_err(), CodecError::UnexpectedTag(999));
}

#[test]
fn untagged_message_decodes() {
    let tagged = encode_cose_sign1(&protected_es256(), &HeaderMap::new(), b"p", b"s").unwrap();
    let msg = decode_cose_sign1(&tagged[1..]).unwrap();
    assert_eq!(msg.payload.as_deref(), Some(b"p".as_slice()));
}

#[test]
fn rejects_trailing_bytes() {
    let mut cose = encode_cose_sign1(&protected_es256(), &HeaderMap::new(), b"p", b"s").unwrap();
    cose.push(0x00);
    assert_eq!(decode_cose_sign1(&cose).unwrap_err(), CodecError::TrailingBytes("COSE_Sign1"));
}

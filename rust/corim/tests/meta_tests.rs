// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod common;

use chrono::{TimeZone, Utc};
use common::meta_json;
use corim::{ManifestMeta, Meta, MetaSigner, Validate, Validity};

fn meta(name: &str, uri: Option<&str>, validity: Option<Validity>) -> Meta {
    Meta {
        signer: MetaSigner {
            name: name.to_string(),
            uri: uri.map(str::to_string),
        },
        validity,
    }
}

fn at(secs: i64) -> chrono::DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

#[test]
fn decodes_json_document() {
    let m = Meta::decode(meta_json()).unwrap();
    m.validate().unwrap();
    assert_eq!(m.signer.name, "ACME Ltd");
    assert_eq!(m.signer.uri.as_deref(), Some("https://acme.example"));
    let validity = m.validity.unwrap();
    assert_eq!(validity.not_before, Some(at(1_700_000_000)));
}

#[test]
fn minimal_json_has_no_validity() {
    let m = Meta::from_json(br#"{"signer": {"name": "ACME"}}"#).unwrap();
    assert_eq!(m, meta("ACME", None, None));
}

#[test]
fn cbor_form_is_integer_keyed() {
    let name_only = meta("ACME", None, None).to_cbor().unwrap();
    assert_eq!(hex::encode(&name_only), "a100a1006441434d45");

    let with_validity = meta(
        "ACME",
        None,
        Some(Validity {
            not_before: None,
            not_after: at(1_700_000_000),
        }),
    )
    .to_cbor()
    .unwrap();
    assert_eq!(hex::encode(&with_validity), "a200a1006441434d4501a101c11a6553f100");
}

#[test]
fn cbor_round_trip_keeps_uri_and_window() {
    let m = Meta::from_json(meta_json()).unwrap();
    let back = Meta::from_cbor(&m.to_cbor().unwrap()).unwrap();
    assert_eq!(back, m);
}

#[test]
fn json_round_trip() {
    let m = Meta::from_json(meta_json()).unwrap();
    let json = m.to_json().unwrap();
    assert!(json.contains("not-before"));
    assert_eq!(Meta::from_json(json.as_bytes()).unwrap(), m);
}

#[test]
fn malformed_inputs_fail_to_decode() {
    assert!(Meta::from_json(b"not json").is_err());
    assert!(Meta::from_json(br#"{"validity": {"not-after": "2030-01-01T00:00:00Z"}}"#).is_err());
    assert!(Meta::from_json(br#"{"signer": {"name": "x"}, "validity": {"not-after": "yesterday"}}"#).is_err());

    // {1: {1: #6.1(0)}} has no signer
    assert!(Meta::from_cbor(&[0xa1, 0x01, 0xa1, 0x01, 0xc1, 0x00]).is_err());
    // trailing byte
    assert!(Meta::from_cbor(&[0xa1, 0x00, 0xa1, 0x00, 0x61, 0x41, 0x00]).is_err());
    // time without tag 1
    assert!(Meta::from_cbor(&[0xa2, 0x00, 0xa1, 0x00, 0x61, 0x41, 0x01, 0xa1, 0x01, 0x00]).is_err());
}

#[test]
fn validate_rejects_bad_records() {
    let err = meta("", None, None).validate().unwrap_err();
    assert!(err.0.contains("empty name"));

    let err = meta("ACME", Some("acme.example"), None).validate().unwrap_err();
    assert!(err.0.contains("uri"));

    let inverted = Validity {
        not_before: Some(at(2_000)),
        not_after: at(1_000),
    };
    let err = meta("ACME", None, Some(inverted)).validate().unwrap_err();
    assert!(err.0.contains("precedes"));

    let instant = Validity {
        not_before: Some(at(1_000)),
        not_after: at(1_000),
    };
    meta("ACME", None, Some(instant)).validate().unwrap();
}

#[test]
fn sub_second_times_are_rejected() {
    let m = Meta::from_json(
        br#"{"signer": {"name": "ACME"}, "validity": {"not-after": "2030-01-01T00:00:00.5Z"}}"#,
    )
    .unwrap();
    let err = m.validate().unwrap_err();
    assert!(err.0.contains("not-after"), "{err}");
    assert!(err.0.contains("sub-second"), "{err}");

    let not_before = Validity {
        not_before: Some(Utc.timestamp_opt(1_000, 1).unwrap()),
        not_after: at(2_000),
    };
    let err = meta("ACME", None, Some(not_before)).validate().unwrap_err();
    assert!(err.0.contains("not-before"), "{err}");

    let whole = Meta::from_json(
        br#"{"signer": {"name": "ACME"}, "validity": {"not-after": "2030-01-01T00:00:00.000Z"}}"#,
    )
    .unwrap();
    whole.validate().unwrap();
}

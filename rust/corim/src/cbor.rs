// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Small decode/encode helpers shared by the CoRIM and metadata codecs.

use chrono::{DateTime, Utc};
use corim_abstractions::DecodeError;
use minicbor::data::{Tag, Type};
use minicbor::{Decoder, Encoder};

pub(crate) const TAG_EPOCH_TIME: u64 = 1;
pub(crate) const TAG_URI: u64 = 32;
pub(crate) const TAG_UUID: u64 = 37;
pub(crate) const TAG_OID: u64 = 111;

pub(crate) type Enc<'a> = Encoder<&'a mut Vec<u8>>;

pub(crate) fn err(context: &str, e: impl std::fmt::Display) -> DecodeError {
    DecodeError::new(format!("{context}: {e}"))
}

pub(crate) fn enc_err(e: impl std::fmt::Display) -> String {
    e.to_string()
}

pub(crate) fn datatype(dec: &Decoder<'_>, context: &str) -> Result<Type, DecodeError> {
    dec.datatype().map_err(|e| err(context, e))
}

pub(crate) fn expect_tag(dec: &mut Decoder<'_>, expected: u64, context: &str) -> Result<(), DecodeError> {
    let tag = dec.tag().map_err(|e| err(context, format!("expected tag {expected}: {e}")))?;
    if tag != Tag::new(expected) {
        return Err(err(context, format!("expected tag {expected}, got {}", tag.as_u64())));
    }
    Ok(())
}

/// Read an optional tag, returning its number.
pub(crate) fn optional_tag(dec: &mut Decoder<'_>, context: &str) -> Result<Option<u64>, DecodeError> {
    if datatype(dec, context)? != Type::Tag {
        return Ok(None);
    }
    let tag = dec.tag().map_err(|e| err(context, e))?;
    Ok(Some(tag.as_u64()))
}

pub(crate) fn map_len(dec: &mut Decoder<'_>, context: &str) -> Result<u64, DecodeError> {
    dec.map()
        .map_err(|e| err(context, format!("expected map: {e}")))?
        .ok_or_else(|| err(context, "indefinite-length maps are not supported"))
}

pub(crate) fn array_len(dec: &mut Decoder<'_>, context: &str) -> Result<u64, DecodeError> {
    dec.array()
        .map_err(|e| err(context, format!("expected array: {e}")))?
        .ok_or_else(|| err(context, "indefinite-length arrays are not supported"))
}

/// Integer map key; CoRIM maps use integer labels only.
pub(crate) fn map_key(dec: &mut Decoder<'_>, context: &str) -> Result<i64, DecodeError> {
    dec.i64().map_err(|e| err(context, format!("expected integer key: {e}")))
}

pub(crate) fn text(dec: &mut Decoder<'_>, context: &str) -> Result<String, DecodeError> {
    dec.str()
        .map(str::to_string)
        .map_err(|e| err(context, format!("expected text: {e}")))
}

pub(crate) fn bytes(dec: &mut Decoder<'_>, context: &str) -> Result<Vec<u8>, DecodeError> {
    dec.bytes()
        .map(<[u8]>::to_vec)
        .map_err(|e| err(context, format!("expected bytes: {e}")))
}

/// `uri` is either `#6.32(tstr)` or a bare `tstr`.
pub(crate) fn uri(dec: &mut Decoder<'_>, context: &str) -> Result<String, DecodeError> {
    match optional_tag(dec, context)? {
        None | Some(TAG_URI) => text(dec, context),
        Some(other) => Err(err(context, format!("unexpected tag {other} for uri"))),
    }
}

pub(crate) fn encode_uri(enc: &mut Enc<'_>, value: &str) -> Result<(), String> {
    enc.tag(Tag::new(TAG_URI)).map_err(enc_err)?;
    enc.str(value).map_err(enc_err)?;
    Ok(())
}

/// `time` is `#6.1(int)` seconds since the Unix epoch.
pub(crate) fn time(dec: &mut Decoder<'_>, context: &str) -> Result<DateTime<Utc>, DecodeError> {
    expect_tag(dec, TAG_EPOCH_TIME, context)?;
    let secs = dec
        .i64()
        .map_err(|e| err(context, format!("expected integer epoch time: {e}")))?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| err(context, format!("epoch time {secs} out of range")))
}

pub(crate) fn encode_time(enc: &mut Enc<'_>, value: &DateTime<Utc>) -> Result<(), String> {
    enc.tag(Tag::new(TAG_EPOCH_TIME)).map_err(enc_err)?;
    enc.i64(value.timestamp()).map_err(enc_err)?;
    Ok(())
}

/// Skip one data item and return its raw encoding.
pub(crate) fn raw_item(dec: &mut Decoder<'_>, input: &[u8], context: &str) -> Result<Vec<u8>, DecodeError> {
    let start = dec.position();
    dec.skip().map_err(|e| err(context, e))?;
    Ok(input[start..dec.position()].to_vec())
}

pub(crate) fn ensure_consumed(dec: &Decoder<'_>, input: &[u8], context: &str) -> Result<(), DecodeError> {
    if dec.position() != input.len() {
        return Err(err(context, "trailing bytes after item"));
    }
    Ok(())
}

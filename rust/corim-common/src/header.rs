// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use corim_abstractions::{HeaderLabel, HeaderMap, HeaderValue};
use minicbor::data::{Tag, Type};
use minicbor::{Decoder, Encoder};

use crate::error::CodecError;

/// Deepest array/map/tag nesting accepted inside a header value.
pub const MAX_HEADER_DEPTH: usize = 16;

pub(crate) type Writer<'a> = Encoder<&'a mut Vec<u8>>;

/// Encode `map` as a definite-length CBOR map in label order.
///
/// An empty map encodes as zero bytes, the protected-header form COSE
/// requires when there are no protected parameters.
pub fn encode_header_map(map: &HeaderMap) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    if !map.is_empty() {
        write_map(&mut Encoder::new(&mut out), map)?;
    }
    Ok(out)
}

pub(crate) fn write_map(enc: &mut Writer<'_>, map: &HeaderMap) -> Result<(), CodecError> {
    enc.map(map.len() as u64)?;
    for (label, value) in map.iter() {
        match label {
            HeaderLabel::Int(i) => enc.i64(*i)?,
            HeaderLabel::Text(s) => enc.str(s)?,
        };
        write_value(enc, value)?;
    }
    Ok(())
}

fn write_value(enc: &mut Writer<'_>, value: &HeaderValue) -> Result<(), CodecError> {
    match value {
        HeaderValue::Int(i) => {
            enc.i64(*i)?;
        }
        HeaderValue::Bytes(b) => {
            enc.bytes(b)?;
        }
        HeaderValue::Text(s) => {
            enc.str(s)?;
        }
        HeaderValue::Bool(b) => {
            enc.bool(*b)?;
        }
        HeaderValue::Null => {
            enc.null()?;
        }
        HeaderValue::Array(items) => {
            enc.array(items.len() as u64)?;
            for item in items {
                write_value(enc, item)?;
            }
        }
        HeaderValue::Map(map) => write_map(enc, map)?,
        HeaderValue::Tagged(tag, inner) => {
            enc.tag(Tag::new(*tag))?;
            write_value(enc, inner)?;
        }
    }
    Ok(())
}

/// Decode a serialized protected header. Zero bytes decode to an empty map.
pub fn decode_header_map(bytes: &[u8]) -> Result<HeaderMap, CodecError> {
    if bytes.is_empty() {
        return Ok(HeaderMap::new());
    }

    let mut dec = Decoder::new(bytes);
    let map = read_map(&mut dec, 0)?;
    if dec.position() != bytes.len() {
        return Err(CodecError::TrailingBytes("header map"));
    }
    Ok(map)
}

fn is_int(t: Type) -> bool {
    matches!(
        t,
        Type::U8 | Type::U16 | Type::U32 | Type::U64 | Type::I8 | Type::I16 | Type::I32 | Type::I64 | Type::Int
    )
}

pub(crate) fn read_map(dec: &mut Decoder<'_>, depth: usize) -> Result<HeaderMap, CodecError> {
    if depth > MAX_HEADER_DEPTH {
        return Err(CodecError::TooDeep(MAX_HEADER_DEPTH));
    }
    let len = dec.map()?.ok_or(CodecError::IndefiniteLength("maps"))?;

    let mut map = HeaderMap::new();
    for _ in 0..len {
        let label = match dec.datatype()? {
            t if is_int(t) => HeaderLabel::Int(dec.i64()?),
            Type::String => HeaderLabel::Text(dec.str()?.to_string()),
            other => {
                return Err(CodecError::UnsupportedType {
                    context: "header label",
                    found: format!("{other:?}"),
                })
            }
        };
        let value = read_value(dec, depth + 1)?;
        map.insert(label, value);
    }
    Ok(map)
}

fn read_value(dec: &mut Decoder<'_>, depth: usize) -> Result<HeaderValue, CodecError> {
    if depth > MAX_HEADER_DEPTH {
        return Err(CodecError::TooDeep(MAX_HEADER_DEPTH));
    }

    let value = match dec.datatype()? {
        t if is_int(t) => HeaderValue::Int(dec.i64()?),
        Type::Bytes => HeaderValue::Bytes(dec.bytes()?.to_vec()),
        Type::String => HeaderValue::Text(dec.str()?.to_string()),
        Type::Bool => HeaderValue::Bool(dec.bool()?),
        Type::Null => {
            dec.null()?;
            HeaderValue::Null
        }
        Type::Array => {
            let len = dec.array()?.ok_or(CodecError::IndefiniteLength("arrays"))?;
            let items = (0..len)
                .map(|_| read_value(dec, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            HeaderValue::Array(items)
        }
        Type::Map => HeaderValue::Map(read_map(dec, depth)?),
        Type::Tag => {
            let tag = dec.tag()?.as_u64();
            HeaderValue::Tagged(tag, Box::new(read_value(dec, depth + 1)?))
        }
        other => {
            return Err(CodecError::UnsupportedType {
                context: "header value",
                found: format!("{other:?}"),
            })
        }
    };
    Ok(value)
}

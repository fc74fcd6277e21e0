// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! CBOR codec for COSE_Sign1 messages and their header maps.

mod cose_sign1;
mod error;
mod header;

pub use cose_sign1::{decode_cose_sign1, encode_cose_sign1, sig_structure, to_be_signed};
pub use error::CodecError;
pub use header::{decode_header_map, encode_header_map, MAX_HEADER_DEPTH};

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use chrono::{DateTime, Utc};
use corim_abstractions::{DecodeError, ValidationError};
use minicbor::Decoder;
use serde::{Deserialize, Serialize};

use crate::cbor::{self, Enc};

/// A validity window: `{ ? 0: not-before, 1: not-after }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    #[serde(rename = "not-before", default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,
    #[serde(rename = "not-after")]
    pub not_after: DateTime<Utc>,
}

impl Validity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        // The CBOR form carries whole epoch seconds only.
        for (name, value) in [("not-before", self.not_before), ("not-after", Some(self.not_after))] {
            if let Some(value) = value.filter(|v| v.timestamp_subsec_nanos() != 0) {
                return Err(ValidationError::new(format!(
                    "validity: {name} ({}) has sub-second precision",
                    value.to_rfc3339()
                )));
            }
        }
        if let Some(not_before) = self.not_before {
            if self.not_after < not_before {
                return Err(ValidationError::new(format!(
                    "validity: not-after ({}) precedes not-before ({})",
                    self.not_after.to_rfc3339(),
                    not_before.to_rfc3339()
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn encode(&self, enc: &mut Enc<'_>) -> Result<(), String> {
        let len = if self.not_before.is_some() { 2 } else { 1 };
        enc.map(len).map_err(cbor::enc_err)?;
        if let Some(not_before) = &self.not_before {
            enc.u8(0).map_err(cbor::enc_err)?;
            cbor::encode_time(enc, not_before)?;
        }
        enc.u8(1).map_err(cbor::enc_err)?;
        cbor::encode_time(enc, &self.not_after)
    }

    pub(crate) fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        const CTX: &str = "validity-map";

        let len = cbor::map_len(dec, CTX)?;
        let mut not_before = None;
        let mut not_after = None;
        for _ in 0..len {
            match cbor::map_key(dec, CTX)? {
                0 => not_before = Some(cbor::time(dec, "validity-map not-before")?),
                1 => not_after = Some(cbor::time(dec, "validity-map not-after")?),
                _ => dec.skip().map_err(|e| cbor::err(CTX, e))?,
            }
        }

        let not_after = not_after.ok_or_else(|| DecodeError::new("validity-map: missing not-after"))?;
        Ok(Self { not_before, not_after })
    }
}

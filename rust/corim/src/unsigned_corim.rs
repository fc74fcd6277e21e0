// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Unsigned CoRIM (`#6.501(corim-map)`).
//!
//! Decoding keeps the exact input bytes; those bytes, not a re-encoding, become
//! the COSE_Sign1 payload. Structural problems surface from [`UnsignedCorim::decode`],
//! semantic ones from [`Validate::validate`].

use std::collections::BTreeSet;

use corim_abstractions::{DecodeError, UnsignedManifest, Validate, ValidationError};
use minicbor::data::Type;
use minicbor::Decoder;

use crate::cbor;
use crate::validity::Validity;

pub const UNSIGNED_CORIM_TAG: u64 = 501;
pub const CORIM_CONTENT_TYPE: &str = "application/rim+cbor";

pub const ROLE_MANIFEST_CREATOR: i64 = 1;
pub const ROLE_MANIFEST_SIGNER: i64 = 2;

const KEY_ID: i64 = 0;
const KEY_TAGS: i64 = 1;
const KEY_DEPENDENT_RIMS: i64 = 2;
const KEY_PROFILE: i64 = 3;
const KEY_RIM_VALIDITY: i64 = 4;
const KEY_ENTITIES: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorimId {
    Text(String),
    Uuid(uuid::Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConciseTagKind {
    Swid,
    Comid,
    Cotl,
}

impl ConciseTagKind {
    pub fn cbor_tag(self) -> u64 {
        match self {
            Self::Swid => 505,
            Self::Comid => 506,
            Self::Cotl => 508,
        }
    }

    pub fn from_cbor_tag(tag: u64) -> Option<Self> {
        match tag {
            505 => Some(Self::Swid),
            506 => Some(Self::Comid),
            508 => Some(Self::Cotl),
            _ => None,
        }
    }
}

/// An embedded concise tag. The body stays opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConciseTag {
    pub kind: ConciseTagKind,
    pub bytes: Vec<u8>,
}

/// `corim-locator-map`. `thumbprint` holds the raw CBOR of the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub hrefs: Vec<String>,
    pub thumbprint: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    Uri(String),
    /// BER-encoded object identifier.
    Oid(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub reg_id: Option<String>,
    pub roles: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedCorim {
    id: Option<CorimId>,
    tags: Vec<ConciseTag>,
    dependent_rims: Option<Vec<Locator>>,
    profile: Option<Profile>,
    rim_validity: Option<Validity>,
    entities: Option<Vec<Entity>>,
    raw: Vec<u8>,
}

impl UnsignedCorim {
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, DecodeError> {
        const CTX: &str = "corim-map";

        let mut dec = Decoder::new(bytes);
        cbor::expect_tag(&mut dec, UNSIGNED_CORIM_TAG, "unsigned CoRIM")?;
        let len = cbor::map_len(&mut dec, CTX)?;

        let mut corim = Self {
            id: None,
            tags: Vec::new(),
            dependent_rims: None,
            profile: None,
            rim_validity: None,
            entities: None,
            raw: bytes.to_vec(),
        };

        let mut seen = BTreeSet::new();
        for _ in 0..len {
            let key = cbor::map_key(&mut dec, CTX)?;
            if !seen.insert(key) {
                return Err(cbor::err(CTX, format!("duplicate key {key}")));
            }
            match key {
                KEY_ID => corim.id = Some(decode_id(&mut dec)?),
                KEY_TAGS => corim.tags = decode_tags(&mut dec)?,
                KEY_DEPENDENT_RIMS => corim.dependent_rims = Some(decode_locators(&mut dec, bytes)?),
                KEY_PROFILE => corim.profile = Some(decode_profile(&mut dec)?),
                KEY_RIM_VALIDITY => corim.rim_validity = Some(Validity::decode(&mut dec)?),
                KEY_ENTITIES => corim.entities = Some(decode_entities(&mut dec)?),
                _ => dec.skip().map_err(|e| cbor::err(CTX, e))?,
            }
        }
        cbor::ensure_consumed(&dec, bytes, "unsigned CoRIM")?;

        Ok(corim)
    }

    pub fn id(&self) -> Option<&CorimId> {
        self.id.as_ref()
    }

    pub fn tags(&self) -> &[ConciseTag] {
        &self.tags
    }

    pub fn dependent_rims(&self) -> Option<&[Locator]> {
        self.dependent_rims.as_deref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn rim_validity(&self) -> Option<&Validity> {
        self.rim_validity.as_ref()
    }

    pub fn entities(&self) -> Option<&[Entity]> {
        self.entities.as_deref()
    }

    /// The exact bytes this value was decoded from.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }
}

fn decode_id(dec: &mut Decoder<'_>) -> Result<CorimId, DecodeError> {
    const CTX: &str = "corim-id";

    match cbor::optional_tag(dec, CTX)? {
        None => Ok(CorimId::Text(cbor::text(dec, CTX)?)),
        Some(cbor::TAG_UUID) => {
            let raw = cbor::bytes(dec, CTX)?;
            uuid::Uuid::from_slice(&raw)
                .map(CorimId::Uuid)
                .map_err(|_| cbor::err(CTX, format!("UUID must be 16 bytes, got {}", raw.len())))
        }
        Some(other) => Err(cbor::err(CTX, format!("unexpected tag {other}"))),
    }
}

fn decode_tags(dec: &mut Decoder<'_>) -> Result<Vec<ConciseTag>, DecodeError> {
    const CTX: &str = "tags";

    let len = cbor::array_len(dec, CTX)?;
    let mut tags = Vec::new();
    for i in 0..len {
        let ctx = format!("tags[{i}]");
        let tag = cbor::optional_tag(dec, &ctx)?.ok_or_else(|| cbor::err(&ctx, "concise tag must be CBOR-tagged"))?;
        let kind = ConciseTagKind::from_cbor_tag(tag)
            .ok_or_else(|| cbor::err(&ctx, format!("unsupported concise tag type {tag}")))?;
        let bytes = cbor::bytes(dec, &ctx)?;
        tags.push(ConciseTag { kind, bytes });
    }
    Ok(tags)
}

fn decode_locators(dec: &mut Decoder<'_>, input: &[u8]) -> Result<Vec<Locator>, DecodeError> {
    let len = cbor::array_len(dec, "dependent-rims")?;
    let mut locators = Vec::new();
    for i in 0..len {
        let ctx = format!("dependent-rims[{i}]");
        let entries = cbor::map_len(dec, &ctx)?;
        let mut hrefs = None;
        let mut thumbprint = None;
        for _ in 0..entries {
            match cbor::map_key(dec, &ctx)? {
                0 => hrefs = Some(decode_hrefs(dec, &ctx)?),
                1 => thumbprint = Some(cbor::raw_item(dec, input, &ctx)?),
                _ => dec.skip().map_err(|e| cbor::err(&ctx, e))?,
            }
        }
        let hrefs = hrefs.ok_or_else(|| cbor::err(&ctx, "missing href"))?;
        locators.push(Locator { hrefs, thumbprint });
    }
    Ok(locators)
}

/// `href` is a single uri or an array of them.
fn decode_hrefs(dec: &mut Decoder<'_>, ctx: &str) -> Result<Vec<String>, DecodeError> {
    if cbor::datatype(dec, ctx)? == Type::Array {
        let len = cbor::array_len(dec, ctx)?;
        (0..len).map(|_| cbor::uri(dec, ctx)).collect()
    } else {
        Ok(vec![cbor::uri(dec, ctx)?])
    }
}

fn decode_profile(dec: &mut Decoder<'_>) -> Result<Profile, DecodeError> {
    const CTX: &str = "profile";

    match cbor::optional_tag(dec, CTX)? {
        Some(cbor::TAG_URI) => Ok(Profile::Uri(cbor::text(dec, CTX)?)),
        Some(cbor::TAG_OID) => Ok(Profile::Oid(cbor::bytes(dec, CTX)?)),
        Some(other) => Err(cbor::err(CTX, format!("unexpected tag {other}"))),
        None => Err(cbor::err(CTX, "must be a tagged uri or OID")),
    }
}

fn decode_entities(dec: &mut Decoder<'_>) -> Result<Vec<Entity>, DecodeError> {
    let len = cbor::array_len(dec, "entities")?;
    let mut entities = Vec::new();
    for i in 0..len {
        let ctx = format!("entities[{i}]");
        let entries = cbor::map_len(dec, &ctx)?;
        let mut name = None;
        let mut reg_id = None;
        let mut roles = None;
        for _ in 0..entries {
            match cbor::map_key(dec, &ctx)? {
                0 => name = Some(cbor::text(dec, &ctx)?),
                1 => reg_id = Some(cbor::uri(dec, &ctx)?),
                2 => {
                    let n = cbor::array_len(dec, &ctx)?;
                    let parsed = (0..n)
                        .map(|_| dec.i64().map_err(|e| cbor::err(&ctx, format!("role: {e}"))))
                        .collect::<Result<Vec<_>, _>>()?;
                    roles = Some(parsed);
                }
                _ => dec.skip().map_err(|e| cbor::err(&ctx, e))?,
            }
        }
        entities.push(Entity {
            name: name.ok_or_else(|| cbor::err(&ctx, "missing entity-name"))?,
            reg_id,
            roles: roles.ok_or_else(|| cbor::err(&ctx, "missing role"))?,
        });
    }
    Ok(entities)
}

fn invalid(message: impl Into<String>) -> ValidationError {
    ValidationError::new(message)
}

impl Validate for UnsignedCorim {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.id {
            None => return Err(invalid("missing id")),
            Some(CorimId::Text(s)) if s.is_empty() => return Err(invalid("id: empty string")),
            Some(_) => {}
        }

        if self.tags.is_empty() {
            return Err(invalid("tags: at least one concise tag is required"));
        }
        if let Some(i) = self.tags.iter().position(|t| t.bytes.is_empty()) {
            return Err(invalid(format!("tags[{i}]: empty tag body")));
        }

        if let Some(locators) = &self.dependent_rims {
            if locators.is_empty() {
                return Err(invalid("dependent-rims: empty list"));
            }
            for (i, locator) in locators.iter().enumerate() {
                if locator.hrefs.is_empty() {
                    return Err(invalid(format!("dependent-rims[{i}]: no href")));
                }
                for href in &locator.hrefs {
                    check_uri(href, &format!("dependent-rims[{i}]"))?;
                }
            }
        }

        match &self.profile {
            Some(Profile::Uri(uri)) => check_uri(uri, "profile")?,
            Some(Profile::Oid(oid)) if oid.is_empty() => return Err(invalid("profile: empty OID")),
            _ => {}
        }

        if let Some(validity) = &self.rim_validity {
            validity.validate()?;
        }

        if let Some(entities) = &self.entities {
            if entities.is_empty() {
                return Err(invalid("entities: empty list"));
            }
            for (i, entity) in entities.iter().enumerate() {
                if entity.name.is_empty() {
                    return Err(invalid(format!("entities[{i}]: empty entity-name")));
                }
                if let Some(reg_id) = &entity.reg_id {
                    check_uri(reg_id, &format!("entities[{i}] reg-id"))?;
                }
                if entity.roles.is_empty() {
                    return Err(invalid(format!("entities[{i}]: no roles")));
                }
                if let Some(role) = entity
                    .roles
                    .iter()
                    .find(|r| **r != ROLE_MANIFEST_CREATOR && **r != ROLE_MANIFEST_SIGNER)
                {
                    return Err(invalid(format!("entities[{i}]: unknown role {role}")));
                }
            }
        }

        Ok(())
    }
}

fn check_uri(uri: &str, ctx: &str) -> Result<(), ValidationError> {
    url::Url::parse(uri)
        .map(|_| ())
        .map_err(|e| invalid(format!("{ctx}: invalid uri {uri:?}: {e}")))
}

impl UnsignedManifest for UnsignedCorim {
    const CONTENT_TYPE: &'static str = CORIM_CONTENT_TYPE;

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_cbor(bytes)
    }

    fn payload(&self) -> &[u8] {
        &self.raw
    }
}

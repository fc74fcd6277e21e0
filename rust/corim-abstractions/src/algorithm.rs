// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Supported COSE signing algorithms (IANA COSE Algorithms registry).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum CoseAlgorithm {
    /// ECDSA w/ SHA-256 over P-256.
    ES256 = -7,
    /// ECDSA w/ SHA-384 over P-384.
    ES384 = -35,
    /// ECDSA w/ SHA-512 over P-521.
    ES512 = -36,
    /// RSASSA-PSS w/ SHA-256.
    PS256 = -37,
    /// RSASSA-PSS w/ SHA-384.
    PS384 = -38,
    /// RSASSA-PSS w/ SHA-512.
    PS512 = -39,
    /// EdDSA. Only Ed25519 keys are accepted.
    EdDSA = -8,
}

impl CoseAlgorithm {
    /// The COSE `alg` header value.
    pub fn id(self) -> i64 {
        self as i64
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            -7 => Some(Self::ES256),
            -35 => Some(Self::ES384),
            -36 => Some(Self::ES512),
            -37 => Some(Self::PS256),
            -38 => Some(Self::PS384),
            -39 => Some(Self::PS512),
            -8 => Some(Self::EdDSA),
            _ => None,
        }
    }

    /// Parse the JOSE/COSE registry name (e.g. `"ES256"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ES256" => Some(Self::ES256),
            "ES384" => Some(Self::ES384),
            "ES512" => Some(Self::ES512),
            "PS256" => Some(Self::PS256),
            "PS384" => Some(Self::PS384),
            "PS512" => Some(Self::PS512),
            "EdDSA" => Some(Self::EdDSA),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
            Self::EdDSA => "EdDSA",
        }
    }
}

impl std::fmt::Display for CoseAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Extensible signer provider registry.
//!
//! Providers are registered using `inventory::submit!`.
//! Callers use this registry to turn key material into a [`Signer`] without
//! hard-coding any particular key format (e.g., JWK).

use crate::Signer;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SignerProviderId(pub uuid::Uuid);

#[derive(thiserror::Error, Debug)]
pub enum SignerProviderError {
    #[error("{0}")]
    Message(String),
}

/// A provider that may be able to build a signer from raw key material.
///
/// Contract:
/// - Return `Ok(None)` when the provider is not applicable (e.g., wrong format).
/// - Return `Ok(Some(signer))` when the key material was loaded.
/// - Return `Err(...)` when the provider is applicable but the key is malformed.
pub trait SignerProvider: Sync {
    fn name(&self) -> &'static str;

    fn try_load_signer(
        &self,
        key_material: &[u8],
    ) -> Result<Option<Box<dyn Signer + Send + Sync>>, SignerProviderError>;
}

pub struct SignerProviderRegistration {
    pub id: SignerProviderId,
    pub name: &'static str,
    pub priority: i32,
    pub provider: &'static dyn SignerProvider,
}

inventory::collect!(SignerProviderRegistration);

#[derive(thiserror::Error, Debug)]
pub enum LoadSignerError {
    #[error("no signer provider recognized the key material")]
    NoProviderMatched,

    #[error("provider '{provider}' failed: {error}")]
    ProviderFailed {
        provider: &'static str,
        error: SignerProviderError,
    },
}

/// A signer together with the provider that produced it.
pub struct LoadedSigner {
    pub provider_id: SignerProviderId,
    pub provider_name: &'static str,
    pub signer: Box<dyn Signer + Send + Sync>,
}

impl std::fmt::Debug for LoadedSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedSigner")
            .field("provider_id", &self.provider_id)
            .field("provider_name", &self.provider_name)
            .field("algorithm", &self.signer.algorithm())
            .finish()
    }
}

/// Iterate all registered providers ordered by descending priority.
pub fn providers_ordered() -> Vec<&'static SignerProviderRegistration> {
    let mut regs: Vec<_> = inventory::iter::<SignerProviderRegistration>.into_iter().collect();
    regs.sort_by(|a, b| b.priority.cmp(&a.priority));
    regs
}

/// Load a signer using registered providers.
pub fn load_signer(key_material: &[u8]) -> Result<LoadedSigner, LoadSignerError> {
    for reg in providers_ordered() {
        match reg.provider.try_load_signer(key_material) {
            Ok(Some(signer)) => {
                return Ok(LoadedSigner {
                    provider_id: reg.id,
                    provider_name: reg.name,
                    signer,
                })
            }
            Ok(None) => continue,
            Err(e) => {
                return Err(LoadSignerError::ProviderFailed {
                    provider: reg.provider.name(),
                    error: e,
                })
            }
        }
    }

    Err(LoadSignerError::NoProviderMatched)
}

pub fn provider_name(id: SignerProviderId) -> Option<&'static str> {
    inventory::iter::<SignerProviderRegistration>
        .into_iter()
        .find(|r| r.id == id)
        .map(|r| r.name)
}

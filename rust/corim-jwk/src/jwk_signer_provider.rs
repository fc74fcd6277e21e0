// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use corim_abstractions::{Signer, SignerProvider, SignerProviderError, SignerProviderRegistration};

use crate::jwk::{signer_from_jwk, JwkError};

struct JwkSignerProvider;

impl SignerProvider for JwkSignerProvider {
    fn name(&self) -> &'static str {
        crate::JWK_PROVIDER_NAME
    }

    fn try_load_signer(
        &self,
        key_material: &[u8],
    ) -> Result<Option<Box<dyn Signer + Send + Sync>>, SignerProviderError> {
        match signer_from_jwk(key_material) {
            Ok(signer) => Ok(Some(Box::new(signer))),
            // Not a JSON object: some other provider may understand it.
            Err(JwkError::NotJson(_)) => Ok(None),
            Err(e) => Err(SignerProviderError::Message(e.to_string())),
        }
    }
}

static PROVIDER: JwkSignerProvider = JwkSignerProvider;

inventory::submit! {
    SignerProviderRegistration {
        id: crate::JWK_PROVIDER_ID,
        name: crate::JWK_PROVIDER_NAME,
        priority: 100,
        provider: &PROVIDER,
    }
}

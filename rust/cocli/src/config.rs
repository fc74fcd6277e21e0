// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::{Path, PathBuf};

use clap::Args;

/// Flags of `cocli corim sign`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SignConfig {
    /// An unsigned CoRIM file (in CBOR format)
    #[arg(short = 'f', long = "file")]
    pub corim_file: Option<PathBuf>,

    /// CoRIM Meta file (in JSON format)
    #[arg(short = 'm', long = "meta")]
    pub meta_file: Option<PathBuf>,

    /// Signing key in JWK format
    #[arg(short = 'k', long = "key")]
    pub key_file: Option<PathBuf>,

    /// Name of the generated COSE Sign1 file
    #[arg(short = 'o', long = "output")]
    pub output_file: Option<PathBuf>,

    /// Signing certificate in DER format
    #[arg(short = 'c', long = "cert")]
    pub cert_file: Option<PathBuf>,

    /// Intermediate certificates in DER format
    #[arg(long = "intermediates")]
    pub intermediates_file: Option<PathBuf>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no CoRIM supplied")]
    NoCorim,

    #[error("no key supplied")]
    NoKey,

    #[error("no CoRIM Meta supplied")]
    NoMeta,

    #[error("cannot add intermediate certificates without a signing certificate")]
    IntermediatesWithoutCert,
}

/// Paths of a config that passed [`SignConfig::check`].
#[derive(Debug, Clone, Copy)]
pub struct SignInputs<'a> {
    pub corim: &'a Path,
    pub meta: &'a Path,
    pub key: &'a Path,
    pub output: Option<&'a Path>,
    pub cert: Option<&'a Path>,
    pub intermediates: Option<&'a Path>,
}

fn given(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}

impl SignConfig {
    /// Check mandatory paths before any file is touched.
    pub fn check(&self) -> Result<SignInputs<'_>, ConfigError> {
        let corim = given(&self.corim_file).ok_or(ConfigError::NoCorim)?;
        let key = given(&self.key_file).ok_or(ConfigError::NoKey)?;
        let meta = given(&self.meta_file).ok_or(ConfigError::NoMeta)?;
        let cert = given(&self.cert_file);
        let intermediates = given(&self.intermediates_file);
        if intermediates.is_some() && cert.is_none() {
            return Err(ConfigError::IntermediatesWithoutCert);
        }

        Ok(SignInputs {
            corim,
            meta,
            key,
            output: given(&self.output_file),
            cert,
            intermediates,
        })
    }
}

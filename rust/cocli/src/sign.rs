// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use corim::{CorimError, Meta, SignedCorimBuilder, UnsignedCorim, Validated};
use corim_abstractions::{
    load_signer, DecodeError, LoadSignerError, ManifestMeta, Signer, UnsignedManifest, ValidationError,
};
use tracing::{debug, info};

use crate::config::{ConfigError, SignConfig};

/// Failure of one stage of `corim sign`, with the file involved.
#[derive(thiserror::Error, Debug)]
pub enum SignCommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("error loading {what} from {}: {source}", .path.display())]
    Read {
        what: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("error decoding unsigned CoRIM from {}: {source}", .path.display())]
    DecodeCorim { path: PathBuf, source: DecodeError },

    #[error("error validating CoRIM from {}: {source}", .path.display())]
    ValidateCorim { path: PathBuf, source: ValidationError },

    #[error("error decoding CoRIM Meta from {}: {source}", .path.display())]
    DecodeMeta { path: PathBuf, source: DecodeError },

    #[error("error validating CoRIM Meta from {}: {source}", .path.display())]
    ValidateMeta { path: PathBuf, source: ValidationError },

    #[error("error loading signing key from {}: {source}", .path.display())]
    LoadKey { path: PathBuf, source: LoadSignerError },

    #[error("error adding signing certificate from {}: {source}", .path.display())]
    AddCert { path: PathBuf, source: CorimError },

    #[error("error adding intermediate certificates from {}: {source}", .path.display())]
    AddIntermediates { path: PathBuf, source: CorimError },

    #[error("error signing CoRIM with key from {}: {source}", .path.display())]
    Sign { path: PathBuf, source: CorimError },

    #[error("error saving signed CoRIM to file {}: {source}", .path.display())]
    Persist { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedOutput {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// `dir/name` becomes `dir/signed-name`.
pub fn default_output_path(corim_file: &Path) -> PathBuf {
    let mut name = OsString::from("signed-");
    if let Some(file_name) = corim_file.file_name() {
        name.push(file_name);
    }
    corim_file.with_file_name(name)
}

fn read(what: &'static str, path: &Path) -> Result<Vec<u8>, SignCommandError> {
    debug!(what, path = %path.display(), "reading");
    std::fs::read(path).map_err(|source| SignCommandError::Read {
        what,
        path: path.to_path_buf(),
        source,
    })
}

/// Run `corim sign`. Nothing is written unless every stage succeeds.
pub fn run_sign(config: &SignConfig) -> Result<SignedOutput, SignCommandError> {
    let inputs = config.check()?;

    let corim_bytes = read("unsigned CoRIM", inputs.corim)?;
    let corim = UnsignedCorim::decode(&corim_bytes).map_err(|source| SignCommandError::DecodeCorim {
        path: inputs.corim.to_path_buf(),
        source,
    })?;
    let corim = Validated::new(corim).map_err(|source| SignCommandError::ValidateCorim {
        path: inputs.corim.to_path_buf(),
        source,
    })?;

    let meta_bytes = read("CoRIM Meta", inputs.meta)?;
    let meta = Meta::decode(&meta_bytes).map_err(|source| SignCommandError::DecodeMeta {
        path: inputs.meta.to_path_buf(),
        source,
    })?;
    let meta = Validated::new(meta).map_err(|source| SignCommandError::ValidateMeta {
        path: inputs.meta.to_path_buf(),
        source,
    })?;

    let key_bytes = read("signing key", inputs.key)?;
    let signer = load_signer(&key_bytes).map_err(|source| SignCommandError::LoadKey {
        path: inputs.key.to_path_buf(),
        source,
    })?;
    info!(provider = signer.provider_name, alg = %signer.signer.algorithm(), "loaded signing key");

    let mut builder = SignedCorimBuilder::new(&corim, &meta);

    if let Some(cert) = inputs.cert {
        let der = read("signing certificate", cert)?;
        builder.attach_leaf(&der).map_err(|source| SignCommandError::AddCert {
            path: cert.to_path_buf(),
            source,
        })?;
    }

    if let Some(intermediates) = inputs.intermediates {
        let der = read("intermediate certificates", intermediates)?;
        builder
            .attach_intermediates(&der)
            .map_err(|source| SignCommandError::AddIntermediates {
                path: intermediates.to_path_buf(),
                source,
            })?;
    }

    let envelope = builder.sign(&*signer.signer).map_err(|source| SignCommandError::Sign {
        path: inputs.key.to_path_buf(),
        source,
    })?;

    let destination = inputs
        .output
        .map_or_else(|| default_output_path(inputs.corim), Path::to_path_buf);
    persist(&destination, &envelope).map_err(|source| SignCommandError::Persist {
        path: destination.clone(),
        source,
    })?;
    info!(path = %destination.display(), len = envelope.len(), "saved signed CoRIM");

    Ok(SignedOutput {
        source: inputs.corim.to_path_buf(),
        destination,
    })
}

/// Write through a temporary file in the destination directory, then rename.
fn persist(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

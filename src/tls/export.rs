// SPDX-License-Identifier: Apache-2.0

//! Write the certificate and key to `<name>-cert.pem` / `<name>-privkey.pem`

use crate::constants::export::{CERT_SUFFIX, KEY_SUFFIX};
use crate::error::{BusyboxError, Result};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub dir: PathBuf,
    pub name: String,
}

impl ExportTarget {
    /// Export into the current working directory, using bare relative paths
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            dir: PathBuf::new(),
            name: name.into(),
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn cert_path(&self) -> PathBuf {
        self.dir.join(format!("{}{}", self.name, CERT_SUFFIX))
    }

    pub fn key_path(&self) -> PathBuf {
        self.dir.join(format!("{}{}", self.name, KEY_SUFFIX))
    }
}

/// Write both files. Nothing is written if either file already exists.
pub fn export_credentials(
    certificate: &[u8],
    private_key: &[u8],
    target: &ExportTarget,
) -> Result<()> {
    let cert_path = target.cert_path();
    let key_path = target.key_path();

    for path in [&cert_path, &key_path] {
        if path.try_exists()? {
            return Err(BusyboxError::ExportTargetExists(path.clone()));
        }
    }

    write_new(&cert_path, certificate)?;
    write_new(&key_path, private_key)?;

    info!(
        "Exported certificate to {} and private key to {}",
        cert_path.display(),
        key_path.display()
    );
    Ok(())
}

fn write_new(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => BusyboxError::ExportTargetExists(path.to_path_buf()),
            _ => BusyboxError::IoError(e),
        })?;
    file.write_all(contents)?;
    Ok(())
}

// SPDX-License-Identifier: Apache-2.0

//! Load certificate and private key bytes from a secret or a local file

use crate::constants::secret_keys;
use crate::error::{BusyboxError, Result};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client, ResourceExt};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Where the credentials are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// A secret in the cluster, looked up in the configured namespace
    SecretName(String),
    /// A local PEM encoded certificate; carries no private key
    PemFile(PathBuf),
    /// A local YAML or JSON serialized secret
    SecretFile(PathBuf),
}

/// Raw certificate and private key bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialBundle {
    pub certificate: Vec<u8>,
    pub private_key: Option<Vec<u8>>,
}

impl CredentialBundle {
    /// Take `tls.crt` and `tls.key` from a secret's data. Both keys must exist.
    pub fn from_secret(secret: &Secret) -> Result<Self> {
        let data = secret.data.as_ref();

        let certificate = data
            .and_then(|d| d.get(secret_keys::CERTIFICATE))
            .ok_or(BusyboxError::MissingSecretKey(secret_keys::CERTIFICATE))?;
        let private_key = data
            .and_then(|d| d.get(secret_keys::PRIVATE_KEY))
            .ok_or(BusyboxError::MissingSecretKey(secret_keys::PRIVATE_KEY))?;

        Ok(Self {
            certificate: certificate.0.clone(),
            private_key: Some(private_key.0.clone()),
        })
    }
}

/// Fetch credentials from a secret in the cluster
#[instrument(skip(client))]
pub async fn fetch_secret(
    client: &Client,
    namespace: &str,
    name: &str,
) -> Result<CredentialBundle> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);

    info!("Getting secret '{}/{}'", namespace, name);
    let secret = secrets.get(name).await?;
    debug!("Secret {} has type {:?}", secret.name_any(), secret.type_);

    CredentialBundle::from_secret(&secret)
}

/// Read a PEM certificate file
pub fn read_pem_file(path: &Path) -> Result<CredentialBundle> {
    debug!("Reading certificate from {}", path.display());
    Ok(CredentialBundle {
        certificate: fs::read(path)?,
        private_key: None,
    })
}

/// Read a serialized secret (`kubectl get secret -o yaml` output)
pub fn read_secret_file(path: &Path) -> Result<CredentialBundle> {
    debug!("Reading secret from {}", path.display());
    let secret: Secret = serde_yaml::from_reader(File::open(path)?)?;
    CredentialBundle::from_secret(&secret)
}

// SPDX-License-Identifier: Apache-2.0

//! Load, optionally export, then summarize a certificate

use crate::config::TlsConfig;
use crate::error::Result;
use crate::kubernetes::create_client;
use crate::tls::export::export_credentials;
use crate::tls::report::CertificateSummary;
use crate::tls::source::{
    fetch_secret, read_pem_file, read_secret_file, CredentialBundle, CredentialSource,
};
use kube::Client;
use std::io::Write;
use tracing::{debug, instrument, warn};

pub struct TlsController {
    config: TlsConfig,
    client: Option<Client>,
}

impl TlsController {
    pub fn new(config: TlsConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Use an existing client instead of building one from the connection flags
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Writes the summary to `out` only once every earlier step succeeded.
    #[instrument(skip(self, out), fields(namespace = %self.config.namespace))]
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        let bundle = self.load().await?;

        if let Some(target) = &self.config.export {
            match &bundle.private_key {
                Some(key) => export_credentials(&bundle.certificate, key, target)?,
                None => warn!("No private key available, skipping export"),
            }
        }

        let summary = CertificateSummary::from_pem(&bundle.certificate)?;
        out.write_all(summary.to_string().as_bytes())?;
        out.flush()?;
        Ok(())
    }

    async fn load(&self) -> Result<CredentialBundle> {
        match &self.config.source {
            CredentialSource::SecretName(name) => {
                let client = match &self.client {
                    Some(client) => client.clone(),
                    None => create_client(&self.config.connection).await?,
                };
                fetch_secret(&client, &self.config.namespace, name).await
            }
            CredentialSource::PemFile(path) => read_pem_file(path),
            CredentialSource::SecretFile(path) => {
                debug!("Ignoring namespace for local secret file");
                read_secret_file(path)
            }
        }
    }
}

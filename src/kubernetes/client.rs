// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation from kubeconfig flags

use crate::config::ConnectionArgs;
use crate::error::{BusyboxError, Result};
use kube::config::Kubeconfig;
use kube::{Client, Config as KConfig};
use tracing::{debug, instrument};

/// Create a Kubernetes client from the connection flags.
///
/// Without any kubeconfig selection flag the configuration is inferred
/// (`KUBECONFIG`, `~/.kube/config`, then the in-cluster service account).
#[instrument(skip(connection))]
pub async fn create_client(connection: &ConnectionArgs) -> Result<Client> {
    let mut config = load_config(connection).await?;

    if let Some(server) = connection.server.as_deref().filter(|s| !s.is_empty()) {
        debug!("Overriding cluster URL {} with {}", config.cluster_url, server);
        config.cluster_url = server.parse::<http::Uri>().map_err(|e| {
            BusyboxError::KubeconfigError(format!("Invalid server URL {}: {}", server, e))
        })?;
    }

    Client::try_from(config)
        .map_err(|e| BusyboxError::KubeconfigError(format!("Failed to create client: {}", e)))
}

async fn load_config(connection: &ConnectionArgs) -> Result<KConfig> {
    let options = connection.kubeconfig_options();

    match &connection.kubeconfig {
        Some(path) => {
            debug!("Loading kubeconfig from {}", path.display());
            let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                BusyboxError::KubeconfigError(format!(
                    "Failed to read kubeconfig {}: {}",
                    path.display(),
                    e
                ))
            })?;
            KConfig::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(|e| {
                    BusyboxError::KubeconfigError(format!("Failed to create config: {}", e))
                })
        }
        None if connection.is_default() => KConfig::infer().await.map_err(|e| {
            BusyboxError::KubeconfigError(format!("Failed to infer config: {}", e))
        }),
        None => KConfig::from_kubeconfig(&options).await.map_err(|e| {
            BusyboxError::KubeconfigError(format!("Failed to create config: {}", e))
        }),
    }
}

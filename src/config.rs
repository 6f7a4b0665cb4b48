// SPDX-License-Identifier: Apache-2.0

//! Command-line flags for both tools and the validated configuration built from them.

use crate::constants::{export, DEFAULT_NAMESPACE};
use crate::error::{BusyboxError, Result};
use crate::tls::{CredentialSource, ExportTarget};
use clap::{Args, Parser, ValueEnum};
use kube::config::KubeConfigOptions;
use std::path::PathBuf;

const SOURCE_FLAGS: &str = "--from-secret-name, --from-pem-file, --from-secret-file";

/// Cluster connection flags shared by both tools
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
    /// Path to the kubeconfig file to use
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// The name of the kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// The name of the kubeconfig cluster to use
    #[arg(long)]
    pub cluster: Option<String>,

    /// The name of the kubeconfig user to use
    #[arg(long)]
    pub user: Option<String>,

    /// The address and port of the Kubernetes API server
    #[arg(long)]
    pub server: Option<String>,
}

impl ConnectionArgs {
    pub fn kubeconfig_options(&self) -> KubeConfigOptions {
        KubeConfigOptions {
            context: self.context.clone(),
            cluster: self.cluster.clone(),
            user: self.user.clone(),
        }
    }

    /// True when no kubeconfig selection flag was given
    pub fn is_default(&self) -> bool {
        self.kubeconfig.is_none()
            && self.context.is_none()
            && self.cluster.is_none()
            && self.user.is_none()
    }
}

/// Event type accepted by the core/v1 events API
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventType {
    #[default]
    #[value(name = "Normal")]
    Normal,
    #[value(name = "Warning")]
    Warning,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Normal => "Normal",
            EventType::Warning => "Warning",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "eventgenerator",
    about = "Generate fake events in kubernetes cluster",
    long_about = "eventgenerator is an utility that can help you generate fake events in kubernetes \
                  cluster, especially useful when you use event-based tools like brigade."
)]
pub struct EventArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Resource kind to get.
    #[arg(long)]
    pub kind: String,

    /// Resource name to get.
    #[arg(long)]
    pub name: String,

    /// Resource namespace to get.
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Event type.
    #[arg(long = "type", value_enum, default_value_t = EventType::Normal)]
    pub event_type: EventType,

    /// Event action.
    #[arg(long)]
    pub action: Option<String>,

    /// Event reason.
    #[arg(long, default_value = "")]
    pub reason: String,

    /// Event message.
    #[arg(long, default_value = "")]
    pub message: String,
}

/// Settings for a single event generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventConfig {
    pub kind: String,
    pub name: String,
    /// Namespace used to look up the subject and to store the event
    pub namespace: String,
    pub event_type: EventType,
    /// Falls back to `reason` when unset
    pub action: Option<String>,
    pub reason: String,
    pub message: String,
}

impl EventArgs {
    pub fn into_config(self) -> (ConnectionArgs, EventConfig) {
        let config = EventConfig {
            kind: self.kind,
            name: self.name,
            namespace: self.namespace,
            event_type: self.event_type,
            action: self.action.filter(|a| !a.is_empty()),
            reason: self.reason,
            message: self.message,
        };
        (self.connection, config)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "tlsinfo",
    about = "Show secret tls info in kubernetes cluster",
    long_about = "tlsinfo is an utility that can help you get the secret tls information in kubernetes \
                  cluster, e.g. certificate common name, expiration."
)]
pub struct TlsArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Resource namespace.
    #[arg(short = 'n', long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Secret name.
    #[arg(long)]
    pub from_secret_name: Option<String>,

    /// Path to certificate pem file.
    #[arg(long)]
    pub from_pem_file: Option<String>,

    /// Path to secret file.
    #[arg(long)]
    pub from_secret_file: Option<String>,

    /// Whether to export certificate and private key.
    #[arg(short = 'E', long)]
    pub export: bool,

    /// Export name.
    #[arg(long, default_value = export::DEFAULT_NAME)]
    pub export_name: String,
}

/// Settings for a single certificate report run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    pub connection: ConnectionArgs,
    pub namespace: String,
    pub source: CredentialSource,
    /// Where to write the certificate and key, if exporting
    pub export: Option<ExportTarget>,
}

impl TlsArgs {
    /// Pick the single credential source. Empty flag values count as unset.
    pub fn credential_source(&self) -> Result<CredentialSource> {
        let mut selected = Vec::with_capacity(1);

        if let Some(name) = non_empty(&self.from_secret_name) {
            selected.push(CredentialSource::SecretName(name.to_string()));
        }
        if let Some(path) = non_empty(&self.from_pem_file) {
            selected.push(CredentialSource::PemFile(PathBuf::from(path)));
        }
        if let Some(path) = non_empty(&self.from_secret_file) {
            selected.push(CredentialSource::SecretFile(PathBuf::from(path)));
        }

        match selected.len() {
            0 => Err(BusyboxError::ConfigError(format!(
                "One of {} is required.",
                SOURCE_FLAGS
            ))),
            1 => Ok(selected.remove(0)),
            _ => Err(BusyboxError::ConfigError(format!(
                "Only one of {} may be set.",
                SOURCE_FLAGS
            ))),
        }
    }

    pub fn into_config(self) -> Result<TlsConfig> {
        let source = self.credential_source()?;
        let export = self.export.then(|| ExportTarget::new(self.export_name));

        Ok(TlsConfig {
            connection: self.connection,
            namespace: self.namespace,
            source,
            export,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

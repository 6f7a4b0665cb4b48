// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BusyboxError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to build cluster client: {0}")]
    KubeconfigError(String),

    #[error("the server doesn't have a resource type \"{0}\"")]
    UnknownResourceType(String),

    #[error("resource type \"{kind}\" is ambiguous, qualify it with one of: {candidates}")]
    AmbiguousResourceType { kind: String, candidates: String },

    #[error("Failed to build object reference: {0}")]
    ReferenceError(String),

    #[error("{0}")]
    ConfigError(String),

    #[error("{0} not exist")]
    MissingSecretKey(&'static str),

    #[error("File {} exists", .0.display())]
    ExportTargetExists(PathBuf),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to decode secret: {0}")]
    SecretDecodeError(#[from] serde_yaml::Error),

    #[error("Failed to decode PEM block: {0}")]
    PemError(String),

    #[error("Failed to parse certificate: {0}")]
    CertificateError(String),

    #[error("Invalid timestamp: {0}")]
    TimestampError(String),
}

pub type Result<T> = std::result::Result<T, BusyboxError>;

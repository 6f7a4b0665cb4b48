// SPDX-License-Identifier: Apache-2.0

/// Namespace used by both tools when `--namespace` is not given
pub const DEFAULT_NAMESPACE: &str = "default";

/// Identity written into the reporting fields of generated events
pub const REPORTER_NAME: &str = "eventgenerator";

/// Keys of a `kubernetes.io/tls` secret's data map
pub mod secret_keys {
    pub const CERTIFICATE: &str = "tls.crt";
    pub const PRIVATE_KEY: &str = "tls.key";
}

/// Export file naming
pub mod export {
    /// Prefix used when `--export-name` is not given
    pub const DEFAULT_NAME: &str = "tls";
    pub const CERT_SUFFIX: &str = "-cert.pem";
    pub const KEY_SUFFIX: &str = "-privkey.pem";
}

// SPDX-License-Identifier: Apache-2.0

//! Certificate inspection and export for TLS secrets.

pub mod controller;
pub mod export;
pub mod report;
pub mod source;


pub use controller::TlsController;
pub use export::{export_credentials, ExportTarget};
pub use report::CertificateSummary;
pub use source::{CredentialBundle, CredentialSource};

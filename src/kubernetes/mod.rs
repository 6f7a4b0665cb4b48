// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation and resource resolution.

pub mod client;
pub mod resolve;

pub use client::create_client;
pub use resolve::{
    object_reference, resolve_api_resource, resolve_reference, select_api_resource,
    DiscoveredResource,
};

// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod kubernetes;
pub mod logging;
pub mod tls;

#[cfg(test)]
pub(crate) mod test_utils;

// SPDX-License-Identifier: Apache-2.0

//! Fake event generation.

pub mod generator;

pub use generator::{build_event, event_name, EventGenerator};

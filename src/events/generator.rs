// SPDX-License-Identifier: Apache-2.0

//! Synthesize a core/v1 Event about an existing object

use crate::config::EventConfig;
use crate::constants::REPORTER_NAME;
use crate::error::{BusyboxError, Result};
use crate::kubernetes::resolve_reference;
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{Event, ObjectReference};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{MicroTime, Time};
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client, ResourceExt,
};
use tracing::{info, instrument};

pub struct EventGenerator {
    client: Client,
    config: EventConfig,
}

impl EventGenerator {
    pub fn new(client: Client, config: EventConfig) -> Self {
        Self { client, config }
    }

    /// Resolve the subject, then create one event about it.
    #[instrument(skip(self), fields(kind = %self.config.kind, name = %self.config.name))]
    pub async fn run(&self) -> Result<Event> {
        let reference = resolve_reference(
            &self.client,
            &self.config.kind,
            &self.config.name,
            &self.config.namespace,
        )
        .await?;

        let event = build_event(&self.config, reference, Utc::now())?;

        // Events live in the requested namespace, even for cluster-scoped subjects
        let events: Api<Event> = Api::namespaced(self.client.clone(), &self.config.namespace);
        let created = events.create(&PostParams::default(), &event).await?;

        info!(
            event = %created.name_any(),
            "Event generated successfully: {:?}",
            created
        );

        Ok(created)
    }
}

/// Build the event record for `involved_object` stamped at `now`.
pub fn build_event(
    config: &EventConfig,
    involved_object: ObjectReference,
    now: DateTime<Utc>,
) -> Result<Event> {
    let nanos = now.timestamp_nanos_opt().ok_or_else(|| {
        BusyboxError::TimestampError(format!("{} is out of range for nanoseconds", now))
    })?;

    let action = config
        .action
        .clone()
        .unwrap_or_else(|| config.reason.clone());

    Ok(Event {
        metadata: ObjectMeta {
            name: Some(event_name(&config.name, nanos)),
            namespace: Some(config.namespace.clone()),
            ..Default::default()
        },
        involved_object,
        type_: Some(config.event_type.as_str().to_string()),
        action: non_empty(action),
        reason: non_empty(config.reason.clone()),
        message: non_empty(config.message.clone()),
        first_timestamp: Some(Time(now)),
        last_timestamp: Some(Time(now)),
        event_time: Some(MicroTime(now)),
        reporting_component: Some(REPORTER_NAME.to_string()),
        reporting_instance: Some(REPORTER_NAME.to_string()),
        ..Default::default()
    })
}

/// `<name>.<nanoseconds since epoch in hex>`
pub fn event_name(name: &str, unix_nanos: i64) -> String {
    format!("{}.{:x}", name, unix_nanos)
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

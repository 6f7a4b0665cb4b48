// SPDX-License-Identifier: Apache-2.0

//! Resolve a `--kind`/`--name` pair to an object reference via API discovery

use crate::error::{BusyboxError, Result};
use k8s_openapi::api::core::v1::ObjectReference;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResourceList;
use kube::{
    api::{Api, DynamicObject},
    discovery::{ApiResource, Scope},
    Client, Resource,
};
use tracing::{debug, info, instrument, warn};

/// A resource type as listed by API discovery
#[derive(Debug, Clone)]
pub struct DiscoveredResource {
    pub resource: ApiResource,
    pub scope: Scope,
    pub short_names: Vec<String>,
}

impl DiscoveredResource {
    fn matches(&self, name: &str) -> bool {
        self.resource.kind.eq_ignore_ascii_case(name)
            || self.resource.plural.eq_ignore_ascii_case(name)
            || self.short_names.iter().any(|s| s.eq_ignore_ascii_case(name))
    }
}

/// Find the API resource matching a user supplied resource type.
///
/// `kind` may be a kind (`Pod`), a lowercase singular (`pod`), a plural
/// (`pods`) or a short name (`po`), optionally qualified with its group
/// (`deployments.apps`). Unqualified names are looked up in the core group
/// first. Named groups whose discovery fails are skipped.
#[instrument(skip(client))]
pub async fn resolve_api_resource(client: &Client, kind: &str) -> Result<DiscoveredResource> {
    let (_, group) = split_kind(kind);
    let mut resources = Vec::new();

    if group.map_or(true, str::is_empty) {
        resources = discover_core(client).await?;
        match select_api_resource(resources.clone(), kind) {
            Err(BusyboxError::UnknownResourceType(_)) if group.is_none() => {}
            result => return result,
        }
    }

    resources.extend(discover_groups(client, group).await?);
    select_api_resource(resources, kind)
}

async fn discover_core(client: &Client) -> Result<Vec<DiscoveredResource>> {
    let mut resources = Vec::new();
    for version in client.list_core_api_versions().await?.versions {
        let list = client.list_core_api_resources(&version).await?;
        resources.extend(parse_resource_list(&list));
    }
    Ok(resources)
}

/// Resources of the preferred version of each named group, or only of `group` if given
async fn discover_groups(
    client: &Client,
    group: Option<&str>,
) -> Result<Vec<DiscoveredResource>> {
    let mut resources = Vec::new();
    let groups = client.list_api_groups().await?;

    for api_group in groups
        .groups
        .iter()
        .filter(|g| group.map_or(true, |name| g.name == name))
    {
        let version = match api_group
            .preferred_version
            .as_ref()
            .or_else(|| api_group.versions.first())
        {
            Some(version) => version,
            None => continue,
        };

        match client.list_api_group_resources(&version.group_version).await {
            Ok(list) => resources.extend(parse_resource_list(&list)),
            Err(e) if group.is_some() => return Err(e.into()),
            Err(e) => warn!("Skipping API group {}: {}", version.group_version, e),
        }
    }

    Ok(resources)
}

/// Top-level resources of one discovery document; subresources are dropped
pub fn parse_resource_list(list: &APIResourceList) -> Vec<DiscoveredResource> {
    let (group, version) = match list.group_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", list.group_version.as_str()),
    };

    list.resources
        .iter()
        .filter(|r| !r.name.contains('/'))
        .map(|r| DiscoveredResource {
            resource: ApiResource {
                group: group.to_string(),
                version: version.to_string(),
                api_version: list.group_version.clone(),
                kind: r.kind.clone(),
                plural: r.name.clone(),
            },
            scope: if r.namespaced {
                Scope::Namespaced
            } else {
                Scope::Cluster
            },
            short_names: r.short_names.clone().unwrap_or_default(),
        })
        .collect()
}

fn split_kind(kind: &str) -> (&str, Option<&str>) {
    match kind.split_once('.') {
        Some((name, group)) => (name, Some(group)),
        None => (kind, None),
    }
}

/// Pick the single resource matching `kind` from discovered resources.
///
/// When several groups serve the same unqualified name the core group wins,
/// otherwise the name is ambiguous.
pub fn select_api_resource<I>(resources: I, kind: &str) -> Result<DiscoveredResource>
where
    I: IntoIterator<Item = DiscoveredResource>,
{
    let (name, group) = split_kind(kind);

    let mut matches: Vec<_> = resources
        .into_iter()
        .filter(|r| group.map_or(true, |g| r.resource.group == g))
        .filter(|r| r.matches(name))
        .collect();

    match matches.len() {
        0 => Err(BusyboxError::UnknownResourceType(kind.to_string())),
        1 => Ok(matches.remove(0)),
        _ => {
            if let Some(pos) = single_core_match(&matches) {
                return Ok(matches.remove(pos));
            }
            let mut candidates: Vec<String> = matches
                .iter()
                .map(|r| format!("{}.{}", r.resource.plural, r.resource.group))
                .collect();
            candidates.sort();
            candidates.dedup();
            Err(BusyboxError::AmbiguousResourceType {
                kind: kind.to_string(),
                candidates: candidates.join(", "),
            })
        }
    }
}

fn single_core_match(matches: &[DiscoveredResource]) -> Option<usize> {
    let mut core = matches
        .iter()
        .enumerate()
        .filter(|(_, r)| r.resource.group.is_empty());
    match (core.next(), core.next()) {
        (Some((pos, _)), None) => Some(pos),
        _ => None,
    }
}

/// Look up the named object and return a reference to it.
///
/// `namespace` is ignored for cluster-scoped resource types.
#[instrument(skip(client))]
pub async fn resolve_reference(
    client: &Client,
    kind: &str,
    name: &str,
    namespace: &str,
) -> Result<ObjectReference> {
    let DiscoveredResource {
        resource: ar,
        scope,
        ..
    } = resolve_api_resource(client, kind).await?;
    debug!(
        "Resolved resource type {} to {}/{}",
        kind, ar.api_version, ar.plural
    );

    let api: Api<DynamicObject> = match scope {
        Scope::Namespaced => Api::namespaced_with(client.clone(), namespace, &ar),
        Scope::Cluster => Api::all_with(client.clone(), &ar),
    };

    let object = api.get(name).await?;
    let reference = object_reference(&object, &ar)?;

    info!(
        "Found {} {}{}",
        ar.kind,
        reference
            .namespace
            .as_deref()
            .map(|ns| format!("{}/", ns))
            .unwrap_or_default(),
        name
    );

    Ok(reference)
}

/// Build a reference from a fetched object
pub fn object_reference(object: &DynamicObject, ar: &ApiResource) -> Result<ObjectReference> {
    if object.metadata.name.as_deref().map_or(true, str::is_empty) {
        return Err(BusyboxError::ReferenceError(format!(
            "{} object has no name",
            ar.kind
        )));
    }

    let mut reference = object.object_ref(ar);
    reference.resource_version = object.metadata.resource_version.clone();
    Ok(reference)
}

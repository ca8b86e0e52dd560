//! REST mapping for watched resource kinds
//!
//! Before any watch starts, every watched kind is resolved against the API
//! server. A kind the server does not serve (for instance a missing CRD), or
//! an unreachable server, fails controller construction.

use async_trait::async_trait;
use kube::core::{ApiResource, GroupVersionKind};
use kube::error::DiscoveryError;
use kube::{Client, Resource};
use tracing::debug;

/// Resolves a GroupVersionKind to the resource the API server serves
#[async_trait]
pub trait RestMapper: Send + Sync {
    async fn resolve(&self, gvk: &GroupVersionKind) -> Result<ApiResource, kube::Error>;
}

/// GroupVersionKind of a static resource type
pub fn gvk_of<K>() -> GroupVersionKind
where
    K: Resource<DynamicType = ()>,
{
    GroupVersionKind::gvk(&K::group(&()), &K::version(&()), &K::kind(&()))
}

/// Mapper backed by API server discovery
#[derive(Clone)]
pub struct DiscoveryRestMapper {
    client: Client,
}

impl DiscoveryRestMapper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RestMapper for DiscoveryRestMapper {
    async fn resolve(&self, gvk: &GroupVersionKind) -> Result<ApiResource, kube::Error> {
        let (resource, _capabilities) = kube::discovery::pinned_kind(&self.client, gvk).await?;
        debug!(
            "Resolved {}/{} {} to resource {}",
            gvk.group, gvk.version, gvk.kind, resource.plural
        );
        Ok(resource)
    }
}

/// Mapper over a fixed set of resources (no API server round trip)
#[derive(Debug, Clone, Default)]
pub struct StaticRestMapper {
    resources: Vec<ApiResource>,
}

impl StaticRestMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a static resource type to the mapper
    pub fn with<K>(mut self) -> Self
    where
        K: Resource<DynamicType = ()>,
    {
        self.resources.push(ApiResource::erase::<K>(&()));
        self
    }
}

#[async_trait]
impl RestMapper for StaticRestMapper {
    async fn resolve(&self, gvk: &GroupVersionKind) -> Result<ApiResource, kube::Error> {
        self.resources
            .iter()
            .find(|ar| ar.group == gvk.group && ar.version == gvk.version && ar.kind == gvk.kind)
            .cloned()
            .ok_or_else(|| {
                kube::Error::Discovery(DiscoveryError::MissingKind(format!(
                    "{}/{} {}",
                    gvk.group, gvk.version, gvk.kind
                )))
            })
    }
}

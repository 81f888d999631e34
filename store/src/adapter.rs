use crate::errors::StoreResult;
use crate::resources::{ClusterTemplate, DeploymentSpec, Quota, RoleBinding, TemplateInstance};
use async_trait::async_trait;
use serde::Serialize;

/// A single JSON-Patch operation, serialized to the wire format the store's
/// patch endpoint expects.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    Replace {
        path: String,
        value: serde_json::Value,
    },
    Remove {
        path: String,
    },
}

impl PatchOp {
    pub fn replace(path: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::Replace {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Typed CRUD access to the record collections. Reads used for resolution go
/// through reactive snapshots instead (see [`crate::watch_collection`]); this
/// trait covers the single-shot operations the write paths need.
///
/// Implementations report transport failures verbatim and never retry.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_template(&self, namespace: &str, name: &str) -> StoreResult<ClusterTemplate>;

    async fn create_template(&self, template: &ClusterTemplate) -> StoreResult<ClusterTemplate>;

    async fn update_template(&self, template: &ClusterTemplate) -> StoreResult<ClusterTemplate>;

    async fn create_deployment_spec(&self, spec: &DeploymentSpec) -> StoreResult<DeploymentSpec>;

    async fn create_quota(&self, quota: &Quota) -> StoreResult<Quota>;

    async fn patch_quota(&self, namespace: &str, name: &str, ops: &[PatchOp])
        -> StoreResult<Quota>;

    async fn create_role_binding(&self, binding: &RoleBinding) -> StoreResult<RoleBinding>;

    async fn delete_role_binding(&self, namespace: &str, name: &str) -> StoreResult<()>;

    async fn create_instance(&self, instance: &TemplateInstance)
        -> StoreResult<TemplateInstance>;

    /// Idempotent: succeeds if the namespace already exists.
    async fn ensure_namespace(&self, name: &str) -> StoreResult<()>;
}

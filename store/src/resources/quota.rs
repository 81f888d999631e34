use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Namespace-scoped budget and allow-list record. One per namespace by
/// convention; this layer does not enforce that.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "stencil.io",
    version = "v1beta1",
    kind = "Quota",
    plural = "quotas",
    status = "QuotaStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct QuotaSpec {
    /// Absent means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,

    #[serde(default)]
    pub allowed_templates: Vec<AllowedTemplate>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct AllowedTemplate {
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_spent: Option<u64>,
}

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One instantiation of a ClusterTemplate, carrying the parameter values the
/// user confirmed for the definition and setup steps.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "stencil.io",
    version = "v1beta1",
    kind = "TemplateInstance",
    plural = "templateinstances",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInstanceSpec {
    pub cluster_template_ref: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<InstanceParameterSpec>,
}

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceParameterSpec {
    pub name: String,

    pub value: serde_json::Value,

    /// Absent for definition-step parameters, the setup step name otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_setup: Option<String>,
}

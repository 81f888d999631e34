use super::DeploymentPayload;
use crate::markers::DESCRIPTION_ANNOTATION;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The raw template record. References its definition and setup steps by
/// DeploymentSpec name; resolution happens at read time.
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "stencil.io",
    version = "v1beta1",
    kind = "ClusterTemplate",
    plural = "clustertemplates",
    status = "ClusterTemplateStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTemplateSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u64>,

    /// Name of the definition DeploymentSpec.
    pub cluster_definition: String,

    /// Ordered names of the setup DeploymentSpecs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_setup: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTemplateStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_definition: Option<StepDocuments>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_setup: Option<Vec<SetupStepDocuments>>,
}

/// Prior-run values/schema documents reported for one installation step.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct StepDocuments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct SetupStepDocuments {
    pub name: String,

    #[serde(flatten)]
    pub documents: StepDocuments,
}

impl ClusterTemplate {
    pub fn description(&self) -> Option<&str> {
        self.metadata
            .annotations
            .as_ref()?
            .get(DESCRIPTION_ANNOTATION)
            .map(String::as_str)
    }
}

/// A template joined with its referenced DeploymentSpec payloads. An absent
/// definition means the definition reference did not resolve; callers must
/// treat it as unresolved rather than as an empty deployment.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateView {
    pub metadata: ObjectMeta,
    pub cost: Option<u64>,
    pub definition_name: Option<String>,
    pub definition: Option<DeploymentPayload>,
    pub setup: Vec<SetupStep>,
    pub status: Option<ClusterTemplateStatus>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetupStep {
    pub name: String,
    pub spec: DeploymentPayload,
}

impl TemplateView {
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata
            .annotations
            .as_ref()?
            .get(DESCRIPTION_ANNOTATION)
            .map(String::as_str)
    }

    pub fn setup_step(&self, name: &str) -> Option<&SetupStep> {
        self.setup.iter().find(|step| step.name == name)
    }
}

use crate::adapter::{PatchOp, RecordStore};
use crate::errors::StoreResult;
use crate::resources::{
    ClusterTemplate, DeploymentSpec, Namespace, Quota, RoleBinding, TemplateInstance,
};
use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, DeleteParams, Patch, PatchParams, PostParams};
use kube::{Client, ResourceExt};
use tracing::debug;

/// [`RecordStore`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn try_default() -> StoreResult<Self> {
        Ok(Self::new(Client::try_default().await?))
    }

    fn templates(&self, namespace: &str) -> Api<ClusterTemplate> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl RecordStore for KubeStore {
    #[tracing::instrument(err, skip(self))]
    async fn get_template(&self, namespace: &str, name: &str) -> StoreResult<ClusterTemplate> {
        Ok(self.templates(namespace).get(name).await?)
    }

    #[tracing::instrument(err, skip_all, fields(name = template.name_any()))]
    async fn create_template(&self, template: &ClusterTemplate) -> StoreResult<ClusterTemplate> {
        let namespace = template.namespace().unwrap_or_default();
        Ok(self
            .templates(&namespace)
            .create(&PostParams::default(), template)
            .await?)
    }

    #[tracing::instrument(err, skip_all, fields(name = template.name_any()))]
    async fn update_template(&self, template: &ClusterTemplate) -> StoreResult<ClusterTemplate> {
        let namespace = template.namespace().unwrap_or_default();
        Ok(self
            .templates(&namespace)
            .replace(&template.name_any(), &PostParams::default(), template)
            .await?)
    }

    #[tracing::instrument(err, skip_all, fields(generate_name = ?spec.metadata.generate_name))]
    async fn create_deployment_spec(&self, spec: &DeploymentSpec) -> StoreResult<DeploymentSpec> {
        let namespace = spec.namespace().unwrap_or_default();
        let api = Api::<DeploymentSpec>::namespaced(self.client.clone(), &namespace);
        Ok(api.create(&PostParams::default(), spec).await?)
    }

    #[tracing::instrument(err, skip_all, fields(namespace = ?quota.metadata.namespace))]
    async fn create_quota(&self, quota: &Quota) -> StoreResult<Quota> {
        let namespace = quota.namespace().unwrap_or_default();
        let api = Api::<Quota>::namespaced(self.client.clone(), &namespace);
        Ok(api.create(&PostParams::default(), quota).await?)
    }

    #[tracing::instrument(err, skip(self, ops))]
    async fn patch_quota(
        &self,
        namespace: &str,
        name: &str,
        ops: &[PatchOp],
    ) -> StoreResult<Quota> {
        let api = Api::<Quota>::namespaced(self.client.clone(), namespace);
        let patch: json_patch::Patch = serde_json::from_value(serde_json::to_value(ops)?)?;
        Ok(api
            .patch(name, &PatchParams::default(), &Patch::Json::<()>(patch))
            .await?)
    }

    #[tracing::instrument(err, skip_all, fields(namespace = ?binding.metadata.namespace))]
    async fn create_role_binding(&self, binding: &RoleBinding) -> StoreResult<RoleBinding> {
        let namespace = binding.namespace().unwrap_or_default();
        let api = Api::<RoleBinding>::namespaced(self.client.clone(), &namespace);
        Ok(api.create(&PostParams::default(), binding).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn delete_role_binding(&self, namespace: &str, name: &str) -> StoreResult<()> {
        let api = Api::<RoleBinding>::namespaced(self.client.clone(), namespace);
        api.delete(name, &DeleteParams::default()).await?;
        Ok(())
    }

    #[tracing::instrument(err, skip_all, fields(name = ?instance.metadata.name))]
    async fn create_instance(
        &self,
        instance: &TemplateInstance,
    ) -> StoreResult<TemplateInstance> {
        let namespace = instance.namespace().unwrap_or_default();
        let api = Api::<TemplateInstance>::namespaced(self.client.clone(), &namespace);
        Ok(api.create(&PostParams::default(), instance).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn ensure_namespace(&self, name: &str) -> StoreResult<()> {
        let api = Api::<Namespace>::all(self.client.clone());
        let namespace = Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_owned()),
                ..Default::default()
            },
            ..Default::default()
        };
        if let Err(err) = api.create(&PostParams::default(), &namespace).await {
            if let kube::Error::Api(kube::core::ErrorResponse { code, .. }) = &err {
                if http::StatusCode::CONFLICT == *code {
                    debug!("Namespace already exists - nothing to do");
                    return Ok(());
                }
            }
            return Err(err.into());
        }
        debug!("Namespace created");
        Ok(())
    }
}

use stencil_store::{
    config, DeploymentPayload, DeploymentSpec, ObjectMeta, RecordStore, Snapshot, StoreResult,
};
use tracing::debug;

/// Creates-or-reuses DeploymentSpec records in the shared specs namespace,
/// keyed by payload equality rather than record identity. Records created
/// through this registry are remembered for the rest of the pipeline run, so
/// dedup does not depend on the snapshot catching up with our own writes.
///
/// No locking: concurrent pipelines racing on the same novel payload may each
/// create a record. Records are immutable and interchangeable, so this
/// degrades to harmless duplication.
pub struct SpecRegistry<'a, S> {
    store: &'a S,
    namespace: String,
    created: Vec<DeploymentSpec>,
}

impl<'a, S: RecordStore> SpecRegistry<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::in_namespace(store, config::specs_namespace())
    }

    pub fn in_namespace(store: &'a S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            created: Vec::new(),
        }
    }

    /// Always persists a new record. Definition specs go through here
    /// directly: they are never deduplicated against other templates.
    pub async fn create(&mut self, payload: DeploymentPayload) -> StoreResult<DeploymentSpec> {
        let spec = DeploymentSpec {
            metadata: ObjectMeta {
                generate_name: Some(base_name(&payload)),
                namespace: Some(self.namespace.clone()),
                ..Default::default()
            },
            spec: payload,
        };
        let created = self.store.create_deployment_spec(&spec).await?;
        debug!(name = ?created.metadata.name, "Created deployment spec");
        self.created.push(created.clone());
        Ok(created)
    }

    /// Returns a record whose payload is deep-equal to `payload` from the
    /// snapshot or from this registry's earlier creations, creating one
    /// otherwise. Issues zero or one write per call.
    pub async fn get_or_create(
        &mut self,
        snapshot: &Snapshot<DeploymentSpec>,
        payload: DeploymentPayload,
    ) -> StoreResult<DeploymentSpec> {
        if let Some(existing) = snapshot
            .items
            .iter()
            .map(|item| item.as_ref())
            .chain(self.created.iter())
            .find(|existing| existing.spec == payload)
        {
            debug!(name = ?existing.metadata.name, "Reusing deployment spec");
            return Ok(existing.clone());
        }
        self.create(payload).await
    }
}

fn last_segment(value: &str) -> Option<String> {
    value
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
}

/// Chart name, else the last segment of the source path, else the last
/// segment of the repository URL; first non-empty wins.
fn base_name(payload: &DeploymentPayload) -> String {
    payload
        .source
        .chart
        .clone()
        .filter(|chart| !chart.is_empty())
        .or_else(|| payload.source.path.as_deref().and_then(last_segment))
        .or_else(|| last_segment(&payload.source.repo_url))
        .unwrap_or_default()
}

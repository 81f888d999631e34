use crate::errors::SyncError;
use futures::future::join_all;
use stencil_store::markers::{is_owned_binding, new_role_binding};
use stencil_store::{
    ObjectMeta, PatchOp, Quota, QuotaSpec, RecordStore, RoleBinding, Snapshot, StoreError,
};
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq)]
pub struct QuotaFormValues {
    pub namespace: String,

    /// `None` means unlimited.
    pub budget: Option<u64>,

    pub users: Vec<String>,
    pub groups: Vec<String>,
}

/// Provisions a namespace with its quota record and keeps the owned role
/// bindings of that namespace in line with the requested subjects. Operations
/// on one namespace never read or mutate another namespace's bindings.
pub struct QuotaSaver<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> QuotaSaver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Returns the namespace name for caller navigation.
    #[tracing::instrument(err, skip_all, fields(namespace = %values.namespace))]
    pub async fn save(
        &self,
        bindings: &Snapshot<RoleBinding>,
        values: &QuotaFormValues,
        existing: Option<&Quota>,
    ) -> Result<String, SyncError> {
        match existing {
            None => self.create_quota(values).await?,
            Some(quota) => self.update_quota(values, quota).await?,
        }

        if values.users.is_empty() && values.groups.is_empty() {
            // Existing owned bindings stay in place: an edit with no subjects
            // never revokes access.
            debug!("No subjects requested, leaving role bindings untouched");
        } else {
            self.replace_owned_bindings(bindings, values).await?;
        }

        Ok(values.namespace.clone())
    }

    async fn create_quota(&self, values: &QuotaFormValues) -> Result<(), SyncError> {
        self.store.ensure_namespace(&values.namespace).await?;
        let quota = Quota {
            metadata: ObjectMeta {
                generate_name: Some(values.namespace.clone()),
                namespace: Some(values.namespace.clone()),
                ..Default::default()
            },
            spec: QuotaSpec {
                budget: values.budget,
                allowed_templates: Vec::new(),
            },
            status: None,
        };
        self.store.create_quota(&quota).await?;
        info!("Quota created");
        Ok(())
    }

    async fn update_quota(
        &self,
        values: &QuotaFormValues,
        existing: &Quota,
    ) -> Result<(), SyncError> {
        if existing.spec.budget == values.budget {
            debug!("Budget unchanged, skipping patch");
            return Ok(());
        }
        let namespace = existing
            .metadata
            .namespace
            .as_deref()
            .unwrap_or(&values.namespace);
        let name = existing.metadata.name.as_deref().unwrap_or_default();
        self.store
            .patch_quota(
                namespace,
                name,
                &[PatchOp::replace(
                    "/spec/budget",
                    serde_json::json!(values.budget),
                )],
            )
            .await?;
        info!("Quota budget updated");
        Ok(())
    }

    /// Deletes every owned binding in the namespace, then creates exactly one
    /// binding with the union of requested subjects. Deletions run as one
    /// concurrent batch and all outcomes are awaited before anything else
    /// happens; if any deletion failed, the create is skipped and the
    /// aggregate error lists every failure.
    async fn replace_owned_bindings(
        &self,
        bindings: &Snapshot<RoleBinding>,
        values: &QuotaFormValues,
    ) -> Result<(), SyncError> {
        let owned: Vec<&RoleBinding> = bindings
            .items
            .iter()
            .map(|binding| binding.as_ref())
            .filter(|binding| {
                is_owned_binding(binding)
                    && binding.metadata.namespace.as_deref() == Some(values.namespace.as_str())
            })
            .collect();

        let deletions = owned.iter().map(|binding| {
            let name = binding.metadata.name.clone().unwrap_or_default();
            async move {
                let result = self
                    .store
                    .delete_role_binding(&values.namespace, &name)
                    .await;
                (name, result)
            }
        });
        let failures: Vec<(String, StoreError)> = join_all(deletions)
            .await
            .into_iter()
            .filter_map(|(name, result)| result.err().map(|err| (name, err)))
            .collect();
        if !failures.is_empty() {
            return Err(SyncError::BindingCleanup {
                namespace: values.namespace.clone(),
                failures,
            });
        }

        let binding = new_role_binding(&values.namespace, &values.users, &values.groups);
        self.store.create_role_binding(&binding).await?;
        info!(replaced = owned.len(), "Owned role bindings replaced");
        Ok(())
    }
}

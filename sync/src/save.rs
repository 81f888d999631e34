use crate::derive_spec::{installation_spec, setup_spec, TemplateFormValues};
use crate::errors::SyncError;
use crate::registry::SpecRegistry;
use crate::spec_diff::payload_diff;
use maplit::btreemap;
use stencil_store::markers::DESCRIPTION_ANNOTATION;
use stencil_store::{
    config, ClusterTemplate, ClusterTemplateSpec, DeploymentSpec, RecordStore, Snapshot,
    TemplateView,
};
use tracing::{debug, info};

/// Turns form values back into the underlying records, creating only what
/// changed. Completed writes are never rolled back: a failure mid-pipeline
/// leaves the specs created so far in place and the caller retries the whole
/// save.
pub struct TemplateSaver<'a, S> {
    store: &'a S,
    specs_namespace: String,
    templates_namespace: String,
}

impl<'a, S: RecordStore> TemplateSaver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_namespaces(store, config::specs_namespace(), config::templates_namespace())
    }

    pub fn with_namespaces(
        store: &'a S,
        specs_namespace: impl Into<String>,
        templates_namespace: impl Into<String>,
    ) -> Self {
        Self {
            store,
            specs_namespace: specs_namespace.into(),
            templates_namespace: templates_namespace.into(),
        }
    }

    /// Saves a template creation (`existing` is `None`) or edit. The
    /// definition spec is recreated only when it differs from the previously
    /// resolved one and is never deduplicated against other templates; setup
    /// specs are resolved through [`SpecRegistry::get_or_create`] since
    /// identical post-install steps are common across templates.
    #[tracing::instrument(err, skip_all, fields(name = %values.details.name))]
    pub async fn save(
        &self,
        specs: &Snapshot<DeploymentSpec>,
        values: &TemplateFormValues,
        existing: Option<&TemplateView>,
    ) -> Result<ClusterTemplate, SyncError> {
        let mut registry = SpecRegistry::in_namespace(self.store, self.specs_namespace.clone());

        let definition = installation_spec(&values.installation);
        let previous = existing.and_then(|view| {
            view.definition
                .as_ref()
                .zip(view.definition_name.as_ref())
        });
        let definition_name = match previous {
            Some((previous_definition, previous_name)) if *previous_definition == definition => {
                debug!(
                    name = %previous_name,
                    "Definition unchanged, keeping existing deployment spec"
                );
                previous_name.clone()
            }
            _ => {
                if let Some((previous_definition, _)) = previous {
                    debug!(
                        changes = ?payload_diff(previous_definition, &definition),
                        "Definition changed"
                    );
                }
                let created = registry.create(definition).await?;
                created.metadata.name.unwrap_or_default()
            }
        };

        let mut setup_names = Vec::with_capacity(values.post_installation.len());
        for setup_values in &values.post_installation {
            let spec = registry
                .get_or_create(specs, setup_spec(setup_values))
                .await?;
            setup_names.push(spec.metadata.name.unwrap_or_default());
        }

        let template = self.compose(values, definition_name, setup_names, existing);
        let persisted = match existing {
            Some(_) => self.store.update_template(&template).await?,
            None => self.store.create_template(&template).await?,
        };
        info!("Template saved");
        Ok(persisted)
    }

    /// Every field of the previous record is preserved except name,
    /// annotations, labels and the spec block. Cost is carried from the
    /// previous record and starts at zero for new templates; a separate flow
    /// owns cost edits.
    fn compose(
        &self,
        values: &TemplateFormValues,
        definition_name: String,
        setup_names: Vec<String>,
        existing: Option<&TemplateView>,
    ) -> ClusterTemplate {
        let mut metadata = existing
            .map(|view| view.metadata.clone())
            .unwrap_or_default();
        metadata.name = Some(values.details.name.clone());
        if metadata.namespace.is_none() {
            metadata.namespace = Some(self.templates_namespace.clone());
        }
        metadata.annotations = values.details.description.as_ref().map(|description| {
            btreemap! { DESCRIPTION_ANNOTATION.to_owned() => description.clone() }
        });
        metadata.labels = values.details.labels.clone();

        ClusterTemplate {
            metadata,
            spec: ClusterTemplateSpec {
                cost: Some(existing.and_then(|view| view.cost).unwrap_or(0)),
                cluster_definition: definition_name,
                cluster_setup: setup_names,
            },
            status: existing.and_then(|view| view.status.clone()),
        }
    }
}

use crate::errors::MissingSpecs;
use std::sync::Arc;
use stencil_store::{
    ClusterTemplate, DeploymentSpec, SetupStep, Snapshot, SnapshotReceiver, TemplateView,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Joins a raw template with the current DeploymentSpec snapshot.
///
/// Resolution is strict for the definition and best-effort for setup steps:
/// an unresolved definition leaves `view.definition` empty, unresolved setup
/// names are collected instead of aborting. Anything unresolved is reported
/// in the returned [`MissingSpecs`] so callers can render a precise
/// diagnostic.
pub fn deserialize_template(
    raw: &ClusterTemplate,
    specs: &Snapshot<DeploymentSpec>,
) -> (TemplateView, Option<MissingSpecs>) {
    let find = |name: &str| {
        specs
            .items
            .iter()
            .find(|spec| spec.metadata.name.as_deref() == Some(name))
    };

    let mut missing = MissingSpecs::default();

    let definition = find(&raw.spec.cluster_definition);
    if definition.is_none() {
        missing.definition = Some(raw.spec.cluster_definition.clone());
    }

    let mut setup = Vec::new();
    for name in &raw.spec.cluster_setup {
        match find(name) {
            Some(spec) => setup.push(SetupStep {
                name: name.clone(),
                spec: spec.spec.clone(),
            }),
            None => missing.setup.push(name.clone()),
        }
    }

    let view = TemplateView {
        metadata: raw.metadata.clone(),
        cost: raw.spec.cost,
        definition_name: definition.and_then(|spec| spec.metadata.name.clone()),
        definition: definition.map(|spec| spec.spec.clone()),
        setup,
        status: raw.status.clone(),
    };
    (view, (!missing.is_empty()).then_some(missing))
}

pub type TemplateViewReceiver = watch::Receiver<Option<(TemplateView, Option<MissingSpecs>)>>;

/// Re-derives the template view whenever the raw template or the spec
/// snapshot changes. Each change triggers a full recomputation over the
/// latest pair; there is no incremental state to grow stale. The view stays
/// `None` until the spec snapshot has loaded.
pub fn watch_template_view(
    mut template_rx: watch::Receiver<Option<Arc<ClusterTemplate>>>,
    mut specs_rx: SnapshotReceiver<DeploymentSpec>,
) -> (TemplateViewReceiver, JoinHandle<()>) {
    let (tx, rx) = watch::channel(None);
    let handle = tokio::task::spawn(async move {
        loop {
            {
                let template = template_rx.borrow_and_update().clone();
                let specs = specs_rx.borrow_and_update().clone();
                let view = template
                    .filter(|_| specs.loaded)
                    .map(|raw| deserialize_template(&raw, &specs));
                tx.send_replace(view);
            }
            tokio::select! {
                changed = template_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = specs_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    });
    (rx, handle)
}

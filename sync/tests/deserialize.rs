use std::sync::Arc;
use stencil_store::{
    ClusterTemplate, ClusterTemplateSpec, DeploymentDestination, DeploymentPayload,
    DeploymentSource, DeploymentSpec, ObjectMeta, Snapshot,
};
use stencil_sync::{deserialize_template, watch_template_view};
use tokio::sync::watch;

fn payload(chart: &str) -> DeploymentPayload {
    DeploymentPayload {
        source: DeploymentSource {
            repo_url: "https://charts.example.com".to_owned(),
            chart: Some(chart.to_owned()),
            path: None,
            target_revision: Some("1.0.0".to_owned()),
        },
        destination: DeploymentDestination {
            server: "${new_cluster}".to_owned(),
            namespace: None,
        },
        project: "default".to_owned(),
        sync_policy: None,
    }
}

fn spec_record(name: &str, chart: &str) -> Arc<DeploymentSpec> {
    Arc::new(DeploymentSpec {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            namespace: Some("argocd".to_owned()),
            ..Default::default()
        },
        spec: payload(chart),
    })
}

fn raw_template(definition: &str, setup: &[&str]) -> ClusterTemplate {
    ClusterTemplate {
        metadata: ObjectMeta {
            name: Some("prod".to_owned()),
            namespace: Some("stencil".to_owned()),
            ..Default::default()
        },
        spec: ClusterTemplateSpec {
            cost: Some(1),
            cluster_definition: definition.to_owned(),
            cluster_setup: setup.iter().map(|name| (*name).to_owned()).collect(),
        },
        status: None,
    }
}

#[test]
fn fully_resolved_template_has_no_missing_specs() {
    let snapshot = Snapshot::ready(vec![
        spec_record("def-1", "hypershift"),
        spec_record("setup-1", "gitops"),
    ]);
    let (view, missing) = deserialize_template(&raw_template("def-1", &["setup-1"]), &snapshot);

    assert!(missing.is_none());
    assert_eq!(view.definition_name.as_deref(), Some("def-1"));
    assert_eq!(view.definition, Some(payload("hypershift")));
    assert_eq!(view.setup.len(), 1);
    assert_eq!(view.setup[0].name, "setup-1");
    assert_eq!(view.setup[0].spec, payload("gitops"));
    assert_eq!(view.cost, Some(1));
}

#[test]
fn missing_definition_yields_empty_definition_and_error() {
    let snapshot = Snapshot::ready(vec![spec_record("setup-1", "gitops")]);
    let (view, missing) = deserialize_template(&raw_template("ghost", &["setup-1"]), &snapshot);

    assert_eq!(view.definition, None);
    assert_eq!(view.definition_name, None);
    assert_eq!(view.setup.len(), 1);
    let missing = missing.expect("missing definition must be reported");
    assert_eq!(missing.definition.as_deref(), Some("ghost"));
    assert!(missing.setup.is_empty());
}

#[test]
fn unresolvable_setup_names_are_collected_not_fatal() {
    let snapshot = Snapshot::ready(vec![
        spec_record("def-1", "hypershift"),
        spec_record("setup-1", "gitops"),
    ]);
    let (view, missing) =
        deserialize_template(&raw_template("def-1", &["setup-1", "ghost"]), &snapshot);

    assert_eq!(view.definition, Some(payload("hypershift")));
    assert_eq!(view.setup.len(), 1);
    assert_eq!(view.setup[0].name, "setup-1");
    let missing = missing.expect("missing setup must be reported");
    assert_eq!(missing.definition, None);
    assert_eq!(missing.setup, vec!["ghost".to_owned()]);
}

#[tokio::test]
async fn view_is_rederived_when_the_snapshot_changes() -> anyhow::Result<()> {
    let (_template_tx, template_rx) =
        watch::channel(Some(Arc::new(raw_template("def-1", &["setup-1"]))));
    let (specs_tx, specs_rx) = watch::channel(Snapshot::default());
    let (mut view_rx, _handle) = watch_template_view(template_rx, specs_rx);

    specs_tx.send_replace(Snapshot::ready(vec![
        spec_record("def-1", "hypershift"),
        spec_record("setup-1", "gitops"),
    ]));

    // The view stays empty until the snapshot loads, then gets recomputed.
    let view = loop {
        view_rx.changed().await?;
        let current = view_rx.borrow().clone();
        if let Some((view, missing)) = current {
            assert!(missing.is_none());
            break view;
        }
    };
    assert_eq!(view.definition, Some(payload("hypershift")));
    assert_eq!(view.setup.len(), 1);
    Ok(())
}

#[test]
fn setup_resolution_matches_by_name_not_by_presence() {
    // A snapshot with records under other names must not satisfy a reference.
    let snapshot = Snapshot::ready(vec![
        spec_record("def-1", "hypershift"),
        spec_record("unrelated", "gitops"),
    ]);
    let (view, missing) = deserialize_template(&raw_template("def-1", &["setup-1"]), &snapshot);

    assert!(view.setup.is_empty());
    assert_eq!(missing.unwrap().setup, vec!["setup-1".to_owned()]);
}

use std::collections::BTreeMap;
use stencil_store::{
    DeploymentDestination, DeploymentPayload, DeploymentSource, SyncAutomated, SyncPolicy,
};

/// The control plane's own API endpoint; definition steps always deploy here.
pub const HUB_CLUSTER_SERVER: &str = "https://kubernetes.default.svc";

/// Placeholder for the newly provisioned target cluster, resolved by the
/// GitOps controller at instantiation time. Setup steps always deploy there.
pub const NEW_CLUSTER_SERVER: &str = "${new_cluster}";

/// Deferred destination namespace, resolved per instance.
pub const INSTANCE_NAMESPACE_VAR: &str = "${instance_ns}";

pub const DEFAULT_PROJECT: &str = "default";

pub const CREATE_NAMESPACE_SYNC_OPTION: &str = "CreateNamespace=true";

#[derive(Clone, Debug, PartialEq)]
pub enum SourceValues {
    Chart {
        repo_url: String,
        chart: String,
        version: String,
    },
    Repo {
        repo_url: String,
        revision: String,
        path: String,
    },
}

impl SourceValues {
    fn to_source(&self) -> DeploymentSource {
        match self {
            Self::Chart {
                repo_url,
                chart,
                version,
            } => DeploymentSource {
                repo_url: repo_url.clone(),
                chart: Some(chart.clone()),
                path: None,
                target_revision: Some(version.clone()),
            },
            Self::Repo {
                repo_url,
                revision,
                path,
            } => DeploymentSource {
                repo_url: repo_url.clone(),
                chart: None,
                path: Some(path.clone()),
                target_revision: Some(revision.clone()),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InstallationValues {
    pub source: SourceValues,

    /// Defer the destination namespace to instantiation time instead of
    /// naming one now.
    pub use_instance_namespace: bool,

    pub destination_namespace: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetupValues {
    pub name: String,
    pub source: SourceValues,
    pub destination_namespace: Option<String>,
    pub auto_sync: bool,
    pub prune_resources: bool,
    pub create_namespace: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplateDetails {
    pub name: String,
    pub description: Option<String>,
    pub labels: Option<BTreeMap<String, String>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TemplateFormValues {
    pub details: TemplateDetails,
    pub installation: InstallationValues,
    pub post_installation: Vec<SetupValues>,
}

fn payload(
    server: &str,
    namespace: Option<String>,
    source: DeploymentSource,
    sync_policy: SyncPolicy,
) -> DeploymentPayload {
    DeploymentPayload {
        source,
        destination: DeploymentDestination {
            server: server.to_owned(),
            namespace,
        },
        project: DEFAULT_PROJECT.to_owned(),
        sync_policy: Some(sync_policy),
    }
}

/// Derives the definition-step payload: hub API server, full auto-sync and
/// namespace creation. Pure; validation happens upstream.
pub fn installation_spec(values: &InstallationValues) -> DeploymentPayload {
    let namespace = if values.use_instance_namespace {
        Some(INSTANCE_NAMESPACE_VAR.to_owned())
    } else {
        values.destination_namespace.clone()
    };
    payload(
        HUB_CLUSTER_SERVER,
        namespace,
        values.source.to_source(),
        SyncPolicy {
            automated: Some(SyncAutomated::default()),
            sync_options: Some(vec![CREATE_NAMESPACE_SYNC_OPTION.to_owned()]),
        },
    )
}

/// Derives a setup-step payload: placeholder target server, sync policy from
/// the form's flags.
pub fn setup_spec(values: &SetupValues) -> DeploymentPayload {
    let sync_policy = SyncPolicy {
        automated: values.auto_sync.then(|| SyncAutomated {
            prune: values.prune_resources,
        }),
        sync_options: values
            .create_namespace
            .then(|| vec![CREATE_NAMESPACE_SYNC_OPTION.to_owned()]),
    };
    payload(
        NEW_CLUSTER_SERVER,
        values.destination_namespace.clone(),
        values.source.to_source(),
        sync_policy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_source() -> SourceValues {
        SourceValues::Chart {
            repo_url: "https://charts.example.com".to_owned(),
            chart: "hypershift".to_owned(),
            version: "1.2.3".to_owned(),
        }
    }

    #[test]
    fn installation_targets_the_hub() {
        let spec = installation_spec(&InstallationValues {
            source: chart_source(),
            use_instance_namespace: false,
            destination_namespace: Some("clusters".to_owned()),
        });
        assert_eq!(spec.destination.server, HUB_CLUSTER_SERVER);
        assert_eq!(spec.destination.namespace.as_deref(), Some("clusters"));
        assert_eq!(spec.source.chart.as_deref(), Some("hypershift"));
        let policy = spec.sync_policy.unwrap();
        assert_eq!(policy.automated, Some(SyncAutomated { prune: false }));
        assert_eq!(
            policy.sync_options,
            Some(vec![CREATE_NAMESPACE_SYNC_OPTION.to_owned()])
        );
    }

    #[test]
    fn installation_namespace_can_be_deferred() {
        let spec = installation_spec(&InstallationValues {
            source: chart_source(),
            use_instance_namespace: true,
            destination_namespace: Some("ignored".to_owned()),
        });
        assert_eq!(
            spec.destination.namespace.as_deref(),
            Some(INSTANCE_NAMESPACE_VAR)
        );
    }

    #[test]
    fn setup_targets_the_new_cluster_with_form_flags() {
        let spec = setup_spec(&SetupValues {
            name: "monitoring".to_owned(),
            source: SourceValues::Repo {
                repo_url: "https://github.com/org/deploys".to_owned(),
                revision: "main".to_owned(),
                path: "addons/monitoring".to_owned(),
            },
            destination_namespace: Some("monitoring".to_owned()),
            auto_sync: true,
            prune_resources: true,
            create_namespace: false,
        });
        assert_eq!(spec.destination.server, NEW_CLUSTER_SERVER);
        assert_eq!(spec.source.path.as_deref(), Some("addons/monitoring"));
        let policy = spec.sync_policy.unwrap();
        assert_eq!(policy.automated, Some(SyncAutomated { prune: true }));
        assert_eq!(policy.sync_options, None);
    }
}

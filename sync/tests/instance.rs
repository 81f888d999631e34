
use anyhow::Result;
use fake_store::FakeStore;
use serde_json::json;
use stencil_params::{
    InstallationParameters, InstanceFormValues, InstanceParameter, ParamValue, StepParameters,
};
use stencil_store::{
    DeploymentDestination, DeploymentPayload, DeploymentSource, ObjectMeta, SetupStep,
    TemplateView,
};
use stencil_sync::{create_instance, to_instance};

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

fn parameter(name: &str, value: ParamValue) -> InstanceParameter {
    InstanceParameter {
        name: name.to_owned(),
        param_type: value.param_type(),
        value,
        required: false,
        description: None,
        title: name.to_owned(),
    }
}

fn template() -> TemplateView {
    TemplateView {
        metadata: ObjectMeta {
            name: Some("prod".to_owned()),
            namespace: Some("stencil".to_owned()),
            ..Default::default()
        },
        cost: Some(1),
        definition_name: Some("hypershift1".to_owned()),
        definition: Some(payload("hypershift")),
        setup: vec![SetupStep {
            name: "monitoring".to_owned(),
            spec: payload("kube-prometheus-stack"),
        }],
        status: None,
    }
}

fn form_values() -> InstanceFormValues {
    InstanceFormValues {
        name: "dev-1".to_owned(),
        namespace: "team-a".to_owned(),
        installation: InstallationParameters {
            spec: Some(payload("hypershift")),
            parameters: vec![parameter("replicas", ParamValue::Integer(3))],
        },
        post_installation: vec![StepParameters {
            name: "monitoring".to_owned(),
            spec: payload("kube-prometheus-stack"),
            parameters: vec![parameter("retention", ParamValue::String("7d".to_owned()))],
        }],
        has_unsupported_parameters: false,
    }
}

#[test]
fn instance_flattens_parameters_with_setup_names() {
    let instance = to_instance(&template(), &form_values());

    assert_eq!(instance.metadata.name.as_deref(), Some("dev-1"));
    assert_eq!(instance.metadata.namespace.as_deref(), Some("team-a"));
    assert_eq!(instance.spec.cluster_template_ref, "prod");

    let parameters = &instance.spec.parameters;
    assert_eq!(parameters.len(), 2);
    assert_eq!(parameters[0].name, "replicas");
    assert_eq!(parameters[0].value, json!(3));
    assert_eq!(parameters[0].cluster_setup, None);
    assert_eq!(parameters[1].name, "retention");
    assert_eq!(parameters[1].value, json!("7d"));
    assert_eq!(parameters[1].cluster_setup.as_deref(), Some("monitoring"));
}

#[test]
fn parameter_types_round_trip_to_json() {
    let mut values = form_values();
    values.installation.parameters = vec![
        parameter("enabled", ParamValue::Boolean(true)),
        parameter("ratio", ParamValue::Number(0.5)),
        parameter("name", ParamValue::String("web".to_owned())),
    ];
    let instance = to_instance(&template(), &values);
    let json_values: Vec<_> = instance
        .spec
        .parameters
        .iter()
        .map(|parameter| parameter.value.clone())
        .collect();
    assert_eq!(json_values[0], json!(true));
    assert_eq!(json_values[1], json!(0.5));
    assert_eq!(json_values[2], json!("web"));
}

#[tokio::test]
async fn create_instance_persists_through_the_store() -> Result<()> {
    let store = FakeStore::new();
    let created = create_instance(&store, &template(), &form_values()).await?;

    assert_eq!(store.counters().instance_creates, 1);
    assert_eq!(store.instances().len(), 1);
    assert_eq!(created.spec.cluster_template_ref, "prod");
    Ok(())
}

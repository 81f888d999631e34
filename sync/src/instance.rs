use crate::errors::SyncError;
use stencil_params::{InstanceFormValues, InstanceParameter};
use stencil_store::{
    InstanceParameterSpec, ObjectMeta, RecordStore, TemplateInstance, TemplateInstanceSpec,
    TemplateView,
};

fn parameter_spec(
    parameter: &InstanceParameter,
    cluster_setup: Option<&str>,
) -> InstanceParameterSpec {
    InstanceParameterSpec {
        name: parameter.name.clone(),
        value: (&parameter.value).into(),
        cluster_setup: cluster_setup.map(str::to_owned),
    }
}

/// Flattens the confirmed form values into one instance record: definition
/// parameters first, then each setup step's parameters tagged with the step
/// name.
pub fn to_instance(template: &TemplateView, values: &InstanceFormValues) -> TemplateInstance {
    let mut parameters: Vec<InstanceParameterSpec> = values
        .installation
        .parameters
        .iter()
        .map(|parameter| parameter_spec(parameter, None))
        .collect();
    for step in &values.post_installation {
        parameters.extend(
            step.parameters
                .iter()
                .map(|parameter| parameter_spec(parameter, Some(&step.name))),
        );
    }

    TemplateInstance {
        metadata: ObjectMeta {
            name: Some(values.name.clone()),
            namespace: Some(values.namespace.clone()),
            ..Default::default()
        },
        spec: TemplateInstanceSpec {
            cluster_template_ref: template.name().to_owned(),
            parameters,
        },
    }
}

pub async fn create_instance<S: RecordStore>(
    store: &S,
    template: &TemplateView,
    values: &InstanceFormValues,
) -> Result<TemplateInstance, SyncError> {
    Ok(store.create_instance(&to_instance(template, values)).await?)
}

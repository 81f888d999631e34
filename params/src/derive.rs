use crate::error::ParamsError;
use crate::schema::{parse_schema_doc, parse_values_doc, PropertySchema};
use crate::value::{ParamType, ParamValue};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use stencil_store::{DeploymentPayload, TemplateView};
use tracing::debug;

/// One editable parameter of an installation step.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceParameter {
    pub name: String,
    pub value: ParamValue,
    pub required: bool,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub title: String,
}

/// Parameters derived for one step, with the aggregate unsupported flag.
#[derive(Debug, Default)]
pub struct DerivedParameters {
    pub parameters: Vec<InstanceParameter>,
    pub has_unsupported_parameters: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InstallationParameters {
    pub spec: Option<DeploymentPayload>,
    pub parameters: Vec<InstanceParameter>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepParameters {
    pub name: String,
    pub spec: DeploymentPayload,
    pub parameters: Vec<InstanceParameter>,
}

/// Pre-filled form state for instantiating a template. Name and namespace
/// start empty and are filled in by the user.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceFormValues {
    pub name: String,
    pub namespace: String,
    pub installation: InstallationParameters,
    pub post_installation: Vec<StepParameters>,
    pub has_unsupported_parameters: bool,
}

/// Derives a typed parameter list from one step's prior-run documents.
/// Schema-driven when a schema document is supplied, values-only otherwise.
pub fn parameters_from_documents(
    values_doc: Option<&str>,
    schema_doc: Option<&str>,
) -> Result<DerivedParameters, ParamsError> {
    let mut deriver = Deriver::default();
    let parameters = deriver.step_parameters(values_doc, schema_doc)?;
    Ok(DerivedParameters {
        parameters,
        has_unsupported_parameters: deriver.unsupported,
    })
}

/// Builds the full instance form state for a template: definition-step
/// parameters plus one parameter list per setup step reported in the
/// template's status. A status entry naming a setup step the template does
/// not declare fails the whole derivation.
pub fn derive_instance_values(template: &TemplateView) -> Result<InstanceFormValues, ParamsError> {
    let mut deriver = Deriver::default();
    let status = template.status.clone().unwrap_or_default();

    let installation_parameters = match &status.cluster_definition {
        Some(docs) => deriver.step_parameters(docs.values.as_deref(), docs.schema.as_deref())?,
        None => Vec::new(),
    };

    let mut post_installation = Vec::new();
    for setup_status in status.cluster_setup.iter().flatten() {
        let step = template
            .setup_step(&setup_status.name)
            .ok_or_else(|| ParamsError::UnknownSetupStep(setup_status.name.clone()))?;
        let parameters = deriver.step_parameters(
            setup_status.documents.values.as_deref(),
            setup_status.documents.schema.as_deref(),
        )?;
        post_installation.push(StepParameters {
            name: setup_status.name.clone(),
            spec: step.spec.clone(),
            parameters,
        });
    }

    if deriver.unsupported {
        debug!(
            template = template.name(),
            "Some prior parameters cannot be round-tripped through the form"
        );
    }

    Ok(InstanceFormValues {
        name: String::new(),
        namespace: String::new(),
        installation: InstallationParameters {
            spec: template.definition.clone(),
            parameters: installation_parameters,
        },
        post_installation,
        has_unsupported_parameters: deriver.unsupported,
    })
}

#[derive(Default)]
struct Deriver {
    unsupported: bool,
}

impl Deriver {
    fn step_parameters(
        &mut self,
        values_doc: Option<&str>,
        schema_doc: Option<&str>,
    ) -> Result<Vec<InstanceParameter>, ParamsError> {
        match schema_doc {
            Some(schema) => self.from_schema(schema, values_doc),
            None => self.from_values(values_doc),
        }
    }

    /// Schema-driven mode: one parameter per declared property, in schema
    /// declaration order. A prior value wins over the schema default by key
    /// presence.
    fn from_schema(
        &mut self,
        schema_doc: &str,
        values_doc: Option<&str>,
    ) -> Result<Vec<InstanceParameter>, ParamsError> {
        let schema = parse_schema_doc(schema_doc)?;
        let values = match values_doc {
            Some(doc) => parse_values_doc(doc)?,
            None => Mapping::new(),
        };

        let mut parameters = Vec::new();
        for (key, prop_value) in &schema.properties {
            let Some(name) = key.as_str() else {
                continue;
            };
            // JSON Schema allows boolean property schemas; nothing to edit.
            if matches!(prop_value, Value::Bool(_)) {
                continue;
            }
            let prop: PropertySchema = serde_yaml::from_value(prop_value.clone())
                .map_err(ParamsError::InvalidSchemaDocument)?;
            let Some(declared) = prop
                .declared_type
                .as_deref()
                .and_then(|t| t.parse::<ParamType>().ok())
            else {
                self.unsupported = true;
                continue;
            };
            let resolved = values.get(key).or(prop.default.as_ref());
            let Some(value) = resolved.and_then(ParamValue::classify) else {
                self.unsupported = true;
                continue;
            };
            parameters.push(InstanceParameter {
                name: name.to_owned(),
                value,
                required: schema.required.iter().any(|required| required == name),
                param_type: declared,
                description: schema.description.clone(),
                title: prop.title.clone().unwrap_or_else(|| name.to_owned()),
            });
        }
        Ok(parameters)
    }

    /// Values-only mode: every primitive entry of the values document, sorted
    /// by name for deterministic presentation.
    fn from_values(
        &mut self,
        values_doc: Option<&str>,
    ) -> Result<Vec<InstanceParameter>, ParamsError> {
        let Some(doc) = values_doc else {
            return Ok(Vec::new());
        };
        let values = parse_values_doc(doc)?;

        let mut parameters = Vec::new();
        for (key, value) in &values {
            let Some(name) = key.as_str() else {
                continue;
            };
            match ParamValue::classify(value) {
                None => self.unsupported = true,
                Some(value) => parameters.push(InstanceParameter {
                    name: name.to_owned(),
                    param_type: value.param_type(),
                    value,
                    required: false,
                    description: None,
                    title: name.to_owned(),
                }),
            }
        }
        parameters.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(parameters)
    }
}

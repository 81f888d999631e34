use crate::error::ParamsError;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// The subset of a step's schema document this layer understands: property
/// declarations, the required-name list and an overall description. Anything
/// else in the document is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct StepSchema {
    #[serde(default)]
    pub properties: Mapping,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub declared_type: Option<String>,

    #[serde(default)]
    pub default: Option<Value>,

    #[serde(default)]
    pub title: Option<String>,
}

pub fn parse_schema_doc(doc: &str) -> Result<StepSchema, ParamsError> {
    match serde_yaml::from_str::<Value>(doc).map_err(ParamsError::InvalidSchemaDocument)? {
        Value::Null => Ok(StepSchema::default()),
        value => serde_yaml::from_value(value).map_err(ParamsError::InvalidSchemaDocument),
    }
}

pub fn parse_values_doc(doc: &str) -> Result<Mapping, ParamsError> {
    match serde_yaml::from_str::<Value>(doc).map_err(ParamsError::InvalidValuesDocument)? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(ParamsError::ValuesNotAMapping),
    }
}

use serde::{Deserialize, Serialize};

/// The parameter types the instance form can round-trip.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Serialize,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParamType {
    String,
    Boolean,
    Number,
    Integer,
}

/// A parameter value, one variant per supported type. Values of any other
/// shape never enter this type; [`ParamValue::classify`] is the single point
/// deciding what is supported.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Number(f64),
}

impl ParamValue {
    pub fn classify(value: &serde_yaml::Value) -> Option<Self> {
        match value {
            serde_yaml::Value::String(s) => Some(Self::String(s.clone())),
            serde_yaml::Value::Bool(b) => Some(Self::Boolean(*b)),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Integer(i)),
                None => n.as_f64().map(Self::Number),
            },
            _ => None,
        }
    }

    pub fn param_type(&self) -> ParamType {
        match self {
            Self::String(_) => ParamType::String,
            Self::Boolean(_) => ParamType::Boolean,
            Self::Integer(_) => ParamType::Integer,
            Self::Number(_) => ParamType::Number,
        }
    }
}

impl From<&ParamValue> for serde_json::Value {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::String(s) => s.clone().into(),
            ParamValue::Boolean(b) => (*b).into(),
            ParamValue::Integer(i) => (*i).into(),
            ParamValue::Number(n) => (*n).into(),
        }
    }
}

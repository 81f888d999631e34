#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error(
        "Post-installation status references the setup step {0}, \
         which does not exist in the template"
    )]
    UnknownSetupStep(String),

    #[error("Failed parsing a step values document: {0}")]
    InvalidValuesDocument(serde_yaml::Error),

    #[error("Failed parsing a step schema document: {0}")]
    InvalidSchemaDocument(serde_yaml::Error),

    #[error("A step values document must be a mapping")]
    ValuesNotAMapping,
}

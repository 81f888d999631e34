use itertools::Itertools;
use std::fmt;
use stencil_store::StoreError;

/// References on a template that did not resolve against the current
/// DeploymentSpec snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MissingSpecs {
    /// The definition reference, when unresolved.
    pub definition: Option<String>,

    /// Every unresolved setup reference, in template order.
    pub setup: Vec<String>,
}

impl MissingSpecs {
    pub fn is_empty(&self) -> bool {
        self.definition.is_none() && self.setup.is_empty()
    }
}

impl fmt::Display for MissingSpecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(definition) = &self.definition {
            parts.push(format!("definition {definition}"));
        }
        if !self.setup.is_empty() {
            parts.push(format!("setup {}", self.setup.iter().join(", ")));
        }
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to find deployment specs referenced by the template: {0}")]
    MissingDeploymentSpecs(MissingSpecs),

    #[error(
        "Failed deleting {} owned role binding(s) in {namespace}: {}",
        .failures.len(),
        .failures.iter().map(|(name, err)| format!("{name}: {err}")).join("; ")
    )]
    BindingCleanup {
        namespace: String,
        failures: Vec<(String, StoreError)>,
    },
}

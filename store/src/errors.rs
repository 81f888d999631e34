#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Failed encoding patch operations: {0}")]
    PatchEncode(#[from] serde_json::Error),

    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

use std::env;

/// The single namespace all DeploymentSpec records live in. This is the
/// namespace watched by the GitOps controller that consumes them.
pub fn specs_namespace() -> String {
    env::var("STENCIL_SPECS_NAMESPACE").unwrap_or_else(|_| "argocd".to_owned())
}

/// The namespace new ClusterTemplate records are created in.
pub fn templates_namespace() -> String {
    env::var("STENCIL_TEMPLATES_NAMESPACE").unwrap_or_else(|_| "stencil".to_owned())
}

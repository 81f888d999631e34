use stencil_store::markers::{binding_subject_names, is_owned_binding};
use stencil_store::{Quota, RoleBinding, Snapshot};

/// A quota joined with the subjects granted access to its namespace through
/// owned role bindings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuotaDetails {
    pub name: String,
    pub namespace: String,
    pub budget: Option<u64>,
    pub budget_spent: Option<u64>,
    pub users: Vec<String>,
    pub groups: Vec<String>,
    pub templates: Vec<String>,
}

pub fn quota_details(quota: &Quota, bindings: &Snapshot<RoleBinding>) -> QuotaDetails {
    let namespace = quota.metadata.namespace.clone().unwrap_or_default();
    let quota_bindings: Vec<&RoleBinding> = bindings
        .items
        .iter()
        .map(|binding| binding.as_ref())
        .filter(|binding| {
            is_owned_binding(binding)
                && binding.metadata.namespace.as_deref() == Some(namespace.as_str())
        })
        .collect();

    QuotaDetails {
        name: quota.metadata.name.clone().unwrap_or_default(),
        namespace,
        budget: quota.spec.budget,
        budget_spent: quota.status.as_ref().and_then(|status| status.budget_spent),
        users: quota_bindings
            .iter()
            .flat_map(|binding| binding_subject_names(binding, "User"))
            .collect(),
        groups: quota_bindings
            .iter()
            .flat_map(|binding| binding_subject_names(binding, "Group"))
            .collect(),
        templates: quota
            .spec
            .allowed_templates
            .iter()
            .map(|template| template.name.clone())
            .collect(),
    }
}

pub fn all_quota_details(
    quotas: &Snapshot<Quota>,
    bindings: &Snapshot<RoleBinding>,
) -> Vec<QuotaDetails> {
    quotas
        .items
        .iter()
        .map(|quota| quota_details(quota, bindings))
        .collect()
}

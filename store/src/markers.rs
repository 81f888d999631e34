use k8s_openapi::api::rbac::v1::{RoleBinding, RoleRef, Subject};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use lazy_static::lazy_static;
use maplit::btreemap;
use std::collections::BTreeMap;

/// Free-text template description, encoded as a single annotation.
pub const DESCRIPTION_ANNOTATION: &str = "stencil.io/description";

/// Marks role bindings created by this system. Replace-all semantics apply
/// only to bindings carrying this marker.
pub const BINDING_MARKER_ANNOTATION: &str = "stencil.io/role-binding";

pub const BINDING_GENERATE_NAME: &str = "stencil-templates-rb-";

/// The fixed ClusterRole granted to template users.
pub const TEMPLATES_ROLE: &str = "stencil-templates-user";

pub const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";

lazy_static! {
    pub static ref BINDING_MARKER_ANNOTATIONS: BTreeMap<String, String> = btreemap! {
        BINDING_MARKER_ANNOTATION.to_owned() => String::new(),
    };
}

pub fn templates_role_ref() -> RoleRef {
    RoleRef {
        api_group: RBAC_API_GROUP.to_owned(),
        kind: "ClusterRole".to_owned(),
        name: TEMPLATES_ROLE.to_owned(),
    }
}

/// A binding is owned by this system when it carries the marker annotation
/// and grants the fixed role. Hand-made bindings on the same role are left
/// alone.
pub fn is_owned_binding(binding: &RoleBinding) -> bool {
    let marked = binding
        .metadata
        .annotations
        .as_ref()
        .is_some_and(|annotations| annotations.contains_key(BINDING_MARKER_ANNOTATION));
    marked && binding.role_ref.name == TEMPLATES_ROLE
}

fn subjects<'a>(names: &'a [String], kind: &str) -> impl Iterator<Item = Subject> + 'a {
    let kind = kind.to_owned();
    names.iter().map(move |name| Subject {
        kind: kind.clone(),
        api_group: Some(RBAC_API_GROUP.to_owned()),
        name: name.clone(),
        ..Default::default()
    })
}

pub fn new_role_binding(namespace: &str, users: &[String], groups: &[String]) -> RoleBinding {
    RoleBinding {
        metadata: ObjectMeta {
            generate_name: Some(BINDING_GENERATE_NAME.to_owned()),
            namespace: Some(namespace.to_owned()),
            annotations: Some(BINDING_MARKER_ANNOTATIONS.clone()),
            ..Default::default()
        },
        subjects: Some(
            subjects(users, "User")
                .chain(subjects(groups, "Group"))
                .collect(),
        ),
        role_ref: templates_role_ref(),
    }
}

pub fn binding_subject_names(binding: &RoleBinding, kind: &str) -> Vec<String> {
    binding
        .subjects
        .iter()
        .flatten()
        .filter(|subject| subject.kind == kind)
        .map(|subject| subject.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked_binding(role: &str) -> RoleBinding {
        let mut binding = new_role_binding("team-a", &["alice".to_owned()], &[]);
        binding.role_ref.name = role.to_owned();
        binding
    }

    #[test]
    fn created_bindings_are_owned() {
        assert!(is_owned_binding(&marked_binding(TEMPLATES_ROLE)));
    }

    #[test]
    fn foreign_role_is_not_owned() {
        assert!(!is_owned_binding(&marked_binding("cluster-admin")));
    }

    #[test]
    fn unmarked_binding_is_not_owned() {
        let mut binding = marked_binding(TEMPLATES_ROLE);
        binding.metadata.annotations = None;
        assert!(!is_owned_binding(&binding));
    }

    #[test]
    fn subjects_carry_kind_and_group() {
        let binding = new_role_binding(
            "team-a",
            &["alice".to_owned()],
            &["ops".to_owned(), "dev".to_owned()],
        );
        let subjects = binding.subjects.unwrap();
        assert_eq!(subjects.len(), 3);
        assert_eq!(subjects[0].kind, "User");
        assert_eq!(subjects[0].name, "alice");
        assert_eq!(subjects[1].kind, "Group");
        assert_eq!(subjects[2].name, "dev");
        assert!(subjects
            .iter()
            .all(|s| s.api_group.as_deref() == Some(RBAC_API_GROUP)));
    }
}

use std::sync::Arc;
use stencil_store::markers::new_role_binding;
use stencil_store::{
    AllowedTemplate, ObjectMeta, Quota, QuotaSpec, QuotaStatus, RoleBinding, Snapshot,
};
use stencil_sync::{all_quota_details, quota_details};

fn quota(name: &str, namespace: &str, budget: Option<u64>) -> Quota {
    Quota {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            namespace: Some(namespace.to_owned()),
            ..Default::default()
        },
        spec: QuotaSpec {
            budget,
            allowed_templates: vec![AllowedTemplate {
                name: "prod".to_owned(),
            }],
        },
        status: Some(QuotaStatus {
            budget_spent: Some(3),
        }),
    }
}

fn named_binding(namespace: &str, users: &[&str], groups: &[&str]) -> Arc<RoleBinding> {
    let users: Vec<String> = users.iter().map(|name| (*name).to_owned()).collect();
    let groups: Vec<String> = groups.iter().map(|name| (*name).to_owned()).collect();
    let mut binding = new_role_binding(namespace, &users, &groups);
    binding.metadata.name = Some(format!("{namespace}-rb"));
    Arc::new(binding)
}

#[test]
fn details_join_subjects_from_the_quota_namespace_only() {
    let bindings = Snapshot::ready(vec![
        named_binding("team-a", &["alice"], &["ops"]),
        named_binding("team-b", &["mallory"], &[]),
    ]);

    let details = quota_details(&quota("team-a-quota", "team-a", Some(10)), &bindings);

    assert_eq!(details.name, "team-a-quota");
    assert_eq!(details.namespace, "team-a");
    assert_eq!(details.budget, Some(10));
    assert_eq!(details.budget_spent, Some(3));
    assert_eq!(details.users, vec!["alice".to_owned()]);
    assert_eq!(details.groups, vec!["ops".to_owned()]);
    assert_eq!(details.templates, vec!["prod".to_owned()]);
}

#[test]
fn foreign_role_bindings_are_ignored() {
    let mut foreign = new_role_binding("team-a", &["admin".to_owned()], &[]);
    foreign.role_ref.name = "cluster-admin".to_owned();
    foreign.metadata.name = Some("foreign".to_owned());
    let bindings = Snapshot::ready(vec![Arc::new(foreign)]);

    let details = quota_details(&quota("team-a-quota", "team-a", None), &bindings);
    assert!(details.users.is_empty());
    assert!(details.groups.is_empty());
}

#[test]
fn all_details_cover_every_quota() {
    let quotas = Snapshot::ready(vec![
        Arc::new(quota("qa", "team-a", Some(1))),
        Arc::new(quota("qb", "team-b", None)),
    ]);
    let bindings = Snapshot::ready(vec![named_binding("team-b", &["bob"], &[])]);

    let details = all_quota_details(&quotas, &bindings);
    assert_eq!(details.len(), 2);
    assert!(details[0].users.is_empty());
    assert_eq!(details[1].users, vec!["bob".to_owned()]);
}

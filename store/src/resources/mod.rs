mod deployment_spec;
pub use deployment_spec::*;

mod instance;
pub use instance::*;

mod quota;
pub use quota::*;

mod template;
pub use template::*;

pub use k8s_openapi::api::core::v1::Namespace;
pub use k8s_openapi::api::rbac::v1::{RoleBinding, RoleRef, Subject};
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

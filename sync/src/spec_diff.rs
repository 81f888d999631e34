use maplit::hashmap;
use serde_json::{json, Value};
use std::collections::HashMap;
use stencil_store::DeploymentPayload;

/// Dotted field paths mapped to their (old, new) values.
pub type SpecDiff = HashMap<String, (Value, Value)>;

/// Field-level difference between two deployment payloads, used to report
/// why a save decided the definition drifted.
pub fn payload_diff(old: &DeploymentPayload, new: &DeploymentPayload) -> SpecDiff {
    value_diff(
        &serde_json::to_value(old).unwrap_or_default(),
        &serde_json::to_value(new).unwrap_or_default(),
    )
}

pub fn value_diff(old: &Value, new: &Value) -> SpecDiff {
    if old == new {
        return Default::default();
    }
    match (old, new) {
        (Value::Object(old_obj), Value::Object(new_obj)) => {
            let mut diffs: SpecDiff = Default::default();

            for (old_key, old_value) in old_obj {
                match new_obj.get(old_key) {
                    Some(new_value) => {
                        merge_with_prefix(&mut diffs, value_diff(old_value, new_value), old_key);
                    }
                    None => {
                        diffs.insert(old_key.to_owned(), (old_value.clone(), json!(null)));
                    }
                }
            }

            for (new_key, new_value) in new_obj {
                if !old_obj.contains_key(new_key) {
                    diffs.insert(new_key.to_owned(), (json!(null), new_value.clone()));
                }
            }

            diffs
        }
        _ => hashmap!("".to_owned() => (old.clone(), new.clone())),
    }
}

fn merge_with_prefix(diffs: &mut SpecDiff, changes: SpecDiff, prefix: &str) {
    for (path, change) in changes.into_iter() {
        diffs.insert(
            [prefix, &path]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<&str>>()
                .join("."),
            change,
        );
    }
}

//! Reference resolution and dependency ordering

use std::collections::{HashMap, HashSet};

use custodian_core::resource::{Resource, Value};

/// Attribute values by binding (`<type>.<name>`)
pub type Bindings = HashMap<String, HashMap<String, Value>>;

/// Bindings that a resource depends on
pub fn dependencies(resource: &Resource) -> HashSet<String> {
    let mut deps = HashSet::new();
    for value in resource.attributes.values() {
        collect_dependencies(value, &mut deps);
    }
    deps
}

fn collect_dependencies(value: &Value, deps: &mut HashSet<String>) {
    match value {
        Value::ResourceRef(binding, _) => {
            deps.insert(binding.clone());
        }
        Value::List(items) => {
            for item in items {
                collect_dependencies(item, deps);
            }
        }
        Value::Map(map) => {
            for v in map.values() {
                collect_dependencies(v, deps);
            }
        }
        _ => {}
    }
}

/// Sort resources so that every resource follows the ones it references
///
/// Cycles are broken at the first revisit; the unresolved reference is
/// reported when the resource is applied.
pub fn sort_by_dependencies(resources: &[Resource]) -> Vec<Resource> {
    let by_binding: HashMap<String, &Resource> =
        resources.iter().map(|r| (r.id.binding(), r)).collect();

    let mut sorted = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut visiting: HashSet<String> = HashSet::new();

    fn visit(
        resource: &Resource,
        by_binding: &HashMap<String, &Resource>,
        visited: &mut HashSet<String>,
        visiting: &mut HashSet<String>,
        sorted: &mut Vec<Resource>,
    ) {
        let binding = resource.id.binding();
        if visited.contains(&binding) || !visiting.insert(binding.clone()) {
            return;
        }

        let mut deps: Vec<String> = dependencies(resource).into_iter().collect();
        deps.sort();
        for dep in deps {
            if let Some(dep_resource) = by_binding.get(&dep) {
                visit(dep_resource, by_binding, visited, visiting, sorted);
            }
        }

        visiting.remove(&binding);
        visited.insert(binding);
        sorted.push(resource.clone());
    }

    for resource in resources {
        visit(
            resource,
            &by_binding,
            &mut visited,
            &mut visiting,
            &mut sorted,
        );
    }
    sorted
}

pub fn resolve_value(value: &Value, bindings: &Bindings) -> Value {
    match value {
        Value::ResourceRef(binding, attr) => bindings
            .get(binding)
            .and_then(|attrs| attrs.get(attr))
            .map(|v| resolve_value(v, bindings))
            .unwrap_or_else(|| value.clone()),
        Value::List(items) => Value::List(items.iter().map(|v| resolve_value(v, bindings)).collect()),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), resolve_value(v, bindings)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// Resolve every reference of a resource, failing on the first one that
/// has no value yet
pub fn resolve(resource: &Resource, bindings: &Bindings) -> Result<Resource, String> {
    let mut resolved = resource.clone();
    for (key, value) in &resource.attributes {
        resolved
            .attributes
            .insert(key.clone(), resolve_value(value, bindings));
    }

    let mut unresolved = Vec::new();
    for value in resolved.attributes.values() {
        collect_unresolved(value, &mut unresolved);
    }
    if let Some(first) = unresolved.into_iter().min() {
        return Err(format!("Unresolved reference ${{{}}}", first));
    }
    Ok(resolved)
}

fn collect_unresolved(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::ResourceRef(binding, attr) => out.push(format!("{}.{}", binding, attr)),
        Value::List(items) => items.iter().for_each(|v| collect_unresolved(v, out)),
        Value::Map(map) => map.values().for_each(|v| collect_unresolved(v, out)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(binding: &str, attr: &str) -> Value {
        Value::ResourceRef(binding.to_string(), attr.to_string())
    }

    #[test]
    fn dependencies_are_collected_from_nested_values() {
        let resource = Resource::new("source_registration", "host").with_attribute(
            "connections",
            Value::List(vec![Value::Map(HashMap::from([(
                "data_source_connection_id".to_string(),
                reference("data_source_connection.edge", "connection_id"),
            )]))]),
        );
        let deps = dependencies(&resource);
        assert!(deps.contains("data_source_connection.edge"));
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn referenced_resources_come_first() {
        let registration = Resource::new("source_registration", "host").with_attribute(
            "data_source_connection_id",
            reference("data_source_connection.edge", "connection_id"),
        );
        let connection = Resource::new("data_source_connection", "edge");
        let policy = Resource::new("protection_policy", "gold");

        let sorted = sort_by_dependencies(&[registration, policy, connection]);
        let order: Vec<String> = sorted.iter().map(|r| r.id.binding()).collect();
        assert_eq!(
            order,
            vec![
                "data_source_connection.edge",
                "source_registration.host",
                "protection_policy.gold"
            ]
        );
    }

    #[test]
    fn cycles_do_not_loop() {
        let a = Resource::new("protection_policy", "a")
            .with_attribute("template_id", reference("protection_policy.b", "policy_id"));
        let b = Resource::new("protection_policy", "b")
            .with_attribute("template_id", reference("protection_policy.a", "policy_id"));
        assert_eq!(sort_by_dependencies(&[a, b]).len(), 2);
    }

    #[test]
    fn resolve_replaces_known_references() {
        let mut bindings = Bindings::new();
        bindings.insert(
            "data_source_connection.edge".to_string(),
            HashMap::from([(
                "connection_id".to_string(),
                Value::String("c-7".to_string()),
            )]),
        );
        let resource = Resource::new("source_registration", "host").with_attribute(
            "data_source_connection_id",
            reference("data_source_connection.edge", "connection_id"),
        );

        let resolved = resolve(&resource, &bindings).unwrap();
        assert_eq!(
            resolved.attributes.get("data_source_connection_id"),
            Some(&Value::String("c-7".to_string()))
        );
    }

    #[test]
    fn resolve_reports_missing_values() {
        let resource = Resource::new("source_registration", "host").with_attribute(
            "data_source_connection_id",
            reference("data_source_connection.edge", "connection_id"),
        );
        let err = resolve(&resource, &Bindings::new()).unwrap_err();
        assert_eq!(
            err,
            "Unresolved reference ${data_source_connection.edge.connection_id}"
        );
    }
}

//! Per-resource reconciliation
//!
//! Decides between create, update, replace and no-op for one configured
//! resource, given what the state file recorded for it.

use std::collections::HashMap;
use std::fmt;

use custodian_core::provider::Provider;
use custodian_core::resource::{Resource, State, Value, changed_attributes};
use custodian_core::schema::ResourceSchema;
use custodian_state::ResourceState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Created,
    Updated,
    Replaced,
    Unchanged,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Created => "created",
            Action::Updated => "updated",
            Action::Replaced => "replaced",
            Action::Unchanged => "unchanged",
        };
        write!(f, "{}", s)
    }
}

/// Sensitive attributes the API never echoes are kept from `source`
pub fn carry_sensitive(
    schema: &ResourceSchema,
    state: &mut State,
    source: &HashMap<String, Value>,
) {
    for attr in schema.attributes.values().filter(|a| a.sensitive) {
        if !state.attributes.contains_key(&attr.name)
            && let Some(value) = source.get(&attr.name)
        {
            state.attributes.insert(attr.name.clone(), value.clone());
        }
    }
}

pub async fn apply_resource(
    provider: &dyn Provider,
    schema: &ResourceSchema,
    desired: &Resource,
    previous: Option<&ResourceState>,
) -> Result<(Action, State), String> {
    let mut desired = desired.clone();
    desired.attributes = schema.normalize(&desired.attributes);
    let desired = &desired;

    let Some(previous) = previous else {
        return create(provider, schema, desired)
            .await
            .map(|s| (Action::Created, s));
    };

    let mut current = provider
        .read(&desired.id, previous.identifier.as_deref())
        .await
        .map_err(|e| e.to_string())?;
    if !current.exists {
        log::info!("{} no longer exists, creating it again", desired.id);
        return create(provider, schema, desired)
            .await
            .map(|s| (Action::Created, s));
    }
    carry_sensitive(schema, &mut current, &previous.to_state().attributes);

    let changed = changed_attributes(&desired.attributes, &current.attributes);
    if changed.is_empty() {
        return Ok((Action::Unchanged, current));
    }
    log::debug!("{} changed: {}", desired.id, changed.join(", "));

    let identifier = current
        .identifier
        .clone()
        .or_else(|| previous.identifier.clone())
        .ok_or_else(|| format!("{} has no identifier", desired.id))?;

    let force_new = schema.force_new_attributes();
    if changed.iter().any(|name| force_new.contains(&name.as_str())) {
        provider
            .delete(&desired.id, &identifier)
            .await
            .map_err(|e| e.to_string())?;
        return create(provider, schema, desired)
            .await
            .map(|s| (Action::Replaced, s));
    }

    let mut updated = provider
        .update(&desired.id, &identifier, &current, desired)
        .await
        .map_err(|e| e.to_string())?;
    carry_sensitive(schema, &mut updated, &desired.attributes);
    Ok((Action::Updated, updated))
}

async fn create(
    provider: &dyn Provider,
    schema: &ResourceSchema,
    desired: &Resource,
) -> Result<State, String> {
    let mut state = provider.create(desired).await.map_err(|e| e.to_string())?;
    carry_sensitive(schema, &mut state, &desired.attributes);
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use custodian_core::provider::{BoxFuture, ProviderResult, ResourceType};
    use custodian_core::resource::ResourceId;
    use custodian_core::schema::{AttributeSchema, AttributeType};

    /// Records calls and serves one remote object
    struct FakeProvider {
        remote: Option<HashMap<String, Value>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        fn new(remote: Option<HashMap<String, Value>>) -> Self {
            Self {
                remote,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }
    }

    impl Provider for FakeProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
            Vec::new()
        }

        fn read(
            &self,
            id: &ResourceId,
            _identifier: Option<&str>,
        ) -> BoxFuture<'_, ProviderResult<State>> {
            self.record("read");
            let state = match &self.remote {
                Some(attrs) => State::existing(id.clone(), attrs.clone()).with_identifier("t::1"),
                None => State::not_found(id.clone()),
            };
            Box::pin(async move { Ok(state) })
        }

        fn read_data_source(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
            let state = State::existing(resource.id.clone(), resource.attributes.clone());
            Box::pin(async move { Ok(state) })
        }

        fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
            self.record("create");
            let mut attrs = resource.attributes.clone();
            attrs.remove("encryption_key");
            let state = State::existing(resource.id.clone(), attrs).with_identifier("t::2");
            Box::pin(async move { Ok(state) })
        }

        fn update(
            &self,
            id: &ResourceId,
            identifier: &str,
            _from: &State,
            to: &Resource,
        ) -> BoxFuture<'_, ProviderResult<State>> {
            self.record("update");
            let state =
                State::existing(id.clone(), to.attributes.clone()).with_identifier(identifier);
            Box::pin(async move { Ok(state) })
        }

        fn delete(&self, _id: &ResourceId, _identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
            self.record("delete");
            Box::pin(async move { Ok(()) })
        }
    }

    fn schema() -> ResourceSchema {
        ResourceSchema::new("source_registration").attributes(vec![
            AttributeSchema::new("x_ibm_tenant_id", AttributeType::String)
                .required()
                .force_new(),
            AttributeSchema::new("name", AttributeType::String).optional(),
            AttributeSchema::new("encryption_key", AttributeType::String)
                .optional()
                .sensitive(),
        ])
    }

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    fn desired(tenant: &str, name: &str) -> Resource {
        Resource::new("source_registration", "host")
            .with_attribute("x_ibm_tenant_id", s(tenant))
            .with_attribute("name", s(name))
            .with_attribute("encryption_key", s("secret"))
    }

    fn remote(tenant: &str, name: &str) -> HashMap<String, Value> {
        HashMap::from([
            ("x_ibm_tenant_id".to_string(), s(tenant)),
            ("name".to_string(), s(name)),
        ])
    }

    fn previous() -> ResourceState {
        ResourceState::new("source_registration", "host", "fake")
            .with_identifier("t::1")
            .with_attribute("encryption_key", serde_json::json!("secret"))
    }

    #[tokio::test]
    async fn unknown_resource_is_created_with_sensitive_values() {
        let provider = FakeProvider::new(None);
        let (action, state) = apply_resource(&provider, &schema(), &desired("t", "a"), None)
            .await
            .unwrap();
        assert_eq!(action, Action::Created);
        assert_eq!(state.attributes.get("encryption_key"), Some(&s("secret")));
        assert_eq!(provider.calls(), vec!["create"]);
    }

    #[tokio::test]
    async fn remotely_deleted_resource_is_recreated() {
        let provider = FakeProvider::new(None);
        let (action, _) =
            apply_resource(&provider, &schema(), &desired("t", "a"), Some(&previous()))
                .await
                .unwrap();
        assert_eq!(action, Action::Created);
        assert_eq!(provider.calls(), vec!["read", "create"]);
    }

    #[tokio::test]
    async fn matching_resource_is_left_alone() {
        let provider = FakeProvider::new(Some(remote("t", "a")));
        let (action, state) =
            apply_resource(&provider, &schema(), &desired("t", "a"), Some(&previous()))
                .await
                .unwrap();
        assert_eq!(action, Action::Unchanged);
        assert_eq!(state.attributes.get("encryption_key"), Some(&s("secret")));
        assert_eq!(provider.calls(), vec!["read"]);
    }

    #[tokio::test]
    async fn changed_attribute_is_updated() {
        let provider = FakeProvider::new(Some(remote("t", "a")));
        let (action, _) =
            apply_resource(&provider, &schema(), &desired("t", "b"), Some(&previous()))
                .await
                .unwrap();
        assert_eq!(action, Action::Updated);
        assert_eq!(provider.calls(), vec!["read", "update"]);
    }

    #[tokio::test]
    async fn force_new_change_replaces() {
        let provider = FakeProvider::new(Some(remote("t", "a")));
        let (action, _) =
            apply_resource(&provider, &schema(), &desired("u", "a"), Some(&previous()))
                .await
                .unwrap();
        assert_eq!(action, Action::Replaced);
        assert_eq!(provider.calls(), vec!["read", "delete", "create"]);
    }

    #[tokio::test]
    async fn dotted_enum_matches_its_read_back_variant() {
        let schema = schema().attribute(
            AttributeSchema::new(
                "environment",
                AttributeType::Enum(vec!["kPhysical".to_string(), "kSQL".to_string()]),
            )
            .required(),
        );
        let desired =
            desired("t", "a").with_attribute("environment", s("Environment.kPhysical"));

        let provider = FakeProvider::new(None);
        let (_, created) = apply_resource(&provider, &schema, &desired, None)
            .await
            .unwrap();
        assert_eq!(created.attributes.get("environment"), Some(&s("kPhysical")));

        let provider = FakeProvider::new(Some(created.attributes.clone()));
        let (action, _) = apply_resource(&provider, &schema, &desired, Some(&previous()))
            .await
            .unwrap();
        assert_eq!(action, Action::Unchanged);
        assert_eq!(provider.calls(), vec!["read"]);
    }

    #[test]
    fn carry_sensitive_keeps_returned_values() {
        let mut state = State::existing(
            ResourceId::new("source_registration", "host"),
            HashMap::from([("encryption_key".to_string(), s("rotated"))]),
        );
        let source = HashMap::from([("encryption_key".to_string(), s("secret"))]);
        carry_sensitive(&schema(), &mut state, &source);
        assert_eq!(state.attributes.get("encryption_key"), Some(&s("rotated")));
    }
}

/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! In-memory [`ApiClient`] used by tests.
//!
//! Objects are stored as JSON keyed by kind, namespace and name. The client
//! assigns uids and resource versions like an API server, enforces
//! optimistic concurrency on update, and only serves kinds whose scheme has
//! been attached. Failures can be injected per verb and kind.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use kube::api::ListParams;
use kube::core::GroupVersionKind;

use super::{ApiClient, ObjectKey, Verb};
use crate::error::InfraError;
use crate::resource::{InfraResource, group_version_kind, gvk_key, is_namespaced};

type StoreKey = (String, String, String);

/// In-memory cluster API.
pub struct FakeClient {
    objects: DashMap<StoreKey, serde_json::Value>,
    schemes: DashSet<String>,
    refused_schemes: DashSet<String>,
    failures: DashMap<(Verb, String), String>,
    requests: AtomicUsize,
    resource_version: AtomicU64,
    poll_interval: Duration,
}

impl Default for FakeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeClient {
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
            schemes: DashSet::new(),
            refused_schemes: DashSet::new(),
            failures: DashMap::new(),
            requests: AtomicUsize::new(0),
            resource_version: AtomicU64::new(1),
            poll_interval: Duration::from_millis(10),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Stores `object` as if it had been created earlier, registering its
    /// kind. Does not count as a request.
    pub fn seed<K: InfraResource>(&self, object: K) -> K {
        let gvk = group_version_kind::<K>();
        self.schemes.insert(gvk_key(&gvk));

        let mut object = object;
        self.assign_server_fields(&mut object);
        let key = store_key::<K>(&ObjectKey::of(&object));
        if let Ok(value) = serde_json::to_value(&object) {
            self.objects.insert(key, value);
        }
        object
    }

    /// Reads an object directly from the store. Does not count as a request.
    pub fn peek<K: InfraResource>(&self, name: &str, namespace: Option<&str>) -> Option<K> {
        let key = store_key::<K>(&ObjectKey::new(name, namespace));
        self.objects
            .get(&key)
            .and_then(|entry| serde_json::from_value(entry.value().clone()).ok())
    }

    /// Makes every `verb` request for `kind` (e.g. `ConfigMap`) fail with
    /// `message` until [`FakeClient::clear_failures`] is called.
    pub fn fail_on(&self, verb: Verb, kind: &str, message: &str) {
        self.failures
            .insert((verb, kind.to_string()), message.to_string());
    }

    pub fn clear_failures(&self) {
        self.failures.clear();
    }

    /// Makes [`ApiClient::attach_scheme`] fail for `kind`.
    pub fn refuse_scheme(&self, kind: &str) {
        self.refused_schemes.insert(kind.to_string());
    }

    /// Number of get/list/create/update/delete requests served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn begin<K: InfraResource>(&self, verb: Verb) -> Result<(), InfraError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let kind = K::kind(&()).to_string();
        if !self.schemes.contains(&gvk_key(&group_version_kind::<K>())) {
            return Err(InfraError::SchemeNotRegistered { kind });
        }

        if let Some(message) = self.failures.get(&(verb, kind)) {
            tracing::debug!(%verb, kind = %K::kind(&()), "Injected failure");
            return Err(InfraError::Rejected(message.value().clone()));
        }

        Ok(())
    }

    fn next_resource_version(&self) -> String {
        self.resource_version
            .fetch_add(1, Ordering::SeqCst)
            .to_string()
    }

    fn assign_server_fields<K: InfraResource>(&self, object: &mut K) {
        let resource_version = self.next_resource_version();
        let meta = object.meta_mut();
        meta.uid = Some(uuid::Uuid::new_v4().to_string());
        meta.resource_version = Some(resource_version);
        if !is_namespaced::<K>() {
            meta.namespace = None;
        }
    }
}

fn store_key<K: InfraResource>(key: &ObjectKey) -> StoreKey {
    (
        gvk_key(&group_version_kind::<K>()),
        key.namespace.clone().unwrap_or_default(),
        key.name.clone(),
    )
}

fn check_key<K: InfraResource>(key: &ObjectKey) -> Result<(), InfraError> {
    if key.name.is_empty() {
        return Err(InfraError::Rejected(format!(
            "{} name is required",
            K::kind(&())
        )));
    }
    if is_namespaced::<K>() && key.namespace.as_deref().unwrap_or_default().is_empty() {
        return Err(InfraError::Rejected(format!(
            "{} {} requires a namespace",
            K::kind(&()),
            key.name
        )));
    }
    Ok(())
}

/// Equality (`k=v`, `k==v`), inequality (`k!=v`), existence (`k`) and
/// non-existence (`!k`) requirements, comma separated.
fn matches_labels(value: &serde_json::Value, selector: Option<&str>) -> bool {
    let Some(selector) = selector else {
        return true;
    };
    let labels = value.pointer("/metadata/labels");
    let label = |key: &str| labels.and_then(|l| l.get(key)).and_then(|v| v.as_str());

    selector
        .split(',')
        .map(str::trim)
        .filter(|requirement| !requirement.is_empty())
        .all(|requirement| {
            if let Some((key, expected)) = requirement.split_once("!=") {
                label(key.trim()) != Some(expected.trim())
            } else if let Some((key, expected)) = requirement
                .split_once("==")
                .or_else(|| requirement.split_once('='))
            {
                label(key.trim()) == Some(expected.trim())
            } else if let Some(key) = requirement.strip_prefix('!') {
                label(key.trim()).is_none()
            } else {
                label(requirement).is_some()
            }
        })
}

#[async_trait]
impl ApiClient for FakeClient {
    fn attach_scheme(&self, gvk: &GroupVersionKind) -> Result<(), InfraError> {
        if self.refused_schemes.contains(&gvk.kind) {
            return Err(InfraError::Rejected(format!(
                "failed to add {} to scheme",
                gvk_key(gvk)
            )));
        }
        self.schemes.insert(gvk_key(gvk));
        Ok(())
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    async fn get<K: InfraResource>(&self, key: &ObjectKey) -> Result<Option<K>, InfraError> {
        self.begin::<K>(Verb::Get)?;
        match self.objects.get(&store_key::<K>(key)) {
            Some(entry) => Ok(Some(serde_json::from_value(entry.value().clone())?)),
            None => Ok(None),
        }
    }

    async fn list<K: InfraResource>(
        &self,
        namespace: Option<&str>,
        params: &ListParams,
    ) -> Result<Vec<K>, InfraError> {
        self.begin::<K>(Verb::List)?;
        let kind = gvk_key(&group_version_kind::<K>());

        let mut entries: Vec<(StoreKey, serde_json::Value)> = self
            .objects
            .iter()
            .filter(|entry| {
                let (entry_kind, entry_namespace, _) = entry.key();
                *entry_kind == kind
                    && namespace.is_none_or(|namespace| entry_namespace == namespace)
                    && matches_labels(entry.value(), params.label_selector.as_deref())
            })
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        entries
            .into_iter()
            .map(|(_, value)| serde_json::from_value(value).map_err(InfraError::from))
            .collect()
    }

    async fn create<K: InfraResource>(&self, object: &K) -> Result<K, InfraError> {
        self.begin::<K>(Verb::Create)?;
        let key = ObjectKey::of(object);
        check_key::<K>(&key)?;

        if object.meta().resource_version.is_some() {
            return Err(InfraError::Rejected(
                "resourceVersion should not be set on objects to be created".to_string(),
            ));
        }

        // the existence check and the insert happen under one shard lock
        match self.objects.entry(store_key::<K>(&key)) {
            Entry::Occupied(_) => Err(InfraError::already_exists(K::kind(&()), key.to_string())),
            Entry::Vacant(slot) => {
                let mut created = object.clone();
                self.assign_server_fields(&mut created);
                slot.insert(serde_json::to_value(&created)?);
                Ok(created)
            }
        }
    }

    async fn update<K: InfraResource>(&self, object: &K) -> Result<K, InfraError> {
        self.begin::<K>(Verb::Update)?;
        let key = ObjectKey::of(object);
        check_key::<K>(&key)?;

        let store_key = store_key::<K>(&key);
        let Some(mut stored) = self.objects.get_mut(&store_key) else {
            return Err(InfraError::not_found(K::kind(&()), key.to_string()));
        };

        let current: K = serde_json::from_value(stored.value().clone())?;
        let current_version = current.meta().resource_version.clone();
        if let Some(requested) = &object.meta().resource_version
            && Some(requested) != current_version.as_ref()
        {
            return Err(InfraError::Conflict {
                kind: K::kind(&()).to_string(),
                name: key.to_string(),
                details: format!(
                    "resourceVersion {} does not match {}",
                    requested,
                    current_version.unwrap_or_default()
                ),
            });
        }

        let mut updated = object.clone();
        let meta = updated.meta_mut();
        meta.uid = current.meta().uid.clone();
        meta.creation_timestamp = current.meta().creation_timestamp.clone();
        meta.resource_version = Some(self.next_resource_version());
        if !is_namespaced::<K>() {
            meta.namespace = None;
        }

        *stored = serde_json::to_value(&updated)?;
        Ok(updated)
    }

    async fn delete<K: InfraResource>(&self, key: &ObjectKey) -> Result<(), InfraError> {
        self.begin::<K>(Verb::Delete)?;
        match self.objects.remove(&store_key::<K>(key)) {
            Some(_) => Ok(()),
            None => Err(InfraError::not_found(K::kind(&()), key.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::core::v1::{ConfigMap, Namespace};
    use kube::api::ObjectMeta;

    use super::*;

    fn configmap(name: &str, namespace: &str, labels: &[(&str, &str)]) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                labels: Some(
                    labels
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                ),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_unregistered_kind_is_rejected() {
        let client = FakeClient::new();
        let err = client
            .get::<ConfigMap>(&ObjectKey::new("a", Some("ns")))
            .await
            .unwrap_err();
        assert!(matches!(err, InfraError::SchemeNotRegistered { ref kind } if kind == "ConfigMap"));
        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test]
    async fn test_create_assigns_server_fields() {
        let client = FakeClient::new();
        client
            .attach_scheme(&group_version_kind::<ConfigMap>())
            .unwrap();

        let created = client.create(&configmap("a", "ns", &[])).await.unwrap();
        assert!(created.metadata.uid.is_some());
        assert!(created.metadata.resource_version.is_some());

        let err = client.create(&configmap("a", "ns", &[])).await.unwrap_err();
        assert!(matches!(err, InfraError::AlreadyExists { .. }));

        let err = client.create(&created).await.unwrap_err();
        assert!(matches!(err, InfraError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_update_checks_resource_version() {
        let client = FakeClient::new();
        let seeded = client.seed(configmap("a", "ns", &[]));

        let updated = client.update(&seeded).await.unwrap();
        assert_eq!(updated.metadata.uid, seeded.metadata.uid);
        assert_ne!(
            updated.metadata.resource_version,
            seeded.metadata.resource_version
        );

        let err = client.update(&seeded).await.unwrap_err();
        assert!(matches!(err, InfraError::Conflict { .. }));

        let err = client
            .update(&configmap("missing", "ns", &[]))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_filters_namespace_and_labels() {
        let client = FakeClient::new();
        client.seed(configmap("b", "ns1", &[("app", "web")]));
        client.seed(configmap("a", "ns1", &[("app", "db")]));
        client.seed(configmap("c", "ns2", &[("app", "web")]));

        let all: Vec<ConfigMap> = client.list(None, &ListParams::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let ns1: Vec<ConfigMap> = client
            .list(Some("ns1"), &ListParams::default())
            .await
            .unwrap();
        let names: Vec<_> = ns1
            .iter()
            .map(|cm| cm.metadata.name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b"]);

        let web: Vec<ConfigMap> = client
            .list(None, &ListParams::default().labels("app=web"))
            .await
            .unwrap();
        assert_eq!(web.len(), 2);

        let not_web: Vec<ConfigMap> = client
            .list(None, &ListParams::default().labels("app!=web"))
            .await
            .unwrap();
        assert_eq!(not_web.len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failures_and_refused_schemes() {
        let client = FakeClient::new();
        client.seed(Namespace {
            metadata: ObjectMeta {
                name: Some("ns".to_string()),
                ..Default::default()
            },
            ..Default::default()
        });

        client.fail_on(Verb::Delete, "Namespace", "denied");
        let err = client
            .delete::<Namespace>(&ObjectKey::new("ns", None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "request rejected by the API server: denied");

        client.clear_failures();
        client
            .delete::<Namespace>(&ObjectKey::new("ns", None))
            .await
            .unwrap();
        assert_eq!(client.object_count(), 0);

        client.refuse_scheme("ConfigMap");
        assert!(
            client
                .attach_scheme(&group_version_kind::<ConfigMap>())
                .is_err()
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_of_one_key() {
        let client = std::sync::Arc::new(FakeClient::new());
        client
            .attach_scheme(&group_version_kind::<ConfigMap>())
            .unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let client = std::sync::Arc::clone(&client);
                tokio::spawn(async move {
                    let mut object = configmap("race", "ns", &[]);
                    object.data = Some([("writer".to_string(), i.to_string())].into());
                    client.create(&object).await
                })
            })
            .collect();

        let mut winners = Vec::new();
        for task in tasks {
            match task.await.unwrap() {
                Ok(created) => winners.push(created),
                Err(err) => assert!(matches!(err, InfraError::AlreadyExists { .. })),
            }
        }

        assert_eq!(winners.len(), 1);
        let stored: ConfigMap = client.peek("race", Some("ns")).unwrap();
        assert_eq!(stored.data, winners[0].data);
        assert_eq!(client.object_count(), 1);
    }
}

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

//! Namespace builder.

use std::collections::BTreeMap;
use std::sync::Arc;

use k8s_openapi::api::core::v1::Namespace;
use kube::api::{ListParams, ObjectMeta};

use crate::builder::{Builder, required};
use crate::clients::{ApiClient, ObjectKey};
use crate::error::InfraError;
use crate::list::list_builders;
use crate::resource::{InfraResource, Writable};

impl InfraResource for Namespace {
    const RESOURCE_TYPE: &'static str = "namespace";
}

impl Writable for Namespace {}

pub type NamespaceBuilder<C> = Builder<Namespace, C>;

impl<C: ApiClient> Builder<Namespace, C> {
    pub fn new(api_client: &Arc<C>, name: &str) -> Self {
        tracing::debug!(name, "Initializing new namespace structure");

        let definition = Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let mut builder = Self::from_definition(api_client, definition);
        builder.require("name", name);
        builder
    }

    pub async fn pull(api_client: &Arc<C>, name: &str) -> Result<Self, InfraError> {
        required::<Namespace>("name", name)?;

        Self::pull_existing(api_client, ObjectKey::new(name, None)).await
    }

    /// Adds a single label, keeping existing ones.
    pub fn with_label(&mut self, key: &str, value: &str) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(key, value, "Adding label to namespace");

        if key.is_empty() {
            return self.record_error("'key' cannot be empty");
        }

        self.edit(|namespace| {
            namespace
                .metadata
                .labels
                .get_or_insert_with(BTreeMap::new)
                .insert(key.to_string(), value.to_string());
        })
    }

    /// Adds several labels, keeping existing ones.
    pub fn with_labels(&mut self, labels: BTreeMap<String, String>) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(?labels, "Adding labels to namespace");

        if labels.is_empty() {
            return self.record_error("labels can not be empty");
        }

        if labels.contains_key("") {
            return self.record_error("'key' cannot be empty");
        }

        self.edit(|namespace| {
            namespace
                .metadata
                .labels
                .get_or_insert_with(BTreeMap::new)
                .extend(labels);
        })
    }
}

/// Lists namespaces.
pub async fn list<C: ApiClient>(
    api_client: &Arc<C>,
    options: &[ListParams],
) -> Result<Vec<NamespaceBuilder<C>>, InfraError> {
    list_builders(api_client, None, options).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::clients::Verb;
    use crate::test::helpers::{fake_client, namespace};

    #[tokio::test]
    async fn test_labels_accumulate() {
        let client = fake_client();

        let mut builder = NamespaceBuilder::new(&client, "ns");
        builder
            .with_label("a", "1")
            .with_labels(BTreeMap::from([("b".to_string(), "2".to_string())]));
        builder.create().await.unwrap();

        let stored: Namespace = client.peek("ns", None).unwrap();
        let labels = stored.metadata.labels.unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("a").map(String::as_str), Some("1"));
    }

    #[tokio::test]
    async fn test_label_errors() {
        let client = fake_client();

        let mut builder = NamespaceBuilder::new(&client, "ns");
        builder.with_label("", "1");
        assert_eq!(builder.error_message(), Some("'key' cannot be empty"));

        let mut builder = NamespaceBuilder::new(&client, "ns");
        builder.with_labels(BTreeMap::new());
        assert_eq!(builder.error_message(), Some("labels can not be empty"));
    }

    #[tokio::test]
    async fn test_pull_cluster_scoped() {
        let client = fake_client();

        let err = NamespaceBuilder::pull(&client, "missing").await.unwrap_err();
        assert_eq!(err.to_string(), "could not find namespace missing");

        client.seed(namespace("present", &[]));
        let builder = NamespaceBuilder::pull(&client, "present").await.unwrap();
        assert!(builder.object.is_some());
    }

    #[tokio::test]
    async fn test_delete_and_wait() {
        let client = fake_client();
        client.seed(namespace("doomed", &[]));

        let mut builder = NamespaceBuilder::pull(&client, "doomed").await.unwrap();
        builder
            .delete_and_wait(Duration::from_secs(1))
            .await
            .unwrap();

        assert!(builder.object.is_none());
        assert!(!builder.exists().await);
    }

    #[tokio::test]
    async fn test_delete_and_wait_reports_delete_failure() {
        let client = fake_client();
        client.seed(namespace("stuck", &[]));
        client.fail_on(Verb::Delete, "Namespace", "finalizers pending");

        let mut builder = NamespaceBuilder::new(&client, "stuck");
        let err = builder
            .delete_and_wait(Duration::from_millis(50))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot delete namespace: request rejected by the API server: finalizers pending"
        );
    }

    #[tokio::test]
    async fn test_list_with_label_selector() {
        let client = fake_client();
        client.seed(namespace("a", &[("team", "qe")]));
        client.seed(namespace("b", &[("team", "dev")]));

        let builders = list(&client, &[ListParams::default().labels("team=qe")])
            .await
            .unwrap();
        assert_eq!(builders.len(), 1);
        assert_eq!(
            builders[0].object.as_ref().unwrap().metadata.name.as_deref(),
            Some("a")
        );
    }
}

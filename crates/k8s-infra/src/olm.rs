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

//! OLM Subscription builder.

use std::sync::Arc;

use crate::builder::{Builder, required};
use crate::clients::{ApiClient, ObjectKey};
use crate::error::InfraError;
use crate::resource::{InfraResource, Writable};
pub use crate::schemes::olm::{Approval, Subscription, SubscriptionSpec};

impl InfraResource for Subscription {
    const RESOURCE_TYPE: &'static str = "subscription";
}

impl Writable for Subscription {}

pub type SubscriptionBuilder<C> = Builder<Subscription, C>;

impl<C: ApiClient> Builder<Subscription, C> {
    /// Defines a subscription to `package_name` from the given catalog source.
    pub fn new(
        api_client: &Arc<C>,
        sub_name: &str,
        sub_namespace: &str,
        catalog_source: &str,
        catalog_source_namespace: &str,
        package_name: &str,
    ) -> Self {
        tracing::debug!(
            sub_name,
            sub_namespace,
            catalog_source,
            catalog_source_namespace,
            package_name,
            "Initializing new Subscription structure"
        );

        let mut definition = Subscription::new(
            sub_name,
            SubscriptionSpec {
                catalog_source: catalog_source.to_string(),
                catalog_source_namespace: catalog_source_namespace.to_string(),
                package: package_name.to_string(),
                ..Default::default()
            },
        );
        definition.metadata.namespace = Some(sub_namespace.to_string());

        let mut builder = Self::from_definition(api_client, definition);
        builder
            .require("subName", sub_name)
            .require("subNamespace", sub_namespace)
            .require("catalogSource", catalog_source)
            .require("catalogSourceNamespace", catalog_source_namespace)
            .require("packageName", package_name);
        builder
    }

    pub async fn pull(api_client: &Arc<C>, sub_name: &str, sub_namespace: &str) -> Result<Self, InfraError> {
        required::<Subscription>("subName", sub_name)?;
        required::<Subscription>("subNamespace", sub_namespace)?;

        Self::pull_existing(api_client, ObjectKey::new(sub_name, Some(sub_namespace))).await
    }

    pub fn with_channel(&mut self, channel: &str) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(channel, "Defining Subscription builder object with channel");

        if channel.is_empty() {
            return self.record_error("can not redefine subscription with empty channel");
        }

        self.edit(|sub| sub.spec.channel = Some(channel.to_string()))
    }

    pub fn with_starting_csv(&mut self, starting_csv: &str) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(starting_csv, "Defining Subscription builder object with startingCSV");

        if starting_csv.is_empty() {
            return self.record_error("can not redefine subscription with empty startingCSV");
        }

        self.edit(|sub| sub.spec.starting_csv = Some(starting_csv.to_string()))
    }

    /// Sets the install plan approval; only `Automatic` and `Manual` are
    /// accepted.
    pub fn with_install_plan_approval(&mut self, approval: &str) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(approval, "Defining Subscription builder object with installPlanApproval");

        let approval = match approval {
            "Automatic" => Approval::Automatic,
            "Manual" => Approval::Manual,
            _ => {
                return self.record_error(
                    "Subscription 'installPlanApproval' must be either \"Automatic\" or \"Manual\"",
                );
            }
        };

        self.edit(|sub| sub.spec.install_plan_approval = Some(approval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Presence;
    use crate::clients::Verb;
    use crate::test::helpers::fake_client;

    #[tokio::test]
    async fn test_new_checks_fields_in_order() {
        let client = fake_client();

        let cases = [
            (["", "ns", "cs", "csns", "pkg"], "subscription 'subName' cannot be empty"),
            (["sub", "", "cs", "csns", "pkg"], "subscription 'subNamespace' cannot be empty"),
            (["sub", "ns", "", "csns", "pkg"], "subscription 'catalogSource' cannot be empty"),
            (
                ["sub", "ns", "cs", "", "pkg"],
                "subscription 'catalogSourceNamespace' cannot be empty",
            ),
            (["sub", "ns", "cs", "csns", ""], "subscription 'packageName' cannot be empty"),
        ];

        for ([name, ns, cs, csns, pkg], expected) in cases {
            let builder = SubscriptionBuilder::new(&client, name, ns, cs, csns, pkg);
            assert_eq!(builder.error_message(), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_create_with_settings() {
        let client = fake_client();

        let mut builder =
            SubscriptionBuilder::new(&client, "sriov", "openshift-sriov", "redhat-operators", "openshift-marketplace", "sriov-network-operator");
        builder
            .with_channel("stable")
            .with_starting_csv("sriov-network-operator.v4.18.0")
            .with_install_plan_approval("Manual");
        builder.create().await.unwrap();

        let stored: Subscription = client.peek("sriov", Some("openshift-sriov")).unwrap();
        assert_eq!(stored.spec.channel.as_deref(), Some("stable"));
        assert_eq!(stored.spec.install_plan_approval, Some(Approval::Manual));
        assert_eq!(stored.spec.package, "sriov-network-operator");

        let pulled = SubscriptionBuilder::pull(&client, "sriov", "openshift-sriov").await.unwrap();
        assert_eq!(pulled.object, Some(stored));
    }

    #[tokio::test]
    async fn test_invalid_setters() {
        let client = fake_client();

        let mut builder = SubscriptionBuilder::new(&client, "sub", "ns", "cs", "csns", "pkg");
        builder.with_install_plan_approval("Sometimes");
        assert_eq!(
            builder.error_message(),
            Some("Subscription 'installPlanApproval' must be either \"Automatic\" or \"Manual\"")
        );

        let mut builder = SubscriptionBuilder::new(&client, "sub", "ns", "cs", "csns", "pkg");
        builder.with_channel("");
        assert_eq!(
            builder.error_message(),
            Some("can not redefine subscription with empty channel")
        );
    }

    #[tokio::test]
    async fn test_unknown_presence_blocks_create() {
        let client = fake_client();
        client.fail_on(Verb::Get, "Subscription", "connection refused");

        let mut builder = SubscriptionBuilder::new(&client, "sub", "ns", "cs", "csns", "pkg");
        assert!(matches!(builder.presence().await, Presence::Unknown(_)));
        assert!(!builder.exists().await);

        let err = builder.create().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot create subscription: request rejected by the API server: connection refused"
        );
        assert_eq!(client.object_count(), 0);
    }

    #[tokio::test]
    async fn test_update_keeps_config_and_unmodelled_fields() {
        let client = fake_client();

        let server: Subscription = serde_json::from_value(serde_json::json!({
            "apiVersion": "operators.coreos.com/v1alpha1",
            "kind": "Subscription",
            "metadata": {"name": "sriov", "namespace": "openshift-sriov"},
            "spec": {
                "name": "pkg",
                "source": "cs",
                "sourceNamespace": "csns",
                "config": {
                    "nodeSelector": {"node-role.kubernetes.io/worker": ""},
                    "env": [{"name": "LOG_LEVEL", "value": "debug"}],
                    "volumes": [{"name": "scratch", "emptyDir": {}}]
                },
                "futureField": {"enabled": true}
            }
        }))
        .unwrap();
        client.seed(server);

        let mut builder = SubscriptionBuilder::pull(&client, "sriov", "openshift-sriov").await.unwrap();
        builder.with_channel("stable");
        builder.update(false).await.unwrap();

        let stored: Subscription = client.peek("sriov", Some("openshift-sriov")).unwrap();
        let config = stored.spec.config.as_ref().unwrap();
        assert_eq!(
            config.node_selector.as_ref().unwrap().get("node-role.kubernetes.io/worker").map(String::as_str),
            Some("")
        );
        assert_eq!(config.env.as_ref().unwrap()[0].name, "LOG_LEVEL");

        let body = serde_json::to_value(&stored.spec).unwrap();
        assert_eq!(body["channel"], "stable");
        assert_eq!(body["config"]["volumes"][0]["name"], "scratch");
        assert_eq!(body["futureField"]["enabled"], true);
    }
}

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

//! ClusterOperator access.
//!
//! ClusterOperators are owned by the cluster version operator, so builders
//! only read them: pull, get, existence checks, status conditions, and the
//! cluster-wide wait helpers.

use std::sync::Arc;
use std::time::Duration;

use kube::api::ListParams;

use crate::builder::{Builder, required};
use crate::clients::{ApiClient, ObjectKey};
use crate::error::InfraError;
use crate::list::{list_builders, single_options};
use crate::resource::InfraResource;
pub use crate::schemes::clusteroperator::ClusterOperator;
use crate::wait::poll_until;

impl InfraResource for ClusterOperator {
    const RESOURCE_TYPE: &'static str = "clusterOperator";
}

pub type ClusterOperatorBuilder<C> = Builder<ClusterOperator, C>;

impl<C: ApiClient> Builder<ClusterOperator, C> {
    pub async fn pull(api_client: &Arc<C>, name: &str) -> Result<Self, InfraError> {
        required::<ClusterOperator>("name", name)?;

        Self::pull_existing(api_client, ObjectKey::new(name, None)).await
    }

    /// Whether the `Available` condition is `True`.
    pub async fn is_available(&mut self) -> bool {
        self.condition_is_true("Available").await
    }

    /// Whether the `Progressing` condition is `True`.
    pub async fn is_progressing(&mut self) -> bool {
        self.condition_is_true("Progressing").await
    }

    /// Whether the `Degraded` condition is `True`.
    pub async fn is_degraded(&mut self) -> bool {
        self.condition_is_true("Degraded").await
    }

    /// Whether the operator reports `desired_version` as its own version.
    pub fn has_desired_version(&self, desired_version: &str) -> Result<bool, InfraError> {
        self.validate()?;

        let Some(operator) = self.object.as_ref().or(self.definition.as_ref()) else {
            return Ok(false);
        };

        Ok(operator.status.as_ref().is_some_and(|status| {
            status
                .versions
                .iter()
                .any(|version| version.name == "operator" && version.version == desired_version)
        }))
    }

    /// Refreshes the object and checks one of its conditions.
    async fn condition_is_true(&mut self, condition: &str) -> bool {
        if !self.exists().await {
            return false;
        }

        tracing::debug!(name = self.name(), condition, "Verifying clusterOperator condition");

        self.object
            .as_ref()
            .and_then(|operator| operator.status.as_ref())
            .is_some_and(|status| {
                status
                    .conditions
                    .iter()
                    .any(|c| c.type_ == condition && c.status == "True")
            })
    }

    fn name(&self) -> &str {
        self.definition
            .as_ref()
            .and_then(|operator| operator.metadata.name.as_deref())
            .unwrap_or_default()
    }
}

/// Lists all clusterOperators.
pub async fn list<C: ApiClient>(
    api_client: &Arc<C>,
    options: &[ListParams],
) -> Result<Vec<ClusterOperatorBuilder<C>>, InfraError> {
    list_builders(api_client, None, options).await
}

/// Waits until every clusterOperator is available. A failing list aborts
/// the wait.
pub async fn wait_for_all_available<C: ApiClient>(
    api_client: &Arc<C>,
    timeout: Duration,
    options: &[ListParams],
) -> Result<(), InfraError> {
    tracing::debug!(?timeout, "Waiting for all clusterOperators to be in available state");
    let params = single_options(options)?;

    poll_until(
        api_client.poll_interval(),
        timeout,
        "all clusterOperators to be available",
        || {
            let params = params.clone();
            async move {
                for mut operator in list(api_client, &[params]).await? {
                    if !operator.is_available().await {
                        tracing::debug!(name = operator.name(), "The clusterOperator is not available");
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        },
    )
    .await
}

/// Waits until no clusterOperator is progressing. Operators are listed again
/// on every check.
pub async fn wait_for_all_stop_progressing<C: ApiClient>(
    api_client: &Arc<C>,
    timeout: Duration,
    options: &[ListParams],
) -> Result<(), InfraError> {
    tracing::debug!(?timeout, "Waiting for all clusterOperators to stop progressing");
    let params = single_options(options)?;

    poll_until(
        api_client.poll_interval(),
        timeout,
        "all clusterOperators to stop progressing",
        || {
            let params = params.clone();
            async move {
                for operator in list(api_client, &[params]).await? {
                    if operator_is_progressing(&operator) {
                        tracing::debug!(name = operator.name(), "The clusterOperator is still progressing");
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        },
    )
    .await
}

/// Checks that every operator in `operators` reports `desired_version`.
pub fn verify_versions<C: ApiClient>(
    desired_version: &str,
    operators: &[ClusterOperatorBuilder<C>],
) -> Result<(), InfraError> {
    if desired_version.is_empty() {
        return Err(InfraError::InvalidArgument(
            "desiredVersion can't be empty".to_string(),
        ));
    }

    if operators.is_empty() {
        return Err(InfraError::InvalidArgument(
            "clusterOperatorList can't be empty".to_string(),
        ));
    }

    tracing::debug!(desired_version, "Checking if all the operators have the desired version");

    for operator in operators {
        if !operator.has_desired_version(desired_version)? {
            return Err(InfraError::InvalidArgument(format!(
                "the clusterOperator {} doesn't have the desired version {}",
                operator.name(),
                desired_version
            )));
        }
    }

    Ok(())
}

fn operator_is_progressing<C>(operator: &ClusterOperatorBuilder<C>) -> bool {
    operator
        .object
        .as_ref()
        .and_then(|operator| operator.status.as_ref())
        .is_some_and(|status| {
            status
                .conditions
                .iter()
                .any(|c| c.type_ == "Progressing" && c.status == "True")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::Verb;
    use crate::test::helpers::{cluster_operator, fake_client};

    #[tokio::test]
    async fn test_pull_and_conditions() {
        let client = fake_client();
        client.seed(cluster_operator("etcd", &[("Available", "True"), ("Degraded", "False")], "4.18.0"));

        let mut builder = ClusterOperatorBuilder::pull(&client, "etcd").await.unwrap();
        assert!(builder.is_available().await);
        assert!(!builder.is_progressing().await);
        assert!(!builder.is_degraded().await);
        assert!(builder.has_desired_version("4.18.0").unwrap());
        assert!(!builder.has_desired_version("4.19.0").unwrap());

        let err = ClusterOperatorBuilder::pull(&client, "").await.unwrap_err();
        assert_eq!(err.to_string(), "clusterOperator 'name' cannot be empty");

        let err = ClusterOperatorBuilder::pull(&client, "cotest").await.unwrap_err();
        assert_eq!(err.to_string(), "could not find clusterOperator cotest");
    }

    #[tokio::test]
    async fn test_conditions_false_when_missing() {
        let client = fake_client();

        let mut builder =
            ClusterOperatorBuilder::from_parts(Some(client.clone()), Some(cluster_operator("gone", &[], "")));
        assert!(!builder.exists().await);
        assert!(!builder.is_available().await);
    }

    #[tokio::test]
    async fn test_wait_for_all_available() {
        let client = fake_client();
        client.seed(cluster_operator("etcd", &[("Available", "True")], "4.18.0"));
        client.seed(cluster_operator("dns", &[("Available", "True")], "4.18.0"));

        wait_for_all_available(&client, Duration::from_secs(1), &[])
            .await
            .unwrap();

        client.seed(cluster_operator("ingress", &[("Available", "False")], "4.18.0"));
        let err = wait_for_all_available(&client, Duration::from_millis(50), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, InfraError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_wait_aborts_on_list_error() {
        let client = fake_client();
        client.seed(cluster_operator("etcd", &[("Available", "True")], "4.18.0"));
        client.fail_on(Verb::List, "ClusterOperator", "forbidden");

        let err = wait_for_all_available(&client, Duration::from_secs(5), &[])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "request rejected by the API server: forbidden");

        let err = wait_for_all_stop_progressing(
            &client,
            Duration::from_secs(5),
            &[ListParams::default(), ListParams::default()],
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "error: more than one ListOptions was passed");
    }

    #[tokio::test]
    async fn test_wait_for_all_stop_progressing() {
        let client = fake_client();
        client.seed(cluster_operator("etcd", &[("Progressing", "False")], "4.18.0"));

        wait_for_all_stop_progressing(&client, Duration::from_secs(1), &[])
            .await
            .unwrap();

        client.seed(cluster_operator("dns", &[("Progressing", "True")], "4.18.0"));
        let err = wait_for_all_stop_progressing(&client, Duration::from_millis(50), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, InfraError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_verify_versions() {
        let client = fake_client();
        client.seed(cluster_operator("etcd", &[], "4.18.0"));
        client.seed(cluster_operator("dns", &[], "4.17.3"));

        let operators = list(&client, &[]).await.unwrap();

        let err = verify_versions("", &operators).unwrap_err();
        assert_eq!(err.to_string(), "desiredVersion can't be empty");

        let err = verify_versions::<crate::clients::FakeClient>("4.18.0", &[]).unwrap_err();
        assert_eq!(err.to_string(), "clusterOperatorList can't be empty");

        let err = verify_versions("4.18.0", &operators).unwrap_err();
        assert_eq!(
            err.to_string(),
            "the clusterOperator dns doesn't have the desired version 4.18.0"
        );

        verify_versions("4.18.0", &operators[1..]).unwrap();
    }
}

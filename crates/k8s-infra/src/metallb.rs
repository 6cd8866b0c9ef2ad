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

//! FRR-K8s BGPSessionState access.
//!
//! Session states are written by the FRR-K8s daemon on every node; builders
//! only read them.

use std::sync::Arc;

use kube::api::ListParams;

use crate::builder::{Builder, required};
use crate::clients::{ApiClient, ObjectKey};
use crate::error::InfraError;
use crate::list::list_builders;
use crate::resource::InfraResource;
pub use crate::schemes::metallb::{BGPSessionState, BGPSessionStateStatus};

impl InfraResource for BGPSessionState {
    const RESOURCE_TYPE: &'static str = "BGPSessionState";
}

pub type BGPSessionStateBuilder<C> = Builder<BGPSessionState, C>;

impl<C: ApiClient> Builder<BGPSessionState, C> {
    pub async fn pull(api_client: &Arc<C>, name: &str, nsname: &str) -> Result<Self, InfraError> {
        required::<BGPSessionState>("name", name)?;
        required::<BGPSessionState>("nsname", nsname)?;

        Self::pull_existing(api_client, ObjectKey::new(name, Some(nsname))).await
    }

    /// Finds the session between `node_name` and `peer_ip`. Session names
    /// carry a generated suffix, so every namespace is searched by status.
    pub async fn pull_by_node_and_peer(
        api_client: &Arc<C>,
        node_name: &str,
        peer_ip: &str,
    ) -> Result<Self, InfraError> {
        tracing::debug!(node_name, peer_ip, "Pulling BGPSessionState by node and peer");

        if node_name.is_empty() {
            return Err(InfraError::InvalidArgument("node name cannot be empty".to_string()));
        }

        if peer_ip.is_empty() {
            return Err(InfraError::InvalidArgument("peer IP cannot be empty".to_string()));
        }

        let sessions = list(api_client, None, &[])
            .await
            .map_err(|err| InfraError::context("list", BGPSessionState::RESOURCE_TYPE, err))?;

        let session = sessions.into_iter().find(|session| {
            session
                .object
                .as_ref()
                .and_then(|state| state.status.as_ref())
                .is_some_and(|status| status.node == node_name && status.peer == peer_ip)
        });

        match session {
            Some(session) => {
                session.validate()?;
                Ok(session)
            }
            None => Err(InfraError::NoMatch {
                resource: BGPSessionState::RESOURCE_TYPE,
                criteria: format!("node {node_name} and peer {peer_ip}"),
            }),
        }
    }

    /// Last observed status, if the session has been fetched.
    pub fn status(&self) -> Option<&BGPSessionStateStatus> {
        self.object.as_ref().and_then(|state| state.status.as_ref())
    }
}

/// Lists BGPSessionStates in `namespace`, or in all namespaces when `None`.
pub async fn list<C: ApiClient>(
    api_client: &Arc<C>,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<BGPSessionStateBuilder<C>>, InfraError> {
    list_builders(api_client, namespace, options).await
}

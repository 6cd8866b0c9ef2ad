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

//! ConfigMap builder.

use std::collections::BTreeMap;
use std::sync::Arc;

use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::{ListParams, ObjectMeta};

use crate::builder::{Builder, required};
use crate::clients::{ApiClient, ObjectKey};
use crate::error::InfraError;
use crate::list::{list_builders, list_in_namespace};
use crate::resource::{InfraResource, Writable};

impl InfraResource for ConfigMap {
    const RESOURCE_TYPE: &'static str = "configmap";
}

impl Writable for ConfigMap {}

pub type ConfigMapBuilder<C> = Builder<ConfigMap, C>;

impl<C: ApiClient> Builder<ConfigMap, C> {
    /// Defines a new configmap. Nothing is sent to the cluster until
    /// [`Builder::create`].
    pub fn new(api_client: &Arc<C>, name: &str, nsname: &str) -> Self {
        tracing::debug!(name, nsname, "Initializing new configmap structure");

        let definition = ConfigMap {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(nsname.to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let mut builder = Self::from_definition(api_client, definition);
        builder.require("name", name).require("nsname", nsname);
        builder
    }

    /// Fetches an existing configmap.
    pub async fn pull(api_client: &Arc<C>, name: &str, nsname: &str) -> Result<Self, InfraError> {
        required::<ConfigMap>("name", name)?;
        required::<ConfigMap>("nsname", nsname)?;

        Self::pull_existing(api_client, ObjectKey::new(name, Some(nsname))).await
    }

    /// Replaces the data of the configmap. Empty data is rejected.
    pub fn with_data(&mut self, data: BTreeMap<String, String>) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(keys = data.len(), "Setting configmap data");

        if data.is_empty() {
            return self.record_error("'data' cannot be empty");
        }

        self.edit(|configmap| configmap.data = Some(data))
    }
}

/// Lists configmaps in `nsname`.
pub async fn list<C: ApiClient>(
    api_client: &Arc<C>,
    nsname: &str,
    options: &[ListParams],
) -> Result<Vec<ConfigMapBuilder<C>>, InfraError> {
    list_in_namespace(api_client, nsname, options).await
}

/// Lists configmaps in every namespace.
pub async fn list_in_all_namespaces<C: ApiClient>(
    api_client: &Arc<C>,
    options: &[ListParams],
) -> Result<Vec<ConfigMapBuilder<C>>, InfraError> {
    list_builders(api_client, None, options).await
}

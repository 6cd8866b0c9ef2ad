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

//! Cluster API client abstraction.
//!
//! Builders never construct a client themselves; callers hand them an
//! implementation of [`ApiClient`], either the kube-backed [`KubeClient`] or
//! the in-memory [`FakeClient`] used in tests.

mod fake;
mod kube;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use ::kube::api::ListParams;
use ::kube::core::GroupVersionKind;

pub use self::fake::FakeClient;
pub use self::kube::KubeClient;
use crate::config::DEFAULT_POLL_INTERVAL;
use crate::error::InfraError;
use crate::resource::{InfraResource, is_namespaced};

/// Identifies a single object. `namespace` is `None` for cluster-scoped kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub name: String,
    pub namespace: Option<String>,
}

impl ObjectKey {
    pub fn new(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.map(str::to_string),
        }
    }

    /// Key of `object`, ignoring the namespace of cluster-scoped kinds.
    pub fn of<K: InfraResource>(object: &K) -> Self {
        let meta = object.meta();
        Self {
            name: meta.name.clone().unwrap_or_default(),
            namespace: if is_namespaced::<K>() {
                meta.namespace.clone()
            } else {
                None
            },
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{}/{}", namespace, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Request verbs, used for failure injection and request accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Verb::Get => "get",
            Verb::List => "list",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Generic access to the cluster API.
///
/// Implementors provide typed CRUD for any [`InfraResource`], enabling the
/// builders to work with any backend (real cluster, in-memory fake, etc.).
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Makes `gvk` known to the client before it is used. Clients that
    /// resolve kinds from the type itself accept everything.
    fn attach_scheme(&self, _gvk: &GroupVersionKind) -> Result<(), InfraError> {
        Ok(())
    }

    /// Interval between checks in the polling helpers.
    fn poll_interval(&self) -> Duration {
        DEFAULT_POLL_INTERVAL
    }

    /// Fetches an object. A definite "not found" is `Ok(None)`.
    async fn get<K: InfraResource>(&self, key: &ObjectKey) -> Result<Option<K>, InfraError>;

    /// Lists objects in `namespace`, or everywhere when `None`.
    async fn list<K: InfraResource>(
        &self,
        namespace: Option<&str>,
        params: &ListParams,
    ) -> Result<Vec<K>, InfraError>;

    async fn create<K: InfraResource>(&self, object: &K) -> Result<K, InfraError>;

    async fn update<K: InfraResource>(&self, object: &K) -> Result<K, InfraError>;

    async fn delete<K: InfraResource>(&self, key: &ObjectKey) -> Result<(), InfraError>;
}

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

//! Traits describing the resource kinds builders can manage.

use std::fmt::Debug;

use kube::core::{
    ClusterResourceScope, GroupVersionKind, GroupVersionResource, NamespaceResourceScope,
};
use kube::{Api, Client, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A resource kind with a statically known type that builders can manage.
pub trait InfraResource:
    Resource<DynamicType = (), Scope: ApiScope>
    + Clone
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Name used in log lines and error messages, e.g. `configmap`.
    const RESOURCE_TYPE: &'static str;
}

/// Marker for kinds the library creates, updates and deletes.
///
/// Kinds owned by an operator (ClusterOperator, BGPSessionState) only get
/// Pull/Get/Exists/List.
pub trait Writable: InfraResource {}

/// Dispatches on the scope of a resource kind.
pub trait ApiScope {
    const NAMESPACED: bool;

    /// Builds an [`Api`] for `K`. A namespaced kind without a namespace gets
    /// an all-namespaces handle.
    fn api<K>(client: Client, namespace: Option<&str>) -> Api<K>
    where
        K: Resource<Scope = Self, DynamicType = ()>;
}

impl ApiScope for NamespaceResourceScope {
    const NAMESPACED: bool = true;

    fn api<K>(client: Client, namespace: Option<&str>) -> Api<K>
    where
        K: Resource<Scope = Self, DynamicType = ()>,
    {
        match namespace {
            Some(namespace) => Api::namespaced(client, namespace),
            None => Api::all(client),
        }
    }
}

impl ApiScope for ClusterResourceScope {
    const NAMESPACED: bool = false;

    fn api<K>(client: Client, _namespace: Option<&str>) -> Api<K>
    where
        K: Resource<Scope = Self, DynamicType = ()>,
    {
        Api::all(client)
    }
}

/// Whether `K` lives in a namespace.
pub fn is_namespaced<K: InfraResource>() -> bool {
    <K::Scope as ApiScope>::NAMESPACED
}

pub fn group_version_kind<K: InfraResource>() -> GroupVersionKind {
    GroupVersionKind::gvk(&K::group(&()), &K::version(&()), &K::kind(&()))
}

/// GroupVersionResource of `K`, as used by cluster cleanup tooling.
pub fn group_version_resource<K: InfraResource>() -> GroupVersionResource {
    GroupVersionResource::gvr(&K::group(&()), &K::version(&()), &K::plural(&()))
}

/// Stable string form of a GVK, used as a registry key.
pub fn gvk_key(gvk: &GroupVersionKind) -> String {
    if gvk.group.is_empty() {
        format!("{}/{}", gvk.version, gvk.kind)
    } else {
        format!("{}/{}/{}", gvk.group, gvk.version, gvk.kind)
    }
}

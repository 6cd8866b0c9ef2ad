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

//! Listing resources into builders.

use std::sync::Arc;

use kube::api::ListParams;

use crate::builder::Builder;
use crate::clients::ApiClient;
use crate::error::InfraError;
use crate::resource::{InfraResource, group_version_kind};

/// Picks the list options out of an optional single-element slice.
pub fn single_options(options: &[ListParams]) -> Result<ListParams, InfraError> {
    match options {
        [] => Ok(ListParams::default()),
        [options] => Ok(options.clone()),
        _ => {
            tracing::debug!("'options' parameter must be empty or single-valued");
            Err(InfraError::TooManyListOptions)
        }
    }
}

/// Lists `K` in `namespace` (everywhere when `None`) and wraps every item in
/// its own builder. An empty namespace is rejected before any request.
pub async fn list_builders<K, C>(
    api_client: &Arc<C>,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<Builder<K, C>>, InfraError>
where
    K: InfraResource,
    C: ApiClient,
{
    if namespace.is_some_and(str::is_empty) {
        tracing::debug!(resource = K::RESOURCE_TYPE, "'nsname' parameter can not be empty");
        return Err(InfraError::InvalidArgument(format!(
            "failed to list {}, 'nsname' parameter is empty",
            K::plural(&())
        )));
    }

    let params = single_options(options)?;

    api_client.attach_scheme(&group_version_kind::<K>())?;

    tracing::debug!(
        resource = K::RESOURCE_TYPE,
        namespace = namespace.unwrap_or("all namespaces"),
        label_selector = params.label_selector.as_deref(),
        field_selector = params.field_selector.as_deref(),
        "Listing resources"
    );

    let items = api_client
        .list::<K>(namespace, &params)
        .await
        .inspect_err(|err| {
            tracing::debug!(resource = K::RESOURCE_TYPE, error = %err, "Failed to list resources");
        })?;

    Ok(items
        .into_iter()
        .map(|item| Builder::from_listed(api_client, item))
        .collect())
}

/// Like [`list_builders`] for a namespaced kind in one namespace, which must
/// not be empty.
pub async fn list_in_namespace<K, C>(
    api_client: &Arc<C>,
    namespace: &str,
    options: &[ListParams],
) -> Result<Vec<Builder<K, C>>, InfraError>
where
    K: InfraResource,
    C: ApiClient,
{
    list_builders(api_client, Some(namespace), options).await
}

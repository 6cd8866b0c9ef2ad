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

//! Kubernetes implementation of [`ApiClient`].

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use kube::api::{DeleteParams, ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};

use super::{ApiClient, ObjectKey};
use crate::config::ClientSettings;
use crate::error::InfraError;
use crate::resource::{ApiScope, InfraResource};

/// Kubernetes-backed implementation of [`ApiClient`].
#[derive(Clone)]
pub struct KubeClient {
    client: Client,
    field_manager: String,
    poll_interval: Duration,
}

impl KubeClient {
    /// Create a new KubeClient with the default in-cluster or kubeconfig client.
    pub async fn new() -> Result<Self, InfraError> {
        Self::from_settings(&ClientSettings::default()).await
    }

    /// Create a new KubeClient from explicit settings.
    pub async fn from_settings(settings: &ClientSettings) -> Result<Self, InfraError> {
        settings.validate()?;

        let options = KubeConfigOptions {
            context: settings.context.clone(),
            ..Default::default()
        };

        let mut config = match (&settings.kubeconfig, &settings.context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    InfraError::ConfigError(format!("failed to read kubeconfig: {}", e))
                })?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| {
                        InfraError::ConfigError(format!("failed to load kubeconfig: {}", e))
                    })?
            }
            (None, Some(_)) => Config::from_kubeconfig(&options).await.map_err(|e| {
                InfraError::ConfigError(format!("failed to load kubeconfig: {}", e))
            })?,
            (None, None) => Config::infer().await.map_err(|e| {
                InfraError::ConfigError(format!("failed to infer cluster config: {}", e))
            })?,
        };
        config.read_timeout = Some(settings.request_timeout);

        let client = Client::try_from(config)?;
        tracing::debug!(field_manager = %settings.field_manager, "Created Kubernetes API client");

        Ok(Self {
            client,
            field_manager: settings.field_manager.clone(),
            poll_interval: settings.poll_interval,
        })
    }

    /// Create a new KubeClient with a provided client and default settings.
    pub fn with_client(client: Client) -> Self {
        let settings = ClientSettings::default();
        Self {
            client,
            field_manager: settings.field_manager,
            poll_interval: settings.poll_interval,
        }
    }

    /// Get a reference to the underlying Kubernetes client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn api<K: InfraResource>(&self, namespace: Option<&str>) -> Api<K> {
        <K::Scope as ApiScope>::api(self.client.clone(), namespace)
    }

    fn post_params(&self) -> PostParams {
        PostParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ApiClient for KubeClient {
    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    async fn get<K: InfraResource>(&self, key: &ObjectKey) -> Result<Option<K>, InfraError> {
        let api: Api<K> = self.api(key.namespace.as_deref());
        Ok(api.get_opt(&key.name).await?)
    }

    async fn list<K: InfraResource>(
        &self,
        namespace: Option<&str>,
        params: &ListParams,
    ) -> Result<Vec<K>, InfraError> {
        let api: Api<K> = self.api(namespace);

        collect_pages(params, |page_params| {
            let api = api.clone();
            async move {
                let page = api.list(&page_params).await?;
                Ok::<_, InfraError>((page.items, page.metadata.continue_))
            }
        })
        .await
    }

    async fn create<K: InfraResource>(&self, object: &K) -> Result<K, InfraError> {
        let key = ObjectKey::of(object);
        let api: Api<K> = self.api(key.namespace.as_deref());
        Ok(api.create(&self.post_params(), object).await?)
    }

    async fn update<K: InfraResource>(&self, object: &K) -> Result<K, InfraError> {
        let key = ObjectKey::of(object);
        let api: Api<K> = self.api(key.namespace.as_deref());
        Ok(api.replace(&key.name, &self.post_params(), object).await?)
    }

    async fn delete<K: InfraResource>(&self, key: &ObjectKey) -> Result<(), InfraError> {
        let api: Api<K> = self.api(key.namespace.as_deref());
        api.delete(&key.name, &DeleteParams::default()).await?;
        Ok(())
    }
}

/// Runs `fetch` page by page. Only a request with a limit is paginated by the
/// API server, so the continue token is followed only when `params` has one.
async fn collect_pages<T, F, Fut>(params: &ListParams, mut fetch: F) -> Result<Vec<T>, InfraError>
where
    F: FnMut(ListParams) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>), InfraError>>,
{
    let mut params = params.clone();
    let mut items = Vec::new();

    loop {
        let (page, continue_token) = fetch(params.clone()).await?;
        items.extend(page);

        match continue_token {
            Some(token) if params.limit.is_some() && !token.is_empty() => {
                tracing::trace!(items = items.len(), "Fetching next list page");
                params.continue_token = Some(token);
            }
            _ => break,
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Serves `pages` in order and records the continue token of every call.
    fn pager<'a>(
        pages: Vec<(Vec<u32>, Option<&'static str>)>,
        seen: &'a Mutex<Vec<Option<String>>>,
    ) -> impl FnMut(ListParams) -> std::future::Ready<Result<(Vec<u32>, Option<String>), InfraError>> + 'a {
        let mut pages = pages.into_iter();
        move |params: ListParams| {
            seen.lock().unwrap().push(params.continue_token.clone());
            let (items, token) = pages.next().unwrap_or_default();
            std::future::ready(Ok((items, token.map(str::to_string))))
        }
    }

    #[tokio::test]
    async fn test_limited_list_follows_continue_tokens() {
        let seen = Mutex::new(Vec::new());
        let pages = vec![
            (vec![1, 2], Some("page-2")),
            (vec![3, 4], Some("page-3")),
            (vec![5], Some("")),
        ];

        let items = collect_pages(&ListParams::default().limit(2), pager(pages, &seen))
            .await
            .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("page-2".to_string()), Some("page-3".to_string())]
        );
    }

    #[tokio::test]
    async fn test_unlimited_list_is_single_request() {
        let seen = Mutex::new(Vec::new());
        let pages = vec![(vec![1, 2, 3], Some("ignored")), (vec![4], None)];

        let items = collect_pages(&ListParams::default(), pager(pages, &seen))
            .await
            .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_page_error_stops_listing() {
        let mut calls = 0;
        let err = collect_pages::<u32, _, _>(&ListParams::default().limit(1), |_| {
            calls += 1;
            let result = if calls == 1 {
                Ok((vec![1], Some("next".to_string())))
            } else {
                Err(InfraError::Rejected("expired continue token".to_string()))
            };
            std::future::ready(result)
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "request rejected by the API server: expired continue token");
        assert_eq!(calls, 2);
    }
}

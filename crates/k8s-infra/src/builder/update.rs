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

//! Update, with an optional delete-then-recreate fallback.
//!
//! The fallback is not atomic. When the delete succeeds and the recreate
//! fails, the resource is left absent and [`InfraError::RecreateFailed`]
//! says so; nothing is rolled back.

use std::sync::Arc;

use super::Builder;
use crate::clients::{ApiClient, ObjectKey};
use crate::error::InfraError;
use crate::resource::Writable;

/// How a successful [`Builder::update`] reached the desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The server accepted the update.
    Updated,
    /// The update was rejected and the resource was deleted and created
    /// again from the definition.
    Recreated,
}

impl<K: Writable, C: ApiClient> Builder<K, C> {
    /// Sends the definition to the server.
    ///
    /// When the update fails and `force` is set, the resource is deleted
    /// and recreated from the definition instead.
    pub async fn update(&mut self, force: bool) -> Result<UpdateOutcome, InfraError> {
        let (client, key) = self.checked()?;
        tracing::debug!(resource = K::RESOURCE_TYPE, object = %key, force, "Updating resource");

        let observed_version = self
            .object
            .as_ref()
            .and_then(|object| object.meta().resource_version.clone());
        let Some(mut request) = self.definition.clone() else {
            return Err(InfraError::UndefinedDefinition {
                resource: K::RESOURCE_TYPE,
            });
        };
        if observed_version.is_some() {
            request.meta_mut().resource_version = observed_version;
        }

        // the definition only takes the new resourceVersion once the server
        // has accepted the request
        let err = match client.update(&request).await {
            Ok(updated) => {
                if let Some(definition) = self.definition.as_mut() {
                    definition.meta_mut().resource_version = updated.meta().resource_version.clone();
                }
                self.object = Some(updated);
                return Ok(UpdateOutcome::Updated);
            }
            Err(err) => err,
        };

        if !force {
            tracing::debug!(resource = K::RESOURCE_TYPE, object = %key, error = %err, "Failed to update resource");
            return Err(InfraError::context("update", K::RESOURCE_TYPE, err));
        }

        tracing::warn!(
            resource = K::RESOURCE_TYPE,
            object = %key,
            error = %err,
            "Failed to update resource. Note: Force flag set, executed delete/create methods instead"
        );

        self.recreate(client, key).await
    }

    async fn recreate(&mut self, client: Arc<C>, key: ObjectKey) -> Result<UpdateOutcome, InfraError> {
        match client.delete::<K>(&key).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {}
            Err(err) => {
                tracing::warn!(resource = K::RESOURCE_TYPE, object = %key, error = %err, "Failed to delete resource before recreating it");
                return Err(InfraError::ForceDeleteFailed {
                    resource: K::RESOURCE_TYPE,
                    name: key.name,
                    source: Box::new(err),
                });
            }
        }

        self.forget_server_state();

        let Some(definition) = self.definition.as_ref() else {
            return Err(InfraError::UndefinedDefinition {
                resource: K::RESOURCE_TYPE,
            });
        };

        match client.create(definition).await {
            Ok(created) => {
                self.object = Some(created);
                Ok(UpdateOutcome::Recreated)
            }
            Err(err) => {
                tracing::warn!(resource = K::RESOURCE_TYPE, object = %key, error = %err, "Resource was deleted but could not be recreated");
                Err(InfraError::RecreateFailed {
                    resource: K::RESOURCE_TYPE,
                    name: key.name,
                    source: Box::new(err),
                })
            }
        }
    }
}

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

//! Generic resource builder.
//!
//! A [`Builder`] pairs the desired state of one resource (`definition`) with
//! the state last observed on the server (`object`). Resource modules add
//! constructors and With* setters on top of the operations defined here.

mod presence;
mod update;
pub mod validate;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use kube::core::GroupVersionResource;

pub use self::presence::Presence;
pub use self::update::UpdateOutcome;
use self::validate::{Validatable, validate_builder};
use crate::clients::{ApiClient, ObjectKey};
use crate::error::InfraError;
use crate::resource::{InfraResource, Writable, group_version_kind, group_version_resource};
use crate::wait::poll_until;

/// Desired and observed state of a single resource.
pub struct Builder<K, C> {
    /// Desired state, sent to the server on create and update.
    pub definition: Option<K>,
    /// Server state as of the last get, create or update.
    pub object: Option<K>,
    api_client: Option<Arc<C>>,
    error_msg: Option<String>,
}

impl<K: fmt::Debug, C> fmt::Debug for Builder<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("definition", &self.definition)
            .field("object", &self.object)
            .field("has_api_client", &self.api_client.is_some())
            .field("error_msg", &self.error_msg)
            .finish()
    }
}

impl<K, C> Clone for Builder<K, C>
where
    K: Clone,
{
    fn clone(&self) -> Self {
        Self {
            definition: self.definition.clone(),
            object: self.object.clone(),
            api_client: self.api_client.clone(),
            error_msg: self.error_msg.clone(),
        }
    }
}

impl<K: InfraResource, C: ApiClient> Validatable for Builder<K, C> {
    const RESOURCE_TYPE: &'static str = K::RESOURCE_TYPE;
    type Definition = K;
    type Client = Arc<C>;

    fn definition(&self) -> Option<&K> {
        self.definition.as_ref()
    }

    fn api_client(&self) -> Option<&Arc<C>> {
        self.api_client.as_ref()
    }

    fn error_message(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }
}

impl<K: InfraResource, C: ApiClient> Builder<K, C> {
    /// Assembles a builder and registers `K` with the client. A failed
    /// registration becomes the builder's deferred error.
    pub fn from_parts(api_client: Option<Arc<C>>, definition: Option<K>) -> Self {
        let mut builder = Self {
            definition,
            object: None,
            api_client,
            error_msg: None,
        };

        if let Some(client) = &builder.api_client
            && let Err(err) = client.attach_scheme(&group_version_kind::<K>())
        {
            tracing::debug!(resource = K::RESOURCE_TYPE, error = %err, "Failed to add scheme to client schemes");
            builder.error_msg = Some(format!(
                "failed to add {} scheme to client schemes: {}",
                K::RESOURCE_TYPE,
                err
            ));
        }

        builder
    }

    /// Wraps an object fetched from the server; definition and object are
    /// independent copies of it.
    pub fn from_listed(api_client: &Arc<C>, item: K) -> Self {
        Self {
            definition: Some(item.clone()),
            object: Some(item),
            api_client: Some(Arc::clone(api_client)),
            error_msg: None,
        }
    }

    /// Builds the definition of a new resource. Resource constructors use
    /// this and then check their required fields with [`Builder::require`].
    pub(crate) fn from_definition(api_client: &Arc<C>, definition: K) -> Self {
        Self::from_parts(Some(Arc::clone(api_client)), Some(definition))
    }

    /// Fetches an existing resource into a new builder whose definition is
    /// the server state.
    pub(crate) async fn pull_existing(api_client: &Arc<C>, key: ObjectKey) -> Result<Self, InfraError> {
        tracing::debug!(resource = K::RESOURCE_TYPE, object = %key, "Pulling existing resource");

        api_client
            .attach_scheme(&group_version_kind::<K>())
            .map_err(|err| InfraError::context("pull", K::RESOURCE_TYPE, err))?;

        match api_client.get::<K>(&key).await {
            Ok(Some(object)) => Ok(Self::from_listed(api_client, object)),
            Ok(None) => Err(pull_not_found::<K>(key)),
            Err(err) if err.is_not_found() => Err(pull_not_found::<K>(key)),
            Err(err) => Err(InfraError::context("pull", K::RESOURCE_TYPE, err)),
        }
    }

    /// Shared handle to the cluster API, if any.
    pub fn api_client(&self) -> Option<&Arc<C>> {
        self.api_client.as_ref()
    }

    /// The deferred error recorded by a With* setter, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    /// GroupVersionResource of `K`.
    pub fn gvr() -> GroupVersionResource {
        group_version_resource::<K>()
    }

    /// Runs the validation gate.
    pub fn validate(&self) -> Result<(), InfraError> {
        validate_builder(Some(self))
    }

    /// Validates and returns the client and the key of the definition.
    pub(crate) fn checked(&self) -> Result<(Arc<C>, ObjectKey), InfraError> {
        self.validate()?;
        match (&self.api_client, &self.definition) {
            (Some(client), Some(definition)) => Ok((Arc::clone(client), ObjectKey::of(definition))),
            (None, _) => Err(InfraError::NilApiClient {
                resource: K::RESOURCE_TYPE,
            }),
            (_, None) => Err(InfraError::UndefinedDefinition {
                resource: K::RESOURCE_TYPE,
            }),
        }
    }

    /// Records `message` as the deferred error unless one is already set.
    pub(crate) fn record_error(&mut self, message: impl Into<String>) -> &mut Self {
        if self.error_msg.is_none() {
            let message = message.into();
            tracing::debug!(resource = K::RESOURCE_TYPE, error = %message, "Recording builder error");
            self.error_msg = Some(message);
        }
        self
    }

    /// Records `<resource> '<field>' cannot be empty` when `value` is empty.
    pub(crate) fn require(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.is_empty() {
            self.record_error(
                InfraError::EmptyField {
                    resource: K::RESOURCE_TYPE,
                    field,
                }
                .to_string(),
            );
        }
        self
    }

    /// Applies `edit` to the definition when the builder is valid.
    pub(crate) fn edit(&mut self, edit: impl FnOnce(&mut K)) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }
        if let Some(definition) = self.definition.as_mut() {
            edit(definition);
        }
        self
    }

    /// Applies caller-supplied mutations in order. The first failing option
    /// becomes the deferred error and stops the rest.
    pub fn with_options<I, F>(&mut self, options: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: FnOnce(&mut Self) -> Result<(), InfraError>,
    {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(resource = K::RESOURCE_TYPE, "Setting additional options");

        for option in options {
            if let Err(err) = option(self) {
                tracing::debug!(resource = K::RESOURCE_TYPE, error = %err, "Error occurred in mutation function");
                self.error_msg = Some(err.to_string());
                break;
            }
        }
        self
    }

    /// Fetches the resource from the server.
    pub async fn get(&self) -> Result<K, InfraError> {
        let (client, key) = self.checked()?;
        tracing::debug!(resource = K::RESOURCE_TYPE, object = %key, "Collecting resource");

        match client.get::<K>(&key).await? {
            Some(object) => Ok(object),
            None => Err(InfraError::not_found(K::RESOURCE_TYPE, key.name)),
        }
    }
}

impl<K: Writable, C: ApiClient> Builder<K, C> {
    /// Creates the resource unless it already exists.
    pub async fn create(&mut self) -> Result<&mut Self, InfraError> {
        let (client, key) = self.checked()?;
        tracing::debug!(resource = K::RESOURCE_TYPE, object = %key, "Creating resource");

        match self.presence().await {
            Presence::Present => Ok(self),
            Presence::Unknown(err) => Err(InfraError::context("create", K::RESOURCE_TYPE, err)),
            Presence::Absent => {
                let Some(mut request) = self.definition.clone() else {
                    return Err(InfraError::UndefinedDefinition {
                        resource: K::RESOURCE_TYPE,
                    });
                };
                // a pulled or previously updated definition still carries
                // the metadata of the server object it came from
                strip_server_metadata(&mut request);
                let created = client
                    .create(&request)
                    .await
                    .map_err(|err| InfraError::context("create", K::RESOURCE_TYPE, err))?;
                self.object = Some(created);
                Ok(self)
            }
        }
    }

    /// Deletes the resource. Deleting an absent resource succeeds.
    pub async fn delete(&mut self) -> Result<&mut Self, InfraError> {
        let (client, key) = self.checked()?;
        tracing::debug!(resource = K::RESOURCE_TYPE, object = %key, "Deleting resource");

        match self.presence().await {
            Presence::Absent => {
                tracing::debug!(resource = K::RESOURCE_TYPE, object = %key, "Resource does not exist");
                return Ok(self);
            }
            Presence::Unknown(err) => {
                return Err(InfraError::context("delete", K::RESOURCE_TYPE, err));
            }
            Presence::Present => {}
        }

        match client.delete::<K>(&key).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(InfraError::context("delete", K::RESOURCE_TYPE, err)),
        }

        self.forget_server_state();
        Ok(self)
    }

    /// Deletes the resource and waits until the server no longer has it.
    pub async fn delete_and_wait(&mut self, timeout: Duration) -> Result<&mut Self, InfraError> {
        let (client, key) = self.checked()?;
        self.delete().await?;

        tracing::debug!(resource = K::RESOURCE_TYPE, object = %key, ?timeout, "Waiting for resource to be deleted");

        let operation = format!("{} {} to be deleted", K::RESOURCE_TYPE, key);
        poll_until(client.poll_interval(), timeout, &operation, || {
            let client = Arc::clone(&client);
            let key = key.clone();
            async move {
                match client.get::<K>(&key).await {
                    Ok(None) => Ok(true),
                    Err(err) if err.is_not_found() => Ok(true),
                    _ => Ok(false),
                }
            }
        })
        .await?;

        Ok(self)
    }

    /// Clears the observed object and the server-assigned metadata of the
    /// definition so it can be created again.
    pub(crate) fn forget_server_state(&mut self) {
        self.object = None;
        if let Some(definition) = self.definition.as_mut() {
            strip_server_metadata(definition);
        }
    }
}

/// Removes the metadata an API server assigns, which must not be sent on
/// create.
fn strip_server_metadata<K: InfraResource>(object: &mut K) {
    let meta = object.meta_mut();
    meta.resource_version = None;
    meta.uid = None;
    meta.creation_timestamp = None;
}

fn pull_not_found<K: InfraResource>(key: ObjectKey) -> InfraError {
    tracing::debug!(resource = K::RESOURCE_TYPE, object = %key, "Resource does not exist");
    InfraError::PullNotFound {
        resource: K::RESOURCE_TYPE,
        name: key.name,
        namespace: key.namespace,
    }
}

/// Fails with `<resource> '<field>' cannot be empty` when `value` is empty.
pub(crate) fn required<K: InfraResource>(field: &'static str, value: &str) -> Result<(), InfraError> {
    if value.is_empty() {
        tracing::debug!(resource = K::RESOURCE_TYPE, field, "Required parameter is empty");
        return Err(InfraError::EmptyField {
            resource: K::RESOURCE_TYPE,
            field,
        });
    }
    Ok(())
}

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

use super::Builder;
use crate::clients::ApiClient;
use crate::error::InfraError;
use crate::resource::InfraResource;

/// Result of an existence check.
#[derive(Debug)]
pub enum Presence {
    /// The server returned the resource.
    Present,
    /// The server definitely does not have the resource.
    Absent,
    /// Presence could not be determined: the builder is invalid or the
    /// request failed for a reason other than "not found".
    Unknown(InfraError),
}

impl Presence {
    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Presence::Absent)
    }
}

impl<K: InfraResource, C: ApiClient> Builder<K, C> {
    /// Checks whether the resource exists, storing the server state in
    /// `object` when it does and clearing `object` otherwise.
    pub async fn presence(&mut self) -> Presence {
        let (client, key) = match self.checked() {
            Ok(parts) => parts,
            Err(err) => {
                self.object = None;
                return Presence::Unknown(err);
            }
        };

        tracing::debug!(resource = K::RESOURCE_TYPE, object = %key, "Checking if resource exists");

        match client.get::<K>(&key).await {
            Ok(Some(object)) => {
                self.object = Some(object);
                Presence::Present
            }
            Ok(None) => {
                self.object = None;
                Presence::Absent
            }
            Err(err) if err.is_not_found() => {
                self.object = None;
                Presence::Absent
            }
            Err(err) => {
                tracing::debug!(resource = K::RESOURCE_TYPE, object = %key, error = %err, "Failed to determine if resource exists");
                self.object = None;
                Presence::Unknown(err)
            }
        }
    }

    /// Whether the resource is known to exist. An undetermined presence
    /// counts as not existing.
    pub async fn exists(&mut self) -> bool {
        self.presence().await.is_present()
    }
}

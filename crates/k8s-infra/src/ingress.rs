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

//! Ingress builder.

use std::sync::Arc;

use k8s_openapi::api::networking::v1::{Ingress, IngressRule, IngressSpec};
use kube::api::ObjectMeta;

use crate::builder::{Builder, required};
use crate::clients::{ApiClient, ObjectKey};
use crate::error::InfraError;
use crate::resource::{InfraResource, Writable};

/// Ingress class used when none is set explicitly.
pub const DEFAULT_INGRESS_CLASS_NAME: &str = "openshift-default";

impl InfraResource for Ingress {
    const RESOURCE_TYPE: &'static str = "ingress";
}

impl Writable for Ingress {}

pub type IngressBuilder<C> = Builder<Ingress, C>;

impl<C: ApiClient> Builder<Ingress, C> {
    /// Defines a new ingress using [`DEFAULT_INGRESS_CLASS_NAME`].
    pub fn new(api_client: &Arc<C>, name: &str, nsname: &str) -> Self {
        tracing::debug!(name, nsname, "Initializing new ingress structure");

        let definition = Ingress {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(nsname.to_string()),
                ..Default::default()
            },
            spec: Some(IngressSpec {
                ingress_class_name: Some(DEFAULT_INGRESS_CLASS_NAME.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let mut builder = Self::from_definition(api_client, definition);
        builder.require("name", name).require("nsname", nsname);
        builder
    }

    pub async fn pull(api_client: &Arc<C>, name: &str, nsname: &str) -> Result<Self, InfraError> {
        required::<Ingress>("name", name)?;
        required::<Ingress>("nsname", nsname)?;

        Self::pull_existing(api_client, ObjectKey::new(name, Some(nsname))).await
    }

    pub fn with_ingress_class_name(&mut self, class_name: &str) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(class_name, "Setting ingress class name");

        if class_name.is_empty() {
            return self.record_error("ingress 'ingressClassName' cannot be empty");
        }

        self.edit(|ingress| {
            ingress.spec.get_or_insert_with(Default::default).ingress_class_name =
                Some(class_name.to_string())
        })
    }

    /// Replaces the routing rules of the ingress.
    pub fn with_rules(&mut self, rules: Vec<IngressRule>) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(rules = rules.len(), "Setting ingress rules");

        if rules.is_empty() {
            return self.record_error("ingress 'rules' cannot be empty");
        }

        self.edit(|ingress| ingress.spec.get_or_insert_with(Default::default).rules = Some(rules))
    }
}

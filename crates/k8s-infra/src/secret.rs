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

//! Secret builder.

use std::collections::BTreeMap;
use std::sync::Arc;

use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::Secret;
use kube::api::ObjectMeta;

use crate::builder::{Builder, required};
use crate::clients::{ApiClient, ObjectKey};
use crate::error::InfraError;
use crate::resource::{InfraResource, Writable};

impl InfraResource for Secret {
    const RESOURCE_TYPE: &'static str = "secret";
}

impl Writable for Secret {}

pub type SecretBuilder<C> = Builder<Secret, C>;

impl<C: ApiClient> Builder<Secret, C> {
    /// Defines a new secret of `secret_type`, e.g. `Opaque` or
    /// `kubernetes.io/dockerconfigjson`.
    pub fn new(api_client: &Arc<C>, name: &str, nsname: &str, secret_type: &str) -> Self {
        tracing::debug!(name, nsname, secret_type, "Initializing new secret structure");

        let definition = Secret {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(nsname.to_string()),
                ..Default::default()
            },
            type_: Some(secret_type.to_string()),
            ..Default::default()
        };

        let mut builder = Self::from_definition(api_client, definition);
        builder
            .require("name", name)
            .require("nsname", nsname)
            .require("secretType", secret_type);
        builder
    }

    pub async fn pull(api_client: &Arc<C>, name: &str, nsname: &str) -> Result<Self, InfraError> {
        required::<Secret>("name", name)?;
        required::<Secret>("nsname", nsname)?;

        Self::pull_existing(api_client, ObjectKey::new(name, Some(nsname))).await
    }

    /// Sets the base64-encoded data of the secret. Empty data is rejected.
    pub fn with_data(&mut self, data: BTreeMap<String, Vec<u8>>) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(keys = data.len(), "Defining secret data");

        if data.is_empty() {
            return self.record_error("'data' cannot be empty");
        }

        let data = data
            .into_iter()
            .map(|(key, value)| (key, ByteString(value)))
            .collect();
        self.edit(|secret| secret.data = Some(data))
    }

    /// Sets the plain-text data of the secret. Empty data is rejected.
    pub fn with_string_data(&mut self, data: BTreeMap<String, String>) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(keys = data.len(), "Defining secret stringData");

        if data.is_empty() {
            return self.record_error("'stringData' cannot be empty");
        }

        self.edit(|secret| secret.string_data = Some(data))
    }

    /// Replaces the annotations of the secret. Annotations must be
    /// non-empty and have non-empty keys.
    pub fn with_annotations(&mut self, annotations: BTreeMap<String, String>) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(?annotations, "Adding annotations to the secret");

        if annotations.is_empty() {
            return self.record_error("'annotations' argument cannot be empty");
        }

        if annotations.contains_key("") {
            return self.record_error("can not apply an annotations with an empty key");
        }

        self.edit(|secret| secret.metadata.annotations = Some(annotations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::helpers::fake_client;

    #[tokio::test]
    async fn test_new_requires_secret_type() {
        let client = fake_client();

        let builder = SecretBuilder::new(&client, "s", "ns", "");
        assert_eq!(
            builder.error_message(),
            Some("secret 'secretType' cannot be empty")
        );

        let builder = SecretBuilder::new(&client, "", "", "");
        assert_eq!(builder.error_message(), Some("secret 'name' cannot be empty"));
    }

    #[tokio::test]
    async fn test_create_with_data() {
        let client = fake_client();

        let mut builder = SecretBuilder::new(&client, "s", "ns", "Opaque");
        builder
            .with_data(BTreeMap::from([("pw".to_string(), b"secret".to_vec())]))
            .with_string_data(BTreeMap::from([("user".to_string(), "admin".to_string())]));
        builder.create().await.unwrap();

        let stored: Secret = client.peek("s", Some("ns")).unwrap();
        assert_eq!(stored.type_.as_deref(), Some("Opaque"));
        assert_eq!(
            stored.data.unwrap().get("pw"),
            Some(&ByteString(b"secret".to_vec()))
        );
        assert_eq!(
            stored.string_data.unwrap().get("user").map(String::as_str),
            Some("admin")
        );
    }

    #[tokio::test]
    async fn test_setters_record_errors() {
        let client = fake_client();

        let mut builder = SecretBuilder::new(&client, "s", "ns", "Opaque");
        builder.with_string_data(BTreeMap::new());
        assert_eq!(builder.error_message(), Some("'stringData' cannot be empty"));

        let mut builder = SecretBuilder::new(&client, "s", "ns", "Opaque");
        builder.with_annotations(BTreeMap::from([(String::new(), "v".to_string())]));
        assert_eq!(
            builder.error_message(),
            Some("can not apply an annotations with an empty key")
        );

        let mut builder = SecretBuilder::new(&client, "s", "ns", "Opaque");
        builder.with_annotations(BTreeMap::new());
        let err = builder.delete().await.unwrap_err();
        assert_eq!(err.to_string(), "'annotations' argument cannot be empty");
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_annotations_are_applied() {
        let client = fake_client();

        let mut builder = SecretBuilder::new(&client, "s", "ns", "Opaque");
        builder.with_annotations(BTreeMap::from([("owner".to_string(), "qe".to_string())]));

        let annotations = builder
            .definition
            .as_ref()
            .and_then(|secret| secret.metadata.annotations.clone())
            .unwrap();
        assert_eq!(annotations.get("owner").map(String::as_str), Some("qe"));
    }
}

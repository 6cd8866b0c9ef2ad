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

//! ClusterRoleBinding builder.

use std::sync::Arc;

use k8s_openapi::api::rbac::v1::{ClusterRoleBinding, RoleRef, Subject};
use kube::api::ObjectMeta;

use crate::builder::{Builder, required};
use crate::clients::{ApiClient, ObjectKey};
use crate::error::InfraError;
use crate::resource::{InfraResource, Writable};

const ALLOWED_SUBJECT_KINDS: [&str; 3] = ["ServiceAccount", "User", "Group"];

impl InfraResource for ClusterRoleBinding {
    const RESOURCE_TYPE: &'static str = "clusterrolebinding";
}

impl Writable for ClusterRoleBinding {}

pub type ClusterRoleBindingBuilder<C> = Builder<ClusterRoleBinding, C>;

impl<C: ApiClient> Builder<ClusterRoleBinding, C> {
    /// Defines a binding of `cluster_role` to `subject`.
    pub fn new(api_client: &Arc<C>, name: &str, cluster_role: &str, subject: Subject) -> Self {
        tracing::debug!(name, cluster_role, ?subject, "Initializing new clusterrolebinding structure");

        let definition = ClusterRoleBinding {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            role_ref: RoleRef {
                api_group: "rbac.authorization.k8s.io".to_string(),
                kind: "ClusterRole".to_string(),
                name: cluster_role.to_string(),
            },
            subjects: None,
        };

        let mut builder = Self::from_definition(api_client, definition);
        builder.with_subjects(vec![subject]).require("name", name);
        builder
    }

    pub async fn pull(api_client: &Arc<C>, name: &str) -> Result<Self, InfraError> {
        required::<ClusterRoleBinding>("name", name)?;

        Self::pull_existing(api_client, ObjectKey::new(name, None)).await
    }

    /// Appends subjects to the binding. Every subject needs a name and one of
    /// the kinds `ServiceAccount`, `User` or `Group`.
    pub fn with_subjects(&mut self, subjects: Vec<Subject>) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(?subjects, "Appending subjects to clusterrolebinding");

        if subjects.is_empty() {
            return self.record_error("cannot accept nil or empty slice as subjects");
        }

        for subject in &subjects {
            if !ALLOWED_SUBJECT_KINDS.contains(&subject.kind.as_str()) {
                return self.record_error(
                    "clusterrolebinding subject kind must be one of 'ServiceAccount', 'User', or 'Group'",
                );
            }

            if subject.name.is_empty() {
                return self.record_error("clusterrolebinding subject name cannot be empty");
            }
        }

        self.edit(|binding| binding.subjects.get_or_insert_with(Vec::new).extend(subjects))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::UpdateOutcome;
    use crate::clients::Verb;
    use crate::test::helpers::fake_client;

    fn subject(kind: &str, name: &str) -> Subject {
        Subject {
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: Some("default".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_new_validates_subject() {
        let client = fake_client();

        let builder = ClusterRoleBindingBuilder::new(&client, "crb", "admin", subject("Pod", "x"));
        assert_eq!(
            builder.error_message(),
            Some("clusterrolebinding subject kind must be one of 'ServiceAccount', 'User', or 'Group'")
        );

        let builder = ClusterRoleBindingBuilder::new(&client, "", "admin", subject("User", "x"));
        assert_eq!(
            builder.error_message(),
            Some("clusterrolebinding 'name' cannot be empty")
        );

        let builder = ClusterRoleBindingBuilder::new(&client, "crb", "admin", subject("User", ""));
        assert_eq!(
            builder.error_message(),
            Some("clusterrolebinding subject name cannot be empty")
        );
    }

    #[tokio::test]
    async fn test_with_subjects_appends() {
        let client = fake_client();

        let mut builder =
            ClusterRoleBindingBuilder::new(&client, "crb", "admin", subject("ServiceAccount", "sa"));
        builder.with_subjects(vec![subject("Group", "ops")]);

        let subjects = builder.definition.as_ref().unwrap().subjects.clone().unwrap();
        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[1].kind, "Group");

        builder.with_subjects(Vec::new());
        assert_eq!(
            builder.error_message(),
            Some("cannot accept nil or empty slice as subjects")
        );
    }

    #[tokio::test]
    async fn test_forced_update_recreates() {
        let client = fake_client();

        let mut builder =
            ClusterRoleBindingBuilder::new(&client, "crb", "admin", subject("User", "alice"));
        builder.create().await.unwrap();
        let original_uid = builder.object.as_ref().unwrap().metadata.uid.clone();

        // roleRef is immutable on a real cluster
        client.fail_on(Verb::Update, "ClusterRoleBinding", "cannot change roleRef");
        builder.definition.as_mut().unwrap().role_ref.name = "view".to_string();

        let err = builder.update(false).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot update clusterrolebinding: request rejected by the API server: cannot change roleRef"
        );

        let outcome = builder.update(true).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::Recreated);

        let stored: ClusterRoleBinding = client.peek("crb", None).unwrap();
        assert_eq!(stored.role_ref.name, "view");
        assert_ne!(stored.metadata.uid, original_uid);
        assert_eq!(builder.object, Some(stored));
    }

    #[tokio::test]
    async fn test_pull() {
        let client = fake_client();

        let mut builder =
            ClusterRoleBindingBuilder::new(&client, "crb", "admin", subject("User", "alice"));
        builder.create().await.unwrap();

        let pulled = ClusterRoleBindingBuilder::pull(&client, "crb").await.unwrap();
        assert_eq!(pulled.object, builder.object);

        let err = ClusterRoleBindingBuilder::pull(&client, "").await.unwrap_err();
        assert_eq!(err.to_string(), "clusterrolebinding 'name' cannot be empty");
    }
}

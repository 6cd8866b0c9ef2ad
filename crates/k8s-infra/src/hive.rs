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

//! Hive ClusterImageSet builder.

use std::sync::Arc;

use crate::builder::{Builder, required};
use crate::clients::{ApiClient, ObjectKey};
use crate::error::InfraError;
use crate::resource::{InfraResource, Writable};
pub use crate::schemes::hive::{ClusterImageSet, ClusterImageSetSpec};

impl InfraResource for ClusterImageSet {
    const RESOURCE_TYPE: &'static str = "clusterimageset";
}

impl Writable for ClusterImageSet {}

pub type ClusterImageSetBuilder<C> = Builder<ClusterImageSet, C>;

impl<C: ApiClient> Builder<ClusterImageSet, C> {
    pub fn new(api_client: &Arc<C>, name: &str, release_image: &str) -> Self {
        tracing::debug!(name, release_image, "Initializing new clusterimageset structure");

        let definition = ClusterImageSet::new(
            name,
            ClusterImageSetSpec {
                release_image: release_image.to_string(),
                ..Default::default()
            },
        );

        let mut builder = Self::from_definition(api_client, definition);
        builder
            .require("name", name)
            .require("releaseImage", release_image);
        builder
    }

    pub async fn pull(api_client: &Arc<C>, name: &str) -> Result<Self, InfraError> {
        required::<ClusterImageSet>("name", name)?;

        Self::pull_existing(api_client, ObjectKey::new(name, None)).await
    }

    pub fn with_release_image(&mut self, image: &str) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(image, "Setting clusterimageset releaseImage");

        if image.is_empty() {
            return self.record_error("cannot set releaseImage to empty string");
        }

        self.edit(|set| set.spec.release_image = image.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::UpdateOutcome;
    use crate::clients::Verb;
    use crate::test::helpers::fake_client;

    const IMAGE: &str = "quay.io/openshift-release-dev/ocp-release:4.18.0-x86_64";
    const NEXT_IMAGE: &str = "quay.io/openshift-release-dev/ocp-release:4.18.1-x86_64";

    #[tokio::test]
    async fn test_new_requires_release_image() {
        let client = fake_client();

        let builder = ClusterImageSetBuilder::new(&client, "img", "");
        assert_eq!(
            builder.error_message(),
            Some("clusterimageset 'releaseImage' cannot be empty")
        );
    }

    #[tokio::test]
    async fn test_update_release_image() {
        let client = fake_client();

        ClusterImageSetBuilder::new(&client, "img", IMAGE)
            .create()
            .await
            .unwrap();

        let mut pulled = ClusterImageSetBuilder::pull(&client, "img").await.unwrap();
        pulled.with_release_image(NEXT_IMAGE);
        assert_eq!(pulled.update(false).await.unwrap(), UpdateOutcome::Updated);

        let stored: ClusterImageSet = client.peek("img", None).unwrap();
        assert_eq!(stored.spec.release_image, NEXT_IMAGE);
        assert_eq!(pulled.object, Some(stored));
    }

    #[tokio::test]
    async fn test_stale_update_conflicts_without_force() {
        let client = fake_client();

        let mut first = ClusterImageSetBuilder::new(&client, "img", IMAGE);
        first.create().await.unwrap();

        let mut second = ClusterImageSetBuilder::pull(&client, "img").await.unwrap();
        second.with_release_image(NEXT_IMAGE).update(false).await.unwrap();

        first.with_release_image(NEXT_IMAGE);
        let err = first.update(false).await.unwrap_err();
        assert!(err.to_string().starts_with("cannot update clusterimageset: "));
    }

    #[tokio::test]
    async fn test_forced_update_reports_failed_recreate() {
        let client = fake_client();

        let mut builder = ClusterImageSetBuilder::new(&client, "img", IMAGE);
        builder.create().await.unwrap();

        client.fail_on(Verb::Update, "ClusterImageSet", "immutable");
        client.fail_on(Verb::Create, "ClusterImageSet", "quota exceeded");

        builder.with_release_image(NEXT_IMAGE);
        let err = builder.update(true).await.unwrap_err();
        assert!(matches!(err, InfraError::RecreateFailed { .. }));
        assert_eq!(
            err.to_string(),
            "clusterimageset img was deleted but could not be recreated, it is now absent: \
             request rejected by the API server: quota exceeded"
        );

        assert!(builder.object.is_none());
        assert!(client.peek::<ClusterImageSet>("img", None).is_none());
    }

    #[tokio::test]
    async fn test_forced_update_stops_when_delete_fails() {
        let client = fake_client();

        let mut builder = ClusterImageSetBuilder::new(&client, "img", IMAGE);
        builder.create().await.unwrap();

        client.fail_on(Verb::Update, "ClusterImageSet", "immutable");
        client.fail_on(Verb::Delete, "ClusterImageSet", "forbidden");

        let err = builder.update(true).await.unwrap_err();
        assert!(matches!(err, InfraError::ForceDeleteFailed { .. }));
        assert!(client.peek::<ClusterImageSet>("img", None).is_some());
    }
}

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

//! OVN-Kubernetes RouteAdvertisements builder.

use std::sync::Arc;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::ListParams;

use crate::builder::{Builder, required};
use crate::clients::{ApiClient, ObjectKey};
use crate::error::InfraError;
use crate::list::list_builders;
use crate::resource::{InfraResource, Writable};
pub use crate::schemes::ovn::{
    AdvertisementType, NETWORK_SELECTION_TYPES, NetworkLabelSelector, NetworkSelector, RouteAdvertisements,
    RouteAdvertisementsSpec,
};

impl InfraResource for RouteAdvertisements {
    const RESOURCE_TYPE: &'static str = "RouteAdvertisement";
}

impl Writable for RouteAdvertisements {}

pub type RouteAdvertisementBuilder<C> = Builder<RouteAdvertisements, C>;

impl<C: ApiClient> Builder<RouteAdvertisements, C> {
    pub fn new(api_client: &Arc<C>, name: &str) -> Self {
        tracing::debug!(name, "Initializing new RouteAdvertisement structure");

        let definition = RouteAdvertisements::new(name, RouteAdvertisementsSpec::default());

        let mut builder = Self::from_definition(api_client, definition);
        builder.require("name", name);
        builder
    }

    pub async fn pull(api_client: &Arc<C>, name: &str) -> Result<Self, InfraError> {
        required::<RouteAdvertisements>("name", name)?;

        Self::pull_existing(api_client, ObjectKey::new(name, None)).await
    }

    /// VRF the advertised routes are imported into.
    pub fn with_target_vrf(&mut self, target_vrf: &str) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(target_vrf, "Setting RouteAdvertisement targetVRF");

        self.edit(|ra| ra.spec.target_vrf = Some(target_vrf.to_string()))
    }

    pub fn with_advertisements(&mut self, advertisements: Vec<AdvertisementType>) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(?advertisements, "Setting RouteAdvertisement advertisements");

        if advertisements.is_empty() {
            return self.record_error("RouteAdvertisement 'advertisements' cannot be empty");
        }

        self.edit(|ra| ra.spec.advertisements = advertisements)
    }

    pub fn with_node_selector(&mut self, selector: LabelSelector) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(?selector, "Setting RouteAdvertisement nodeSelector");

        self.edit(|ra| ra.spec.node_selector = Some(selector))
    }

    pub fn with_frr_configuration_selector(&mut self, selector: LabelSelector) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(?selector, "Setting RouteAdvertisement frrConfigurationSelector");

        self.edit(|ra| ra.spec.frr_configuration_selector = Some(selector))
    }

    /// Replaces the network selectors. Each selector must name one of
    /// [`NETWORK_SELECTION_TYPES`].
    pub fn with_network_selectors(&mut self, selectors: Vec<NetworkSelector>) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(?selectors, "Setting RouteAdvertisement networkSelectors");

        if selectors.is_empty() {
            return self.record_error("RouteAdvertisement 'networkSelectors' cannot be empty");
        }

        for (index, selector) in selectors.iter().enumerate() {
            let selection_type = selector.network_selection_type.as_str();

            if selection_type.is_empty() {
                tracing::debug!(index, "RouteAdvertisement networkSelector has empty NetworkSelectionType");
                return self.record_error("RouteAdvertisement 'networkSelectors' must have valid NetworkSelectionType");
            }

            if !NETWORK_SELECTION_TYPES.contains(&selection_type) {
                return self.record_error(format!(
                    "RouteAdvertisement 'networkSelectors[{index}]' has invalid NetworkSelectionType: {selection_type}"
                ));
            }
        }

        self.edit(|ra| ra.spec.network_selectors = selectors)
    }
}

/// Lists RouteAdvertisements.
pub async fn list<C: ApiClient>(
    api_client: &Arc<C>,
    options: &[ListParams],
) -> Result<Vec<RouteAdvertisementBuilder<C>>, InfraError> {
    list_builders(api_client, None, options).await
}

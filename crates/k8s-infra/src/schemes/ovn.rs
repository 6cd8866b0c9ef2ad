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

//! `k8s.ovn.org/v1` RouteAdvertisements.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{Condition, LabelSelector};
use kube::CustomResource;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NETWORK: &str = "DefaultNetwork";
pub const CLUSTER_USER_DEFINED_NETWORKS: &str = "ClusterUserDefinedNetworks";
pub const PRIMARY_USER_DEFINED_NETWORKS: &str = "PrimaryUserDefinedNetworks";
pub const SECONDARY_USER_DEFINED_NETWORKS: &str = "SecondaryUserDefinedNetworks";
pub const NETWORK_ATTACHMENT_DEFINITIONS: &str = "NetworkAttachmentDefinitions";

/// Network selection types accepted in [`NetworkSelector::network_selection_type`].
pub const NETWORK_SELECTION_TYPES: [&str; 5] = [
    DEFAULT_NETWORK,
    CLUSTER_USER_DEFINED_NETWORKS,
    PRIMARY_USER_DEFINED_NETWORKS,
    SECONDARY_USER_DEFINED_NETWORKS,
    NETWORK_ATTACHMENT_DEFINITIONS,
];

/// Which networks are advertised over BGP, to which FRR configurations.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "k8s.ovn.org",
    version = "v1",
    kind = "RouteAdvertisements",
    plural = "routeadvertisements",
    status = "RouteAdvertisementsStatus",
    schema = "disabled",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct RouteAdvertisementsSpec {
    /// VRF the routes are imported into. Defaults to the network's VRF.
    #[serde(default, rename = "targetVRF", skip_serializing_if = "Option::is_none")]
    pub target_vrf: Option<String>,

    #[serde(default)]
    pub network_selectors: Vec<NetworkSelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<LabelSelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frr_configuration_selector: Option<LabelSelector>,

    #[serde(default)]
    pub advertisements: Vec<AdvertisementType>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvertisementType {
    PodNetwork,
    #[serde(rename = "EgressIP")]
    EgressIp,
}

/// Selects networks of one type. Kept as a string so that invalid types can
/// be reported by name.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSelector {
    pub network_selection_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_user_defined_network_selector: Option<NetworkLabelSelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_user_defined_network_selector: Option<NetworkLabelSelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_user_defined_network_selector: Option<NetworkLabelSelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_attachment_definition_selector: Option<NetworkLabelSelector>,
}

impl NetworkSelector {
    pub fn new(network_selection_type: impl Into<String>) -> Self {
        Self {
            network_selection_type: network_selection_type.into(),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkLabelSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<LabelSelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_selector: Option<LabelSelector>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RouteAdvertisementsStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

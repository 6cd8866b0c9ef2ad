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

//! `sriovnetwork.openshift.io/v1` SriovNetworkNodeState and SriovNetwork.

use std::collections::BTreeMap;

use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Per-node inventory of SR-IOV capable interfaces, written by the
/// config daemon. One state exists per node, named after it.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "sriovnetwork.openshift.io",
    version = "v1",
    kind = "SriovNetworkNodeState",
    plural = "sriovnetworknodestates",
    namespaced,
    status = "SriovNetworkNodeStateStatus",
    schema = "disabled"
)]
pub struct SriovNetworkNodeStateSpec {}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SriovNetworkNodeStateStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<InterfaceExt>,

    /// `Succeeded`, `InProgress` or `Failed`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sync_status: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_sync_error: String,
}

/// A physical function as reported by the node.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceExt {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub pci_address: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub driver: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vendor: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device_id: String,

    /// Empty or `-1 Mb/s` while the link is down.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link_speed: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i32>,

    #[serde(default)]
    pub num_vfs: i32,

    #[serde(default)]
    pub total_vfs: i32,
}

/// Network attachment backed by an SR-IOV resource pool. The operator
/// renders it into a NetworkAttachmentDefinition in `networkNamespace`.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "sriovnetwork.openshift.io",
    version = "v1",
    kind = "SriovNetwork",
    plural = "sriovnetworks",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct SriovNetworkSpec {
    pub resource_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network_namespace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,

    #[serde(default, rename = "vlanQoS", skip_serializing_if = "Option::is_none")]
    pub vlan_qos: Option<u8>,

    /// `on` or `off`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoof_chk: Option<String>,

    /// `on` or `off`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust: Option<String>,

    /// `auto`, `enable` or `disable`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_state: Option<String>,

    /// Mbps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tx_rate: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_tx_rate: Option<u32>,

    /// IPAM configuration as a JSON document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipam: Option<String>,

    /// Spec fields not modelled above, sent back unchanged on update.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

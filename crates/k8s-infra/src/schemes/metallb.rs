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

//! `frrk8s.metallb.io/v1beta1` BGPSessionState.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// State of one BGP session, written by the FRR-K8s daemon. Names carry a
/// random suffix, so sessions are usually found by node and peer.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "frrk8s.metallb.io",
    version = "v1beta1",
    kind = "BGPSessionState",
    plural = "bgpsessionstates",
    namespaced,
    status = "BGPSessionStateStatus",
    schema = "disabled"
)]
pub struct BGPSessionStateSpec {}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BGPSessionStateStatus {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bgp_status: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bfd_status: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub node: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub peer: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vrf: String,
}

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

//! Shared test infrastructure.

use std::collections::BTreeMap;
use std::sync::Arc;

use k8s_openapi::api::core::v1::{ConfigMap, Namespace};
use kube::api::ObjectMeta;

use crate::clients::FakeClient;
use crate::schemes::clusteroperator::{
    ClusterOperator, ClusterOperatorSpec, ClusterOperatorStatus, ClusterOperatorStatusCondition, OperandVersion,
};
use crate::schemes::metallb::{BGPSessionState, BGPSessionStateSpec, BGPSessionStateStatus};
use crate::schemes::sriov::{
    InterfaceExt, SriovNetworkNodeState, SriovNetworkNodeStateSpec, SriovNetworkNodeStateStatus,
};

/// In-memory client with a short poll interval.
pub(crate) fn fake_client() -> Arc<FakeClient> {
    Arc::new(FakeClient::new())
}

pub(crate) fn configmap(name: &str, namespace: &str) -> ConfigMap {
    ConfigMap {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([("key".to_string(), "value".to_string())])),
        ..Default::default()
    }
}

pub(crate) fn namespace(name: &str, labels: &[(&str, &str)]) -> Namespace {
    Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: (!labels.is_empty()).then(|| {
                labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            }),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// ClusterOperator with the given `(type, status)` conditions. An empty
/// `version` leaves the versions list empty.
pub(crate) fn cluster_operator(name: &str, conditions: &[(&str, &str)], version: &str) -> ClusterOperator {
    let mut operator = ClusterOperator::new(name, ClusterOperatorSpec {});

    let versions = if version.is_empty() {
        Vec::new()
    } else {
        vec![OperandVersion {
            name: "operator".to_string(),
            version: version.to_string(),
        }]
    };

    operator.status = Some(ClusterOperatorStatus {
        conditions: conditions
            .iter()
            .map(|(type_, status)| ClusterOperatorStatusCondition {
                type_: type_.to_string(),
                status: status.to_string(),
                ..Default::default()
            })
            .collect(),
        versions,
        ..Default::default()
    });
    operator
}

pub(crate) fn bgp_session_state(
    name: &str,
    namespace: &str,
    node: &str,
    peer: &str,
    bgp_status: &str,
) -> BGPSessionState {
    let mut state = BGPSessionState::new(name, BGPSessionStateSpec {});
    state.metadata.namespace = Some(namespace.to_string());
    state.status = Some(BGPSessionStateStatus {
        bgp_status: bgp_status.to_string(),
        bfd_status: "N/A".to_string(),
        node: node.to_string(),
        peer: peer.to_string(),
        vrf: String::new(),
    });
    state
}

/// Node state with one Mellanox interface per `(name, link speed, numVfs)`
/// entry. PCI addresses follow the entry order.
pub(crate) fn sriov_node_state(
    node: &str,
    namespace: &str,
    sync_status: &str,
    interfaces: &[(&str, &str, i32)],
) -> SriovNetworkNodeState {
    let mut state = SriovNetworkNodeState::new(node, SriovNetworkNodeStateSpec {});
    state.metadata.namespace = Some(namespace.to_string());
    state.status = Some(SriovNetworkNodeStateStatus {
        interfaces: interfaces
            .iter()
            .enumerate()
            .map(|(index, (name, link_speed, num_vfs))| InterfaceExt {
                name: name.to_string(),
                pci_address: format!("0000:3b:00.{index}"),
                driver: "mlx5_core".to_string(),
                vendor: "15b3".to_string(),
                device_id: "1017".to_string(),
                link_speed: link_speed.to_string(),
                link_type: "ETH".to_string(),
                mtu: Some(1500),
                num_vfs: *num_vfs,
                total_vfs: 64,
            })
            .collect(),
        sync_status: sync_status.to_string(),
        last_sync_error: String::new(),
    });
    state
}

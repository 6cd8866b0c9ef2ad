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

//! SR-IOV network operator resources.
//!
//! [`SriovNetworkNodeStateBuilder`] reads the interface inventory the config
//! daemon publishes for a node. [`SriovNetworkBuilder`] writes the networks
//! that expose SR-IOV resource pools to pods.

use std::sync::Arc;
use std::time::Duration;

use kube::api::ListParams;

use crate::builder::{Builder, required};
use crate::clients::{ApiClient, ObjectKey};
use crate::error::InfraError;
use crate::list::list_in_namespace;
use crate::resource::{InfraResource, Writable};
pub use crate::schemes::sriov::{
    InterfaceExt, SriovNetwork, SriovNetworkNodeState, SriovNetworkNodeStateSpec, SriovNetworkNodeStateStatus,
    SriovNetworkSpec,
};
use crate::wait::poll_until;

const MAX_VLAN_ID: u16 = 4094;
const MAX_VLAN_QOS: u8 = 7;
const LINK_STATES: [&str; 3] = ["auto", "enable", "disable"];
const LINK_DOWN_SPEED: &str = "-1 Mb/s";

impl InfraResource for SriovNetworkNodeState {
    const RESOURCE_TYPE: &'static str = "SriovNetworkNodeState";
}

pub type SriovNetworkNodeStateBuilder<C> = Builder<SriovNetworkNodeState, C>;

impl<C: ApiClient> Builder<SriovNetworkNodeState, C> {
    /// Addresses the state of `node_name`. Nothing is fetched until
    /// [`Self::discover`] or one of the interface accessors runs.
    pub fn new(api_client: &Arc<C>, node_name: &str, nsname: &str) -> Self {
        tracing::debug!(node_name, nsname, "Initializing new SriovNetworkNodeState structure");

        let mut definition = SriovNetworkNodeState::new(node_name, SriovNetworkNodeStateSpec {});
        definition.metadata.namespace = Some(nsname.to_string());

        let mut builder = Self::from_definition(api_client, definition);
        builder.require("nodeName", node_name).require("nsname", nsname);
        builder
    }

    pub async fn pull(api_client: &Arc<C>, node_name: &str, nsname: &str) -> Result<Self, InfraError> {
        required::<SriovNetworkNodeState>("nodeName", node_name)?;
        required::<SriovNetworkNodeState>("nsname", nsname)?;

        Self::pull_existing(api_client, ObjectKey::new(node_name, Some(nsname))).await
    }

    /// Fetches the current state into `object`.
    pub async fn discover(&mut self) -> Result<&SriovNetworkNodeState, InfraError> {
        let state = self.get().await?;
        Ok(self.object.insert(state))
    }

    /// Every SR-IOV capable interface of the node, freshly discovered.
    pub async fn nics(&mut self) -> Result<Vec<InterfaceExt>, InfraError> {
        let state = self.discover().await?;
        Ok(state
            .status
            .as_ref()
            .map(|status| status.interfaces.clone())
            .unwrap_or_default())
    }

    /// Interfaces whose link is up.
    pub async fn up_nics(&mut self) -> Result<Vec<InterfaceExt>, InfraError> {
        let nics = self.nics().await?;
        let up: Vec<InterfaceExt> = nics
            .into_iter()
            .filter(|nic| !nic.link_speed.is_empty() && nic.link_speed != LINK_DOWN_SPEED)
            .collect();

        tracing::debug!(
            node = self.name(),
            interfaces = ?up.iter().map(|nic| nic.name.as_str()).collect::<Vec<_>>(),
            "Collected SR-IOV interfaces in UP state"
        );
        Ok(up)
    }

    pub async fn num_vfs(&mut self, interface: &str) -> Result<i32, InfraError> {
        Ok(self.interface(interface).await?.num_vfs)
    }

    pub async fn total_vfs(&mut self, interface: &str) -> Result<i32, InfraError> {
        Ok(self.interface(interface).await?.total_vfs)
    }

    pub async fn driver_name(&mut self, interface: &str) -> Result<String, InfraError> {
        Ok(self.interface(interface).await?.driver)
    }

    pub async fn pci_address(&mut self, interface: &str) -> Result<String, InfraError> {
        Ok(self.interface(interface).await?.pci_address)
    }

    /// Waits until the node reports `sync_status`. Failed reads are retried
    /// until `timeout`.
    pub async fn wait_until_sync_status(&self, sync_status: &str, timeout: Duration) -> Result<(), InfraError> {
        let (client, key) = self.checked()?;

        if sync_status.is_empty() {
            return Err(InfraError::InvalidArgument("syncStatus cannot be empty".to_string()));
        }

        tracing::debug!(object = %key, sync_status, ?timeout, "Waiting for SriovNetworkNodeState syncStatus");

        let operation = format!("SriovNetworkNodeState {key} to have syncStatus {sync_status}");
        poll_until(client.poll_interval(), timeout, &operation, || {
            let client = Arc::clone(&client);
            let key = key.clone();
            async move {
                match client.get::<SriovNetworkNodeState>(&key).await {
                    Ok(Some(state)) => Ok(state
                        .status
                        .is_some_and(|status| status.sync_status == sync_status)),
                    Ok(None) => Ok(false),
                    Err(err) => {
                        tracing::debug!(object = %key, error = %err, "Failed to read SriovNetworkNodeState");
                        Ok(false)
                    }
                }
            }
        })
        .await
    }

    async fn interface(&mut self, interface: &str) -> Result<InterfaceExt, InfraError> {
        self.validate()?;

        if interface.is_empty() {
            return Err(InfraError::InvalidArgument(
                "sriovInterface can not be empty string".to_string(),
            ));
        }

        tracing::debug!(node = self.name(), interface, "Looking up SR-IOV interface");

        self.nics()
            .await?
            .into_iter()
            .find(|nic| nic.name == interface)
            .ok_or_else(|| InfraError::NoMatch {
                resource: SriovNetworkNodeState::RESOURCE_TYPE,
                criteria: format!("interface {interface}"),
            })
    }

    fn name(&self) -> &str {
        self.definition
            .as_ref()
            .and_then(|state| state.metadata.name.as_deref())
            .unwrap_or_default()
    }
}

/// Lists the node states in `nsname`, normally the operator namespace.
pub async fn list_network_node_states<C: ApiClient>(
    api_client: &Arc<C>,
    nsname: &str,
    options: &[ListParams],
) -> Result<Vec<SriovNetworkNodeStateBuilder<C>>, InfraError> {
    list_in_namespace(api_client, nsname, options).await
}

impl InfraResource for SriovNetwork {
    const RESOURCE_TYPE: &'static str = "SriovNetwork";
}

impl Writable for SriovNetwork {}

pub type SriovNetworkBuilder<C> = Builder<SriovNetwork, C>;

impl<C: ApiClient> Builder<SriovNetwork, C> {
    /// Defines a network in the operator namespace `nsname` whose attachment
    /// is rendered into `target_nsname` and draws VFs from `resource_name`.
    pub fn new(api_client: &Arc<C>, name: &str, nsname: &str, target_nsname: &str, resource_name: &str) -> Self {
        tracing::debug!(name, nsname, target_nsname, resource_name, "Initializing new SriovNetwork structure");

        let mut definition = SriovNetwork::new(
            name,
            SriovNetworkSpec {
                resource_name: resource_name.to_string(),
                network_namespace: target_nsname.to_string(),
                ..Default::default()
            },
        );
        definition.metadata.namespace = Some(nsname.to_string());

        let mut builder = Self::from_definition(api_client, definition);
        builder
            .require("name", name)
            .require("nsname", nsname)
            .require("networkNamespace", target_nsname)
            .require("resourceName", resource_name);
        builder
    }

    pub async fn pull(api_client: &Arc<C>, name: &str, nsname: &str) -> Result<Self, InfraError> {
        required::<SriovNetwork>("name", name)?;
        required::<SriovNetwork>("nsname", nsname)?;

        Self::pull_existing(api_client, ObjectKey::new(name, Some(nsname))).await
    }

    pub fn with_vlan(&mut self, vlan: u16) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(vlan, "Defining SriovNetwork with vlan");

        if vlan > MAX_VLAN_ID {
            return self.record_error(format!(
                "invalid vlanId {vlan}, allowed vlanId values are between 0-{MAX_VLAN_ID}"
            ));
        }

        self.edit(|network| network.spec.vlan = Some(vlan))
    }

    pub fn with_vlan_qos(&mut self, qos: u8) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(qos, "Defining SriovNetwork with vlanQoS");

        if qos > MAX_VLAN_QOS {
            return self.record_error(format!(
                "invalid vlanQoS {qos}, allowed vlanQoS values are between 0-{MAX_VLAN_QOS}"
            ));
        }

        self.edit(|network| network.spec.vlan_qos = Some(qos))
    }

    pub fn with_spoof_check(&mut self, enabled: bool) -> &mut Self {
        tracing::debug!(enabled, "Defining SriovNetwork with spoofChk");

        self.edit(|network| network.spec.spoof_chk = Some(on_off(enabled)))
    }

    pub fn with_trust(&mut self, enabled: bool) -> &mut Self {
        tracing::debug!(enabled, "Defining SriovNetwork with trust");

        self.edit(|network| network.spec.trust = Some(on_off(enabled)))
    }

    /// Sets the VF link state: `auto`, `enable` or `disable`.
    pub fn with_link_state(&mut self, link_state: &str) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(link_state, "Defining SriovNetwork with linkState");

        if !LINK_STATES.contains(&link_state) {
            return self.record_error(format!(
                "invalid linkState '{link_state}', allowed values are {}",
                LINK_STATES.join(", ")
            ));
        }

        self.edit(|network| network.spec.link_state = Some(link_state.to_string()))
    }

    /// Caps VF transmit bandwidth, in Mbps.
    pub fn with_max_tx_rate(&mut self, max_tx_rate: u32) -> &mut Self {
        tracing::debug!(max_tx_rate, "Defining SriovNetwork with maxTxRate");

        self.edit(|network| network.spec.max_tx_rate = Some(max_tx_rate))
    }

    /// Sets the IPAM plugin configuration, which must be a JSON document.
    pub fn with_ipam(&mut self, ipam: &str) -> &mut Self {
        if self.validate().is_err() {
            return self;
        }

        tracing::debug!(ipam, "Defining SriovNetwork with ipam");

        if ipam.is_empty() {
            return self.record_error("SriovNetwork 'ipam' cannot be empty");
        }

        if let Err(err) = serde_json::from_str::<serde_json::Value>(ipam) {
            return self.record_error(format!("SriovNetwork 'ipam' is not valid JSON: {err}"));
        }

        self.edit(|network| network.spec.ipam = Some(ipam.to_string()))
    }
}

fn on_off(enabled: bool) -> String {
    let value = if enabled { "on" } else { "off" };
    value.to_string()
}

/// Lists the SriovNetworks in `nsname`.
pub async fn list<C: ApiClient>(
    api_client: &Arc<C>,
    nsname: &str,
    options: &[ListParams],
) -> Result<Vec<SriovNetworkBuilder<C>>, InfraError> {
    list_in_namespace(api_client, nsname, options).await
}

/// Deletes every SriovNetwork in `operator_nsname` whose attachment lands in
/// `target_nsname`. Stops at the first failed delete.
pub async fn clean_all_networks_by_target_namespace<C: ApiClient>(
    api_client: &Arc<C>,
    operator_nsname: &str,
    target_nsname: &str,
    options: &[ListParams],
) -> Result<(), InfraError> {
    tracing::debug!(operator_nsname, target_nsname, "Cleaning up SriovNetworks by target namespace");

    if operator_nsname.is_empty() {
        return Err(InfraError::InvalidArgument(
            "failed to clean up sriov networks, 'operatornsname' parameter is empty".to_string(),
        ));
    }

    if target_nsname.is_empty() {
        return Err(InfraError::InvalidArgument(
            "failed to clean up sriov networks, 'targetnsname' parameter is empty".to_string(),
        ));
    }

    for mut network in list(api_client, operator_nsname, options).await? {
        let targets = network
            .object
            .as_ref()
            .is_some_and(|object| object.spec.network_namespace == target_nsname);

        if targets {
            network.delete().await?;
        }
    }

    Ok(())
}

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

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::InfraError;

/// Interval used by the polling helpers when no settings are supplied.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Settings for connecting to a cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Path to a kubeconfig file. When unset the in-cluster or default
    /// kubeconfig is inferred.
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of the current one.
    pub context: Option<String>,

    /// Field manager recorded on create and update requests.
    pub field_manager: String,

    /// Interval between checks in the WaitUntil/WaitFor helpers.
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Read timeout applied to every API request.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            context: None,
            field_manager: "k8s-infra".to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientSettings {
    /// Loads settings from defaults, an optional TOML file, and `K8S_INFRA__`
    /// prefixed environment variables, in that order of precedence.
    pub fn load(config_path: Option<&Path>) -> Result<Self, InfraError> {
        let mut figment = Figment::new().merge(Serialized::defaults(ClientSettings::default()));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("K8S_INFRA__").split("__"));

        let settings: ClientSettings = figment
            .extract()
            .map_err(|e| InfraError::ConfigError(format!("Failed to load configuration: {}", e)))?;

        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        if self.field_manager.is_empty() {
            return Err(InfraError::ConfigError(
                "field_manager cannot be empty".to_string(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(InfraError::ConfigError(
                "poll_interval must be greater than zero".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(InfraError::ConfigError(
                "request_timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

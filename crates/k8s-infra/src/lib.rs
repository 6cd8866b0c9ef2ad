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

//! # k8s-infra
//!
//! Typed builders for reading and mutating Kubernetes and OpenShift
//! resources from test automation.
//!
//! ## Overview
//!
//! Every supported kind gets a [`Builder`] that holds the desired state of
//! one resource (`definition`) next to the state last seen on the server
//! (`object`). Builders provide:
//!
//! - Constructors and `pull` for existing resources
//! - Chainable With* setters that record the first invalid input and make
//!   every later operation fail with it
//! - Idempotent `create`, `delete`, `delete_and_wait`, and `update` with an
//!   optional delete-and-recreate fallback
//! - `list` helpers that wrap each item in its own builder
//!
//! All requests go through an [`ApiClient`]: [`KubeClient`] talks to a real
//! cluster, [`FakeClient`] keeps objects in memory for tests.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! use k8s_infra::{ClientSettings, KubeClient, configmap::ConfigMapBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ClientSettings::load(None)?;
//!     let client = Arc::new(KubeClient::from_settings(&settings).await?);
//!
//!     let mut builder = ConfigMapBuilder::new(&client, "settings", "default");
//!     builder.with_data(BTreeMap::from([("mode".to_string(), "fast".to_string())]));
//!     builder.create().await?;
//!
//!     assert!(builder.exists().await);
//!     builder.delete().await?;
//!     Ok(())
//! }
//! ```
#![warn(clippy::all)]
#![deny(warnings, unsafe_code)]

pub mod builder;
pub mod clients;
pub mod config;
pub mod error;
pub mod list;
pub mod resource;
pub mod schemes;
pub mod wait;

pub mod clusteroperator;
pub mod configmap;
pub mod hive;
pub mod ingress;
pub mod metallb;
pub mod namespace;
pub mod olm;
pub mod ovn;
pub mod rbac;
pub mod secret;
pub mod sriov;

#[cfg(test)]
mod test;

// Re-exports for convenience
pub use builder::{Builder, Presence, UpdateOutcome};
pub use clients::{ApiClient, FakeClient, KubeClient, ObjectKey, Verb};
pub use config::ClientSettings;
pub use error::InfraError;
pub use resource::{InfraResource, Writable};

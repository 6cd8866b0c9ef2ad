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

//! Custom resource kinds that are not part of the core Kubernetes API.
//!
//! Only the fields the builders read or write are modelled. Specs of the
//! kinds the builders write keep every other field in a flattened `extra`
//! map, so a full-object update sends them back unchanged. Read-only kinds
//! drop unknown fields.

pub mod clusteroperator;
pub mod hive;
pub mod metallb;
pub mod olm;
pub mod ovn;
pub mod sriov;

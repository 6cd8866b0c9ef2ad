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

//! Error types for resource builders and API clients.

use thiserror::Error;

/// Error type for builder and client operations.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Kubernetes client error: {0}")]
    Kube(#[from] kube::Error),

    #[error("error: received nil {resource} builder")]
    NilBuilder { resource: &'static str },

    #[error("can not redefine the undefined {resource}")]
    UndefinedDefinition { resource: &'static str },

    #[error("{resource} builder cannot have nil apiClient")]
    NilApiClient { resource: &'static str },

    /// Message recorded by a With* setter and surfaced by the next validation.
    #[error("{0}")]
    Deferred(String),

    #[error("{resource} '{field}' cannot be empty")]
    EmptyField {
        resource: &'static str,
        field: &'static str,
    },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("error: more than one ListOptions was passed")]
    TooManyListOptions,

    #[error("{kind} '{name}' not found")]
    NotFound { kind: String, name: String },

    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: String, name: String },

    #[error("{kind} '{name}' was modified concurrently: {details}")]
    Conflict {
        kind: String,
        name: String,
        details: String,
    },

    #[error("request rejected by the API server: {0}")]
    Rejected(String),

    #[error("no kind is registered for the type {kind} in scheme")]
    SchemeNotRegistered { kind: String },

    #[error("{resource} for {criteria} not found")]
    NoMatch {
        resource: &'static str,
        criteria: String,
    },

    #[error("could not find {resource} {name}{}", in_namespace(.namespace))]
    PullNotFound {
        resource: &'static str,
        name: String,
        namespace: Option<String>,
    },

    #[error("cannot {verb} {resource}: {source}")]
    Context {
        verb: &'static str,
        resource: &'static str,
        #[source]
        source: Box<InfraError>,
    },

    #[error("cannot delete {resource} {name} before recreating it: {source}")]
    ForceDeleteFailed {
        resource: &'static str,
        name: String,
        #[source]
        source: Box<InfraError>,
    },

    #[error("{resource} {name} was deleted but could not be recreated, it is now absent: {source}")]
    RecreateFailed {
        resource: &'static str,
        name: String,
        #[source]
        source: Box<InfraError>,
    },

    #[error("Timeout waiting for {operation}: {details}")]
    Timeout { operation: String, details: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

fn in_namespace(namespace: &Option<String>) -> String {
    match namespace {
        Some(namespace) => format!(" in namespace {namespace}"),
        None => String::new(),
    }
}

impl InfraError {
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn already_exists(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Wraps `source` as `cannot <verb> <resource>: <source>`.
    pub fn context(verb: &'static str, resource: &'static str, source: InfraError) -> Self {
        Self::Context {
            verb,
            resource,
            source: Box::new(source),
        }
    }

    /// Whether this error is a definite "not found" answer from the API server.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::NoMatch { .. } => true,
            Self::Kube(kube::Error::Api(response)) => response.code == 404,
            Self::Context { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

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

//! The validation gate every builder operation passes through.

use crate::error::InfraError;

/// What the validation gate needs to know about a builder.
pub trait Validatable {
    /// Resource name used in validation errors.
    const RESOURCE_TYPE: &'static str;

    type Definition;
    type Client;

    fn definition(&self) -> Option<&Self::Definition>;

    fn api_client(&self) -> Option<&Self::Client>;

    /// Deferred error recorded by a With* setter, if any.
    fn error_message(&self) -> Option<&str>;
}

/// Checks that a builder can be used.
///
/// Checks run in order and the first failure is returned: the builder
/// itself, its definition, its client, then any deferred error message
/// (returned verbatim).
pub fn validate_builder<B: Validatable>(builder: Option<&B>) -> Result<(), InfraError> {
    let resource = B::RESOURCE_TYPE;

    let Some(builder) = builder else {
        tracing::debug!(resource, "The builder is uninitialized");
        return Err(InfraError::NilBuilder { resource });
    };

    if builder.definition().is_none() {
        tracing::debug!(resource, "The builder is undefined");
        return Err(InfraError::UndefinedDefinition { resource });
    }

    if builder.api_client().is_none() {
        tracing::debug!(resource, "The builder apiclient is nil");
        return Err(InfraError::NilApiClient { resource });
    }

    if let Some(message) = builder.error_message().filter(|m| !m.is_empty()) {
        tracing::debug!(resource, error = message, "The builder has error message");
        return Err(InfraError::Deferred(message.to_string()));
    }

    Ok(())
}

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

//! Fixed-interval polling.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::error::InfraError;

/// Evaluates `condition` immediately and then every `interval` until it
/// returns `true`.
///
/// An error from `condition` stops polling and is returned as is. When
/// `timeout` elapses first, [`InfraError::Timeout`] names `operation`.
pub async fn poll_until<F, Fut>(
    interval: Duration,
    timeout: Duration,
    operation: &str,
    mut condition: F,
) -> Result<(), InfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, InfraError>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        if condition().await? {
            return Ok(());
        }

        let now = Instant::now();
        if now >= deadline {
            tracing::debug!(operation, ?timeout, "Condition not met before timeout");
            return Err(InfraError::timeout(
                operation,
                format!("condition not met within {:?}", timeout),
            ));
        }

        sleep(interval.min(deadline - now)).await;
    }
}

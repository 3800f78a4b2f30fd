// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Single-host task execution over an opaque transport subprocess.

use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

use super::invocation::Invocation;
use super::result_types::{ExecutionResult, TaskStatus};

/// Run `invocation` against `host`, bounded by `timeout`.
///
/// Never returns an error: spawn failures, nonzero exits, signal
/// terminations, and timeouts all come back as well-formed results. On
/// timeout the child is killed rather than left running.
pub async fn execute(host: Ipv4Addr, invocation: Invocation, timeout: Duration) -> ExecutionResult {
    debug!(
        "Executing {} {:?} against {host}",
        invocation.program, invocation.args
    );

    let start = Instant::now();

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    // Without this, timed-out transports would linger as orphan zombies.
    cmd.kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return ExecutionResult {
                host,
                status: TaskStatus::Failed,
                exit_code: None,
                error: Some(format!("failed to spawn {}: {e}", invocation.program)),
                duration: start.elapsed(),
            };
        }
        Err(_) => {
            debug!("Task for {host} timed out after {}s", timeout.as_secs());
            return ExecutionResult {
                host,
                status: TaskStatus::Timeout,
                exit_code: None,
                error: None,
                duration: start.elapsed(),
            };
        }
    };

    let duration = start.elapsed();

    if output.status.success() {
        debug!("Task for {host} succeeded in {duration:?}");
        return ExecutionResult {
            host,
            status: TaskStatus::Success,
            exit_code: Some(0),
            error: None,
            duration,
        };
    }

    match output.status.code() {
        Some(code) => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            ExecutionResult {
                host,
                status: TaskStatus::Failed,
                exit_code: Some(code),
                error: (!detail.is_empty()).then_some(detail),
                duration,
            }
        }
        None => ExecutionResult {
            host,
            status: TaskStatus::Failed,
            exit_code: None,
            error: Some("transport terminated by signal".to_string()),
            duration,
        },
    }
}

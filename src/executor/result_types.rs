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

//! Result types for fleet runs.

use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Terminal status of one host task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Success,
    Timeout,
    Failed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Success => write!(f, "success"),
            TaskStatus::Timeout => write!(f, "timeout"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of running a script against a single host.
///
/// Per-host failures are carried as data, never as errors: a run over N
/// hosts always yields exactly N of these.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub host: Ipv4Addr,
    pub status: TaskStatus,
    /// Exit code of the transport process, when it exited normally.
    pub exit_code: Option<i32>,
    /// Diagnostic detail for non-success outcomes.
    pub error: Option<String>,
    pub duration: Duration,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self.status, TaskStatus::Success)
    }

    /// Result synthesized when a worker could not be joined, keeping the
    /// one-result-per-host accounting intact.
    pub fn dispatch_failure(host: Ipv4Addr, error: String) -> Self {
        Self {
            host,
            status: TaskStatus::Failed,
            exit_code: None,
            error: Some(error),
            duration: Duration::ZERO,
        }
    }
}

/// Aggregate view of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub total: usize,
    pub elapsed: Duration,
    pub success_count: usize,
    pub timeout_count: usize,
    pub failure_count: usize,
    /// Non-success results in the order they completed.
    pub problems: Vec<ExecutionResult>,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            elapsed: Duration::ZERO,
            success_count: 0,
            timeout_count: 0,
            failure_count: 0,
            problems: Vec::new(),
        }
    }

    pub fn record(&mut self, result: ExecutionResult) {
        match result.status {
            TaskStatus::Success => self.success_count += 1,
            TaskStatus::Timeout => {
                self.timeout_count += 1;
                self.problems.push(result);
            }
            TaskStatus::Failed => {
                self.failure_count += 1;
                self.problems.push(result);
            }
        }
    }

    /// True when at least one host did not succeed.
    pub fn is_failure(&self) -> bool {
        self.timeout_count + self.failure_count > 0
    }
}

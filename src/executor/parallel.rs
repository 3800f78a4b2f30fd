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

//! Bounded-concurrency fleet dispatch.

use anyhow::{Context, Result};
use futures::future::join_all;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};

use super::invocation::Invocation;
use super::reporter;
use super::result_types::{ExecutionResult, RunSummary};
use super::task;

/// One unit of work: the argv to run against one host, and its timeout.
#[derive(Debug, Clone)]
pub struct HostTask {
    pub host: Ipv4Addr,
    pub invocation: Invocation,
    pub timeout: Duration,
}

/// Fans host tasks out across a bounded worker pool and streams each
/// result to the reporter as it completes.
pub struct FleetExecutor {
    workers: usize,
}

impl FleetExecutor {
    pub fn new(workers: usize) -> Self {
        Self { workers }
    }

    /// Concurrency actually used for `total` tasks: never more workers
    /// than tasks, never fewer than one.
    fn effective_concurrency(&self, total: usize) -> usize {
        self.workers.min(total).max(1)
    }

    /// Run every task to completion and return the aggregate summary.
    ///
    /// Exactly one result is produced per task. Workers that panic or
    /// cannot be joined are converted into failed results rather than
    /// lost, so the reporter's count-based termination always fires.
    pub async fn run(&self, tasks: Vec<HostTask>) -> Result<RunSummary> {
        let total = tasks.len();
        let concurrency = self.effective_concurrency(total);
        tracing::debug!("Dispatching {total} tasks with {concurrency} workers");

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let (tx, rx) = mpsc::channel::<ExecutionResult>(concurrency);
        let started = Instant::now();
        let reporter = tokio::spawn(reporter::stream_results(rx, total, started));

        let hosts: Vec<Ipv4Addr> = tasks.iter().map(|task| task.host).collect();
        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                let semaphore = Arc::clone(&semaphore);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let _permit = match semaphore.acquire().await {
                        Ok(permit) => permit,
                        Err(e) => {
                            let result = ExecutionResult::dispatch_failure(
                                task.host,
                                format!("semaphore acquisition failed: {e}"),
                            );
                            let _ = tx.send(result).await;
                            return;
                        }
                    };

                    let result = task::execute(task.host, task.invocation, task.timeout).await;
                    let _ = tx.send(result).await;
                })
            })
            .collect();

        let joined = join_all(handles).await;
        for (idx, join_result) in joined.into_iter().enumerate() {
            if let Err(e) = join_result {
                tracing::error!("Worker for {} could not be joined: {e}", hosts[idx]);
                let result = ExecutionResult::dispatch_failure(
                    hosts[idx],
                    format!("task execution failed: {e}"),
                );
                let _ = tx.send(result).await;
            }
        }
        drop(tx);

        reporter.await.context("result reporter task failed")
    }
}

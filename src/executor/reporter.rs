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

//! Streaming result reporter.
//!
//! Consumes results while workers are still running and prints one line
//! per host the moment its outcome is known. Terminates when the received
//! count reaches the known task total.

use owo_colors::OwoColorize;
use std::time::Instant;
use tokio::sync::mpsc::Receiver;

use super::output_sync::synchronized_println;
use super::result_types::{ExecutionResult, RunSummary, TaskStatus};

/// Longest error detail shown on a streaming line. Full details reappear
/// in the final summary.
const MAX_ERROR_PREVIEW: usize = 50;

/// Drain `rx` until `total` results have arrived, printing each one and
/// folding it into the returned summary.
pub async fn stream_results(
    mut rx: Receiver<ExecutionResult>,
    total: usize,
    started: Instant,
) -> RunSummary {
    let mut summary = RunSummary::new(total);
    let mut completed = 0usize;

    while completed < total {
        let result = match rx.recv().await {
            Some(result) => result,
            // All senders gone early; the dispatcher guarantees one result
            // per host, so this only happens if it was torn down.
            None => break,
        };
        completed += 1;

        let line = format_result_line(&result, completed, total);
        if let Err(e) = synchronized_println(&line) {
            tracing::error!("Failed to write result line for {}: {e}", result.host);
        }
        summary.record(result);
    }

    summary.elapsed = started.elapsed();
    summary
}

fn format_result_line(result: &ExecutionResult, completed: usize, total: usize) -> String {
    let progress = format!("[{completed}/{total}]");
    let host = result.host.to_string();

    match result.status {
        TaskStatus::Success => format!(
            "{} {} {} ({:.2}s)",
            progress.dimmed(),
            "✓".green(),
            host.bold(),
            result.duration.as_secs_f64()
        ),
        TaskStatus::Timeout => format!(
            "{} {} {} {} ({:.2}s)",
            progress.dimmed(),
            "✗".red(),
            host.bold(),
            "timed out".yellow(),
            result.duration.as_secs_f64()
        ),
        TaskStatus::Failed => {
            let code = match result.exit_code {
                Some(code) => format!("exit {code}"),
                None => "no exit code".to_string(),
            };
            let mut line = format!(
                "{} {} {} {}",
                progress.dimmed(),
                "✗".red(),
                host.bold(),
                format!("failed, {code}").red()
            );
            if let Some(error) = &result.error {
                line.push_str(&format!(": {}", truncate_error(error).dimmed()));
            }
            line
        }
    }
}

fn truncate_error(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or("");
    if first_line.chars().count() <= MAX_ERROR_PREVIEW {
        first_line.to_string()
    } else {
        let preview: String = first_line.chars().take(MAX_ERROR_PREVIEW).collect();
        format!("{preview}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn result(last_octet: u8, status: TaskStatus) -> ExecutionResult {
        ExecutionResult {
            host: format!("10.0.0.{last_octet}").parse().unwrap(),
            status,
            exit_code: match status {
                TaskStatus::Success => Some(0),
                TaskStatus::Failed => Some(1),
                TaskStatus::Timeout => None,
            },
            error: None,
            duration: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_stream_results_counts_to_total() {
        let (tx, rx) = mpsc::channel(4);
        let reporter = tokio::spawn(stream_results(rx, 3, Instant::now()));

        tx.send(result(1, TaskStatus::Success)).await.unwrap();
        tx.send(result(2, TaskStatus::Timeout)).await.unwrap();
        tx.send(result(3, TaskStatus::Failed)).await.unwrap();

        let summary = reporter.await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.timeout_count, 1);
        assert_eq!(summary.failure_count, 1);
    }

    #[tokio::test]
    async fn test_stream_results_preserves_completion_order() {
        let (tx, rx) = mpsc::channel(4);
        let reporter = tokio::spawn(stream_results(rx, 3, Instant::now()));

        tx.send(result(7, TaskStatus::Failed)).await.unwrap();
        tx.send(result(1, TaskStatus::Success)).await.unwrap();
        tx.send(result(3, TaskStatus::Timeout)).await.unwrap();

        let summary = reporter.await.unwrap();
        let order: Vec<String> = summary.problems.iter().map(|r| r.host.to_string()).collect();
        assert_eq!(order, vec!["10.0.0.7", "10.0.0.3"]);
    }

    #[tokio::test]
    async fn test_stream_results_stops_when_senders_drop() {
        let (tx, rx) = mpsc::channel(4);
        let reporter = tokio::spawn(stream_results(rx, 5, Instant::now()));

        tx.send(result(1, TaskStatus::Success)).await.unwrap();
        drop(tx);

        let summary = reporter.await.unwrap();
        assert_eq!(summary.success_count, 1);
    }

    #[test]
    fn test_truncate_error_short_message() {
        assert_eq!(truncate_error("connection refused"), "connection refused");
    }

    #[test]
    fn test_truncate_error_long_message() {
        let long = "x".repeat(80);
        let truncated = truncate_error(&long);
        assert_eq!(truncated.chars().count(), MAX_ERROR_PREVIEW + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_error_keeps_first_line_only() {
        assert_eq!(truncate_error("first\nsecond\nthird"), "first");
    }
}

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

use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use crate::executor::{invocation, FleetExecutor, HostTask, RunSummary, TaskStatus};
use crate::iprange;
use crate::registry::ScriptRegistry;
use crate::script::{ScriptAction, ScriptDefinition};

pub struct RunScriptParams {
    pub registry_path: PathBuf,
    pub name: String,
    pub start_ip: String,
    pub count: usize,
    pub key_path: Option<PathBuf>,
    pub user: String,
    pub inputs: Vec<String>,
    pub workers: usize,
}

/// Run a stored script across a host range.
///
/// All configuration checks happen before any task is dispatched, so a
/// bad invocation fails fast with no partial output. Exits the process
/// with code 1 when any host does not succeed.
pub async fn run_script(params: RunScriptParams) -> Result<()> {
    let registry = ScriptRegistry::load(&params.registry_path).await?;
    let definition = registry.lookup(&params.name)?.clone();

    if definition.timeout_secs == 0 {
        bail!(
            "Script '{}' has a zero timeout; edit the registry to give it a positive timeout",
            params.name
        );
    }
    if params.workers == 0 {
        bail!("--workers must be at least 1");
    }
    if params.count == 0 {
        bail!("--count must be at least 1; a run needs at least one host");
    }

    let start = iprange::parse_start(&params.start_ip)?;
    let hosts = iprange::expand_range(start, params.count)?;

    print_run_header(&params, &definition, &hosts);

    let timeout = Duration::from_secs(definition.timeout_secs);
    let tasks: Vec<HostTask> = hosts
        .iter()
        .map(|&host| HostTask {
            host,
            invocation: invocation::render(
                &definition.action,
                host,
                &params.user,
                params.key_path.as_deref(),
                &params.inputs,
            ),
            timeout,
        })
        .collect();

    let executor = FleetExecutor::new(params.workers);
    let summary = executor.run(tasks).await?;

    println!("{}", format_summary(&summary));

    if summary.is_failure() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_run_header(params: &RunScriptParams, definition: &ScriptDefinition, hosts: &[Ipv4Addr]) {
    // Host count was validated as nonzero before this point.
    let first = hosts[0];
    let last = hosts[hosts.len() - 1];

    println!(
        "\n{} {} '{}' on {} {} ({} → {}):",
        "►".cyan().bold(),
        "Running".cyan(),
        params.name.bold(),
        hosts.len().to_string().bold(),
        if hosts.len() == 1 { "host" } else { "hosts" },
        first,
        last
    );

    match &definition.action {
        ScriptAction::Ssh { command } => {
            let preview = invocation::substitute_inputs(command, &params.inputs);
            println!("{}", format!("  {preview}").dimmed());
        }
        ScriptAction::Scp {
            source,
            destination,
        } => {
            println!("{}", format!("  {source} → {destination}").dimmed());
        }
    }

    let key = match &params.key_path {
        Some(path) => format!(", key {}", path.display()),
        None => String::new(),
    };
    println!(
        "{}\n",
        format!(
            "  timeout {}s, workers {}, user {}{key}",
            definition.timeout_secs, params.workers, params.user
        )
        .dimmed()
    );
}

fn format_summary(summary: &RunSummary) -> String {
    let mut parts = Vec::new();

    parts.push(format!("{} hosts", summary.total.to_string().bold()));
    if summary.success_count > 0 {
        parts.push(format!(
            "{} {}",
            summary.success_count.to_string().green().bold(),
            "successful".green()
        ));
    }
    if summary.timeout_count > 0 {
        parts.push(format!(
            "{} {}",
            summary.timeout_count.to_string().yellow().bold(),
            "timed out".yellow()
        ));
    }
    if summary.failure_count > 0 {
        parts.push(format!(
            "{} {}",
            summary.failure_count.to_string().red().bold(),
            "failed".red()
        ));
    }
    parts.push(format!("{:.2}s elapsed", summary.elapsed.as_secs_f64()));

    let rule = "═".repeat(64);
    let mut out = format!(
        "\n{}\n{}\n",
        rule.dimmed(),
        format!(" Summary: {} ", parts.join(" • ")).bold()
    );

    let timeouts: Vec<_> = summary
        .problems
        .iter()
        .filter(|r| r.status == TaskStatus::Timeout)
        .collect();
    if !timeouts.is_empty() {
        out.push_str(&format!("\n {}:\n", "Timed out".yellow().bold()));
        for result in timeouts {
            out.push_str(&format!("   {} {}\n", "✗".yellow(), result.host));
        }
    }

    let failures: Vec<_> = summary
        .problems
        .iter()
        .filter(|r| r.status == TaskStatus::Failed)
        .collect();
    if !failures.is_empty() {
        out.push_str(&format!("\n {}:\n", "Failed".red().bold()));
        for result in failures {
            let code = match result.exit_code {
                Some(code) => format!("exit {code}"),
                None => "no exit code".to_string(),
            };
            match &result.error {
                Some(error) => out.push_str(&format!(
                    "   {} {} ({code}): {}\n",
                    "✗".red(),
                    result.host,
                    error.dimmed()
                )),
                None => out.push_str(&format!("   {} {} ({code})\n", "✗".red(), result.host)),
            }
        }
    }

    out.push_str(&format!("{}\n", rule.dimmed()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutionResult;

    fn result(last_octet: u8, status: TaskStatus, exit_code: Option<i32>) -> ExecutionResult {
        ExecutionResult {
            host: format!("10.0.0.{last_octet}").parse().unwrap(),
            status,
            exit_code,
            error: None,
            duration: Duration::from_millis(20),
        }
    }

    #[test]
    fn test_format_summary_all_success() {
        let mut summary = RunSummary::new(2);
        summary.record(result(1, TaskStatus::Success, Some(0)));
        summary.record(result(2, TaskStatus::Success, Some(0)));

        let rendered = format_summary(&summary);
        assert!(rendered.contains("2 hosts"));
        assert!(rendered.contains("successful"));
        assert!(!rendered.contains("Timed out"));
        assert!(!rendered.contains("Failed"));
    }

    #[test]
    fn test_format_summary_lists_problem_hosts() {
        let mut summary = RunSummary::new(3);
        summary.record(result(1, TaskStatus::Success, Some(0)));
        summary.record(result(2, TaskStatus::Timeout, None));
        summary.record(result(3, TaskStatus::Failed, Some(7)));

        let rendered = format_summary(&summary);
        assert!(rendered.contains("10.0.0.2"));
        assert!(rendered.contains("10.0.0.3"));
        assert!(rendered.contains("exit 7"));
    }

    #[test]
    fn test_format_summary_failure_without_exit_code() {
        let mut summary = RunSummary::new(1);
        summary.record(result(9, TaskStatus::Failed, None));

        let rendered = format_summary(&summary);
        assert!(rendered.contains("no exit code"));
    }
}

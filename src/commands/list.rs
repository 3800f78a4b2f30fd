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

use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

use crate::registry::ScriptRegistry;
use crate::script::ScriptAction;

pub async fn list_scripts(registry_path: &Path) -> Result<()> {
    let registry = ScriptRegistry::load(registry_path).await?;

    if registry.is_empty() {
        println!("{}", "No scripts defined".dimmed());
        return Ok(());
    }

    println!("\n{} {}\n", "▶".cyan(), "Available scripts".bold());
    for (name, definition) in registry.iter() {
        println!(
            "  {} {} ({}, timeout {}s)",
            "●".blue(),
            name.bold(),
            definition.action.kind().yellow(),
            definition.timeout_secs
        );
        match &definition.action {
            ScriptAction::Ssh { command } => {
                println!("    {} {}", "•".dimmed(), command.dimmed());
            }
            ScriptAction::Scp {
                source,
                destination,
            } => {
                println!(
                    "    {} {} → {}",
                    "•".dimmed(),
                    source.dimmed(),
                    destination.dimmed()
                );
            }
        }
    }
    println!();

    Ok(())
}

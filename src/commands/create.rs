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

use anyhow::{bail, Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use crate::cli::ScriptKind;
use crate::registry::ScriptRegistry;
use crate::script::{ScriptAction, ScriptDefinition};

pub struct CreateScriptParams {
    pub registry_path: PathBuf,
    pub name: String,
    pub kind: ScriptKind,
    pub command: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub timeout: u64,
    pub force: bool,
}

pub async fn create_script(params: CreateScriptParams) -> Result<()> {
    if params.timeout == 0 {
        bail!("--timeout must be positive");
    }

    let action = match params.kind {
        ScriptKind::Ssh => ScriptAction::Ssh {
            command: params
                .command
                .context("--command is required for ssh scripts")?,
        },
        ScriptKind::Scp => ScriptAction::Scp {
            source: params
                .source
                .context("--source is required for scp scripts")?,
            destination: params
                .destination
                .context("--destination is required for scp scripts")?,
        },
    };

    let definition = ScriptDefinition {
        action,
        timeout_secs: params.timeout,
    };

    let mut registry = ScriptRegistry::load(&params.registry_path).await?;
    registry.insert(params.name.clone(), definition, params.force)?;
    registry.save().await?;

    println!(
        "{} Script '{}' saved to {}",
        "✓".green(),
        params.name.bold(),
        registry.path().display().to_string().dimmed()
    );

    Ok(())
}

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

//! Persistent store of named script definitions.

use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::script::ScriptDefinition;

/// Script registry persisted as a single JSON document mapping
/// script name to definition.
#[derive(Debug)]
pub struct ScriptRegistry {
    path: PathBuf,
    scripts: BTreeMap<String, ScriptDefinition>,
}

impl ScriptRegistry {
    /// Load the registry from `path`. A missing file is not an error:
    /// it loads as an empty registry, so the first `create` works without
    /// any setup step.
    pub async fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_tilde(path);

        if !expanded_path.exists() {
            tracing::debug!(
                "Registry file not found at {:?}, starting empty",
                expanded_path
            );
            return Ok(Self {
                path: expanded_path,
                scripts: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(&expanded_path)
            .await
            .with_context(|| format!("Failed to read script registry at {expanded_path:?}"))?;

        let scripts: BTreeMap<String, ScriptDefinition> = serde_json::from_str(&content)
            .with_context(|| {
                format!("Failed to parse script registry at {expanded_path:?}. The file must be a JSON object mapping script names to definitions.")
            })?;

        Ok(Self {
            path: expanded_path,
            scripts,
        })
    }

    /// Write the registry back to the path it was loaded from, creating
    /// parent directories as needed.
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create registry directory {parent:?}"))?;
        }

        let content = serde_json::to_string_pretty(&self.scripts)
            .context("Failed to serialize script registry")?;

        fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write script registry at {:?}", self.path))?;

        Ok(())
    }

    /// Look up a script by name. An unknown name is a configuration error
    /// whose message lists what is actually available.
    pub fn lookup(&self, name: &str) -> Result<&ScriptDefinition> {
        self.scripts.get(name).ok_or_else(|| {
            let available = if self.scripts.is_empty() {
                "(none)".to_string()
            } else {
                self.scripts.keys().cloned().collect::<Vec<_>>().join(", ")
            };
            anyhow::anyhow!(
                "Script '{name}' not found in the registry.\nAvailable scripts: {available}\nUse 'fleetsh list' to inspect them."
            )
        })
    }

    /// Insert a definition under `name`. Refuses to overwrite an existing
    /// script unless `force` is set.
    pub fn insert(&mut self, name: String, definition: ScriptDefinition, force: bool) -> Result<()> {
        if !force && self.scripts.contains_key(&name) {
            bail!("Script '{name}' already exists. Pass --force to overwrite it.");
        }
        self.scripts.insert(name, definition);
        Ok(())
    }

    /// Remove a script by name, returning its definition.
    pub fn remove(&mut self, name: &str) -> Result<ScriptDefinition> {
        self.scripts
            .remove(name)
            .ok_or_else(|| anyhow::anyhow!("Script '{name}' does not exist"))
    }

    /// Iterate scripts in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ScriptDefinition)> {
        self.scripts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if path_str.starts_with("~/") {
            if let Ok(home) = std::env::var("HOME") {
                return PathBuf::from(path_str.replacen("~", &home, 1));
            }
        }
    }
    path.to_path_buf()
}

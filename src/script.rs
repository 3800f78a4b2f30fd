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

//! Script definitions stored in the registry.

use serde::{Deserialize, Serialize};

/// What a script does when run against a host.
///
/// `Ssh` runs a remote command template over ssh; `Scp` copies a local file
/// to a remote path over scp. The serialized form carries a `type` tag so
/// registry files stay readable and hand-editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScriptAction {
    Ssh {
        /// Remote command template. `$1`..`$N` placeholders are replaced
        /// by run-time inputs.
        command: String,
    },
    Scp {
        /// Local source path.
        source: String,
        /// Remote destination path.
        destination: String,
    },
}

impl ScriptAction {
    /// Short kind label used in listings.
    pub fn kind(&self) -> &'static str {
        match self {
            ScriptAction::Ssh { .. } => "ssh",
            ScriptAction::Scp { .. } => "scp",
        }
    }
}

/// A named script as persisted in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDefinition {
    #[serde(flatten)]
    pub action: ScriptAction,

    /// Per-host execution timeout in seconds.
    #[serde(rename = "timeout", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssh_wire_format() {
        let definition = ScriptDefinition {
            action: ScriptAction::Ssh {
                command: "systemctl restart $1".to_string(),
            },
            timeout_secs: 30,
        };

        let json = serde_json::to_value(&definition).unwrap();
        assert_eq!(json["type"], "ssh");
        assert_eq!(json["command"], "systemctl restart $1");
        assert_eq!(json["timeout"], 30);

        let parsed: ScriptDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, definition);
    }

    #[test]
    fn test_scp_wire_format() {
        let definition = ScriptDefinition {
            action: ScriptAction::Scp {
                source: "./app.conf".to_string(),
                destination: "/etc/app/app.conf".to_string(),
            },
            timeout_secs: 10,
        };

        let json = serde_json::to_value(&definition).unwrap();
        assert_eq!(json["type"], "scp");
        assert_eq!(json["source"], "./app.conf");
        assert_eq!(json["destination"], "/etc/app/app.conf");

        let parsed: ScriptDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, definition);
    }

    #[test]
    fn test_timeout_defaults_when_missing() {
        let definition: ScriptDefinition =
            serde_json::from_str(r#"{"type": "ssh", "command": "uptime"}"#).unwrap();
        assert_eq!(definition.timeout_secs, 10);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result =
            serde_json::from_str::<ScriptDefinition>(r#"{"type": "rsync", "command": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_labels() {
        let ssh = ScriptAction::Ssh {
            command: "uptime".to_string(),
        };
        let scp = ScriptAction::Scp {
            source: "a".to_string(),
            destination: "b".to_string(),
        };
        assert_eq!(ssh.kind(), "ssh");
        assert_eq!(scp.kind(), "scp");
    }
}

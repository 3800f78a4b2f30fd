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

//! Rendering script actions into the argv handed to the transport.

use std::net::Ipv4Addr;
use std::path::Path;

use crate::script::ScriptAction;

/// Options passed on every ssh/scp invocation so unattended runs never
/// block on host-key prompts or pollute output with transport noise.
pub const TRANSPORT_HARDENING: &[&str] = &[
    "-o",
    "StrictHostKeyChecking=no",
    "-o",
    "UserKnownHostsFile=/dev/null",
    "-o",
    "LogLevel=ERROR",
];

/// A concrete subprocess invocation: the program and its arguments,
/// passed as discrete argv entries with no shell interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

/// Replace `$1`..`$N` placeholders in a command template with run-time
/// inputs.
///
/// Substitution runs from the highest index down so `$1` never corrupts
/// the prefix of `$10`. Placeholders without a matching input are left
/// verbatim, which keeps the remote shell's own `$`-variables usable.
pub fn substitute_inputs(command: &str, inputs: &[String]) -> String {
    let mut rendered = command.to_string();
    for (idx, value) in inputs.iter().enumerate().rev() {
        rendered = rendered.replace(&format!("${}", idx + 1), value);
    }
    rendered
}

/// Render the argv for running `action` against a single host.
pub fn render(
    action: &ScriptAction,
    host: Ipv4Addr,
    user: &str,
    key_path: Option<&Path>,
    inputs: &[String],
) -> Invocation {
    let mut args: Vec<String> = TRANSPORT_HARDENING.iter().map(|s| s.to_string()).collect();

    if let Some(key) = key_path {
        args.push("-i".to_string());
        args.push(key.display().to_string());
    }

    match action {
        ScriptAction::Ssh { command } => {
            args.push(format!("{user}@{host}"));
            args.push(substitute_inputs(command, inputs));
            Invocation {
                program: "ssh".to_string(),
                args,
            }
        }
        ScriptAction::Scp { source, destination } => {
            args.push(source.clone());
            args.push(format!("{user}@{host}:{destination}"));
            Invocation {
                program: "scp".to_string(),
                args,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_substitute_basic() {
        let rendered = substitute_inputs("systemctl restart $1", &inputs(&["nginx"]));
        assert_eq!(rendered, "systemctl restart nginx");
    }

    #[test]
    fn test_substitute_high_index_before_low() {
        let values = inputs(&[
            "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
        ]);
        let rendered = substitute_inputs("echo $10 $1", &values);
        assert_eq!(rendered, "echo ten one");
    }

    #[test]
    fn test_substitute_repeated_placeholder() {
        let rendered = substitute_inputs("cp $1 $1.bak", &inputs(&["/etc/hosts"]));
        assert_eq!(rendered, "cp /etc/hosts /etc/hosts.bak");
    }

    #[test]
    fn test_substitute_missing_input_left_verbatim() {
        let rendered = substitute_inputs("echo $1 $2", &inputs(&["only"]));
        assert_eq!(rendered, "echo only $2");
    }

    #[test]
    fn test_substitute_no_inputs_is_identity() {
        let rendered = substitute_inputs("echo $HOME $1", &[]);
        assert_eq!(rendered, "echo $HOME $1");
    }

    #[test]
    fn test_render_ssh_argv() {
        let action = ScriptAction::Ssh {
            command: "systemctl restart $1".to_string(),
        };
        let invocation = render(
            &action,
            "10.0.0.5".parse().unwrap(),
            "root",
            None,
            &inputs(&["nginx"]),
        );

        assert_eq!(invocation.program, "ssh");
        assert_eq!(
            invocation.args,
            vec![
                "-o",
                "StrictHostKeyChecking=no",
                "-o",
                "UserKnownHostsFile=/dev/null",
                "-o",
                "LogLevel=ERROR",
                "root@10.0.0.5",
                "systemctl restart nginx",
            ]
        );
    }

    #[test]
    fn test_render_ssh_with_key_and_user() {
        let action = ScriptAction::Ssh {
            command: "uptime".to_string(),
        };
        let invocation = render(
            &action,
            "10.0.0.5".parse().unwrap(),
            "deploy",
            Some(Path::new("/home/deploy/.ssh/id_ed25519")),
            &[],
        );

        assert!(invocation
            .args
            .windows(2)
            .any(|pair| pair == ["-i", "/home/deploy/.ssh/id_ed25519"]));
        assert!(invocation.args.contains(&"deploy@10.0.0.5".to_string()));
    }

    #[test]
    fn test_render_scp_argv() {
        let action = ScriptAction::Scp {
            source: "./app.conf".to_string(),
            destination: "/etc/app/app.conf".to_string(),
        };
        let invocation = render(&action, "192.168.0.10".parse().unwrap(), "root", None, &[]);

        assert_eq!(invocation.program, "scp");
        let tail = &invocation.args[invocation.args.len() - 2..];
        assert_eq!(tail, ["./app.conf", "root@192.168.0.10:/etc/app/app.conf"]);
    }
}

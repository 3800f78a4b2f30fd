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

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fleetsh",
    version,
    about = "fleetsh - Parallel script execution across IPv4 host ranges",
    long_about = "fleetsh manages a registry of named scripts (remote shell commands or file copies)\nand runs them against a contiguous range of IPv4 hosts in parallel.\nEach host is bounded by a per-script timeout, results stream in as they complete,\nand a final summary reports successes, timeouts, and failures.\nThe transport is the system ssh/scp binary, invoked non-interactively.",
    after_help = "EXAMPLES:\n  Define a remote command:  fleetsh create restart-app --type ssh --command \"systemctl restart $1\"\n  Define a file copy:       fleetsh create push-config --type scp --source ./app.conf --destination /etc/app/app.conf\n  List stored scripts:      fleetsh list\n  Run across 20 hosts:      fleetsh run restart-app --start-ip 10.0.0.1 --count 20 --input nginx\n  Raise parallelism:        fleetsh run push-config --start-ip 10.0.0.1 --count 50 --workers 25\n\nExit codes: 0 (all hosts succeeded), 1 (any host timed out or failed), 2 (configuration error)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'v',
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    #[arg(
        long,
        global = true,
        default_value = "~/.config/fleetsh/scripts.json",
        help = "Script registry path\nA single JSON document mapping script names to definitions"
    )]
    pub registry: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// Run a remote command over ssh
    Ssh,
    /// Copy a local file to the host over scp
    Scp,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Create a named script in the registry",
        long_about = "Stores a script definition under a name for later runs.\nssh scripts carry a remote command template where $1..$N placeholders\nare replaced by --input values at run time. scp scripts carry a local\nsource path and a remote destination path.\n\nAn existing name is not overwritten unless --force is passed.",
        after_help = "Examples:\n  fleetsh create restart-app --type ssh --command \"systemctl restart $1\" --timeout 30\n  fleetsh create push-config --type scp --source ./app.conf --destination /etc/app/app.conf\n  fleetsh create restart-app --type ssh --command \"systemctl restart nginx\" --force"
    )]
    Create {
        #[arg(help = "Script name")]
        name: String,

        #[arg(
            long = "type",
            value_enum,
            help = "Script kind: ssh runs a remote command, scp copies a file"
        )]
        kind: ScriptKind,

        #[arg(
            long,
            required_if_eq("kind", "ssh"),
            help = "Remote command template for ssh scripts\n$1..$N placeholders are replaced by --input values at run time"
        )]
        command: Option<String>,

        #[arg(
            long,
            required_if_eq("kind", "scp"),
            help = "Local source path for scp scripts"
        )]
        source: Option<String>,

        #[arg(
            long,
            required_if_eq("kind", "scp"),
            help = "Remote destination path for scp scripts"
        )]
        destination: Option<String>,

        #[arg(
            long,
            default_value = "10",
            help = "Per-host timeout in seconds (must be positive)"
        )]
        timeout: u64,

        #[arg(long, help = "Overwrite an existing script with the same name")]
        force: bool,
    },

    #[command(
        about = "List scripts stored in the registry",
        long_about = "Displays every script in the registry with its kind, timeout,\nand command or copy paths, in name order."
    )]
    List,

    #[command(about = "Delete a script from the registry")]
    Delete {
        #[arg(help = "Script name")]
        name: String,
    },

    #[command(
        about = "Run a script against a contiguous IPv4 host range",
        long_about = "Expands a contiguous host range from the starting address, renders the\nscript into one ssh/scp invocation per host, and executes them in parallel\nunder a bounded worker pool. Each host is bounded by the script's timeout.\nResults stream in as they complete; a summary follows the last host.\n\nExit codes: 0 (all hosts succeeded), 1 (any host timed out or failed)",
        after_help = "Examples:\n  fleetsh run restart-app --start-ip 10.0.0.1 --count 20 --input nginx\n  fleetsh run push-config --start-ip 192.168.1.10 --count 5 --key ~/.ssh/id_ed25519\n  fleetsh run restart-app --start-ip 10.0.0.1 --count 100 --user deploy --workers 25"
    )]
    Run {
        #[arg(help = "Script name to run")]
        name: String,

        #[arg(long, help = "First IPv4 address of the host range (dotted-quad)")]
        start_ip: String,

        #[arg(
            short = 'n',
            long,
            default_value = "1",
            help = "Number of consecutive hosts to target"
        )]
        count: usize,

        #[arg(
            short = 'i',
            long,
            help = "SSH private key path, passed to the transport via -i"
        )]
        key: Option<PathBuf>,

        #[arg(
            short = 'u',
            long,
            default_value = "root",
            help = "Remote login user"
        )]
        user: String,

        #[arg(
            long = "input",
            help = "Value for the next $N placeholder (repeatable: first --input fills $1)"
        )]
        inputs: Vec<String>,

        #[arg(
            short = 'w',
            long,
            default_value = "10",
            help = "Maximum hosts executed concurrently"
        )]
        workers: usize,
    },
}

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
use clap::Parser;
use owo_colors::OwoColorize;

use fleetsh::{
    cli::{Cli, Commands},
    commands::{
        create::{create_script, CreateScriptParams},
        delete::delete_script,
        list::list_scripts,
        run::{run_script, RunScriptParams},
    },
    utils::init_logging,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Per-host failures surface through the run summary and exit code 1;
    // an Err here is always a configuration or IO problem.
    if let Err(e) = dispatch(cli).await {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(2);
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let registry_path = cli.registry;

    match cli.command {
        Commands::Create {
            name,
            kind,
            command,
            source,
            destination,
            timeout,
            force,
        } => {
            create_script(CreateScriptParams {
                registry_path,
                name,
                kind,
                command,
                source,
                destination,
                timeout,
                force,
            })
            .await
        }
        Commands::List => list_scripts(&registry_path).await,
        Commands::Delete { name } => delete_script(&registry_path, &name).await,
        Commands::Run {
            name,
            start_ip,
            count,
            key,
            user,
            inputs,
            workers,
        } => {
            run_script(RunScriptParams {
                registry_path,
                name,
                start_ip,
                count,
                key_path: key,
                user,
                inputs,
                workers,
            })
            .await
        }
    }
}

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

//! Parallel execution framework for fleet script runs.

mod output_sync;
mod parallel;
mod reporter;
mod result_types;

pub mod invocation;
pub mod task;

// Re-export public types
pub use invocation::{substitute_inputs, Invocation, TRANSPORT_HARDENING};
pub use parallel::{FleetExecutor, HostTask};
pub use result_types::{ExecutionResult, RunSummary, TaskStatus};

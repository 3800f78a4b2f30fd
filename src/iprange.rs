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

//! Contiguous IPv4 host range expansion.

use std::net::Ipv4Addr;
use thiserror::Error;

/// Maximum number of hosts a single range may expand to.
pub const MAX_RANGE_SIZE: usize = 65_536;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid IPv4 address '{address}' (expected dotted-quad, e.g. 10.0.0.1)")]
    InvalidAddress { address: String },

    #[error("range of {requested} hosts exceeds the maximum of {} hosts", MAX_RANGE_SIZE)]
    RangeTooLarge { requested: usize },
}

/// Parse the starting address of a host range.
pub fn parse_start(address: &str) -> Result<Ipv4Addr, RangeError> {
    address
        .trim()
        .parse()
        .map_err(|_| RangeError::InvalidAddress {
            address: address.to_string(),
        })
}

/// Expand `count` consecutive addresses beginning at `start`.
///
/// Addresses are incremented as unsigned 32-bit integers, carrying across
/// octet boundaries. A range that runs past 255.255.255.255 wraps around to
/// 0.0.0.0. `count == 0` yields an empty vector.
pub fn expand_range(start: Ipv4Addr, count: usize) -> Result<Vec<Ipv4Addr>, RangeError> {
    if count > MAX_RANGE_SIZE {
        return Err(RangeError::RangeTooLarge { requested: count });
    }

    let base = u32::from(start);
    Ok((0..count as u32)
        .map(|offset| Ipv4Addr::from(base.wrapping_add(offset)))
        .collect())
}

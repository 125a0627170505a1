// FlowPath: Shortest-Path Flow Installation for SDN Controllers
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Module containing the basic type definitions

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Switch Identification (Datapath ID). The ID is unique per switch, and stable for the entire
/// lifetime of a controller session.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwitchId(pub u64);

/// Port number, unique within the scope of a single switch
pub type Port = u32;

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl From<u64> for SwitchId {
    fn from(x: u64) -> Self {
        Self(x)
    }
}

impl TryFrom<i64> for SwitchId {
    type Error = ValidationError;

    /// Datapath IDs reported as signed integers must not be negative.
    fn try_from(x: i64) -> Result<Self, Self::Error> {
        u64::try_from(x).map(Self).map_err(|_| ValidationError::InvalidSwitchId(x.to_string()))
    }
}

impl FromStr for SwitchId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidSwitchId(s.to_string()))
    }
}

/// MAC address of a host. It is parsed from the 17-character colon-separated form (case
/// insensitive), and always printed in the canonical lowercase form, e.g. `00:1b:21:3a:4f:90`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Generate a MAC address from the lower 48 bits of a number. This is how hosts in the
    /// [example topologies](crate::example_topologies) are numbered.
    pub fn from_u64(x: u64) -> Self {
        let b = x.to_be_bytes();
        Self([b[2], b[3], b[4], b[5], b[6], b[7]])
    }
}

impl FromStr for MacAddr {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidMac(s.to_string());
        if s.len() != 17 {
            return Err(invalid());
        }
        let mut bytes = [0u8; 6];
        let mut num_parts = 0;
        for (i, part) in s.split(':').enumerate() {
            if i >= bytes.len() || part.len() != 2 || !part.chars().all(|c| c.is_ascii_hexdigit())
            {
                return Err(invalid());
            }
            bytes[i] = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
            num_parts += 1;
        }
        if num_parts != bytes.len() {
            return Err(invalid());
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for MacAddr {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MacAddr> for String {
    fn from(mac: MacAddr) -> Self {
        mac.to_string()
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl fmt::Debug for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Validation Errors, raised before any path is computed or any rule is installed.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ValidationError {
    /// The MAC address is not in the 17-character colon-separated form
    #[error("MAC address {0} has an invalid format")]
    InvalidMac(String),
    /// The datapath ID is not a non-negative integer
    #[error("DPID should be a positive integer value, got {0}")]
    InvalidSwitchId(String),
    /// Both hosts of a request are the same
    #[error("Cannot connect host {0} with itself")]
    SelfPath(MacAddr),
}

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

//! Module containing all error types

use crate::installer::{InstallReport, PartialInstallError};
use crate::topology::TopologyError;
use crate::{MacAddr, SwitchId, ValidationError};
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input, detected before any planning
    #[error("Validation Error: {0}")]
    Validation(#[from] ValidationError),
    /// The host has no known attachment point in the topology
    #[error("Host {0} has no known attachment point")]
    HostNotFound(MacAddr),
    /// There exists no path between the two switches in the current topology
    #[error("Switch {to} is not reachable from switch {from}")]
    Unreachable {
        /// Switch where the path starts
        from: SwitchId,
        /// Switch which cannot be reached
        to: SwitchId,
    },
    /// Installation failed partway, and was rolled back.
    #[error("{0}")]
    PartialInstall(#[from] PartialInstallError),
    /// The request was cancelled while installing, and was rolled back.
    #[error("The request was cancelled after {} rule operations", .0.len())]
    Cancelled(InstallReport),
    /// Error propagated from the topology
    #[error("Topology Error: {0}")]
    Topology(#[from] TopologyError),
}

impl Error {
    /// Returns true if the error happened before any rule was sent to a switch.
    pub fn is_before_install(&self) -> bool {
        !matches!(self, Self::PartialInstall(_) | Self::Cancelled(_))
    }
}

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

#![deny(missing_docs, missing_debug_implementations)]

//! # Topology
//!
//! This module contains the read-only view on the switch topology, which the
//! [planner](crate::planner) uses to compute paths. The view is supplied by a discovery service,
//! which learns the switches, the links between them and where each host is attached. The
//! [`Topology`] struct is an implementation of [`TopologyView`], which is built either by hand,
//! or from a JSON file (see [`TopologyFile`]).
//!
//! ```rust
//! use flowpath::topology::{Link, Topology, TopologyView};
//! use flowpath::SwitchId;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut t = Topology::new();
//!     t.add_switch(SwitchId(1))?;
//!     t.add_switch(SwitchId(2))?;
//!     t.add_link(Link::new(SwitchId(1), 2, SwitchId(2), 1).with_weight(5))?;
//!
//!     let neighbours = t.get_neighbours(SwitchId(1))?;
//!     assert_eq!(neighbours.len(), 1);
//!     assert_eq!(neighbours[0].switch, SwitchId(2));
//!     assert_eq!(neighbours[0].local_port, 2);
//!     assert_eq!(neighbours[0].remote_port, 1);
//!     assert_eq!(neighbours[0].weight, 5);
//!     Ok(())
//! }
//! ```

mod file;
mod graph;

pub use file::{HostEntry, LinkEntry, TopologyFile};
pub use graph::{SwitchGraph, Topology};

use crate::{MacAddr, Port, SwitchId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Link weight used for computing the shortest path
pub type LinkWeight = u32;

/// Weight of a link, if no weight is configured explicitly.
pub const DEFAULT_LINK_WEIGHT: LinkWeight = 1;

/// # Link
/// Undirected link between two switches, connecting port `port_a` on switch `a` with port
/// `port_b` on switch `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Link {
    /// First switch
    pub a: SwitchId,
    /// Port on the first switch
    pub port_a: Port,
    /// Second switch
    pub b: SwitchId,
    /// Port on the second switch
    pub port_b: Port,
    /// Cost of using the link
    pub weight: LinkWeight,
}

impl Link {
    /// Create a new link with the default weight of 1.
    pub fn new(a: SwitchId, port_a: Port, b: SwitchId, port_b: Port) -> Self {
        Self { a, port_a, b, port_b, weight: DEFAULT_LINK_WEIGHT }
    }

    /// Change the weight of the link
    pub fn with_weight(mut self, weight: LinkWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Returns the port of the link on the given switch, or `None` if the link is not connected to
    /// that switch.
    pub fn port_at(&self, switch: SwitchId) -> Option<Port> {
        if switch == self.a {
            Some(self.port_a)
        } else if switch == self.b {
            Some(self.port_b)
        } else {
            None
        }
    }

    /// Returns the switch and port on the other end of the link, seen from the given switch.
    pub fn other_end(&self, switch: SwitchId) -> Option<(SwitchId, Port)> {
        if switch == self.a {
            Some((self.b, self.port_b))
        } else if switch == self.b {
            Some((self.a, self.port_a))
        } else {
            None
        }
    }

    /// Returns true if the link connects the two `(switch, port)` pairs, in any direction.
    pub fn connects(&self, x: (SwitchId, Port), y: (SwitchId, Port)) -> bool {
        ((self.a, self.port_a) == x && (self.b, self.port_b) == y)
            || ((self.a, self.port_a) == y && (self.b, self.port_b) == x)
    }
}

/// Point where a host is connected to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostAttachment {
    /// Switch to which the host is connected
    pub switch: SwitchId,
    /// Port on the switch facing the host
    pub port: Port,
}

/// Adjacent switch, seen from a specific switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Neighbour {
    /// The neighbouring switch
    pub switch: SwitchId,
    /// Port on the local switch, facing the neighbour
    pub local_port: Port,
    /// Port on the neighbouring switch, facing back
    pub remote_port: Port,
    /// Weight of the link
    pub weight: LinkWeight,
}

/// # Topology View
///
/// Read-only snapshot of the switch topology. The view is shared between concurrent requests,
/// and it is never modified by the planner or the installer.
pub trait TopologyView: Sync {
    /// Returns the attachment point of the host, or `None` if the host is currently not located.
    fn get_attachment(&self, mac: &MacAddr) -> Option<HostAttachment>;

    /// Returns all links in the topology.
    fn get_links(&self) -> Vec<Link>;

    /// Returns all neighbours of the switch, ordered by the neighbour switch id, and then by the
    /// local port. If the switch is not part of the topology, an error is returned.
    fn get_neighbours(&self, switch: SwitchId) -> Result<Vec<Neighbour>, TopologyError>;

    /// Returns all switches in the topology, in ascending order.
    fn get_switches(&self) -> Vec<SwitchId>;
}

/// Topology Errors
#[derive(Error, Debug)]
pub enum TopologyError {
    /// Switch is not present in the topology
    #[error("Switch was not found in topology: {0}")]
    SwitchNotFound(SwitchId),
    /// Switch was already added to the topology
    #[error("Switch {0} already exists")]
    SwitchAlreadyExists(SwitchId),
    /// A link must connect two different switches
    #[error("Link from {0} to itself is not allowed")]
    SelfLoop(SwitchId),
    /// Link weights must be strictly positive
    #[error("Link between {0} and {1} has an invalid weight")]
    InvalidWeight(SwitchId, SwitchId),
    /// The port is already used by another link
    #[error("Port {1} on switch {0} is already used by another link")]
    PortInUse(SwitchId, Port),
    /// No link is connected to the port
    #[error("No link connected to port {1} on switch {0}")]
    NoLinkAtPort(SwitchId, Port),
    /// Cannot read or write the topology file
    #[error("Cannot access the topology file: {0}")]
    Io(#[from] std::io::Error),
    /// Cannot parse the topology file
    #[error("Cannot parse the topology file: {0}")]
    Json(#[from] serde_json::Error),
    /// The number of switches of a generated topology does not fit into a switch id
    #[error("Topology of size {0} has too many switches")]
    SizeTooLarge(usize),
}

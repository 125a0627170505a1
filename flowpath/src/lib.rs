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

#![deny(missing_docs)]

//! # FlowPath: Shortest-Path Flow Installation for SDN Controllers
//! This is a library for connecting two hosts in an OpenFlow-style network. It computes the
//! least-cost path between the switches the hosts are attached to, translates the path into
//! per-switch forwarding rules, and installs them on the switches. If the installation fails
//! halfway, all rules installed by the same request are removed again.
//!
//! ## Structure
//!
//! This library is structured in the following way:
//!
//! - **[`Topology`](topology)**: Read-only view on the switch graph, the links between switches
//!   and the attachment points of the hosts (see [`TopologyView`](topology::TopologyView)). The
//!   struct [`Topology`](topology::Topology) is an implementation backed by a petgraph graph,
//!   which can also be loaded from a JSON file (see [`TopologyFile`](topology::TopologyFile)).
//!
//! - **[`Planner`](planner)**: Computes the shortest [`Path`](planner::Path) between two hosts,
//!   using Dijkstra's algorithm. Ties between equal-cost paths are broken deterministically.
//!
//! - **[`Installer`](installer)**: Translates the paths into [`FlowRules`](installer::FlowRule)
//!   and installs them using a [`ControlChannel`](installer::ControlChannel). On failure, all
//!   rules of the request are rolled back.
//!
//! - **[`Service`](service)**: The [`PathService`](service::PathService) combines the planner
//!   and the installer for bidirectional host-to-host requests.
//!
//! - **[`Control`](control)**: In-memory control channel, storing the flow tables of all switches.
//!   Faults and timeouts can be injected.
//!
//! - **[`ExampleTopologies`](example_topologies)**: Collection of prepared topologies, which can be
//!   scaled to arbitrary size.
//!
//! ## Usage
//!
//! ```
//! use flowpath::control::MemoryControlChannel;
//! use flowpath::service::PathService;
//! use flowpath::topology::{Link, Topology};
//! use flowpath::{Error, SwitchId};
//!
//! fn main() -> Result<(), Error> {
//!     let (s1, s2, s3) = (SwitchId(1), SwitchId(2), SwitchId(3));
//!
//!     // prepare the topology
//!     let mut topo = Topology::new();
//!     topo.add_switch(s1)?;
//!     topo.add_switch(s2)?;
//!     topo.add_switch(s3)?;
//!     topo.add_link(Link::new(s1, 2, s2, 1))?;
//!     topo.add_link(Link::new(s2, 2, s3, 1))?;
//!     topo.attach_host("00:00:00:00:00:01".parse()?, s1, 1)?;
//!     topo.attach_host("00:00:00:00:00:02".parse()?, s3, 2)?;
//!
//!     // connect both hosts
//!     let channel = MemoryControlChannel::from_topology(&topo);
//!     let service = PathService::new(&topo, &channel);
//!     let report = service.connect("00:00:00:00:00:01", "00:00:00:00:00:02")?;
//!
//!     // three rules in each direction
//!     assert_eq!(report.installed_rules().len(), 6);
//!     assert_eq!(channel.num_rules(), 6);
//!
//!     Ok(())
//! }
//! ```

pub mod control;
mod error;
pub mod example_topologies;
pub mod installer;
pub mod planner;
pub mod printer;
pub mod service;
mod test;
pub mod topology;
mod types;

pub use error::Error;
pub use types::{MacAddr, Port, SwitchId, ValidationError};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Stopper, to cancel an ongoing request from a different thread. All clones share the same
/// flag. The flag is never reset: once stopped, every later request using this stopper is
/// cancelled before its first rule operation. Use a new stopper to continue.
#[derive(Clone, Debug, Default)]
pub struct Stopper {
    b: Arc<AtomicBool>,
}

impl Stopper {
    /// Create a new stopper
    pub fn new() -> Self {
        Self { b: Arc::new(AtomicBool::new(false)) }
    }

    /// Send the stop command. Every request sharing this stopper will roll back before issuing
    /// its next rule operation.
    pub fn send_stop(&self) {
        self.b.store(true, Ordering::SeqCst);
    }

    /// Checks if the stop flag is set.
    pub fn is_stop(&self) -> bool {
        self.b.load(Ordering::SeqCst)
    }
}

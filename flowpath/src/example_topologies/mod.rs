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

//! Topologies for testing
//!
//! Every switch `s` in these topologies has exactly one host attached, with the MAC address
//! [`host_mac(s)`](host_mac).

use crate::topology::{Topology, TopologyError};
use crate::{MacAddr, SwitchId};

mod linear;
pub use linear::LinearTopology;

mod ring;
pub use ring::RingTopology;

mod grid;
pub use grid::GridTopology;

mod disconnected;
pub use disconnected::DisconnectedTopology;

/// Trait for easier access to example topologies.
pub trait ExampleTopology {
    /// Get the topology of the chosen size.
    fn topology(size: usize) -> Result<Topology, TopologyError>;
    /// Get the two hosts which are furthest apart (or not connected at all).
    fn endpoints(size: usize) -> (MacAddr, MacAddr);
}

/// MAC address of the host attached to the switch.
pub fn host_mac(switch: SwitchId) -> MacAddr {
    MacAddr::from_u64(switch.0)
}

/// Add the switches `first..=last`, each with a host attached to `host_port`.
fn add_switches_with_hosts(
    t: &mut Topology,
    first: u64,
    last: u64,
    host_port: u32,
) -> Result<(), TopologyError> {
    for id in first..=last {
        t.add_switch(SwitchId(id))?;
        t.attach_host(host_mac(SwitchId(id)), SwitchId(id), host_port)?;
    }
    Ok(())
}

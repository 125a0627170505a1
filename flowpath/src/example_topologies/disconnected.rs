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

//! # Disconnected Topology

use super::{add_switches_with_hosts, host_mac, ExampleTopology};
use crate::topology::{Link, Topology, TopologyError};
use crate::{MacAddr, SwitchId};

/// # Disconnected Topology
/// Two separate linear islands, each with `size` switches: `s1 ... sn` and `s(n+1) ... s(2n)`.
/// Ports are assigned as in the [`LinearTopology`](super::LinearTopology).
#[derive(Debug)]
pub struct DisconnectedTopology {}

impl ExampleTopology for DisconnectedTopology {
    fn topology(size: usize) -> Result<Topology, TopologyError> {
        let n = size as u64;
        let num_switches = n.checked_mul(2).ok_or(TopologyError::SizeTooLarge(size))?;
        let mut t = Topology::new();
        add_switches_with_hosts(&mut t, 1, num_switches, 3)?;
        for i in (1..n).chain(n + 1..num_switches) {
            t.add_link(Link::new(SwitchId(i), 2, SwitchId(i + 1), 1))?;
        }
        Ok(t)
    }

    /// The first switch of each island.
    fn endpoints(size: usize) -> (MacAddr, MacAddr) {
        (host_mac(SwitchId(1)), host_mac(SwitchId(size as u64 + 1)))
    }
}

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

//! # Ring Topology

use super::{add_switches_with_hosts, host_mac, ExampleTopology};
use crate::topology::{Link, Topology, TopologyError};
use crate::{MacAddr, SwitchId};

/// # Ring Topology
/// Like the [`LinearTopology`](super::LinearTopology), but port 2 of the last switch is connected
/// to port 1 of the first one. Rings with less than three switches are not closed.
///
/// For even sizes, both ways around the ring have the same cost for the two endpoints.
#[derive(Debug)]
pub struct RingTopology {}

impl ExampleTopology for RingTopology {
    fn topology(size: usize) -> Result<Topology, TopologyError> {
        let n = size as u64;
        let mut t = Topology::new();
        add_switches_with_hosts(&mut t, 1, n, 3)?;
        for i in 1..n {
            t.add_link(Link::new(SwitchId(i), 2, SwitchId(i + 1), 1))?;
        }
        if n >= 3 {
            t.add_link(Link::new(SwitchId(n), 2, SwitchId(1), 1))?;
        }
        Ok(t)
    }

    /// The first switch, and the one opposite to it.
    fn endpoints(size: usize) -> (MacAddr, MacAddr) {
        (host_mac(SwitchId(1)), host_mac(SwitchId(size as u64 / 2 + 1)))
    }
}

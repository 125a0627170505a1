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

//! # Linear Topology

use super::{add_switches_with_hosts, host_mac, ExampleTopology};
use crate::topology::{Link, Topology, TopologyError};
use crate::{MacAddr, SwitchId};

/// # Linear Topology
///
/// ```text
/// h1      h2      h3           hn
///  |3      |3      |3           |3
/// s1 2---1 s2 2---1 s3 2-- ... 1 sn
/// ```
#[derive(Debug)]
pub struct LinearTopology {}

impl ExampleTopology for LinearTopology {
    fn topology(size: usize) -> Result<Topology, TopologyError> {
        let n = size as u64;
        let mut t = Topology::new();
        add_switches_with_hosts(&mut t, 1, n, 3)?;
        for i in 1..n {
            t.add_link(Link::new(SwitchId(i), 2, SwitchId(i + 1), 1))?;
        }
        Ok(t)
    }

    fn endpoints(size: usize) -> (MacAddr, MacAddr) {
        (host_mac(SwitchId(1)), host_mac(SwitchId(size as u64)))
    }
}

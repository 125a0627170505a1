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

//! # Grid Topology

use super::{add_switches_with_hosts, host_mac, ExampleTopology};
use crate::topology::{Link, Topology, TopologyError};
use crate::{MacAddr, SwitchId};

/// # Grid Topology
/// Square grid of `size x size` switches. The switch in row `r` and column `c` has the id
/// `r * size + c + 1`. Ports are numbered clockwise: 1 faces north, 2 east, 3 south and 4 west.
/// The host is attached to port 5.
/// Sizes whose number of switches overflows return [`TopologyError::SizeTooLarge`].
///
/// ```text
/// s1 --- s2 --- s3
///  |      |      |
/// s4 --- s5 --- s6
///  |      |      |
/// s7 --- s8 --- s9
/// ```
#[derive(Debug)]
pub struct GridTopology {}

impl GridTopology {
    /// Returns the id of the switch at the given row and column
    pub fn switch(size: usize, row: usize, col: usize) -> SwitchId {
        SwitchId((row * size + col + 1) as u64)
    }
}

impl ExampleTopology for GridTopology {
    fn topology(size: usize) -> Result<Topology, TopologyError> {
        let num_switches = size.checked_mul(size).ok_or(TopologyError::SizeTooLarge(size))?;
        let mut t = Topology::new();
        add_switches_with_hosts(&mut t, 1, num_switches as u64, 5)?;
        for row in 0..size {
            for col in 0..size {
                let here = Self::switch(size, row, col);
                if col + 1 < size {
                    t.add_link(Link::new(here, 2, Self::switch(size, row, col + 1), 4))?;
                }
                if row + 1 < size {
                    t.add_link(Link::new(here, 3, Self::switch(size, row + 1, col), 1))?;
                }
            }
        }
        Ok(t)
    }

    /// The top-left and the bottom-right corner.
    fn endpoints(size: usize) -> (MacAddr, MacAddr) {
        let n = size as u64;
        (host_mac(SwitchId(1)), host_mac(SwitchId(n.saturating_mul(n))))
    }
}

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

//! Test the shape of the example topologies

use crate::example_topologies::*;
use crate::topology::{HostAttachment, TopologyError, TopologyView};
use crate::SwitchId;

#[test]
fn test_linear() {
    let t = LinearTopology::topology(5).unwrap();
    assert_eq!(t.num_switches(), 5);
    assert_eq!(t.num_links(), 4);
    assert_eq!(t.hosts().count(), 5);
    let (a, b) = LinearTopology::endpoints(5);
    assert_eq!(t.get_attachment(&a), Some(HostAttachment { switch: SwitchId(1), port: 3 }));
    assert_eq!(t.get_attachment(&b), Some(HostAttachment { switch: SwitchId(5), port: 3 }));
}

#[test]
fn test_empty() {
    let t = LinearTopology::topology(0).unwrap();
    assert_eq!(t.num_switches(), 0);
    let t = LinearTopology::topology(1).unwrap();
    assert_eq!(t.num_switches(), 1);
    assert_eq!(t.num_links(), 0);
}

#[test]
fn test_ring() {
    let t = RingTopology::topology(6).unwrap();
    assert_eq!(t.num_switches(), 6);
    assert_eq!(t.num_links(), 6);
    for s in t.get_switches() {
        assert_eq!(t.get_neighbours(s).unwrap().len(), 2);
    }
    // rings that are too small stay open
    assert_eq!(RingTopology::topology(2).unwrap().num_links(), 1);
}

#[test]
fn test_grid() {
    let t = GridTopology::topology(4).unwrap();
    assert_eq!(t.num_switches(), 16);
    assert_eq!(t.num_links(), 24);
    assert_eq!(GridTopology::switch(4, 2, 1), SwitchId(10));
    // corner, edge and center switches
    assert_eq!(t.get_neighbours(SwitchId(1)).unwrap().len(), 2);
    assert_eq!(t.get_neighbours(SwitchId(2)).unwrap().len(), 3);
    assert_eq!(t.get_neighbours(SwitchId(6)).unwrap().len(), 4);
    let (_, b) = GridTopology::endpoints(4);
    assert_eq!(t.get_attachment(&b), Some(HostAttachment { switch: SwitchId(16), port: 5 }));
}

#[test]
fn test_grid_too_large() {
    assert!(matches!(
        GridTopology::topology(usize::MAX),
        Err(TopologyError::SizeTooLarge(n)) if n == usize::MAX
    ));
    // the endpoints do not overflow either
    let (a, _) = GridTopology::endpoints(usize::MAX);
    assert_eq!(a, host_mac(SwitchId(1)));
}

#[test]
fn test_disconnected() {
    let t = DisconnectedTopology::topology(3).unwrap();
    assert_eq!(t.num_switches(), 6);
    assert_eq!(t.num_links(), 4);
    assert!(t.link_at(SwitchId(3), 2).is_none());
    let (a, b) = DisconnectedTopology::endpoints(3);
    assert_eq!(a, host_mac(SwitchId(1)));
    assert_eq!(b, host_mac(SwitchId(4)));
}

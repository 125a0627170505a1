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

//! Test the path computation

use crate::example_topologies::*;
use crate::planner::{compute_bidirectional, compute_path, Path, PathHop};
use crate::topology::{Link, Topology, TopologyView};
use crate::{Error, MacAddr, SwitchId};

use lazy_static::lazy_static;
use petgraph::algo::dijkstra;
use petgraph::visit::EdgeRef;
use rand::prelude::*;

lazy_static! {
    static ref S1: SwitchId = 1.into();
    static ref S2: SwitchId = 2.into();
    static ref S3: SwitchId = 3.into();
    static ref S4: SwitchId = 4.into();
    static ref A: MacAddr = "00:00:00:00:00:0a".parse().unwrap();
    static ref B: MacAddr = "00:00:00:00:00:0b".parse().unwrap();
}

/// # Linear topology
///
/// ```text
///  A                           B
///  |1                          |1
/// s1 2 ---- 1 s2 2 ---- 1 s3 --'
/// ```
///
/// Host B is discovered behind port 1 of s3, the same port that leads to s2.
fn get_linear_topo() -> Topology {
    let mut t = Topology::new();
    t.add_switch(*S1).unwrap();
    t.add_switch(*S2).unwrap();
    t.add_switch(*S3).unwrap();
    t.add_link(Link::new(*S1, 2, *S2, 1)).unwrap();
    t.add_link(Link::new(*S2, 2, *S3, 1)).unwrap();
    t.attach_host(*A, *S1, 1).unwrap();
    t.attach_host(*B, *S3, 1).unwrap();
    t
}

/// Checks that the path starts and ends at the attachment points, and that every two consecutive
/// hops are connected by a link. Returns the sum of the link weights.
fn check_path(path: &Path, t: &Topology) -> u64 {
    let src = t.get_attachment(&path.src).unwrap();
    let dst = t.get_attachment(&path.dst).unwrap();
    let first = path.hops.first().unwrap();
    let last = path.hops.last().unwrap();
    assert_eq!((first.switch, first.in_port), (src.switch, src.port));
    assert_eq!((last.switch, last.out_port), (dst.switch, dst.port));

    let links = t.get_links();
    let mut cost = 0;
    for w in path.hops.windows(2) {
        let link = links
            .iter()
            .find(|l| l.connects((w[0].switch, w[0].out_port), (w[1].switch, w[1].in_port)))
            .unwrap_or_else(|| panic!("No link between {:?} and {:?}", w[0], w[1]));
        cost += u64::from(link.weight);
    }
    cost
}

#[test]
fn test_linear() {
    let t = get_linear_topo();
    let path = compute_path(&A, &B, &t).unwrap();
    assert_eq!(
        path.hops,
        vec![PathHop::new(*S1, 1, 2), PathHop::new(*S2, 1, 2), PathHop::new(*S3, 1, 1)]
    );
    assert_eq!(path.cost, 2);
    assert_eq!(path.switches(), vec![*S1, *S2, *S3]);
    assert_eq!(check_path(&path, &t), 2);
}

#[test]
fn test_linear_reverse() {
    let t = get_linear_topo();
    let (ab, ba) = compute_bidirectional(&A, &B, &t).unwrap();
    assert_eq!(ab, compute_path(&A, &B, &t).unwrap());
    assert_eq!(ba.src, *B);
    assert_eq!(ba.dst, *A);
    assert_eq!(
        ba.hops,
        vec![PathHop::new(*S3, 1, 1), PathHop::new(*S2, 2, 1), PathHop::new(*S1, 2, 1)]
    );
    assert_eq!(ba.len(), ab.len());
}

#[test]
fn test_same_switch() {
    let mut t = get_linear_topo();
    t.attach_host(*B, *S1, 4).unwrap();
    let path = compute_path(&A, &B, &t).unwrap();
    assert_eq!(path.hops, vec![PathHop::new(*S1, 1, 4)]);
    assert_eq!(path.cost, 0);
    let path = compute_path(&B, &A, &t).unwrap();
    assert_eq!(path.hops, vec![PathHop::new(*S1, 4, 1)]);

    // both hosts behind the same port
    t.attach_host(*B, *S1, 1).unwrap();
    let path = compute_path(&A, &B, &t).unwrap();
    assert_eq!(path.hops, vec![PathHop::new(*S1, 1, 1)]);
}

#[test]
fn test_host_not_found() {
    let t = get_linear_topo();
    let c = MacAddr::from_u64(0xc);
    assert!(matches!(compute_path(&A, &c, &t), Err(Error::HostNotFound(x)) if x == c));
    assert!(matches!(compute_path(&c, &A, &t), Err(Error::HostNotFound(x)) if x == c));
    assert!(matches!(compute_bidirectional(&c, &B, &t), Err(Error::HostNotFound(x)) if x == c));
}

#[test]
fn test_unreachable() {
    let t = DisconnectedTopology::topology(2).unwrap();
    let (a, b) = DisconnectedTopology::endpoints(2);
    assert!(matches!(
        compute_path(&a, &b, &t),
        Err(Error::Unreachable { from, to }) if from == *S1 && to == *S3
    ));
    assert!(matches!(
        compute_bidirectional(&b, &a, &t),
        Err(Error::Unreachable { from, to }) if from == *S3 && to == *S1
    ));

    // within one island
    let path = compute_path(&a, &host_mac(*S2), &t).unwrap();
    assert_eq!(path.switches(), vec![*S1, *S2]);
}

#[test]
fn test_removed_link() {
    let mut t = get_linear_topo();
    t.remove_link(*S2, 2).unwrap();
    assert!(matches!(compute_path(&A, &B, &t), Err(Error::Unreachable { .. })));
}

#[test]
fn test_weights() {
    // s1 -- s2 with weight 5, and s1 -- s3 -- s2 with weight 1 each
    let mut t = Topology::new();
    t.add_switch(*S1).unwrap();
    t.add_switch(*S2).unwrap();
    t.add_switch(*S3).unwrap();
    t.add_link(Link::new(*S1, 1, *S2, 1).with_weight(5)).unwrap();
    t.add_link(Link::new(*S1, 2, *S3, 1)).unwrap();
    t.add_link(Link::new(*S3, 2, *S2, 2)).unwrap();
    t.attach_host(*A, *S1, 3).unwrap();
    t.attach_host(*B, *S2, 3).unwrap();

    let path = compute_path(&A, &B, &t).unwrap();
    assert_eq!(
        path.hops,
        vec![PathHop::new(*S1, 3, 2), PathHop::new(*S3, 1, 2), PathHop::new(*S2, 2, 3)]
    );
    assert_eq!(path.cost, 2);

    // make the direct link cheaper
    t.remove_link(*S1, 1).unwrap();
    t.add_link(Link::new(*S1, 1, *S2, 1)).unwrap();
    let path = compute_path(&A, &B, &t).unwrap();
    assert_eq!(path.hops, vec![PathHop::new(*S1, 3, 1), PathHop::new(*S2, 1, 3)]);
    assert_eq!(path.cost, 1);
}

#[test]
fn test_tie_lowest_predecessor() {
    // both ways around the ring have cost 2. The path via s2 is chosen, in both directions.
    let t = RingTopology::topology(4).unwrap();
    let (a, b) = RingTopology::endpoints(4);
    assert_eq!(b, host_mac(*S3));
    let (ab, ba) = compute_bidirectional(&a, &b, &t).unwrap();
    assert_eq!(
        ab.hops,
        vec![PathHop::new(*S1, 3, 2), PathHop::new(*S2, 1, 2), PathHop::new(*S3, 1, 3)]
    );
    assert_eq!(
        ba.hops,
        vec![PathHop::new(*S3, 3, 1), PathHop::new(*S2, 2, 1), PathHop::new(*S1, 2, 3)]
    );
}

#[test]
fn test_tie_parallel_links() {
    let mut t = Topology::new();
    t.add_switch(*S1).unwrap();
    t.add_switch(*S2).unwrap();
    t.add_link(Link::new(*S1, 3, *S2, 4)).unwrap();
    t.add_link(Link::new(*S1, 2, *S2, 1)).unwrap();
    t.attach_host(*A, *S1, 1).unwrap();
    t.attach_host(*B, *S2, 5).unwrap();

    let (ab, ba) = compute_bidirectional(&A, &B, &t).unwrap();
    assert_eq!(ab.hops, vec![PathHop::new(*S1, 1, 2), PathHop::new(*S2, 1, 5)]);
    assert_eq!(ba.hops, vec![PathHop::new(*S2, 5, 1), PathHop::new(*S1, 2, 1)]);

    // a cheaper parallel link wins, regardless of its port
    t.remove_link(*S1, 3).unwrap();
    t.remove_link(*S1, 2).unwrap();
    t.add_link(Link::new(*S1, 3, *S2, 4).with_weight(1)).unwrap();
    t.add_link(Link::new(*S1, 2, *S2, 1).with_weight(2)).unwrap();
    let path = compute_path(&A, &B, &t).unwrap();
    assert_eq!(path.hops, vec![PathHop::new(*S1, 1, 3), PathHop::new(*S2, 4, 5)]);
}

#[test]
fn test_grid() {
    let t = GridTopology::topology(3).unwrap();
    let (a, b) = GridTopology::endpoints(3);
    let path = compute_path(&a, &b, &t).unwrap();
    assert_eq!(path.cost, 4);
    assert_eq!(
        path.hops,
        vec![
            PathHop::new(SwitchId(1), 5, 2),
            PathHop::new(SwitchId(2), 4, 2),
            PathHop::new(SwitchId(3), 4, 3),
            PathHop::new(SwitchId(6), 1, 3),
            PathHop::new(SwitchId(9), 1, 5),
        ]
    );
    assert_eq!(check_path(&path, &t), 4);
}

#[test]
fn test_deterministic() {
    let t = GridTopology::topology(5).unwrap();
    let (a, b) = GridTopology::endpoints(5);
    let first = compute_path(&a, &b, &t).unwrap();
    let copy = t.clone();
    for _ in 0..10 {
        assert_eq!(compute_path(&a, &b, &t).unwrap(), first);
        assert_eq!(compute_path(&a, &b, &copy).unwrap(), first);
    }
}

#[test]
fn test_random_topologies() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let num_switches = rng.gen_range(2, 12);
        let num_links = rng.gen_range(1, 3 * num_switches);
        let mut t = Topology::new();
        let mut next_port = vec![2; num_switches as usize + 1];
        for i in 1..=num_switches {
            t.add_switch(SwitchId(i)).unwrap();
            t.attach_host(host_mac(SwitchId(i)), SwitchId(i), 1).unwrap();
        }
        for _ in 0..num_links {
            let a = rng.gen_range(1, num_switches + 1);
            let b = rng.gen_range(1, num_switches + 1);
            if a == b {
                continue;
            }
            let weight = rng.gen_range(1, 10);
            let (port_a, port_b) = (next_port[a as usize], next_port[b as usize]);
            let link = Link::new(SwitchId(a), port_a, SwitchId(b), port_b).with_weight(weight);
            t.add_link(link).unwrap();
            next_port[a as usize] += 1;
            next_port[b as usize] += 1;
        }

        let src = rng.gen_range(1, num_switches + 1);
        let dst = rng.gen_range(1, num_switches + 1);
        let (src_mac, dst_mac) = (host_mac(SwitchId(src)), host_mac(SwitchId(dst)));

        let g = t.graph();
        let start = t.node_index(SwitchId(src)).unwrap();
        let target = t.node_index(SwitchId(dst)).unwrap();
        let expected = dijkstra(g, start, Some(target), |e| u64::from(e.weight().weight));

        match (compute_path(&src_mac, &dst_mac, &t), expected.get(&target)) {
            (Ok(path), Some(cost)) => {
                assert_eq!(path.cost, *cost);
                assert_eq!(check_path(&path, &t), *cost);
                let back = compute_path(&dst_mac, &src_mac, &t).unwrap();
                assert_eq!(back.cost, *cost);
                assert_eq!(check_path(&back, &t), *cost);
                // no switch is visited twice
                let mut switches = path.switches();
                switches.sort();
                switches.dedup();
                assert_eq!(switches.len(), path.len());
            }
            (Err(Error::Unreachable { from, to }), None) => {
                assert_eq!(from, SwitchId(src));
                assert_eq!(to, SwitchId(dst));
            }
            (result, cost) => panic!("Unexpected result {:?}, expected cost {:?}", result, cost),
        }
    }
}

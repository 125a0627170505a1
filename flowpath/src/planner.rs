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

//! # Path Planner
//!
//! This module computes the least-cost path between the attachment points of two hosts. It uses
//! Dijkstra's algorithm over the undirected switch graph, where every link has the weight
//! configured in the topology (by default 1).
//!
//! Ties between equal-cost paths are broken deterministically: when a switch can be reached
//! from two predecessors with the same cost, the predecessor with the lowest [`SwitchId`] is
//! chosen. Among parallel links to the same predecessor, the one with the lowest port on the
//! predecessor wins.
//!
//! The path from `B` to `A` is never derived by reversing the path from `A` to `B`. The ingress
//! and egress ports swap their meaning, and the tie breaking starts at the other end, so both
//! directions are computed separately (see [`compute_bidirectional`]).

use crate::topology::TopologyView;
use crate::{Error, MacAddr, Port, SwitchId};

use log::*;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Single hop of a path. `in_port` faces the previous hop (or the source host), and `out_port`
/// faces the next hop (or the destination host).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathHop {
    /// Switch of this hop
    pub switch: SwitchId,
    /// Port where the traffic enters the switch
    pub in_port: Port,
    /// Port where the traffic leaves the switch
    pub out_port: Port,
}

impl PathHop {
    /// Create a new hop
    pub fn new(switch: SwitchId, in_port: Port, out_port: Port) -> Self {
        Self { switch, in_port, out_port }
    }
}

/// # Path
/// Ordered sequence of hops, starting at the switch where `src` is attached, and ending at the
/// switch where `dst` is attached. A path always contains at least one hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    /// Source host
    pub src: MacAddr,
    /// Destination host
    pub dst: MacAddr,
    /// Hops from the source to the destination
    pub hops: Vec<PathHop>,
    /// Sum of all link weights along the path
    pub cost: u64,
}

impl Path {
    /// Returns the number of hops (switches) on the path
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Returns true if the path has no hops. This is never the case for paths returned by the
    /// planner.
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Returns the switches along the path, in order.
    pub fn switches(&self) -> Vec<SwitchId> {
        self.hops.iter().map(|h| h.switch).collect()
    }
}

/// Element of the priority queue. The ordering is reversed, such that the `BinaryHeap` behaves
/// like a min-heap on `(cost, switch)`.
#[derive(Debug, PartialEq, Eq)]
struct State {
    cost: u64,
    switch: SwitchId,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.cmp(&self.cost).then_with(|| other.switch.cmp(&self.switch))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The link over which a switch is reached in the shortest path tree.
#[derive(Debug, Clone, Copy)]
struct Predecessor {
    switch: SwitchId,
    /// port on the predecessor
    out_port: Port,
    /// port on the reached switch
    in_port: Port,
}

/// Compute the least-cost path from host `src` to host `dst`. This function has no side effects.
///
/// If both hosts are attached to the same switch, the path has a single hop, with `in_port` set
/// to the port of `src` and `out_port` to the port of `dst`. If both hosts are behind the same
/// port, these ports are equal.
///
/// # Errors
/// - [`Error::HostNotFound`] if either host has no attachment point,
/// - [`Error::Unreachable`] if the switch of `dst` cannot be reached from the switch of `src`,
/// - [`Error::Topology`] if the view does not know a switch it has reported before.
pub fn compute_path<T>(src: &MacAddr, dst: &MacAddr, topology: &T) -> Result<Path, Error>
where
    T: TopologyView + ?Sized,
{
    let start = topology.get_attachment(src).ok_or(Error::HostNotFound(*src))?;
    let end = topology.get_attachment(dst).ok_or(Error::HostNotFound(*dst))?;

    if start.switch == end.switch {
        debug!("{} and {} are both attached to {}", src, dst, start.switch);
        return Ok(Path {
            src: *src,
            dst: *dst,
            hops: vec![PathHop::new(start.switch, start.port, end.port)],
            cost: 0,
        });
    }

    let (cost, predecessors) = shortest_path_tree(start.switch, end.switch, topology)?;
    let cost = cost.ok_or(Error::Unreachable { from: start.switch, to: end.switch })?;

    // walk back from the destination
    let mut hops: Vec<PathHop> = Vec::new();
    let mut current = end.switch;
    let mut out_port = end.port;
    while current != start.switch {
        let pred = predecessors
            .get(&current)
            .ok_or(Error::Unreachable { from: start.switch, to: end.switch })?;
        hops.push(PathHop::new(current, pred.in_port, out_port));
        out_port = pred.out_port;
        current = pred.switch;
    }
    hops.push(PathHop::new(start.switch, start.port, out_port));
    hops.reverse();

    debug!(
        "Path {} => {}: {:?} (cost {})",
        src,
        dst,
        hops.iter().map(|h| h.switch).collect::<Vec<_>>(),
        cost
    );

    Ok(Path { src: *src, dst: *dst, hops, cost })
}

/// Compute both directions between two hosts. The reverse path is computed as a fresh shortest
/// path from `b` to `a`. If any direction fails, the error is returned.
pub fn compute_bidirectional<T>(
    a: &MacAddr,
    b: &MacAddr,
    topology: &T,
) -> Result<(Path, Path), Error>
where
    T: TopologyView + ?Sized,
{
    let path_ab = compute_path(a, b, topology)?;
    let path_ba = compute_path(b, a, topology)?;
    Ok((path_ab, path_ba))
}

/// Dijkstra from `source` until `target` is settled. Returns the distance of the target (or
/// `None` if unreachable), and the predecessor of every switch reached so far.
fn shortest_path_tree<T>(
    source: SwitchId,
    target: SwitchId,
    topology: &T,
) -> Result<(Option<u64>, HashMap<SwitchId, Predecessor>), Error>
where
    T: TopologyView + ?Sized,
{
    let mut distances: HashMap<SwitchId, u64> = HashMap::new();
    let mut predecessors: HashMap<SwitchId, Predecessor> = HashMap::new();
    let mut settled: HashSet<SwitchId> = HashSet::new();
    let mut heap = BinaryHeap::new();

    distances.insert(source, 0);
    heap.push(State { cost: 0, switch: source });

    while let Some(State { cost, switch }) = heap.pop() {
        // skip outdated entries
        if !settled.insert(switch) {
            continue;
        }
        if switch == target {
            return Ok((Some(cost), predecessors));
        }

        for n in topology.get_neighbours(switch)? {
            if settled.contains(&n.switch) {
                continue;
            }
            let new_cost = cost + u64::from(n.weight);
            let better = match (distances.get(&n.switch), predecessors.get(&n.switch)) {
                (Some(&old_cost), Some(old)) => {
                    new_cost < old_cost
                        || (new_cost == old_cost
                            && (switch, n.local_port) < (old.switch, old.out_port))
                }
                _ => true,
            };
            if better {
                distances.insert(n.switch, new_cost);
                predecessors.insert(
                    n.switch,
                    Predecessor { switch, out_port: n.local_port, in_port: n.remote_port },
                );
                heap.push(State { cost: new_cost, switch: n.switch });
            }
        }
    }

    Ok((None, predecessors))
}

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

//! Module containing the graph-backed topology

use super::{HostAttachment, Link, Neighbour, TopologyError, TopologyFile, TopologyView};
use crate::{MacAddr, Port, SwitchId};

use log::*;
use petgraph::prelude::*;
use petgraph::stable_graph::StableGraph;
use std::collections::HashMap;

type IndexType = u32;
/// Switch graph. Each node carries the id of the switch, and each edge carries the link.
pub type SwitchGraph = StableGraph<SwitchId, Link, Undirected, IndexType>;

/// # Topology
/// The struct contains the switches, the links between them (as a petgraph graph), and the
/// attachment points of all known hosts. Every MAC address maps to at most one attachment point.
/// Attaching a host that is already known moves it to the new location.
///
/// A port on a switch can carry at most one link. However, host attachment points are not checked
/// against the links, since discovery may report a host behind a port that also leads to another
/// switch.
#[derive(Debug, Clone)]
pub struct Topology {
    graph: SwitchGraph,
    nodes: HashMap<SwitchId, NodeIndex<IndexType>>,
    hosts: HashMap<MacAddr, HostAttachment>,
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}

impl Topology {
    /// Generate an empty topology
    pub fn new() -> Self {
        Self {
            graph: SwitchGraph::with_capacity(0, 0),
            nodes: HashMap::new(),
            hosts: HashMap::new(),
        }
    }

    /// Build the topology from the description in a JSON file.
    pub fn from_file(filename: impl AsRef<str>) -> Result<Self, TopologyError> {
        TopologyFile::load(filename)?.build()
    }

    /// Add a new switch to the topology.
    pub fn add_switch(&mut self, switch: SwitchId) -> Result<(), TopologyError> {
        if self.nodes.contains_key(&switch) {
            return Err(TopologyError::SwitchAlreadyExists(switch));
        }
        let idx = self.graph.add_node(switch);
        self.nodes.insert(switch, idx);
        Ok(())
    }

    /// Add a link between two switches. Both switches must exist, the link must not be a self
    /// loop, its weight must be positive, and both ports must not yet be used by another link.
    pub fn add_link(&mut self, link: Link) -> Result<(), TopologyError> {
        if link.a == link.b {
            return Err(TopologyError::SelfLoop(link.a));
        }
        if link.weight == 0 {
            return Err(TopologyError::InvalidWeight(link.a, link.b));
        }
        let idx_a = self.node_index(link.a)?;
        let idx_b = self.node_index(link.b)?;
        if self.link_at(link.a, link.port_a).is_some() {
            return Err(TopologyError::PortInUse(link.a, link.port_a));
        }
        if self.link_at(link.b, link.port_b).is_some() {
            return Err(TopologyError::PortInUse(link.b, link.port_b));
        }
        debug!("Adding link {}:{} <-> {}:{}", link.a, link.port_a, link.b, link.port_b);
        self.graph.add_edge(idx_a, idx_b, link);
        Ok(())
    }

    /// Remove the link connected to the given port, and return it.
    pub fn remove_link(&mut self, switch: SwitchId, port: Port) -> Result<Link, TopologyError> {
        let idx = self.node_index(switch)?;
        let edge = self
            .graph
            .edges(idx)
            .find(|e| e.weight().port_at(switch) == Some(port))
            .map(|e| e.id())
            .ok_or(TopologyError::NoLinkAtPort(switch, port))?;
        self.graph.remove_edge(edge).ok_or(TopologyError::NoLinkAtPort(switch, port))
    }

    /// Attach a host to a port of a switch. If the host was already attached somewhere else, the
    /// old attachment point is returned.
    pub fn attach_host(
        &mut self,
        mac: MacAddr,
        switch: SwitchId,
        port: Port,
    ) -> Result<Option<HostAttachment>, TopologyError> {
        self.node_index(switch)?;
        let old = self.hosts.insert(mac, HostAttachment { switch, port });
        if let Some(old) = old {
            info!("Host {} moved from {}:{} to {}:{}", mac, old.switch, old.port, switch, port);
        }
        Ok(old)
    }

    /// Remove the attachment point of a host, and return it.
    pub fn detach_host(&mut self, mac: &MacAddr) -> Option<HostAttachment> {
        self.hosts.remove(mac)
    }

    /// Returns an iterator over all hosts and their attachment points.
    pub fn hosts(&self) -> impl Iterator<Item = (&MacAddr, &HostAttachment)> {
        self.hosts.iter()
    }

    /// Returns the number of switches in the topology
    pub fn num_switches(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of links in the topology
    pub fn num_links(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the link connected to the given port, if any.
    pub fn link_at(&self, switch: SwitchId, port: Port) -> Option<Link> {
        let idx = *self.nodes.get(&switch)?;
        self.graph.edges(idx).map(|e| *e.weight()).find(|l| l.port_at(switch) == Some(port))
    }

    /// Returns a reference to the switch graph (PetGraph struct)
    pub fn graph(&self) -> &SwitchGraph {
        &self.graph
    }

    /// Returns the index of the switch inside the graph
    pub fn node_index(&self, switch: SwitchId) -> Result<NodeIndex<IndexType>, TopologyError> {
        self.nodes.get(&switch).copied().ok_or(TopologyError::SwitchNotFound(switch))
    }
}

impl TopologyView for Topology {
    fn get_attachment(&self, mac: &MacAddr) -> Option<HostAttachment> {
        self.hosts.get(mac).copied()
    }

    fn get_links(&self) -> Vec<Link> {
        let mut links: Vec<Link> =
            self.graph.edge_indices().filter_map(|e| self.graph.edge_weight(e)).copied().collect();
        links.sort();
        links
    }

    fn get_neighbours(&self, switch: SwitchId) -> Result<Vec<Neighbour>, TopologyError> {
        let idx = self.node_index(switch)?;
        let mut neighbours: Vec<Neighbour> = self
            .graph
            .edges(idx)
            .filter_map(|e| {
                let link = e.weight();
                let (remote, remote_port) = link.other_end(switch)?;
                Some(Neighbour {
                    switch: remote,
                    local_port: link.port_at(switch)?,
                    remote_port,
                    weight: link.weight,
                })
            })
            .collect();
        neighbours.sort();
        Ok(neighbours)
    }

    fn get_switches(&self) -> Vec<SwitchId> {
        let mut switches: Vec<SwitchId> = self.nodes.keys().copied().collect();
        switches.sort();
        switches
    }
}

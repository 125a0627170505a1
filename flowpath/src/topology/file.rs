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

//! Module for reading and writing topologies as JSON files.
//!
//! ```json
//! {
//!   "switches": [1, 2],
//!   "links": [{ "a": 1, "port_a": 2, "b": 2, "port_b": 1, "weight": 1 }],
//!   "hosts": [{ "mac": "00:00:00:00:00:01", "switch": 1, "port": 1 }]
//! }
//! ```

use super::{Link, LinkWeight, Topology, TopologyError, TopologyView, DEFAULT_LINK_WEIGHT};
use crate::{MacAddr, Port, SwitchId};

use serde::{Deserialize, Serialize};
use std::fs;

/// Description of a topology, as it is stored in a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyFile {
    /// All switches
    pub switches: Vec<SwitchId>,
    /// All links between the switches
    #[serde(default)]
    pub links: Vec<LinkEntry>,
    /// All known hosts
    #[serde(default)]
    pub hosts: Vec<HostEntry>,
}

/// Link entry in the topology file. The weight is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
    /// First switch
    pub a: SwitchId,
    /// Port on the first switch
    pub port_a: Port,
    /// Second switch
    pub b: SwitchId,
    /// Port on the second switch
    pub port_b: Port,
    /// Cost of using the link
    #[serde(default = "default_weight")]
    pub weight: LinkWeight,
}

/// Host entry in the topology file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostEntry {
    /// MAC address of the host
    pub mac: MacAddr,
    /// Switch to which the host is connected
    pub switch: SwitchId,
    /// Port on the switch
    pub port: Port,
}

fn default_weight() -> LinkWeight {
    DEFAULT_LINK_WEIGHT
}

impl TopologyFile {
    /// Read the topology description from a JSON file
    pub fn load(filename: impl AsRef<str>) -> Result<Self, TopologyError> {
        let content = fs::read_to_string(filename.as_ref())?;
        Self::from_json(&content)
    }

    /// Parse the topology description from a JSON string
    pub fn from_json(content: &str) -> Result<Self, TopologyError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Write the topology description to a JSON file
    pub fn save(&self, filename: impl AsRef<str>) -> Result<(), TopologyError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(filename.as_ref(), content)?;
        Ok(())
    }

    /// Generate the topology. All constraints of [`Topology::add_link`] must hold.
    pub fn build(&self) -> Result<Topology, TopologyError> {
        let mut t = Topology::new();
        for switch in self.switches.iter() {
            t.add_switch(*switch)?;
        }
        for l in self.links.iter() {
            t.add_link(Link::new(l.a, l.port_a, l.b, l.port_b).with_weight(l.weight))?;
        }
        for h in self.hosts.iter() {
            t.attach_host(h.mac, h.switch, h.port)?;
        }
        Ok(t)
    }
}

impl From<&Topology> for TopologyFile {
    fn from(t: &Topology) -> Self {
        let mut hosts: Vec<HostEntry> = t
            .hosts()
            .map(|(mac, h)| HostEntry { mac: *mac, switch: h.switch, port: h.port })
            .collect();
        hosts.sort_by_key(|h| h.mac);
        Self {
            switches: t.get_switches(),
            links: t
                .get_links()
                .into_iter()
                .map(|l| LinkEntry {
                    a: l.a,
                    port_a: l.port_a,
                    b: l.b,
                    port_b: l.port_b,
                    weight: l.weight,
                })
                .collect(),
            hosts,
        }
    }
}

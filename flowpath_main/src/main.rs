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

use flowpath::control::MemoryControlChannel;
use flowpath::example_topologies::*;
use flowpath::printer;
use flowpath::service::PathService;
use flowpath::topology::{Topology, TopologyFile, TopologyView};
use flowpath::MacAddr;

use clap::{ArgEnum, Parser};
use log::*;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // run clap
    let args = CommandLineArguments::parse();

    if args.hosts.len() != 2 {
        println!("This program installs bi-directional flows between two hosts");
        println!("Expected usage: flowpath_main [OPTIONS] <hostA's MAC> <hostB's MAC>");
        return Ok(());
    }

    // initialize the env logger
    pretty_env_logger::init();

    // validate the input before looking at the topology
    let host_a: MacAddr = args.hosts[0].parse()?;
    let host_b: MacAddr = args.hosts[1].parse()?;

    let topo = get_topo(&args)?;
    info!("Topology has {} switches and {} links", topo.num_switches(), topo.num_links());

    if let Some(filename) = args.export.as_ref() {
        TopologyFile::from(&topo).save(filename)?;
        info!("Topology written to {}", filename);
    }

    let channel = MemoryControlChannel::from_topology(&topo);
    let service = PathService::new(&topo, &channel);

    if args.dry_run {
        let (path_ab, path_ba) = service.plan(host_a, host_b)?;
        println!("{}", printer::path(&path_ab));
        println!("{}", printer::path(&path_ba));
        return Ok(());
    }

    let report = service.connect_hosts(host_a, host_b)?;
    println!("Operations:");
    for line in printer::install_report(&report) {
        println!("    {}", line);
    }
    println!("Flow tables:");
    for switch in topo.get_switches() {
        for rule in channel.flow_table(switch)? {
            println!("    {}", printer::flow_rule(&rule));
        }
    }

    Ok(())
}

fn get_topo(args: &CommandLineArguments) -> Result<Topology, Box<dyn Error>> {
    if let Some(filename) = args.topology.as_ref() {
        info!("Reading the topology from {}", filename);
        return Ok(Topology::from_file(filename)?);
    }
    Ok(match args.example {
        ExampleSelection::Linear => LinearTopology::topology(args.size)?,
        ExampleSelection::Ring => RingTopology::topology(args.size)?,
        ExampleSelection::Grid => GridTopology::topology(args.size)?,
        ExampleSelection::Disconnected => DisconnectedTopology::topology(args.size)?,
    })
}

#[derive(Parser, Debug)]
#[clap(name = "FlowPath (Binary)", author = "Tibor Schneider")]
struct CommandLineArguments {
    /// JSON file describing the topology. If omitted, an example topology is used.
    #[clap(short = 't', long)]
    topology: Option<String>,
    /// Example topology, used if no topology file is given
    #[clap(short = 'e', long, arg_enum, default_value = "linear")]
    example: ExampleSelection,
    /// Size of the example topology
    #[clap(short = 'n', long, default_value = "3")]
    size: usize,
    /// Only compute and print the paths, without installing any rule
    #[clap(short = 'd', long)]
    dry_run: bool,
    /// Write the topology to a JSON file
    #[clap(long)]
    export: Option<String>,
    /// MAC addresses of the two hosts
    hosts: Vec<String>,
}

#[derive(ArgEnum, Clone, Copy, Debug)]
enum ExampleSelection {
    /// Switches connected in a line
    Linear,
    /// Switches connected in a ring
    Ring,
    /// Square grid of switches
    Grid,
    /// Two separate lines of switches
    Disconnected,
}

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

//! # Path Service
//!
//! The [`PathService`] is the entry point for callers. It connects two hosts by computing the
//! path in both directions, and installing the rules for both paths.

use crate::installer::{ControlChannel, FlowInstaller, InstallReport};
use crate::planner::{compute_bidirectional, Path};
use crate::topology::TopologyView;
use crate::{Error, MacAddr, Stopper, ValidationError};

use log::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// # Path Service
/// Orchestrates the [planner](crate::planner) and the [installer](crate::installer) for
/// bidirectional host-to-host requests. The service never retries on its own.
///
/// A request is processed synchronously, first planning both directions, then installing. If
/// planning fails in any direction, no rule is sent to any switch.
#[derive(Debug)]
pub struct PathService<'a, T: TopologyView + ?Sized, C: ControlChannel + ?Sized> {
    topology: &'a T,
    channel: &'a C,
    stopper: Stopper,
}

impl<'a, T, C> PathService<'a, T, C>
where
    T: TopologyView + ?Sized,
    C: ControlChannel + ?Sized,
{
    /// Create a new service working on the topology snapshot and the control channel.
    pub fn new(topology: &'a T, channel: &'a C) -> Self {
        Self { topology, channel, stopper: Stopper::new() }
    }

    /// Use the given stopper. Sending stop cancels all requests in progress, and rolls back their
    /// rules. Cancelling is permanent: all later requests of this service return
    /// [`Error::Cancelled`] without touching any switch.
    pub fn with_stopper(mut self, stopper: Stopper) -> Self {
        self.stopper = stopper;
        self
    }

    /// Returns the stopper used to cancel requests of this service.
    pub fn stopper(&self) -> &Stopper {
        &self.stopper
    }

    /// Connect two hosts given as strings. Both MAC addresses are validated first.
    pub fn connect(&self, host_a: &str, host_b: &str) -> Result<InstallReport, Error> {
        let host_a: MacAddr = host_a.parse()?;
        let host_b: MacAddr = host_b.parse()?;
        self.connect_hosts(host_a, host_b)
    }

    /// Compute the paths in both directions without installing anything.
    pub fn plan(&self, host_a: MacAddr, host_b: MacAddr) -> Result<(Path, Path), Error> {
        if host_a == host_b {
            return Err(ValidationError::SelfPath(host_a).into());
        }
        compute_bidirectional(&host_a, &host_b, self.topology)
    }

    /// Connect two hosts: compute the path from `host_a` to `host_b` and back, and install the
    /// rules for both. On success, the report of all operations is returned. If the installation
    /// fails, the [`PartialInstallError`](crate::installer::PartialInstallError) is returned
    /// unchanged.
    pub fn connect_hosts(&self, host_a: MacAddr, host_b: MacAddr) -> Result<InstallReport, Error> {
        let (path_ab, path_ba) = self.plan(host_a, host_b)?;
        debug!("Planned {} hops forward and {} hops back", path_ab.len(), path_ba.len());

        let report = FlowInstaller::new(self.channel)
            .with_stopper(self.stopper.clone())
            .install_bidirectional(host_a, host_b, &path_ab, &path_ba)?;

        if report.is_noop() {
            info!("{} <==> {} already connected", host_a, host_b);
        } else {
            info!("Connected {} <==> {}", host_a, host_b);
        }
        Ok(report)
    }

    /// Connect many host pairs in parallel, using `n_threads` worker threads (by default, one per
    /// CPU). The results are returned in the same order as the pairs. Pairs sharing switches are
    /// serialized only by the control channel.
    pub fn connect_many(
        &self,
        pairs: &[(MacAddr, MacAddr)],
        n_threads: Option<usize>,
    ) -> Vec<Result<InstallReport, Error>> {
        let n_threads = n_threads.unwrap_or_else(num_cpus::get).max(1).min(pairs.len().max(1));
        info!("Connecting {} host pairs using {} threads", pairs.len(), n_threads);

        let next = AtomicUsize::new(0);
        let next = &next;
        let mut results: Vec<(usize, Result<InstallReport, Error>)> = thread::scope(|s| {
            let mut handles = Vec::with_capacity(n_threads);
            for _ in 0..n_threads {
                handles.push(s.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let i = next.fetch_add(1, Ordering::SeqCst);
                        match pairs.get(i) {
                            Some((a, b)) => done.push((i, self.connect_hosts(*a, *b))),
                            None => break done,
                        }
                    }
                }));
            }
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        });

        results.sort_by_key(|(i, _)| *i);
        results.into_iter().map(|(_, r)| r).collect()
    }
}

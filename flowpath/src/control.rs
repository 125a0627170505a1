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

//! # In-memory Control Channel
//!
//! This module contains a [`ControlChannel`] which keeps the flow table of every switch in
//! memory. Each table is protected by its own mutex, which serializes concurrent requests on the
//! same switch. Faults can be injected per switch, either by letting the switch reject operations
//! ([`Fault`]), or by giving it a latency larger than the call timeout.

use crate::installer::{ChannelError, ControlChannel, FlowRule, MatchKey, RuleChange};
use crate::topology::TopologyView;
use crate::SwitchId;

use log::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// Default time to wait for an answer of a switch.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(1);

/// Fault injected on a switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Every install is rejected
    RejectInstall,
    /// Every delete is rejected
    RejectDelete,
    /// Every operation is rejected
    RejectAll,
}

#[derive(Debug, Default)]
struct SwitchState {
    table: BTreeMap<MatchKey, FlowRule>,
    fault: Option<Fault>,
    latency: Duration,
    num_operations: usize,
}

/// # Memory Control Channel
/// Stores the flow tables of all switches. The set of switches is fixed when the channel is
/// created. Operations on unknown switches fail with [`ChannelError::UnknownSwitch`].
#[derive(Debug)]
pub struct MemoryControlChannel {
    switches: HashMap<SwitchId, Mutex<SwitchState>>,
    call_timeout: Duration,
}

impl MemoryControlChannel {
    /// Create a channel connected to the given switches, all with an empty flow table.
    pub fn new(switches: impl IntoIterator<Item = SwitchId>) -> Self {
        Self {
            switches: switches
                .into_iter()
                .map(|s| (s, Mutex::new(SwitchState::default())))
                .collect(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Create a channel connected to every switch of the topology.
    pub fn from_topology<T: TopologyView + ?Sized>(topology: &T) -> Self {
        Self::new(topology.get_switches())
    }

    /// Change the timeout applied to every call.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Inject a fault on the switch, or clear it by passing `None`.
    pub fn set_fault(&self, switch: SwitchId, fault: Option<Fault>) -> Result<(), ChannelError> {
        self.state(switch)?.fault = fault;
        Ok(())
    }

    /// Set the time the switch needs to answer. If the latency is larger than the call timeout,
    /// every operation on the switch times out.
    pub fn set_latency(&self, switch: SwitchId, latency: Duration) -> Result<(), ChannelError> {
        self.state(switch)?.latency = latency;
        Ok(())
    }

    /// Returns the flow table of the switch, ordered by the match.
    pub fn flow_table(&self, switch: SwitchId) -> Result<Vec<FlowRule>, ChannelError> {
        Ok(self.state(switch)?.table.values().copied().collect())
    }

    /// Returns all rules of all switches, ordered by switch and match.
    pub fn all_rules(&self) -> Vec<FlowRule> {
        let mut switches: Vec<SwitchId> = self.switches.keys().copied().collect();
        switches.sort();
        switches.into_iter().filter_map(|s| self.flow_table(s).ok()).flatten().collect()
    }

    /// Returns the number of rules on all switches.
    pub fn num_rules(&self) -> usize {
        self.switches.keys().filter_map(|s| self.state(*s).ok()).map(|s| s.table.len()).sum()
    }

    /// Returns the number of operations (successful or not) received by the switch.
    pub fn num_operations(&self, switch: SwitchId) -> Result<usize, ChannelError> {
        Ok(self.state(switch)?.num_operations)
    }

    fn state(&self, switch: SwitchId) -> Result<MutexGuard<'_, SwitchState>, ChannelError> {
        let state = self.switches.get(&switch).ok_or(ChannelError::UnknownSwitch(switch))?;
        // every operation is a single map update, so a poisoned table is still consistent
        Ok(state.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Wait for the answer of the switch, respecting the call timeout.
    fn answer(&self, switch: SwitchId, state: &mut SwitchState) -> Result<(), ChannelError> {
        state.num_operations += 1;
        if state.latency > self.call_timeout {
            warn!("Switch {} timed out", switch);
            return Err(ChannelError::Timeout(switch, self.call_timeout));
        }
        if state.latency > Duration::from_secs(0) {
            thread::sleep(state.latency);
        }
        Ok(())
    }
}

impl ControlChannel for MemoryControlChannel {
    fn install_rule(&self, rule: &FlowRule) -> Result<RuleChange, ChannelError> {
        let mut state = self.state(rule.switch)?;
        self.answer(rule.switch, &mut state)?;
        if matches!(state.fault, Some(Fault::RejectInstall) | Some(Fault::RejectAll)) {
            return Err(ChannelError::Rejected(rule.switch, String::from("flow-mod add refused")));
        }
        Ok(match state.table.insert(rule.match_key(), *rule) {
            None => RuleChange::Added,
            Some(old) if old == *rule => RuleChange::Unchanged,
            Some(old) => RuleChange::Replaced(old),
        })
    }

    fn delete_rule(&self, rule: &FlowRule) -> Result<(), ChannelError> {
        let mut state = self.state(rule.switch)?;
        self.answer(rule.switch, &mut state)?;
        if matches!(state.fault, Some(Fault::RejectDelete) | Some(Fault::RejectAll)) {
            let reason = String::from("flow-mod delete refused");
            return Err(ChannelError::Rejected(rule.switch, reason));
        }
        let key = rule.match_key();
        if state.table.get(&key) != Some(rule) {
            return Err(ChannelError::RuleNotFound(*rule));
        }
        state.table.remove(&key);
        Ok(())
    }
}

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

//! # Flow Installer
//!
//! This module translates [paths](crate::planner::Path) into [flow rules](FlowRule), and installs
//! them on the switches using a [`ControlChannel`].
//!
//! ## Rollback
//!
//! The installer guarantees that either all rules of a request are installed, or none of them
//! persist. Every successful install is remembered together with the change it caused on the
//! switch ([`RuleChange`]). As soon as one install fails, all changes are compensated in reverse
//! order:
//!
//! - `RuleChange::Added`: the rule is deleted again.
//! - `RuleChange::Replaced(old)`: the old rule is installed again.
//! - `RuleChange::Unchanged`: nothing to do.
//!
//! An install that timed out may still have reached the switch. The failed rule is therefore
//! deleted as well, where a missing rule counts as success.
//!
//! Rollback is best-effort. A compensating operation that fails is reported in the
//! [`PartialInstallError`], but it never replaces the original error. The same rollback happens
//! when the request is cancelled using a [`Stopper`].
//!
//! Every operation sent to a switch (including the compensating ones) is recorded in the
//! [`InstallReport`].

use crate::planner::Path;
use crate::{Error, MacAddr, Port, Stopper, SwitchId};

use log::*;
use std::time::Duration;
use thiserror::Error;

/// # Flow Rule
/// Forwarding rule on a single switch: traffic destined to `dst_mac` entering at `in_port` leaves
/// at `out_port`. The match of the rule is `(dst_mac, in_port)`. Installing a rule with the same
/// match on the same switch overwrites the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowRule {
    /// Switch on which the rule is installed
    pub switch: SwitchId,
    /// Destination MAC address to match
    pub dst_mac: MacAddr,
    /// Ingress port to match
    pub in_port: Port,
    /// Output port
    pub out_port: Port,
}

/// Match of a flow rule, unique within the flow table of a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    /// Destination MAC address
    pub dst_mac: MacAddr,
    /// Ingress port
    pub in_port: Port,
}

impl FlowRule {
    /// Returns the match of the rule
    pub fn match_key(&self) -> MatchKey {
        MatchKey { dst_mac: self.dst_mac, in_port: self.in_port }
    }
}

/// Generate the rules for a path, one rule for each hop, all matching on `dst_mac`.
pub fn rules_for_path(path: &Path, dst_mac: MacAddr) -> Vec<FlowRule> {
    path.hops
        .iter()
        .map(|h| FlowRule { switch: h.switch, dst_mac, in_port: h.in_port, out_port: h.out_port })
        .collect()
}

/// Effect of installing a rule on the flow table of a switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleChange {
    /// There was no rule with the same match before.
    Added,
    /// The contained rule with the same match was overwritten.
    Replaced(FlowRule),
    /// The identical rule was already installed.
    Unchanged,
}

/// Errors reported by the control channel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The switch refused the operation
    #[error("Switch {0} rejected the operation: {1}")]
    Rejected(SwitchId, String),
    /// The switch did not answer in time
    #[error("Switch {0} did not answer within {1:?}")]
    Timeout(SwitchId, Duration),
    /// There is no connection to the switch
    #[error("Switch {0} is not connected")]
    UnknownSwitch(SwitchId),
    /// The rule to delete does not exist
    #[error("Rule does not exist: {0:?}")]
    RuleNotFound(FlowRule),
}

/// # Control Channel
///
/// Connection to the switches, used to modify their flow tables. Implementations are shared
/// between concurrent requests, so they must serialize the operations on the same switch. Every
/// call must apply a timeout, and report [`ChannelError::Timeout`] if it expires.
pub trait ControlChannel: Send + Sync {
    /// Install the rule, overwriting any rule with the same match on the same switch.
    fn install_rule(&self, rule: &FlowRule) -> Result<RuleChange, ChannelError>;

    /// Delete the rule from the switch.
    fn delete_rule(&self, rule: &FlowRule) -> Result<(), ChannelError>;
}

/// Outcome of a single operation, as recorded in the [`InstallReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The rule was installed
    Installed(RuleChange),
    /// Installing the rule failed
    Failed(ChannelError),
    /// The change caused by the rule was reverted
    RolledBack,
    /// Reverting the change failed
    RollbackFailed(ChannelError),
}

/// Single entry in the [`InstallReport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// Switch on which the operation was performed
    pub switch: SwitchId,
    /// The rule
    pub rule: FlowRule,
    /// What happened
    pub outcome: RuleOutcome,
}

/// Ordered list of all operations performed on the switches during a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    entries: Vec<AuditEntry>,
}

impl InstallReport {
    /// Returns all entries in the order in which the operations were performed.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Returns the number of recorded operations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no operation was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the rules that were installed, and not rolled back afterwards.
    pub fn installed_rules(&self) -> Vec<FlowRule> {
        let rolled_back: Vec<&FlowRule> = self
            .entries
            .iter()
            .filter(|e| e.outcome == RuleOutcome::RolledBack)
            .map(|e| &e.rule)
            .collect();
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, RuleOutcome::Installed(_)))
            .filter(|e| !rolled_back.contains(&&e.rule))
            .map(|e| e.rule)
            .collect()
    }

    /// Returns true if no operation changed any flow table.
    pub fn is_noop(&self) -> bool {
        self.entries.iter().all(|e| e.outcome == RuleOutcome::Installed(RuleChange::Unchanged))
    }

    fn push(&mut self, rule: FlowRule, outcome: RuleOutcome) {
        self.entries.push(AuditEntry { switch: rule.switch, rule, outcome });
    }
}

/// Installation failed partway. All rules installed before were rolled back (as far as
/// possible).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Installing {failed_rule:?} failed: {cause}; rolled back {} rules, {} rollback steps failed",
    .rolled_back.len(),
    .rollback_failures.len()
)]
pub struct PartialInstallError {
    /// Switch on which the installation failed
    pub failed_switch: SwitchId,
    /// Rule which could not be installed
    pub failed_rule: FlowRule,
    /// Error reported by the control channel
    pub cause: ChannelError,
    /// Rules whose change was reverted successfully
    pub rolled_back: Vec<FlowRule>,
    /// Rules whose change could not be reverted
    pub rollback_failures: Vec<(FlowRule, ChannelError)>,
    /// All operations of the request
    pub report: InstallReport,
}

/// Compensating operation for a rule sent to a switch
#[derive(Debug, Clone, Copy)]
enum Undo {
    /// The rule was added
    Delete,
    /// The rule replaced the contained one
    Restore(FlowRule),
    /// The install timed out, so the rule may or may not be on the switch
    DeleteIfPresent,
}

/// # Flow Installer
/// Installs the rules of a request using a control channel. The installer does not arbitrate
/// between concurrent requests; that is the job of the control channel.
#[derive(Debug)]
pub struct FlowInstaller<'a, C: ControlChannel + ?Sized> {
    channel: &'a C,
    stopper: Stopper,
}

impl<'a, C: ControlChannel + ?Sized> FlowInstaller<'a, C> {
    /// Create a new installer, sending all operations to the channel.
    pub fn new(channel: &'a C) -> Self {
        Self { channel, stopper: Stopper::new() }
    }

    /// Use the stopper to cancel the installation.
    pub fn with_stopper(mut self, stopper: Stopper) -> Self {
        self.stopper = stopper;
        self
    }

    /// Install the rules for both directions. The rules of `path_ab` match on `host_b`, and the
    /// rules of `path_ba` match on `host_a`. Rules are installed in path order, the forward path
    /// first.
    pub fn install_bidirectional(
        &self,
        host_a: MacAddr,
        host_b: MacAddr,
        path_ab: &Path,
        path_ba: &Path,
    ) -> Result<InstallReport, Error> {
        let mut rules = rules_for_path(path_ab, host_b);
        rules.extend(rules_for_path(path_ba, host_a));
        info!("Installing {} rules for {} <==> {}", rules.len(), host_a, host_b);
        self.install_all(&rules)
    }

    /// Install all rules in the given order. If any of them fails, or if the request is cancelled,
    /// all changes are rolled back.
    pub fn install_all(&self, rules: &[FlowRule]) -> Result<InstallReport, Error> {
        let mut report = InstallReport::default();
        let mut applied: Vec<(FlowRule, Undo)> = Vec::with_capacity(rules.len());

        for rule in rules {
            if self.stopper.is_stop() {
                warn!("Request cancelled, rolling back {} rules", applied.len());
                self.rollback(&applied, &mut report);
                return Err(Error::Cancelled(report));
            }

            match self.channel.install_rule(rule) {
                Ok(change) => {
                    debug!("Installed {:?} on {}: {:?}", rule.match_key(), rule.switch, change);
                    report.push(*rule, RuleOutcome::Installed(change));
                    match change {
                        RuleChange::Added => applied.push((*rule, Undo::Delete)),
                        RuleChange::Replaced(old) => applied.push((*rule, Undo::Restore(old))),
                        RuleChange::Unchanged => {}
                    }
                }
                Err(cause) => {
                    error!("Cannot install rule on {}: {}", rule.switch, cause);
                    report.push(*rule, RuleOutcome::Failed(cause.clone()));
                    if let ChannelError::Timeout(..) = cause {
                        applied.push((*rule, Undo::DeleteIfPresent));
                    }
                    let (rolled_back, rollback_failures) = self.rollback(&applied, &mut report);
                    return Err(Error::PartialInstall(PartialInstallError {
                        failed_switch: rule.switch,
                        failed_rule: *rule,
                        cause,
                        rolled_back,
                        rollback_failures,
                        report,
                    }));
                }
            }
        }

        Ok(report)
    }

    /// Revert all applied changes in reverse order. Returns the rules that were reverted, and the
    /// ones that failed.
    fn rollback(
        &self,
        applied: &[(FlowRule, Undo)],
        report: &mut InstallReport,
    ) -> (Vec<FlowRule>, Vec<(FlowRule, ChannelError)>) {
        let mut rolled_back = Vec::new();
        let mut failures = Vec::new();
        for (rule, undo) in applied.iter().rev() {
            let result = match undo {
                Undo::Delete => self.channel.delete_rule(rule),
                Undo::Restore(old) => self.channel.install_rule(old).map(|_| ()),
                Undo::DeleteIfPresent => match self.channel.delete_rule(rule) {
                    Err(ChannelError::RuleNotFound(_)) => Ok(()),
                    result => result,
                },
            };
            match result {
                Ok(()) => {
                    report.push(*rule, RuleOutcome::RolledBack);
                    rolled_back.push(*rule);
                }
                Err(e) => {
                    warn!("Rollback of rule on {} failed: {}", rule.switch, e);
                    report.push(*rule, RuleOutcome::RollbackFailed(e.clone()));
                    failures.push((*rule, e));
                }
            }
        }
        (rolled_back, failures)
    }
}

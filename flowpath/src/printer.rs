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

//! # Helper (printer) functions
//! Module containing helper functions to get formatted strings of paths, rules and reports.

use crate::installer::{FlowRule, InstallReport, RuleChange, RuleOutcome};
use crate::planner::Path;

use itertools::Itertools;

/// Returns the formatted path, e.g. `00:00:00:00:00:01 => s1[1->2] => s2[1->3] =>
/// 00:00:00:00:00:02`.
pub fn path(path: &Path) -> String {
    let hops = path
        .hops
        .iter()
        .map(|h| format!("{}[{}->{}]", h.switch, h.in_port, h.out_port))
        .join(" => ");
    format!("{} => {} => {}", path.src, hops, path.dst)
}

/// Returns the formatted flow rule, in the style of `ovs-ofctl dump-flows`.
pub fn flow_rule(rule: &FlowRule) -> String {
    format!(
        "{}: dl_dst={},in_port={} actions=output:{}",
        rule.switch, rule.dst_mac, rule.in_port, rule.out_port
    )
}

/// Returns one line for each entry in the report.
pub fn install_report(report: &InstallReport) -> Vec<String> {
    report
        .entries()
        .iter()
        .map(|e| {
            let outcome = match &e.outcome {
                RuleOutcome::Installed(RuleChange::Added) => String::from("added"),
                RuleOutcome::Installed(RuleChange::Replaced(old)) => {
                    format!("replaced (was output:{})", old.out_port)
                }
                RuleOutcome::Installed(RuleChange::Unchanged) => String::from("unchanged"),
                RuleOutcome::Failed(e) => format!("FAILED: {}", e),
                RuleOutcome::RolledBack => String::from("rolled back"),
                RuleOutcome::RollbackFailed(e) => format!("ROLLBACK FAILED: {}", e),
            };
            format!("{} [{}]", flow_rule(&e.rule), outcome)
        })
        .collect()
}

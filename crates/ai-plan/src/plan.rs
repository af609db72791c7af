use core::fmt;

use crate::{Handle, PlanTreeNode};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of one successful planning pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plan {
    pub selected_goal: Handle,
    pub rule_refs: Vec<Handle>,
    pub context_refs: Vec<Handle>,
    /// Store handles of the top-level action steps.
    pub action_refs: Vec<Handle>,
    pub action_tree: PlanTreeNode,
}

impl Plan {
    /// Every node that takes part in the plan: rules, then contexts, then action steps.
    pub fn salient_handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.rule_refs
            .iter()
            .chain(&self.context_refs)
            .chain(&self.action_refs)
            .copied()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "selected demand goal: {}", self.selected_goal)?;
        match &self.action_tree {
            PlanTreeNode::Sequence(steps) => {
                for (i, step) in steps.iter().enumerate() {
                    writeln!(f, "step {}: {step}", i + 1)?;
                }
                Ok(())
            }
            step => writeln!(f, "step 1: {step}"),
        }
    }
}
